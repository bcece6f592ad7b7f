//! Core types and configuration for repodiff.
//!
//! This crate provides the data model shared by every stage of a comparison:
//! file records, pairings, classified diff entries and the final result.

mod config;
mod diff;
mod error;
mod record;
mod result;

pub use config::{CompareConfig, CompareConfigBuilder, FilterSet, VCS_DIRS};
pub use diff::{DiffEntry, DiffLine, DiffOp, DiffStats, DiffStatus, Hunk, hunks};
pub use error::{CompareError, EntryError, ScanWarning, Side, WarningKind};
pub use record::{ContentHash, FileRecord, MatchKind, Pairing};
pub use result::{CompareMode, ComparisonResult, ComparisonSummary};
