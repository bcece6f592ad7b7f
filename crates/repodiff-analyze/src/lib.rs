//! Matching, diffing and search for repodiff.
//!
//! This crate holds the algorithmic stages that run after both trees have
//! been walked:
//!
//! - **Matching** - Pair records by exact path, then optionally by file name
//! - **Diffing** - Classify each pairing and align modified text line by line
//! - **Search** - Case-insensitive substring queries over a finished result
//!
//! # Matching and Diffing
//!
//! ```rust,ignore
//! use repodiff_analyze::{Differ, Matcher};
//! use repodiff_core::CompareMode;
//!
//! let pairings = Matcher::new(CompareMode::Deep).match_records(left.records, right.records);
//! let differ = Differ::new(&left.root, &right.root);
//! let entries: Vec<_> = pairings.into_iter().map(|p| differ.classify(p)).collect();
//! ```
//!
//! # Search
//!
//! ```rust,ignore
//! use repodiff_analyze::SearchIndex;
//!
//! let index = SearchIndex::build(&result);
//! for entry in index.query("withdraw") {
//!     println!("{}", entry.pairing.display_path());
//! }
//! ```

mod differ;
mod matcher;
mod search;

pub use differ::{DiffConfig, DiffConfigBuilder, Differ, diff_lines};
pub use matcher::Matcher;
pub use search::SearchIndex;

// Re-export core types
pub use repodiff_core::{DiffEntry, DiffLine, DiffStatus, FileRecord, MatchKind, Pairing};
