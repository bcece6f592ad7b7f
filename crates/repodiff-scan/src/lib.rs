//! Tree walking engine for repodiff.
//!
//! This crate turns a directory tree into a sorted list of
//! [`FileRecord`]s using jwalk for traversal and BLAKE3 for content hashes.
//!
//! # Overview
//!
//! - **Parallel traversal** via jwalk/rayon
//! - **Directory pruning** by exact name, at every depth, plus VCS metadata dirs
//! - **Extension filtering**, case-insensitive
//! - **Streaming hashes** with a bounded read buffer
//! - **Deterministic output**, sorted by relative path
//!
//! # Example
//!
//! ```rust,no_run
//! use repodiff_scan::{FilterSet, TreeWalker};
//!
//! let filters = FilterSet::new([".sol"], ["node_modules"]);
//! let listing = TreeWalker::new().walk("/path/to/repo".as_ref(), &filters).unwrap();
//!
//! for record in &listing.records {
//!     println!("{} {}", record.content_hash, record.relative_path);
//! }
//! ```

mod hash;
mod walker;

pub use hash::{HASH_BUFFER_SIZE, hash_bytes, hash_file, hash_reader};
pub use walker::{TreeListing, TreeWalker};

// Re-export core types for convenience
pub use repodiff_core::{CompareError, ContentHash, FileRecord, FilterSet, ScanWarning, WarningKind};
