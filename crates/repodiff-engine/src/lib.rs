//! Comparison orchestration for repodiff.
//!
//! [`Comparator`] sequences the pipeline:
//!
//! 1. Walk both roots (concurrently)
//! 2. Match records by path, then optionally by file name
//! 3. Classify every pairing (in parallel)
//! 4. Sort entries into the report order and summarize
//!
//! The report order is: modified, identical, removed, added; each group
//! sorted by left path, then right path. It never depends on thread timing.
//!
//! # Example
//!
//! ```rust,no_run
//! use repodiff_engine::{Comparator, CompareConfig, FilterSet};
//!
//! let config = CompareConfig::builder()
//!     .left_root("data/protocol")
//!     .right_root("data/2024-07-reserve")
//!     .filters(FilterSet::new([".sol"], ["node_modules"]))
//!     .deep(true)
//!     .build()
//!     .unwrap();
//!
//! let result = Comparator::new().compare(&config).unwrap();
//! println!("{} modified", result.summary.modified);
//! ```

mod comparator;

pub use comparator::Comparator;

pub use repodiff_analyze::{DiffConfig, SearchIndex};
pub use repodiff_core::{CompareConfig, CompareError, ComparisonResult, FilterSet};
