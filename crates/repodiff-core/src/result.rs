//! Comparison result container and summary statistics.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::FilterSet;
use crate::diff::{DiffEntry, DiffStatus};
use crate::error::ScanWarning;
use crate::record::MatchKind;

/// Matching policy used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareMode {
    /// Path-exact matching only.
    Shallow,
    /// Path-exact matching, then file name matching for the leftovers.
    Deep,
}

/// Per-status counts for a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub added: usize,
    pub removed: usize,
    pub identical: usize,
    pub modified: usize,
    /// Modified entries skipped as binary.
    pub binary: usize,
    /// Entries carrying a read error.
    pub unreadable: usize,
    /// Pairings made by file name only.
    pub renamed: usize,
}

impl ComparisonSummary {
    /// Tally a list of entries.
    pub fn from_entries(entries: &[DiffEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.status {
                DiffStatus::Added => summary.added += 1,
                DiffStatus::Removed => summary.removed += 1,
                DiffStatus::Identical => summary.identical += 1,
                DiffStatus::Modified => summary.modified += 1,
            }
            if entry.binary {
                summary.binary += 1;
            }
            if entry.error.is_some() {
                summary.unreadable += 1;
            }
            if entry.pairing.match_kind() == MatchKind::FilenameOnly {
                summary.renamed += 1;
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.identical + self.modified
    }

    /// Whether the two trees differ at all.
    pub fn has_differences(&self) -> bool {
        self.added + self.removed + self.modified > 0
    }
}

/// The complete, immutable output of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    /// Entries in report order.
    pub entries: Vec<DiffEntry>,
    pub mode: CompareMode,
    pub filters_applied: FilterSet,
    /// Canonical left root.
    pub left_root: PathBuf,
    /// Canonical right root.
    pub right_root: PathBuf,
    /// Files skipped while walking either tree.
    pub warnings: Vec<ScanWarning>,
    pub summary: ComparisonSummary,
    /// Wall-clock time of the run. Not serialized, so identical runs
    /// produce identical JSON.
    #[serde(skip)]
    pub duration: Duration,
}

impl ComparisonResult {
    /// Distinct lowercase extensions among all compared files.
    pub fn extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self
            .paths()
            .filter_map(|p| {
                let name = p.rsplit('/').next()?;
                let (stem, ext) = name.rsplit_once('.')?;
                (!stem.is_empty()).then(|| ext.to_lowercase())
            })
            .collect();
        exts.sort();
        exts.dedup();
        exts
    }

    /// Distinct parent directories among all compared files.
    pub fn directories(&self) -> Vec<String> {
        let mut dirs: Vec<String> = self
            .paths()
            .filter_map(|p| p.rsplit_once('/').map(|(dir, _)| dir.to_string()))
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|e| {
            e.pairing
                .left()
                .into_iter()
                .chain(e.pairing.right())
                .map(|r| r.relative_path.as_str())
        })
    }
}
