//! Classified diff entries and line-level diff types.

use std::ops::Range;

use serde::Serialize;

use crate::error::EntryError;
use crate::record::Pairing;

/// Classification of a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiffStatus {
    /// Only present in the right tree.
    Added,
    /// Only present in the left tree.
    Removed,
    /// Same content hash on both sides.
    Identical,
    /// Content differs.
    Modified,
}

impl DiffStatus {
    /// Position of this status in the report order.
    pub fn rank(self) -> u8 {
        match self {
            Self::Modified => 0,
            Self::Identical => 1,
            Self::Removed => 2,
            Self::Added => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Identical => "identical",
            Self::Modified => "modified",
        }
    }
}

/// Line diff operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiffOp {
    Equal,
    Insert,
    Delete,
}

/// One line of a line-level diff.
///
/// `text` holds the line exactly as it appears in its file, terminator
/// included, so concatenating the `Equal` and `Insert` texts yields the right
/// file and the `Equal` and `Delete` texts yield the left file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub op: DiffOp,
    /// 1-based line number in the left file.
    pub left_line_no: Option<usize>,
    /// 1-based line number in the right file.
    pub right_line_no: Option<usize>,
    pub text: String,
}

impl DiffLine {
    pub fn equal(left_line_no: usize, right_line_no: usize, text: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Equal,
            left_line_no: Some(left_line_no),
            right_line_no: Some(right_line_no),
            text: text.into(),
        }
    }

    pub fn insert(right_line_no: usize, text: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Insert,
            left_line_no: None,
            right_line_no: Some(right_line_no),
            text: text.into(),
        }
    }

    pub fn delete(left_line_no: usize, text: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Delete,
            left_line_no: Some(left_line_no),
            right_line_no: None,
            text: text.into(),
        }
    }

    /// Line text without its terminator.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\n', '\r'])
    }

    pub fn is_change(&self) -> bool {
        self.op != DiffOp::Equal
    }
}

/// Inserted and deleted line counts for a modified entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub insertions: usize,
    pub deletions: usize,
}

/// A classified pairing, the unit handed to reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub pairing: Pairing,
    pub status: DiffStatus,
    /// Present only for modified text files that could be read.
    pub line_diff: Option<Vec<DiffLine>>,
    /// Content was sniffed as binary; no line diff was attempted.
    pub binary: bool,
    /// A side could not be read while diffing.
    pub error: Option<EntryError>,
}

impl DiffEntry {
    /// Entry that needs no content inspection.
    pub fn new(pairing: Pairing, status: DiffStatus) -> Self {
        Self {
            pairing,
            status,
            line_diff: None,
            binary: false,
            error: None,
        }
    }

    /// Modified text entry with its line diff.
    pub fn modified(pairing: Pairing, line_diff: Vec<DiffLine>) -> Self {
        Self {
            line_diff: Some(line_diff),
            ..Self::new(pairing, DiffStatus::Modified)
        }
    }

    /// Modified entry whose content is binary.
    pub fn binary(pairing: Pairing) -> Self {
        Self {
            binary: true,
            ..Self::new(pairing, DiffStatus::Modified)
        }
    }

    /// Modified entry where a side could not be read.
    pub fn unreadable(pairing: Pairing, error: EntryError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(pairing, DiffStatus::Modified)
        }
    }

    /// Inserted and deleted line counts.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for line in self.line_diff.iter().flatten() {
            match line.op {
                DiffOp::Insert => stats.insertions += 1,
                DiffOp::Delete => stats.deletions += 1,
                DiffOp::Equal => {}
            }
        }
        stats
    }

    /// Key defining the total report order.
    pub fn sort_key(&self) -> (u8, &str, &str) {
        (
            self.status.rank(),
            self.pairing.primary_path(),
            self.pairing.secondary_path().unwrap_or_default(),
        )
    }
}

/// A run of diff lines with surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    /// Index range into the line diff.
    pub lines: Range<usize>,
    /// First left line number covered (1-based, 0 if none).
    pub left_start: usize,
    pub left_len: usize,
    /// First right line number covered (1-based, 0 if none).
    pub right_start: usize,
    pub right_len: usize,
}

impl Hunk {
    /// Unified-diff style header, e.g. `@@ -3,7 +3,8 @@`.
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.left_start, self.left_len, self.right_start, self.right_len
        )
    }
}

/// Group changed lines into hunks with `context` unchanged lines around them.
///
/// Hunks whose context would overlap or touch are merged.
pub fn hunks(lines: &[DiffLine], context: usize) -> Vec<Hunk> {
    let mut ranges: Vec<Range<usize>> = Vec::new();

    for (idx, _) in lines.iter().enumerate().filter(|(_, l)| l.is_change()) {
        let start = idx.saturating_sub(context);
        let end = (idx + context + 1).min(lines.len());
        match ranges.last_mut() {
            Some(last) if start <= last.end => last.end = last.end.max(end),
            _ => ranges.push(start..end),
        }
    }

    ranges
        .into_iter()
        .map(|range| {
            let slice = &lines[range.clone()];
            let left_start = slice.iter().find_map(|l| l.left_line_no).unwrap_or(0);
            let right_start = slice.iter().find_map(|l| l.right_line_no).unwrap_or(0);
            Hunk {
                left_start,
                left_len: slice.iter().filter(|l| l.left_line_no.is_some()).count(),
                right_start,
                right_len: slice.iter().filter(|l| l.right_line_no.is_some()).count(),
                lines: range,
            }
        })
        .collect()
}
