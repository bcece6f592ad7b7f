//! Pairing of file records from two trees.
//!
//! Matching runs in up to two phases:
//! 1. Exact relative-path matching (always)
//! 2. File-name matching of the leftovers (deep mode only)
//!
//! Every input record ends up in exactly one pairing.

use std::collections::{BTreeMap, HashMap};

use compact_str::CompactString;

use repodiff_core::{CompareMode, FileRecord, Pairing};

/// Pairs records from the left and right trees.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    mode: CompareMode,
}

impl Matcher {
    /// Create a matcher for the given policy.
    pub fn new(mode: CompareMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CompareMode {
        self.mode
    }

    /// Pair `left` against `right`.
    ///
    /// Output order: exact pairs by path, file-name pairs by file name then
    /// left path, unmatched left records, unmatched right records.
    pub fn match_records(&self, left: Vec<FileRecord>, right: Vec<FileRecord>) -> Vec<Pairing> {
        let (mut pairings, left_rest, right_rest) = match_exact(left, right);
        let exact = pairings.len();

        let (left_rest, right_rest) = match self.mode {
            CompareMode::Shallow => (left_rest, right_rest),
            CompareMode::Deep => match_by_filename(left_rest, right_rest, &mut pairings),
        };

        tracing::debug!(
            exact,
            by_filename = pairings.len() - exact,
            left_only = left_rest.len(),
            right_only = right_rest.len(),
            "matched records"
        );

        pairings.extend(left_rest.into_iter().map(Pairing::left_only));
        pairings.extend(right_rest.into_iter().map(Pairing::right_only));
        pairings
    }
}

/// Phase 1: pair identical relative paths. Leftovers come back sorted by path.
fn match_exact(
    mut left: Vec<FileRecord>,
    right: Vec<FileRecord>,
) -> (Vec<Pairing>, Vec<FileRecord>, Vec<FileRecord>) {
    left.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let mut right_by_path: HashMap<String, Vec<FileRecord>> = HashMap::with_capacity(right.len());
    for record in right {
        right_by_path
            .entry(record.relative_path.clone())
            .or_default()
            .push(record);
    }

    let mut pairings = Vec::new();
    let mut left_rest = Vec::new();

    for record in left {
        let counterpart = right_by_path
            .get_mut(&record.relative_path)
            .filter(|candidates| !candidates.is_empty())
            .map(|candidates| candidates.remove(0));
        match counterpart {
            Some(other) => pairings.push(Pairing::exact(record, other)),
            None => left_rest.push(record),
        }
    }

    let mut right_rest: Vec<FileRecord> = right_by_path.into_values().flatten().collect();
    right_rest.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    (pairings, left_rest, right_rest)
}

/// Phase 2: pair leftovers sharing a file name, lowest paths first.
fn match_by_filename(
    left: Vec<FileRecord>,
    right: Vec<FileRecord>,
    pairings: &mut Vec<Pairing>,
) -> (Vec<FileRecord>, Vec<FileRecord>) {
    let mut groups: BTreeMap<CompactString, (Vec<FileRecord>, Vec<FileRecord>)> = BTreeMap::new();
    for record in left {
        groups.entry(record.filename.clone()).or_default().0.push(record);
    }
    for record in right {
        groups.entry(record.filename.clone()).or_default().1.push(record);
    }

    let mut left_rest = Vec::new();
    let mut right_rest = Vec::new();

    for (_, (mut lefts, mut rights)) in groups {
        lefts.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        rights.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        let paired = lefts.len().min(rights.len());
        let left_surplus = lefts.split_off(paired);
        let right_surplus = rights.split_off(paired);

        pairings.extend(
            lefts
                .into_iter()
                .zip(rights)
                .map(|(l, r)| Pairing::by_filename(l, r)),
        );
        left_rest.extend(left_surplus);
        right_rest.extend(right_surplus);
    }

    left_rest.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    right_rest.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    (left_rest, right_rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use repodiff_core::{ContentHash, MatchKind};

    fn record(path: &str) -> FileRecord {
        FileRecord::new(path, 1, ContentHash::new([1; 32]))
    }

    fn records(paths: &[&str]) -> Vec<FileRecord> {
        paths.iter().map(|p| record(p)).collect()
    }

    fn describe(pairings: &[Pairing]) -> Vec<(Option<&str>, Option<&str>, MatchKind)> {
        pairings
            .iter()
            .map(|p| {
                (
                    p.left().map(|r| r.relative_path.as_str()),
                    p.right().map(|r| r.relative_path.as_str()),
                    p.match_kind(),
                )
            })
            .collect()
    }

    #[test]
    fn test_shallow_exact_and_leftovers() {
        let pairings = Matcher::new(CompareMode::Shallow).match_records(
            records(&["a.txt", "dir1/x.txt"]),
            records(&["dir2/x.txt", "a.txt"]),
        );

        assert_eq!(
            describe(&pairings),
            vec![
                (Some("a.txt"), Some("a.txt"), MatchKind::ExactPath),
                (Some("dir1/x.txt"), None, MatchKind::Unmatched),
                (None, Some("dir2/x.txt"), MatchKind::Unmatched),
            ]
        );
    }

    #[test]
    fn test_deep_pairs_by_filename() {
        let pairings = Matcher::new(CompareMode::Deep)
            .match_records(records(&["dir1/x.txt"]), records(&["dir2/x.txt"]));

        assert_eq!(
            describe(&pairings),
            vec![(Some("dir1/x.txt"), Some("dir2/x.txt"), MatchKind::FilenameOnly)]
        );
    }

    #[test]
    fn test_deep_prefers_exact_path() {
        let pairings = Matcher::new(CompareMode::Deep).match_records(
            records(&["a/lib.rs", "b/lib.rs"]),
            records(&["b/lib.rs", "c/lib.rs"]),
        );

        assert_eq!(
            describe(&pairings),
            vec![
                (Some("b/lib.rs"), Some("b/lib.rs"), MatchKind::ExactPath),
                (Some("a/lib.rs"), Some("c/lib.rs"), MatchKind::FilenameOnly),
            ]
        );
    }

    #[test]
    fn test_deep_tie_break_by_path_with_surplus() {
        let pairings = Matcher::new(CompareMode::Deep).match_records(
            records(&["z/mod.rs", "a/mod.rs", "m/mod.rs"]),
            records(&["y/mod.rs", "b/mod.rs"]),
        );

        assert_eq!(
            describe(&pairings),
            vec![
                (Some("a/mod.rs"), Some("b/mod.rs"), MatchKind::FilenameOnly),
                (Some("m/mod.rs"), Some("y/mod.rs"), MatchKind::FilenameOnly),
                (Some("z/mod.rs"), None, MatchKind::Unmatched),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(Matcher::new(CompareMode::Deep)
            .match_records(Vec::new(), Vec::new())
            .is_empty());
    }
}
