//! Case-insensitive substring search over a comparison result.

use repodiff_core::{ComparisonResult, DiffEntry};

/// In-memory index over entry paths and diff text.
///
/// Built once per comparison; borrows the result it indexes.
#[derive(Debug)]
pub struct SearchIndex<'a> {
    entries: &'a [DiffEntry],
    /// Lowercased searchable text, one per entry.
    haystacks: Vec<String>,
}

impl<'a> SearchIndex<'a> {
    /// Index every entry of `result`.
    pub fn build(result: &'a ComparisonResult) -> Self {
        Self::from_entries(&result.entries)
    }

    /// Index a slice of entries.
    pub fn from_entries(entries: &'a [DiffEntry]) -> Self {
        let haystacks = entries.iter().map(haystack).collect();
        Self { entries, haystacks }
    }

    /// Entries whose path or diff text contains `term`, in entry order.
    ///
    /// A blank term matches everything.
    pub fn query(&self, term: &str) -> Vec<&'a DiffEntry> {
        let needle = term.trim().to_lowercase();
        let entries = self.entries;
        self.haystacks
            .iter()
            .zip(entries)
            .filter(|(haystack, _)| needle.is_empty() || haystack.contains(&needle))
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn haystack(entry: &DiffEntry) -> String {
    let mut text = String::new();
    for record in entry.pairing.left().into_iter().chain(entry.pairing.right()) {
        text.push_str(&record.relative_path);
        text.push('\n');
    }
    for line in entry.line_diff.iter().flatten() {
        text.push_str(&line.text);
        if !line.text.ends_with('\n') {
            text.push('\n');
        }
    }
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use repodiff_core::{ContentHash, DiffLine, DiffStatus, FileRecord, Pairing};

    fn record(path: &str) -> FileRecord {
        FileRecord::new(path, 1, ContentHash::new([3; 32]))
    }

    fn entries() -> Vec<DiffEntry> {
        vec![
            DiffEntry::modified(
                Pairing::exact(record("contracts/Vault.sol"), record("contracts/Vault.sol")),
                vec![
                    DiffLine::equal(1, 1, "pragma solidity ^0.8.0;\n"),
                    DiffLine::insert(2, "function withdrawAll() external {}\n"),
                ],
            ),
            DiffEntry::new(Pairing::right_only(record("docs/Withdraw.md")), DiffStatus::Added),
            DiffEntry::new(Pairing::left_only(record("README.md")), DiffStatus::Removed),
        ]
    }

    #[test]
    fn test_query_matches_path_and_diff_text_case_insensitively() {
        let entries = entries();
        let index = SearchIndex::from_entries(&entries);

        let hits = index.query("WITHDRAW");
        let paths: Vec<&str> = hits.iter().map(|e| e.pairing.primary_path()).collect();
        assert_eq!(paths, vec!["contracts/Vault.sol", "docs/Withdraw.md"]);

        assert_eq!(index.query("readme").len(), 1);
        assert!(index.query("nothing-like-this").is_empty());
    }

    #[test]
    fn test_blank_query_returns_all_in_order() {
        let entries = entries();
        let index = SearchIndex::from_entries(&entries);
        assert_eq!(index.len(), 3);
        assert_eq!(index.query("  ").len(), 3);
        assert_eq!(index.query("")[2].pairing.primary_path(), "README.md");
    }

    #[test]
    fn test_paths_do_not_run_together() {
        let entries = entries();
        let index = SearchIndex::from_entries(&entries);
        assert!(index.query("vault.solcontracts").is_empty());
    }
}
