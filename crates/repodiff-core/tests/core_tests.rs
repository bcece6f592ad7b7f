use repodiff_core::{
    CompareConfig, CompareError, CompareMode, ContentHash, DiffEntry, DiffLine, DiffOp,
    DiffStatus, EntryError, FileRecord, FilterSet, MatchKind, Pairing, Side, hunks,
};

fn record(path: &str, byte: u8) -> FileRecord {
    FileRecord::new(path, 10, ContentHash::new([byte; 32]))
}

#[test]
fn test_content_hash_creation_and_hex() {
    let bytes = [0xab; 32];
    let hash = ContentHash::new(bytes);

    let hex = hash.to_hex();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(hex.starts_with("ab"));
    assert_eq!(hash.to_string(), hex);

    assert_eq!(hash, ContentHash::new(bytes));
    assert_ne!(hash, ContentHash::new([0xcd; 32]));
}

#[test]
fn test_pairing_constructors_keep_one_side() {
    let pairings = [
        Pairing::exact(record("a.txt", 1), record("a.txt", 1)),
        Pairing::by_filename(record("x/a.txt", 1), record("y/a.txt", 2)),
        Pairing::left_only(record("gone.txt", 1)),
        Pairing::right_only(record("new.txt", 1)),
    ];

    for pairing in &pairings {
        assert!(pairing.left().is_some() || pairing.right().is_some());
    }
    assert_eq!(pairings[0].match_kind(), MatchKind::ExactPath);
    assert_eq!(pairings[1].match_kind(), MatchKind::FilenameOnly);
    assert_eq!(pairings[2].match_kind(), MatchKind::Unmatched);
    assert_eq!(pairings[3].match_kind(), MatchKind::Unmatched);
}

#[test]
fn test_entry_constructors() {
    let pairing = Pairing::exact(record("img.png", 1), record("img.png", 2));

    let binary = DiffEntry::binary(pairing.clone());
    assert_eq!(binary.status, DiffStatus::Modified);
    assert!(binary.binary);
    assert!(binary.line_diff.is_none());

    let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let unreadable = DiffEntry::unreadable(pairing, EntryError::read(Side::Left, "img.png", &err));
    assert_eq!(unreadable.status, DiffStatus::Modified);
    assert!(unreadable.line_diff.is_none());
    assert_eq!(unreadable.error.as_ref().map(|e| e.side), Some(Side::Left));
}

#[test]
fn test_status_order() {
    let mut statuses = vec![
        DiffStatus::Added,
        DiffStatus::Identical,
        DiffStatus::Removed,
        DiffStatus::Modified,
    ];
    statuses.sort_by_key(|s| s.rank());
    assert_eq!(
        statuses,
        vec![
            DiffStatus::Modified,
            DiffStatus::Identical,
            DiffStatus::Removed,
            DiffStatus::Added
        ]
    );
}

#[test]
fn test_hunks_cover_leading_and_trailing_changes() {
    let lines = vec![
        DiffLine::insert(1, "header\n"),
        DiffLine::equal(1, 2, "a\n"),
        DiffLine::equal(2, 3, "b\n"),
        DiffLine::equal(3, 4, "c\n"),
        DiffLine::equal(4, 5, "d\n"),
        DiffLine::delete(5, "footer\n"),
    ];

    let found = hunks(&lines, 1);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].lines, 0..2);
    assert_eq!(found[0].left_start, 1);
    assert_eq!(found[0].right_start, 1);
    assert_eq!(found[1].lines, 4..6);
    assert_eq!(lines[found[1].lines.end - 1].op, DiffOp::Delete);
}

#[test]
fn test_compare_config_builder() {
    let config = CompareConfig::builder()
        .left_root("/data/protocol")
        .right_root("/data/2024-07-reserve")
        .filters(FilterSet::new([".sol"], ["node_modules", "lib"]))
        .deep(true)
        .include_hidden(false)
        .build()
        .unwrap();

    assert_eq!(config.mode(), CompareMode::Deep);
    assert!(!config.include_hidden);
    assert_eq!(config.filters.excluded_dirs.len(), 2);
    assert!(config.filters.matches_extension("Main.sol"));
    assert!(!config.filters.matches_extension("README.md"));
}

#[test]
fn test_compare_error_display() {
    let err = CompareError::NotADirectory {
        path: "/etc/hosts".into(),
    };
    assert!(err.to_string().contains("/etc/hosts"));
    assert_eq!(CompareError::Cancelled.to_string(), "Comparison cancelled");
}
