//! File records and the pairings built from them.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// BLAKE3 content hash used to detect identical files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A single file found by the tree walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the tree root, with forward slashes.
    pub relative_path: String,
    /// File size in bytes.
    pub size: u64,
    /// Hash of the full file content.
    pub content_hash: ContentHash,
    /// Last path component.
    pub filename: CompactString,
}

impl FileRecord {
    /// Create a record, deriving `filename` from the relative path.
    pub fn new(relative_path: impl Into<String>, size: u64, content_hash: ContentHash) -> Self {
        let relative_path = relative_path.into();
        let filename = relative_path
            .rsplit('/')
            .next()
            .map(CompactString::new)
            .unwrap_or_default();
        Self {
            relative_path,
            size,
            content_hash,
            filename,
        }
    }
}

/// How a pairing was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    /// Same relative path on both sides.
    ExactPath,
    /// Different directories, same file name (deep mode only).
    FilenameOnly,
    /// Present on one side only.
    Unmatched,
}

/// Association between a file on the left tree and/or the right tree.
///
/// At least one side is always present; the constructors are the only way to
/// build one outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    left: Option<FileRecord>,
    right: Option<FileRecord>,
    match_kind: MatchKind,
}

impl Pairing {
    /// Pair two records with the same relative path.
    pub fn exact(left: FileRecord, right: FileRecord) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            match_kind: MatchKind::ExactPath,
        }
    }

    /// Pair two records that share only a file name.
    pub fn by_filename(left: FileRecord, right: FileRecord) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            match_kind: MatchKind::FilenameOnly,
        }
    }

    /// A left record with no counterpart.
    pub fn left_only(left: FileRecord) -> Self {
        Self {
            left: Some(left),
            right: None,
            match_kind: MatchKind::Unmatched,
        }
    }

    /// A right record with no counterpart.
    pub fn right_only(right: FileRecord) -> Self {
        Self {
            left: None,
            right: Some(right),
            match_kind: MatchKind::Unmatched,
        }
    }

    pub fn left(&self) -> Option<&FileRecord> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&FileRecord> {
        self.right.as_ref()
    }

    pub fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    /// Whether both sides are present.
    pub fn is_matched(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Left path if present, otherwise right path.
    pub fn primary_path(&self) -> &str {
        self.left
            .as_ref()
            .or(self.right.as_ref())
            .map(|r| r.relative_path.as_str())
            .unwrap_or_default()
    }

    /// Right path when both sides are present.
    pub fn secondary_path(&self) -> Option<&str> {
        match (&self.left, &self.right) {
            (Some(_), Some(right)) => Some(&right.relative_path),
            _ => None,
        }
    }

    /// Path shown to users: `left -> right` for filename-only pairs.
    pub fn display_path(&self) -> String {
        match (&self.left, &self.right) {
            (Some(left), Some(right)) if left.relative_path != right.relative_path => {
                format!("{} -> {}", left.relative_path, right.relative_path)
            }
            _ => self.primary_path().to_string(),
        }
    }
}
