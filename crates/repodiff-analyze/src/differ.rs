//! Classification of pairings and line-level diffs.
//!
//! Content is only read for pairings whose hashes differ. Identical,
//! added and removed files never touch the disk here.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use similar::{Algorithm, ChangeTag, TextDiff};

use repodiff_core::{DiffEntry, DiffLine, DiffStatus, EntryError, Pairing, Side};

/// Configuration for content diffing.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DiffConfig {
    /// Bytes inspected at the start of a file when sniffing for binary content.
    #[builder(default = "8192")]
    pub sniff_len: usize,

    /// Largest `left_lines * right_lines` product aligned with the LCS table.
    /// Bigger pairs are aligned with Myers, which also yields a minimal script.
    #[builder(default = "16_000_000")]
    pub max_lcs_cells: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            sniff_len: 8192,
            max_lcs_cells: 16_000_000,
        }
    }
}

impl DiffConfig {
    /// Create a new config builder.
    pub fn builder() -> DiffConfigBuilder {
        DiffConfigBuilder::default()
    }
}

/// Classifies pairings against the two tree roots.
#[derive(Debug, Clone)]
pub struct Differ {
    left_root: PathBuf,
    right_root: PathBuf,
    config: DiffConfig,
}

impl Differ {
    /// Create a differ with default config.
    pub fn new(left_root: impl Into<PathBuf>, right_root: impl Into<PathBuf>) -> Self {
        Self::with_config(left_root, right_root, DiffConfig::default())
    }

    /// Create a differ with custom config.
    pub fn with_config(
        left_root: impl Into<PathBuf>,
        right_root: impl Into<PathBuf>,
        config: DiffConfig,
    ) -> Self {
        Self {
            left_root: left_root.into(),
            right_root: right_root.into(),
            config,
        }
    }

    /// Classify one pairing.
    pub fn classify(&self, pairing: Pairing) -> DiffEntry {
        let (left, right) = match (pairing.left(), pairing.right()) {
            (None, _) => return DiffEntry::new(pairing, DiffStatus::Added),
            (_, None) => return DiffEntry::new(pairing, DiffStatus::Removed),
            (Some(left), Some(right)) if left.content_hash == right.content_hash => {
                return DiffEntry::new(pairing, DiffStatus::Identical);
            }
            (Some(left), Some(right)) => (left, right),
        };

        let left_text = self.read_side(Side::Left, &left.relative_path);
        let right_text = self.read_side(Side::Right, &right.relative_path);

        match (left_text, right_text) {
            (Err(error), _) | (_, Err(error)) => {
                tracing::warn!(path = %error.path, side = %error.side, "{}", error.message);
                DiffEntry::unreadable(pairing, error)
            }
            (Ok(Some(old)), Ok(Some(new))) => {
                let lines = diff_lines(&old, &new, self.config.max_lcs_cells);
                DiffEntry::modified(pairing, lines)
            }
            _ => {
                tracing::debug!(path = pairing.primary_path(), "binary content, skipping line diff");
                DiffEntry::binary(pairing)
            }
        }
    }

    fn read_side(&self, side: Side, relative_path: &str) -> Result<Option<String>, EntryError> {
        let root = match side {
            Side::Left => &self.left_root,
            Side::Right => &self.right_root,
        };
        read_text(&root.join(relative_path), self.config.sniff_len)
            .map_err(|e| EntryError::read(side, relative_path, &e))
    }
}

/// Read a file as text, or `None` when it is binary or not valid UTF-8.
///
/// A NUL byte within the first `sniff_len` bytes marks the file as binary
/// before the rest is read.
fn read_text(path: &Path, sniff_len: usize) -> io::Result<Option<String>> {
    let mut file = File::open(path)?;

    let mut bytes = Vec::with_capacity(sniff_len);
    file.by_ref().take(sniff_len as u64).read_to_end(&mut bytes)?;
    if bytes.contains(&0) {
        return Ok(None);
    }

    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes).ok())
}

/// Align two texts line by line.
///
/// Line numbers are 1-based. Each line keeps its terminator.
pub fn diff_lines(old: &str, new: &str, max_lcs_cells: usize) -> Vec<DiffLine> {
    let cells = old.lines().count().saturating_mul(new.lines().count());
    let algorithm = if cells <= max_lcs_cells {
        Algorithm::Lcs
    } else {
        Algorithm::Myers
    };

    let diff = TextDiff::configure().algorithm(algorithm).diff_lines(old, new);

    diff.iter_all_changes()
        .filter_map(|change| {
            let old_no = change.old_index().map(|i| i + 1);
            let new_no = change.new_index().map(|i| i + 1);
            let text = change.value();
            match change.tag() {
                ChangeTag::Equal => Some(DiffLine::equal(old_no?, new_no?, text)),
                ChangeTag::Delete => Some(DiffLine::delete(old_no?, text)),
                ChangeTag::Insert => Some(DiffLine::insert(new_no?, text)),
            }
        })
        .collect()
}
