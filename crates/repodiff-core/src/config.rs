//! Comparison configuration types.

use std::collections::BTreeSet;
use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::result::CompareMode;

/// Directory names that always hold version-control metadata.
pub const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".bzr", "_darcs", "CVS"];

/// Extension allow-set and excluded directory names for a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Allowed extensions, lowercase, without a leading dot. Empty = all.
    pub extensions: BTreeSet<String>,
    /// Directory names pruned at every depth.
    pub excluded_dirs: BTreeSet<String>,
}

impl FilterSet {
    /// Build a filter set from raw user input.
    ///
    /// Extensions may be given as `.sol`, `sol` or `SOL`; all three mean the same.
    pub fn new<E, D>(extensions: E, excluded_dirs: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        let excluded_dirs = excluded_dirs
            .into_iter()
            .map(|d| d.as_ref().trim().trim_matches('/').to_string())
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            extensions,
            excluded_dirs,
        }
    }

    /// Check whether a file name passes the extension filter.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let lower = file_name.to_lowercase();
        self.extensions.iter().any(|ext| {
            lower.len() > ext.len()
                && lower.ends_with(ext.as_str())
                && lower.as_bytes()[lower.len() - ext.len() - 1] == b'.'
        })
    }

    /// Check whether a directory with this name is pruned.
    pub fn is_excluded_dir(&self, dir_name: &str) -> bool {
        VCS_DIRS.contains(&dir_name) || self.excluded_dirs.contains(dir_name)
    }
}

/// Configuration for a comparison run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CompareConfig {
    /// Root of the left (original) tree.
    pub left_root: PathBuf,

    /// Root of the right (changed) tree.
    pub right_root: PathBuf,

    /// Extension and directory filters.
    #[builder(default)]
    #[serde(default)]
    pub filters: FilterSet,

    /// Pair leftover files by file name after exact-path matching.
    #[builder(default = "false")]
    #[serde(default)]
    pub deep: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Number of worker threads (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

impl CompareConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        for (name, root) in [("Left", &self.left_root), ("Right", &self.right_root)] {
            match root {
                Some(root) if root.as_os_str().is_empty() => {
                    return Err(format!("{name} root path cannot be empty"));
                }
                Some(_) => {}
                None => return Err(format!("{name} root path is required")),
            }
        }
        Ok(())
    }
}

impl CompareConfig {
    /// Create a new compare config builder.
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder::default()
    }

    /// Create a shallow, unfiltered config for two roots.
    pub fn new(left_root: impl Into<PathBuf>, right_root: impl Into<PathBuf>) -> Self {
        Self {
            left_root: left_root.into(),
            right_root: right_root.into(),
            filters: FilterSet::default(),
            deep: false,
            include_hidden: true,
            threads: 0,
        }
    }

    /// Matching policy selected by `deep`.
    pub fn mode(&self) -> CompareMode {
        if self.deep {
            CompareMode::Deep
        } else {
            CompareMode::Shallow
        }
    }
}
