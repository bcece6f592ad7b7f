//! JWalk-based tree walker producing sorted, hashed file records.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use repodiff_core::{CompareError, FileRecord, FilterSet, ScanWarning, WarningKind};

use crate::hash::hash_file;

/// Files found under one root, sorted by relative path.
#[derive(Debug, Clone)]
pub struct TreeListing {
    /// Canonical root path.
    pub root: PathBuf,
    /// One record per retained file.
    pub records: Vec<FileRecord>,
    /// Files skipped because they could not be read.
    pub warnings: Vec<ScanWarning>,
    /// Time spent walking and hashing.
    pub duration: Duration,
}

/// Recursive directory walker with filtering and parallel hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeWalker {
    threads: usize,
    include_hidden: bool,
}

impl TreeWalker {
    /// Create a walker using the default thread pool and including hidden files.
    pub fn new() -> Self {
        Self {
            threads: 0,
            include_hidden: true,
        }
    }

    /// Number of threads for directory reads (0 = auto-detect).
    /// Hashing runs on the current rayon pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Whether files and directories starting with `.` are walked.
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Walk `root`, keeping files that pass `filters`.
    pub fn walk(&self, root: &Path, filters: &FilterSet) -> Result<TreeListing, CompareError> {
        self.walk_with_cancel(root, filters, &CancellationToken::new())
    }

    /// Walk `root`, aborting with [`CompareError::Cancelled`] once `cancel` fires.
    pub fn walk_with_cancel(
        &self,
        root: &Path,
        filters: &FilterSet,
        cancel: &CancellationToken,
    ) -> Result<TreeListing, CompareError> {
        let start = Instant::now();
        let root_path = root.canonicalize().map_err(|e| CompareError::io(root, e))?;

        if !root_path.is_dir() {
            return Err(CompareError::NotADirectory { path: root_path });
        }
        // Surface an unreadable root as fatal instead of as a walk warning.
        std::fs::read_dir(&root_path).map_err(|e| CompareError::io(&root_path, e))?;

        tracing::debug!(root = %root_path.display(), "walking tree");

        let mut warnings = Vec::new();
        let candidates = self.collect_candidates(&root_path, filters, cancel, &mut warnings)?;

        let (mut records, hash_warnings) =
            hash_candidates(candidates, cancel).ok_or(CompareError::Cancelled)?;
        warnings.extend(hash_warnings);

        records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        warnings.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!(
            root = %root_path.display(),
            files = records.len(),
            warnings = warnings.len(),
            "walk complete"
        );

        Ok(TreeListing {
            root: root_path,
            records,
            warnings,
            duration: start.elapsed(),
        })
    }

    /// Enumerate regular files passing the filters, as (absolute, relative) paths.
    fn collect_candidates(
        &self,
        root_path: &Path,
        filters: &FilterSet,
        cancel: &CancellationToken,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<Vec<(PathBuf, String)>, CompareError> {
        // Directory reads get their own pool: the caller may already be a
        // rayon worker, and blocking one on the shared pool can stall the walk.
        let parallelism = Parallelism::RayonNewPool(self.threads);

        let prune = filters.clone();
        let walker = WalkDir::new(root_path)
            .parallelism(parallelism)
            .skip_hidden(!self.include_hidden)
            .follow_links(false)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| match child {
                    Ok(entry) => {
                        !(entry.file_type().is_dir()
                            && prune.is_excluded_dir(&entry.file_name().to_string_lossy()))
                    }
                    Err(_) => true,
                });
            });

        let mut candidates = Vec::new();

        for entry_result in walker {
            if cancel.is_cancelled() {
                return Err(CompareError::Cancelled);
            }

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    tracing::warn!(path = %path.display(), "walk error: {err}");
                    warnings.push(ScanWarning::new(path, err.to_string(), WarningKind::WalkError));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !filters.matches_extension(&file_name) {
                continue;
            }

            let path = entry.path();
            // Files only live below the root, so `None` here means a non-UTF-8 name.
            let Some(relative_path) = relative_posix_path(root_path, &path) else {
                tracing::warn!(path = %path.display(), "skipping path that is not valid UTF-8");
                warnings.push(ScanWarning::new(
                    path,
                    "Path is not valid UTF-8",
                    WarningKind::InvalidPath,
                ));
                continue;
            };
            candidates.push((path, relative_path));
        }

        Ok(candidates)
    }
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash every candidate in parallel. Unreadable files become warnings.
///
/// Returns `None` once `cancel` fires.
fn hash_candidates(
    candidates: Vec<(PathBuf, String)>,
    cancel: &CancellationToken,
) -> Option<(Vec<FileRecord>, Vec<ScanWarning>)> {
    let hashed: Option<Vec<Result<FileRecord, ScanWarning>>> = candidates
        .into_par_iter()
        .map(|(path, relative_path)| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(match hash_file(&path) {
                Ok((hash, size)) => Ok(FileRecord::new(relative_path, size, hash)),
                Err(err) => Err(ScanWarning::read_error(path, &err)),
            })
        })
        .collect();

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    for item in hashed? {
        match item {
            Ok(record) => records.push(record),
            Err(warning) => {
                tracing::warn!(path = %warning.path.display(), "{}", warning.message);
                warnings.push(warning);
            }
        }
    }
    Some((records, warnings))
}

/// Render `path` relative to `root` with forward slashes.
///
/// `None` when `path` is not below `root` or is not valid UTF-8.
fn relative_posix_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}
