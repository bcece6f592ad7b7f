//! Walk → match → diff pipeline.

use std::time::Instant;

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use repodiff_analyze::{DiffConfig, Differ, Matcher};
use repodiff_core::{
    CompareConfig, CompareError, ComparisonResult, ComparisonSummary, DiffEntry, Pairing,
};
use repodiff_scan::TreeWalker;

/// Runs full comparisons of two trees.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    diff_config: DiffConfig,
}

impl Comparator {
    /// Create a comparator with default diff settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparator with custom diff settings.
    pub fn with_diff_config(diff_config: DiffConfig) -> Self {
        Self { diff_config }
    }

    /// Compare the two roots named in `config`.
    pub fn compare(&self, config: &CompareConfig) -> Result<ComparisonResult, CompareError> {
        self.compare_with_cancel(config, &CancellationToken::new())
    }

    /// Compare the two roots, giving up with [`CompareError::Cancelled`] once
    /// `cancel` fires. A cancelled run yields no partial result.
    pub fn compare_with_cancel(
        &self,
        config: &CompareConfig,
        cancel: &CancellationToken,
    ) -> Result<ComparisonResult, CompareError> {
        match config.threads {
            0 => self.run(config, cancel),
            n => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| CompareError::InvalidConfig {
                        message: format!("cannot start {n} worker threads: {e}"),
                    })?;
                pool.install(|| self.run(config, cancel))
            }
        }
    }

    fn run(
        &self,
        config: &CompareConfig,
        cancel: &CancellationToken,
    ) -> Result<ComparisonResult, CompareError> {
        let start = Instant::now();
        let walker = tree_walker(config);

        let (left, right) = rayon::join(
            || walker.walk_with_cancel(&config.left_root, &config.filters, cancel),
            || walker.walk_with_cancel(&config.right_root, &config.filters, cancel),
        );
        let left = left?;
        let right = right?;
        check_cancel(cancel)?;

        let mut warnings = left.warnings;
        warnings.extend(right.warnings);

        let pairings = Matcher::new(config.mode()).match_records(left.records, right.records);
        check_cancel(cancel)?;

        let differ = Differ::with_config(&left.root, &right.root, self.diff_config.clone());
        let mut entries = classify_all(&differ, pairings, cancel)?;

        // Completion order is irrelevant; the report order is total.
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let summary = ComparisonSummary::from_entries(&entries);
        tracing::info!(
            added = summary.added,
            removed = summary.removed,
            modified = summary.modified,
            identical = summary.identical,
            warnings = warnings.len(),
            "comparison complete"
        );

        Ok(ComparisonResult {
            entries,
            mode: config.mode(),
            filters_applied: config.filters.clone(),
            left_root: left.root,
            right_root: right.root,
            warnings,
            summary,
            duration: start.elapsed(),
        })
    }
}

fn tree_walker(config: &CompareConfig) -> TreeWalker {
    TreeWalker::new()
        .with_threads(config.threads)
        .with_hidden(config.include_hidden)
}

/// Classify every pairing in parallel, in input order.
fn classify_all(
    differ: &Differ,
    pairings: Vec<Pairing>,
    cancel: &CancellationToken,
) -> Result<Vec<DiffEntry>, CompareError> {
    let entries: Option<Vec<DiffEntry>> = pairings
        .into_par_iter()
        .map(|pairing| (!cancel.is_cancelled()).then(|| differ.classify(pairing)))
        .collect();
    let entries = entries.ok_or(CompareError::Cancelled)?;
    check_cancel(cancel)?;
    Ok(entries)
}

fn check_cancel(cancel: &CancellationToken) -> Result<(), CompareError> {
    if cancel.is_cancelled() {
        Err(CompareError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_aborts() {
        let temp = TempDir::new().unwrap();
        let config = CompareConfig::new(temp.path().join("left"), temp.path());
        let err = Comparator::new().compare(&config).unwrap_err();
        assert!(matches!(err, CompareError::NotFound { .. }));
    }

    #[test]
    fn test_pre_cancelled_run_has_no_result() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        fs::write(left.path().join("a.txt"), "a").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let config = CompareConfig::new(left.path(), right.path());
        let err = Comparator::new().compare_with_cancel(&config, &cancel).unwrap_err();
        assert!(matches!(err, CompareError::Cancelled));
    }

    #[test]
    fn test_dedicated_thread_pool() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        fs::write(left.path().join("a.txt"), "a").unwrap();
        fs::write(right.path().join("a.txt"), "b").unwrap();

        let config = CompareConfig::builder()
            .left_root(left.path())
            .right_root(right.path())
            .threads(2usize)
            .build()
            .unwrap();
        assert_eq!(
            tree_walker(&config),
            TreeWalker::new().with_threads(2).with_hidden(true)
        );

        let result = Comparator::new().compare(&config).unwrap();
        assert_eq!(result.summary.modified, 1);
    }

    #[test]
    fn test_cancel_between_walk_and_classification() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        fs::write(left.path().join("a.txt"), "one\n").unwrap();
        fs::write(right.path().join("a.txt"), "two\n").unwrap();

        let cancel = CancellationToken::new();
        let config = CompareConfig::new(left.path(), right.path());
        let walker = tree_walker(&config);
        let left_listing = walker
            .walk_with_cancel(left.path(), &config.filters, &cancel)
            .unwrap();
        let right_listing = walker
            .walk_with_cancel(right.path(), &config.filters, &cancel)
            .unwrap();
        let pairings = Matcher::new(config.mode())
            .match_records(left_listing.records, right_listing.records);
        assert_eq!(pairings.len(), 1);

        cancel.cancel();
        let differ = Differ::new(&left_listing.root, &right_listing.root);
        let err = classify_all(&differ, pairings, &cancel).unwrap_err();
        assert!(matches!(err, CompareError::Cancelled));
    }
}
