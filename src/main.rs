//! repodiff - compare two repository trees and report file-level differences.
//!
//! Usage:
//!   repodiff LEFT RIGHT                     Compare by relative path
//!   repodiff LEFT RIGHT --deep              Also pair moved files by name
//!   repodiff LEFT RIGHT -e sol -x lib       Only .sol files, skip lib/ dirs
//!   repodiff LEFT RIGHT --format json       Machine-readable result
//!   repodiff --help                         Show help

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use repodiff_core::{DiffEntry, DiffOp, DiffStatus, hunks};
use repodiff_engine::{Comparator, CompareConfig, ComparisonResult, FilterSet, SearchIndex};

#[derive(Parser)]
#[command(
    name = "repodiff",
    version,
    about = "Compare two repository trees and report file-level differences",
    long_about = "repodiff walks two directory trees, pairs their files and classifies \
                  every pair as added, removed, identical or modified.\n\n\
                  Modified text files come with a line diff. Use --deep to pair files \
                  that moved between directories by their file name."
)]
struct Cli {
    /// Left (original) tree
    left: PathBuf,

    /// Right (changed) tree
    right: PathBuf,

    /// Only compare files with this extension (repeatable, e.g. "sol" or ".rs")
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Skip directories with this name at any depth (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "DIR")]
    exclude: Vec<String>,

    /// Pair unmatched files by file name
    #[arg(short, long)]
    deep: bool,

    /// Skip files and directories starting with `.`
    #[arg(long)]
    skip_hidden: bool,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Only report entries whose path or diff text contains TERM
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,

    /// Also write the text report to FILE
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Unchanged lines shown around each change
    #[arg(short = 'C', long, default_value = "3")]
    context: usize,

    /// Log pipeline progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    fn compare_config(&self) -> Result<CompareConfig> {
        let config = CompareConfig::builder()
            .left_root(self.left.clone())
            .right_root(self.right.clone())
            .filters(FilterSet::new(&self.extensions, &self.exclude))
            .deep(self.deep)
            .include_hidden(!self.skip_hidden)
            .threads(self.threads)
            .build()
            .context("Invalid arguments")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.compare_config()?;
    let result = run_compare(config).await?;

    let index = SearchIndex::build(&result);
    let entries = index.query(cli.search.as_deref().unwrap_or_default());

    match cli.format {
        OutputFormat::Text => {
            let report = render_text(&result, &entries, cli.context, cli.search.as_deref())?;
            print!("{report}");
            if let Some(log_path) = &cli.log {
                std::fs::write(log_path, &report)
                    .with_context(|| format!("Failed to write {}", log_path.display()))?;
                eprintln!("Report written to {}", log_path.display());
            }
        }
        OutputFormat::Json => {
            let json = if cli.search.is_some() {
                serde_json::to_string_pretty(&entries)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{json}");
            if let Some(log_path) = &cli.log {
                let report = render_text(&result, &entries, cli.context, cli.search.as_deref())?;
                std::fs::write(log_path, report)
                    .with_context(|| format!("Failed to write {}", log_path.display()))?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the comparison off the async runtime, cancelling it on Ctrl-C.
async fn run_compare(config: CompareConfig) -> Result<ComparisonResult> {
    eprintln!(
        "Comparing {} with {}...",
        config.left_root.display(),
        config.right_root.display()
    );

    let cancel = CancellationToken::new();
    let mut worker = {
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || Comparator::new().compare_with_cancel(&config, &cancel))
    };

    let joined = tokio::select! {
        joined = &mut worker => joined,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted, cancelling...");
            cancel.cancel();
            worker.await
        }
    };

    let result = joined
        .context("Comparison task failed")?
        .context("Comparison failed")?;
    Ok(result)
}

/// Render the human-readable report for `entries`, a subset of `result`.
fn render_text(
    result: &ComparisonResult,
    entries: &[&DiffEntry],
    context: usize,
    search: Option<&str>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let summary = &result.summary;

    writeln!(out)?;
    writeln!(out, "{}", "─".repeat(70))?;
    writeln!(
        out,
        " {} -> {}",
        result.left_root.display(),
        result.right_root.display()
    )?;
    writeln!(
        out,
        " Mode: {:?}, extensions: {}, excluded dirs: {}",
        result.mode,
        join_or(&result.filters_applied.extensions, "all"),
        join_or(&result.filters_applied.excluded_dirs, "none")
    )?;
    writeln!(
        out,
        " {} files: {} modified, {} identical, {} removed, {} added",
        summary.total(),
        summary.modified,
        summary.identical,
        summary.removed,
        summary.added
    )?;
    if summary.renamed + summary.binary + summary.unreadable > 0 {
        writeln!(
            out,
            " {} paired by name, {} binary, {} unreadable",
            summary.renamed, summary.binary, summary.unreadable
        )?;
    }
    writeln!(out, " Compared in {:.2}s", result.duration.as_secs_f64())?;
    if let Some(term) = search {
        writeln!(out, " Showing {} entries matching {:?}", entries.len(), term)?;
    }
    writeln!(out, "{}", "─".repeat(70))?;

    writeln!(out)?;
    writeln!(
        out,
        " Extensions found: {}",
        join_or(&result.extensions(), "none")
    )?;
    writeln!(
        out,
        " Directories found: {}",
        join_or(&result.directories(), "none")
    )?;

    for status in [
        DiffStatus::Modified,
        DiffStatus::Removed,
        DiffStatus::Added,
        DiffStatus::Identical,
    ] {
        let group: Vec<&DiffEntry> = entries
            .iter()
            .copied()
            .filter(|e| e.status == status)
            .collect();
        if group.is_empty() {
            continue;
        }

        writeln!(out)?;
        writeln!(out, " {} ({}):", capitalize(status.label()), group.len())?;
        for entry in group {
            render_entry(&mut out, entry, context)?;
        }
    }

    if !result.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, " {} warning(s) during walk:", result.warnings.len())?;
        for warning in &result.warnings {
            writeln!(out, "   {}: {}", warning.path.display(), warning.message)?;
        }
    }
    writeln!(out)?;

    Ok(out)
}

fn render_entry(out: &mut String, entry: &DiffEntry, context: usize) -> fmt::Result {
    let path = entry.pairing.display_path();
    let sizes = match (entry.pairing.left(), entry.pairing.right()) {
        (Some(l), Some(r)) if l.size != r.size => {
            format!("{} -> {}", format_size(l.size), format_size(r.size))
        }
        (Some(record), _) | (None, Some(record)) => format_size(record.size),
        (None, None) => String::new(),
    };

    if let Some(error) = &entry.error {
        return writeln!(out, "   {path} [unreadable] {error}");
    }
    if entry.binary {
        return writeln!(out, "   {path} [binary] ({sizes})");
    }

    let Some(lines) = &entry.line_diff else {
        return writeln!(out, "   {path} ({sizes})");
    };

    let stats = entry.stats();
    writeln!(
        out,
        "   {path} (+{} -{}, {sizes})",
        stats.insertions, stats.deletions
    )?;
    for hunk in hunks(lines, context) {
        writeln!(out, "     {}", hunk.header())?;
        for line in &lines[hunk.lines] {
            let marker = match line.op {
                DiffOp::Equal => ' ',
                DiffOp::Insert => '+',
                DiffOp::Delete => '-',
            };
            writeln!(out, "     {marker}{}", line.content())?;
        }
    }
    Ok(())
}

fn join_or<'a>(items: impl IntoIterator<Item = &'a String>, empty: &str) -> String {
    let joined: Vec<&str> = items.into_iter().map(String::as_str).collect();
    if joined.is_empty() {
        empty.to_string()
    } else {
        joined.join(", ")
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
