//! pdfsmith - Remove pages from PDFs and merge PDFs and images into one.
//!
//! The document work is synchronous and runs on tokio's blocking pool so
//! the runtime stays free for progress output and signal handling.

mod cli;

use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use tracing::debug;

use crate::cli::{Cli, Command, InfoArgs, MergeArgs, OverwriteArgs, RemoveArgs};
use pdfsmith::config::{
    CompressionLevel, MergeOptions, OverwriteMode, PageRange, SessionOptions, WriteOptions,
};
use pdfsmith::document::DocumentSession;
use pdfsmith::error::{PdfSmithError, Result};
use pdfsmith::merge::{MergeEngine, MergeQueue, PageGeometry};
use pdfsmith::output::{
    OutputFormatter, display_merge_plan, display_merge_report, display_page_sizes,
};
use pdfsmith::utils::{collect_paths_for_patterns, format_file_size};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise only library errors are logged,
/// or everything down to debug with `--verbose`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_filter = if verbose {
        "pdfsmith=debug"
    } else {
        "pdfsmith=error"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);

    match cli.command {
        Command::Merge(args) => merge(args, formatter).await,
        Command::Remove(args) => remove(args, formatter).await,
        Command::Info(args) => info(args, formatter).await,
    }
}

async fn merge(args: MergeArgs, formatter: OutputFormatter) -> Result<()> {
    // JSON goes to stdout, so status text must not
    let formatter = if args.json {
        OutputFormatter::quiet()
    } else {
        formatter
    };

    let paths = collect_paths_for_patterns(&args.inputs)?;

    let mut queue = MergeQueue::new();
    for rejected in queue.add(paths) {
        if !rejected.is_recoverable() {
            return Err(rejected);
        }
        formatter.warning(&rejected.to_string());
    }
    formatter.debug(&format!("Queued {} source(s)", queue.len()));

    let options = MergeOptions {
        write: write_options(&args.compression)?,
        ..MergeOptions::default()
    };
    let engine = MergeEngine::with_options(options);

    if args.dry_run {
        let plan = blocking(move || engine.plan(&queue)).await?;

        if args.json {
            print_json(&plan)?;
        } else {
            display_merge_plan(&formatter, &plan);
            formatter.blank_line();
            formatter.success("Dry run completed successfully");
            formatter.info(&format!("  Output would be: {}", args.output.display()));
        }
        return Ok(());
    }

    check_output_overwrite(&args.output, overwrite_mode(args.overwrite), &formatter)?;

    formatter.info(&format!("Merging {} source(s)...", queue.len()));

    let output = args.output.clone();
    let (mut queue, report) = blocking(move || {
        let report = engine.run_with_progress(&queue, &output, |position, total, source| {
            formatter.progress(position, total, Some(&source.path.display().to_string()));
        });
        Ok((queue, report))
    })
    .await?;
    let report = report?;

    queue.clear();
    debug!(remaining = queue.len(), "merge queue cleared");

    if args.json {
        print_json(&report)
    } else {
        display_merge_report(&formatter, &report);
        Ok(())
    }
}

async fn remove(args: RemoveArgs, formatter: OutputFormatter) -> Result<()> {
    let range = PageRange::parse(&args.pages)
        .map_err(|e| PdfSmithError::invalid_config(e.to_string()))?;

    check_output_overwrite(&args.output, overwrite_mode(args.overwrite), &formatter)?;

    let options = SessionOptions {
        write: write_options(&args.compression)?,
        ..SessionOptions::default()
    };
    let input = args.input.clone();
    let output = args.output.clone();

    let (before, after, statistics) = blocking(move || {
        let mut session = DocumentSession::with_options(options);
        let before = session.load(&input)?;

        // Descending, so each index still names the page it did on disk
        let indices = range.to_indices(before)?;
        for &index in indices.iter().rev() {
            session.remove_page(index)?;
        }

        let after = session.page_count()?;
        let statistics = session.save(&output)?;
        Ok((before, after, statistics))
    })
    .await?;

    if after == 0 {
        formatter.warning("Every page was removed; the output has no pages");
    }
    formatter.success(&format!(
        "Removed {} page(s), {} remaining: {} ({})",
        before - after,
        after,
        args.output.display(),
        format_file_size(statistics.file_size)
    ));
    formatter.detail(
        "Write time",
        &format!("{:.2}s", statistics.write_time.as_secs_f64()),
    );

    Ok(())
}

/// Page summary printed by `info --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInfo {
    path: PathBuf,
    page_count: usize,
    page_sizes: Vec<PageGeometry>,
}

async fn info(args: InfoArgs, formatter: OutputFormatter) -> Result<()> {
    let input = args.input.clone();

    let page_sizes = blocking(move || {
        let mut session = DocumentSession::new();
        session.load(&input)?;
        let sizes = session
            .pages()?
            .iter()
            .map(|page| page.native_size)
            .collect::<Vec<_>>();
        session.close();
        Ok(sizes)
    })
    .await?;

    let info = DocumentInfo {
        path: args.input,
        page_count: page_sizes.len(),
        page_sizes,
    };

    if args.json {
        return print_json(&info);
    }

    formatter.section(&info.path.display().to_string());
    formatter.info(&format!("Pages: {}", info.page_count));
    display_page_sizes(&formatter, &info.page_sizes);
    Ok(())
}

/// Run blocking document work off the async runtime.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| PdfSmithError::other(format!("Worker task failed: {err}")))?
}

fn write_options(compression: &str) -> Result<WriteOptions> {
    Ok(WriteOptions {
        compression: CompressionLevel::from_str(compression)?,
        ..WriteOptions::default()
    })
}

fn overwrite_mode(args: OverwriteArgs) -> OverwriteMode {
    if args.force {
        OverwriteMode::Force
    } else if args.no_clobber {
        OverwriteMode::NoClobber
    } else {
        OverwriteMode::Prompt
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| PdfSmithError::other(format!("Failed to serialize output: {err}")))?;
    println!("{json}");
    Ok(())
}

/// Handle output file overwrite scenarios.
fn check_output_overwrite(
    output: &Path,
    mode: OverwriteMode,
    formatter: &OutputFormatter,
) -> Result<()> {
    // Check if output exists
    if !output.exists() {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfSmithError::output_exists(output.to_path_buf())),
        OverwriteMode::Prompt => {
            // In quiet mode, treat as no-clobber
            if formatter.is_quiet() {
                return Err(PdfSmithError::output_exists(output.to_path_buf()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                output.display()
            ));

            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfSmithError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfSmithError::Cancelled)
            }
        }
    }
}
