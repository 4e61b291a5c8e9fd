//! CLI argument parsing for pdfsmith.
//!
//! This module defines the command-line interface structure using `clap`.
//! It only depends on `clap` so that `build.rs` can include it to render
//! the man page; conversion into library options happens in `main.rs`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Remove pages from PDFs and merge PDFs and images into one document.
///
/// pdfsmith merges an ordered mix of PDF, JPEG, and PNG files. Images are
/// scaled onto pages matching the first PDF's page size, keeping their
/// aspect ratio. It can also delete pages from a single PDF.
#[derive(Parser, Debug)]
#[command(name = "pdfsmith")]
#[command(version)]
#[command(about = "Remove pages from PDFs and merge PDFs and images", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output - show details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    /// Useful for scripts and automation.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge PDF and image files into one PDF, in the order given
    ///
    /// Examples:
    ///   pdfsmith merge cover.pdf scan1.jpg scan2.png -o packet.pdf
    ///   pdfsmith merge 'scans/*.png' -o scans.pdf
    Merge(MergeArgs),

    /// Remove pages from a PDF
    ///
    /// Examples:
    ///   pdfsmith remove report.pdf --pages 2 -o trimmed.pdf
    ///   pdfsmith remove report.pdf --pages 1-3,7 -o trimmed.pdf
    Remove(RemoveArgs),

    /// Show the page count and page sizes of a PDF
    Info(InfoArgs),
}

/// Output overwrite flags shared by commands that write a file.
#[derive(Args, Debug, Clone, Copy)]
pub struct OverwriteArgs {
    /// Force overwrite of existing output file without confirmation
    ///
    /// By default, pdfsmith will prompt before overwriting an existing file.
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,
}

/// Arguments for `merge`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input files to merge (in order): .pdf, .jpg, .jpeg, .png
    ///
    /// Glob patterns are expanded and their matches sorted by name.
    /// Files with other extensions are reported and left out.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Dry run - inspect inputs and show the merge plan without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub overwrite: OverwriteArgs,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress uncompressed streams (default)
    /// - maximum: Also drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Print the merge report (or plan, with --dry-run) as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// PDF to remove pages from
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Pages to remove, 1-indexed (e.g., "2", "1-3,7")
    ///
    /// Page numbers refer to the input document as it is on disk.
    #[arg(short, long, value_name = "RANGE")]
    pub pages: String,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub overwrite: OverwriteArgs,

    /// Compression level for output PDF
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,
}

/// Arguments for `info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// PDF to inspect
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
