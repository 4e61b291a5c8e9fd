//! pdfsmith - Remove pages from PDFs and merge PDFs and images into one.
//!
//! This library provides the document mutation and merge engine behind the
//! `pdfsmith` command. It supports:
//!
//! - Editing one open document, page by page, with cached previews
//! - Merging an ordered mix of PDF, JPEG, and PNG sources
//! - Normalizing images onto a common page size, aspect ratio preserved
//! - Atomic output writes
//!
//! # Examples
//!
//! ## Merging Sources
//!
//! ```no_run
//! use pdfsmith::merge::{MergeEngine, MergeQueue};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut queue = MergeQueue::new();
//! for rejected in queue.add(["cover.pdf", "scan-1.jpg", "scan-2.png", "notes.txt"]) {
//!     eprintln!("{rejected}");
//! }
//!
//! let report = MergeEngine::new().run(&queue, Path::new("merged.pdf"))?;
//! println!("Created {} page document", report.total_pages);
//! queue.clear();
//! # Ok(())
//! # }
//! ```
//!
//! ## Removing Pages
//!
//! ```no_run
//! use pdfsmith::document::DocumentSession;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = DocumentSession::new();
//! let pages = session.load("input.pdf")?;
//! println!("Loaded {pages} pages");
//!
//! session.remove_page(0)?;
//! session.save("output.pdf")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod pdf;
pub mod raster;
pub mod utils;

// Re-export commonly used types
pub use document::DocumentSession;
pub use error::{PdfSmithError, Result};
pub use merge::{MergeEngine, MergeQueue};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
