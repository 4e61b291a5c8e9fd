//! File I/O for PDF documents.
//!
//! - [`PdfReader`] loads and classifies PDF files
//! - [`PdfWriter`] writes documents atomically with optional compression

pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::{PdfWriter, WriteStatistics};
