//! PDF writing.
//!
//! Writes are atomic by default: the document is serialized into a
//! temporary sibling file which is renamed over the destination only once
//! everything has been flushed. A failed write never leaves a truncated
//! output behind.

use lopdf::Document;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::{CompressionLevel, WriteOptions};
use crate::error::{PdfSmithError, Result};
use crate::utils::format_file_size;

/// Buffer size for file output.
const BUFFER_SIZE: usize = 64 * 1024;

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Compression applied before writing.
    pub compression: CompressionLevel,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Serialize `doc` to `path`.
    ///
    /// Compression is applied to `doc` in place before serialization.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::Write`] if the file cannot be created,
    /// serialized, flushed, or renamed into place.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        match self.options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => doc.compress(),
            CompressionLevel::Maximum => {
                doc.prune_objects();
                doc.compress();
            }
        }
        doc.renumber_objects();

        let write_path = if self.options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        if let Err(err) = Self::write_to(doc, &write_path) {
            if self.options.atomic {
                let _ = std::fs::remove_file(&write_path);
            }
            return Err(PdfSmithError::write(path, err));
        }

        if self.options.atomic {
            std::fs::rename(&write_path, path).map_err(|err| {
                let _ = std::fs::remove_file(&write_path);
                PdfSmithError::write(path, err)
            })?;
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let stats = WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            compression: self.options.compression,
        };

        debug!(
            path = %path.display(),
            size = %stats.format_file_size(),
            "wrote pdf"
        );

        Ok(stats)
    }

    fn write_to(doc: &mut Document, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);
        doc.save_to(&mut writer).map_err(std::io::Error::other)?;
        writer.flush()
    }
}

/// Temporary sibling used for atomic writes: `out.pdf` becomes `out.pdf.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
