//! Error types for pdfsmith.
//!
//! Every fallible operation in the crate returns [`PdfSmithError`]. Errors
//! carry enough context (paths, indices, reasons) to be shown to a user as-is.
//!
//! # Error Categories
//!
//! - **Session Errors**: loading, page removal, and saving of an open document
//! - **Queue Errors**: unsupported source kinds, bad queue indices
//! - **Merge Errors**: empty queues, unreadable sources, failed output writes
//! - **Ambient Errors**: file system, configuration, and I/O failures

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfsmith operations.
pub type Result<T> = std::result::Result<T, PdfSmithError>;

/// Main error type for pdfsmith operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfSmithError {
    /// The file could not be opened as a paged document.
    #[error("Failed to load document: {}\n  Reason: {reason}", path.display())]
    Load {
        /// Path to the document.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// The operation requires an open document but none is open.
    #[error("No document is open")]
    NoDocument,

    /// A page or queue index is out of range.
    #[error("Index {index} is out of range (length {len})")]
    Index {
        /// Requested index.
        index: usize,
        /// Length of the indexed collection at the time of the request.
        len: usize,
    },

    /// The file extension is not one of the supported source kinds.
    #[error("Unsupported file type: {}\n  Supported: pdf, jpg, jpeg, png", path.display())]
    UnsupportedKind {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// A merge was requested with no sources queued.
    #[error("No files queued for merging")]
    EmptyQueue,

    /// A single merge source could not be opened or decoded.
    #[error("Failed to read source: {}\n  Reason: {reason}", path.display())]
    SourceRead {
        /// Path to the source.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Persisting a document failed.
    #[error("Failed to write output file: {}\n  Reason: {reason}", path.display())]
    Write {
        /// Path being written to.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Merge produced nothing or the page tree could not be assembled.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfSmithError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<image::ImageError> for PdfSmithError {
    fn from(err: image::ImageError) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for PdfSmithError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfSmithError {
    /// Create a Load error.
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Index error.
    pub fn index(index: usize, len: usize) -> Self {
        Self::Index { index, len }
    }

    /// Create an UnsupportedKind error.
    pub fn unsupported_kind(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedKind { path: path.into() }
    }

    /// Create a SourceRead error.
    pub fn source_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Write error.
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (operation can continue).
    ///
    /// Only per-source merge failures are recovered locally; the merge engine
    /// records them and moves on to the next source.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SourceRead { .. } | Self::UnsupportedKind { .. })
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EmptyQueue | Self::Write { .. } | Self::Cancelled
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::Load { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::SourceRead { .. } => 3,
            Self::NoDocument => 1,
            Self::Index { .. } => 1,
            Self::UnsupportedKind { .. } => 1,
            Self::EmptyQueue => 1,
            Self::OutputExists { .. } => 4,
            Self::Write { .. } => 5,
            Self::Io { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Other { .. } => 1,
        }
    }
}
