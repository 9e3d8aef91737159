//! Error types for the resume2json library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ResumeError`] is **fatal** for one call. The input could not be turned
//!   into text at all (missing file, failed download, undecodable bytes,
//!   unreadable PDF), or the configuration is invalid. Returned as
//!   `Err(ResumeError)` from the file/URL entry points.
//!
//! * [`DocumentError`] is **non-fatal** inside a batch. One document failed but
//!   the others are fine. Stored in [`crate::output::BatchItem`] so callers
//!   can inspect partial success rather than losing a whole batch to one bad
//!   file.
//!
//! The extraction core itself never returns either: text that reaches it
//! always yields a [`crate::output::ParsedDocument`], which carries its own
//! failure shape for empty input or internal faults.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the resume2json library.
#[derive(Debug, Error)]
pub enum ResumeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Résumé file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file is neither UTF-8 text nor a PDF this build can read.
    #[error("Unsupported input format for '{path}': {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },

    /// The file looked like text but is not valid UTF-8.
    #[error("'{path}' is not valid UTF-8 text (invalid byte at offset {offset})")]
    NotUtf8 { path: PathBuf, offset: usize },

    // ── PDF text layer ────────────────────────────────────────────────────
    /// pdfium could not open the document or read a page's text layer.
    #[error("Failed to read the text layer of '{path}': {detail}")]
    PdfTextFailed { path: PathBuf, detail: String },

    /// The PDF requires a password but none (or a wrong one) was provided.
    #[error("PDF '{path}' is encrypted.\nProvide the password with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF input needs libpdfium at runtime.\n\
  • Install it system-wide, or\n\
  • Place libpdfium next to the binary, or\n\
  • Convert the PDF to text first and pass the .txt file.\n"
    )]
    PdfiumBindingFailed(String),

    /// The source decoded successfully but contains no text at all.
    #[error("No text could be extracted from '{path}'")]
    EmptyDocument { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extraction core reported a failure-shaped document.
    ///
    /// Returned by [`crate::output::ParsedDocument::into_result`] when the
    /// caller wants to treat a failed document as an error.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document in a batch.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The input could not be read or decoded into text.
    #[error("{input}: could not load text: {detail}")]
    LoadFailed { input: String, detail: String },

    /// Text was loaded but the extraction core returned a failure document.
    #[error("{input}: extraction failed: {detail}")]
    ExtractionFailed { input: String, detail: String },

    /// The worker running this document panicked or was cancelled.
    #[error("{input}: worker aborted: {detail}")]
    WorkerAborted { input: String, detail: String },
}

impl DocumentError {
    /// The input path or URL this error refers to.
    pub fn input(&self) -> &str {
        match self {
            DocumentError::LoadFailed { input, .. }
            | DocumentError::ExtractionFailed { input, .. }
            | DocumentError::WorkerAborted { input, .. } => input,
        }
    }
}
