//! Error types for the edgequake-text2braille library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Text2BrailleError`] — **Fatal**: the request cannot proceed at all
//!   (no text, bad window settings, unreadable input, provider not
//!   configured). Returned as `Err(Text2BrailleError)` from the top-level
//!   `summarize*` functions.
//!
//! * [`WindowError`] — **Non-fatal**: the summariser failed on one window
//!   (timeout, API error, empty output) but the other windows are fine.
//!   Stored inside [`crate::output::WindowResult`] so the merged summary can
//!   still be built from whatever succeeded.
//!
//! Even when every window fails the request succeeds: the output carries the
//! fallback summary and `stats.fallback_used = true`. The braille codec
//! itself never fails.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-text2braille library.
#[derive(Debug, Error)]
pub enum Text2BrailleError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No text content after extraction and trimming.
    #[error("No text content provided")]
    EmptyInput,

    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one we can extract text from.
    #[error("Unsupported file type: '{path}'\nSupported: .txt, .md, .pdf, .docx")]
    UnsupportedFileType { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Summariser errors ─────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Some windows succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::SummaryOutput::into_result`] when the
    /// caller wants to treat any window failure as an error.
    #[error("{failed}/{total} windows failed during summarisation")]
    PartialFailure {
        success: usize,
        failed: usize,
        total: usize,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or window-parameter validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library for PDF text extraction.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF text extraction needs the pdfium shared library.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium, or\n\
  • place libpdfium next to the executable, or\n\
  • install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single window.
///
/// Stored alongside [`crate::output::WindowResult`] when a window fails.
/// The merged summary is built from the remaining windows.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum WindowError {
    /// The summariser returned an error on every attempt.
    #[error("Window {window}: summariser failed after {retries} retries: {detail}")]
    OracleFailed {
        window: usize,
        retries: u32,
        detail: String,
    },

    /// The last attempt exceeded the per-call timeout.
    #[error("Window {window}: summariser timed out after {secs}s")]
    Timeout { window: usize, secs: u64 },

    /// The summariser answered, but nothing usable was left after clean-up.
    #[error("Window {window}: summariser returned an empty summary")]
    EmptySummary { window: usize },
}

impl WindowError {
    /// Index of the window this error belongs to.
    pub fn window(&self) -> usize {
        match self {
            WindowError::OracleFailed { window, .. }
            | WindowError::Timeout { window, .. }
            | WindowError::EmptySummary { window } => *window,
        }
    }
}
