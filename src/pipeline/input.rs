//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! URLs are downloaded into a `TempDir` that lives as long as the returned
//! [`ResolvedInput`], so the extractor gets a real path and the file is
//! removed automatically afterwards. The document kind is decided here from
//! the file extension so unsupported inputs fail before any download work is
//! wasted on extraction.

use crate::error::Text2BrailleError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The kinds of document we can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.txt` or `.md`, read as UTF-8.
    PlainText,
    /// `.pdf`, text layer read via pdfium.
    Pdf,
    /// `.docx`, paragraphs of `word/document.xml`.
    Docx,
}

impl DocumentKind {
    /// Classify a path by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" | "md" => Some(DocumentKind::PlainText),
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// The resolved input — either a local path or a downloaded temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local { path: PathBuf, kind: DocumentKind },
    /// Input was a URL; the file lives in a temp directory kept alive here.
    Downloaded {
        path: PathBuf,
        kind: DocumentKind,
        _temp_dir: TempDir,
    },
}

impl ResolvedInput {
    /// Get the path to the document regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local { path, .. } => path,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            ResolvedInput::Local { kind, .. } | ResolvedInput::Downloaded { kind, .. } => *kind,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local document path.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, Text2BrailleError> {
    if input.trim().is_empty() {
        return Err(Text2BrailleError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

fn resolve_local(path_str: &str) -> Result<ResolvedInput, Text2BrailleError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(Text2BrailleError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Text2BrailleError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Text2BrailleError::FileNotFound { path });
        }
    }

    let kind = DocumentKind::from_path(&path)
        .ok_or_else(|| Text2BrailleError::UnsupportedFileType { path: path.clone() })?;

    debug!("Resolved local {:?} document: {}", kind, path.display());
    Ok(ResolvedInput::Local { path, kind })
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, Text2BrailleError> {
    let filename = extract_filename(url).ok_or_else(|| Text2BrailleError::InvalidInput {
        input: url.to_string(),
    })?;
    let kind = DocumentKind::from_path(Path::new(&filename)).ok_or_else(|| {
        Text2BrailleError::UnsupportedFileType {
            path: PathBuf::from(&filename),
        }
    })?;

    info!("Downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Text2BrailleError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Text2BrailleError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Text2BrailleError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Text2BrailleError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Text2BrailleError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let temp_dir = TempDir::new().map_err(|e| Text2BrailleError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| Text2BrailleError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        kind,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of a URL when it looks like a file name.
fn extract_filename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if !last.is_empty() && last.contains('.') {
        Some(last.to_string())
    } else {
        None
    }
}
