//! Text extraction from resolved documents.
//!
//! Extraction never turns an unreadable document into an error of its own.
//! A PDF without a text layer, a `.docx` without paragraph text, or a file
//! that cannot be parsed yields a short marker sentence instead, and the
//! orchestrator treats that marker like any other text (it is far below the
//! summarisation threshold, so it comes back verbatim with its braille
//! rendering). Callers that want to surface the
//! failure can compare against [`NO_READABLE_TEXT`] or check
//! [`is_extraction_marker`].
//!
//! Fatal errors are reserved for problems with the environment: the file
//! vanished between resolution and reading, or the pdfium library cannot be
//! loaded at all.
//!
//! pdfium is a blocking C library and `.docx` parsing is synchronous zip and
//! XML work, so both run in `spawn_blocking`.

use crate::error::Text2BrailleError;
use crate::pipeline::input::{DocumentKind, ResolvedInput};
use pdfium_render::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Marker returned when a document has no extractable text.
pub const NO_READABLE_TEXT: &str = "no readable text found";

/// Prefix of the marker returned when pdfium cannot parse a PDF.
pub const PDF_EXTRACTION_FAILED: &str = "could not extract text from PDF";

/// Prefix of the marker returned when a `.docx` file cannot be read.
pub const DOCX_EXTRACTION_FAILED: &str = "could not read .docx file";

/// True if `text` is one of the extraction markers rather than document text.
pub fn is_extraction_marker(text: &str) -> bool {
    text == NO_READABLE_TEXT
        || text.starts_with(PDF_EXTRACTION_FAILED)
        || text.starts_with(DOCX_EXTRACTION_FAILED)
}

/// Extract plain text from a resolved document.
pub async fn extract_text(input: &ResolvedInput) -> Result<String, Text2BrailleError> {
    let path = input.path().to_path_buf();
    match input.kind() {
        DocumentKind::PlainText => read_plain_text(&path).await,
        DocumentKind::Pdf => {
            tokio::task::spawn_blocking(move || extract_pdf_blocking(&path))
                .await
                .map_err(|e| Text2BrailleError::Internal(format!("PDF extraction task panicked: {}", e)))?
        }
        DocumentKind::Docx => {
            tokio::task::spawn_blocking(move || extract_docx_blocking(&path))
                .await
                .map_err(|e| Text2BrailleError::Internal(format!("DOCX extraction task panicked: {}", e)))?
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> Text2BrailleError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => Text2BrailleError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Text2BrailleError::FileNotFound {
            path: path.to_path_buf(),
        },
    }
}

async fn read_plain_text(path: &Path) -> Result<String, Text2BrailleError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    debug!("Read {} bytes of text from {}", bytes.len(), path.display());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Bind to pdfium: `PDFIUM_LIB_PATH`, then next to the executable's working
/// directory, then the system library search path.
fn bind_pdfium() -> Result<Pdfium, Text2BrailleError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(p) if !p.is_empty() => Pdfium::bind_to_library(PathBuf::from(p)),
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| Text2BrailleError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

fn extract_pdf_blocking(pdf_path: &Path) -> Result<String, Text2BrailleError> {
    let pdfium = bind_pdfium()?;

    let document = match pdfium.load_pdf_from_file(pdf_path, None) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("pdfium could not open {}: {:?}", pdf_path.display(), e);
            return Ok(format!("{PDF_EXTRACTION_FAILED}: {e:?}"));
        }
    };

    let mut text = String::new();
    for (idx, page) in document.pages().iter().enumerate() {
        match page.text() {
            Ok(page_text) => {
                text.push_str(&page_text.all());
                text.push('\n');
            }
            Err(e) => warn!("Skipping text of page {}: {:?}", idx + 1, e),
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        info!("PDF {} has no text layer", pdf_path.display());
        return Ok(NO_READABLE_TEXT.to_string());
    }

    info!(
        "Extracted {} words from {}",
        trimmed.split_whitespace().count(),
        pdf_path.display()
    );
    Ok(trimmed.to_string())
}

fn extract_docx_blocking(docx_path: &Path) -> Result<String, Text2BrailleError> {
    let file = std::fs::File::open(docx_path).map_err(|e| io_error(docx_path, e))?;

    let paragraphs = match read_document_xml(file).and_then(|xml| {
        docx_paragraphs(&xml).map_err(|e| format!("malformed document.xml: {e}"))
    }) {
        Ok(p) => p,
        Err(reason) => {
            warn!("Could not read {} as .docx: {}", docx_path.display(), reason);
            return Ok(format!("{DOCX_EXTRACTION_FAILED}: {reason}"));
        }
    };

    let text = paragraphs.join("\n");
    if text.trim().is_empty() {
        info!("DOCX {} has no paragraph text", docx_path.display());
        return Ok(NO_READABLE_TEXT.to_string());
    }

    info!(
        "Extracted {} paragraphs from {}",
        paragraphs.len(),
        docx_path.display()
    );
    Ok(text)
}

fn read_document_xml(file: std::fs::File) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("word/document.xml: {e}"))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml).map_err(|e| e.to_string())?;
    Ok(xml)
}

/// Text of every `<w:p>`, with runs concatenated. Empty paragraphs are kept.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
