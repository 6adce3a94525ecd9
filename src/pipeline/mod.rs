//! Pipeline stages for document summarisation.
//!
//! Each submodule implements one step, so each can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ chunk ──▶ oracle ──▶ postprocess
//! (URL/path)  (pdfium)  (windows) (summariser) (cleanup)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`] — read plain text, the PDF text layer, or `.docx`
//!    paragraphs; pdfium and zip work runs in `spawn_blocking`
//! 3. [`chunk`]   — split the word sequence into overlapping windows
//! 4. [`oracle`]  — call the summariser per window with retry, backoff and a
//!    per-attempt timeout; the only stage with network I/O
//! 5. [`postprocess`] — deterministic clean-up of LLM replies, applied by
//!    [`crate::summarizer::LlmSummarizer`]; other summarisers are merged as-is
//!
//! Merging and braille encoding happen in [`crate::summarize`].

pub mod chunk;
pub mod extract;
pub mod input;
pub mod oracle;
pub mod postprocess;
