//! # edgequake-text2braille
//!
//! Summarise long documents with an LLM and render the result as Grade 1
//! six-dot Unicode braille.
//!
//! ## Why this crate?
//!
//! Braille is slow to read and expensive to emboss, so a long report is far
//! more usable as a faithful summary. Long inputs are split into overlapping
//! word windows, each window is summarised independently (concurrently), and
//! the partial summaries are joined in document order before encoding. The
//! braille codec itself is a pure, dependency-free table lookup with a
//! numeric-indicator state machine for digits.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document / text
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Extract   plain text or PDF text layer (pdfium, spawn_blocking)
//!  ├─ 3. Window    512-word windows, 50 words of overlap
//!  ├─ 4. Summarise concurrent calls to gpt-4.1-nano / claude / gemini / …
//!  ├─ 5. Merge     window summaries joined in window order
//!  └─ 6. Braille   ⠞⠓⠑ ⠎⠥⠍⠍⠁⠗⠽ + per-window stats
//! ```
//!
//! Inputs under 150 words skip steps 3 to 5 and are encoded verbatim.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_text2braille::{summarize_document, SummaryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = SummaryConfig::default();
//!     let output = summarize_document("report.pdf", &config).await?;
//!     println!("{}", output.summary);
//!     println!("{}", output.braille);
//!     Ok(())
//! }
//! ```
//!
//! The codec needs neither a runtime nor a provider:
//!
//! ```rust
//! use edgequake_text2braille::{from_braille, to_braille};
//!
//! assert_eq!(to_braille("Hi 5!"), "⠓⠊ ⠼⠑⠖");
//! assert_eq!(from_braille("⠓⠊ ⠼⠑⠖"), "hi 5!");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `text2braille` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-text2braille = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod braille;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod stream;
pub mod summarize;
pub mod summarizer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use braille::{decode as from_braille, encode as to_braille};
pub use config::{SummaryConfig, SummaryConfigBuilder, DEFAULT_FALLBACK_SUMMARY};
pub use error::{Text2BrailleError, WindowError};
pub use output::{SummaryOutput, SummaryStats, WindowResult};
pub use pipeline::chunk::{chunk_text, Window, WindowPlan};
pub use progress::{NoopProgressCallback, ProgressCallback, SummaryProgressCallback};
pub use stream::{summarize_stream, WindowStream};
pub use summarize::{
    merge_summaries, summarize, summarize_document, summarize_sync, summarize_text, summarize_to_file,
};
pub use summarizer::{LengthBounds, LlmSummarizer, OracleError, OracleReply, Summarizer};
