//! Eager (whole-request) summarisation entry points.
//!
//! [`summarize_text`] waits for every window, merges the partial summaries in
//! window order and returns the merged text with its braille rendering. Use
//! [`crate::stream::summarize_stream`] instead to observe windows as they
//! finish.
//!
//! ## Flow
//!
//! ```text
//! text ─▶ word count < threshold? ──yes──▶ verbatim ───────────────┐
//!                 │ no                                             ▼
//!                 └─▶ windows ─▶ summariser × N ─▶ sort ─▶ merge ─▶ braille
//! ```

use crate::braille;
use crate::config::SummaryConfig;
use crate::error::Text2BrailleError;
use crate::output::{SummaryOutput, SummaryStats, WindowResult};
use crate::pipeline::chunk::{Window, WindowPlan};
use crate::pipeline::{extract, input, oracle};
use crate::summarizer::{resolve_summarizer, LengthBounds, Summarizer};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summarise `text` and encode the result to braille.
///
/// # Returns
/// `Ok(SummaryOutput)` whenever the input was usable — including when some
/// or all windows failed (check `output.stats.failed_windows` and
/// `output.stats.fallback_used`).
///
/// # Errors
/// - [`Text2BrailleError::EmptyInput`] — nothing but whitespace
/// - [`Text2BrailleError::InvalidConfig`] — e.g. `overlap >= max_tokens`
/// - [`Text2BrailleError::ProviderNotConfigured`] — a summary is needed but
///   no summariser or provider could be resolved
pub async fn summarize_text(
    text: &str,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Text2BrailleError> {
    let total_start = Instant::now();
    config.validate()?;

    if text.trim().is_empty() {
        return Err(Text2BrailleError::EmptyInput);
    }

    let plan = WindowPlan::new(text, config.max_tokens, config.overlap)?;
    let word_count = plan.word_count();
    info!("Input word count: {}", word_count);

    // ── Short input: no summariser involved ──────────────────────────────
    if word_count < config.threshold_words {
        debug!(
            "{} words is below the {}-word threshold; returning input verbatim",
            word_count, config.threshold_words
        );
        return Ok(SummaryOutput {
            summary: text.to_string(),
            braille: braille::encode(text),
            windows: Vec::new(),
            stats: SummaryStats {
                word_count,
                summarized: false,
                total_duration_ms: total_start.elapsed().as_millis() as u64,
                ..Default::default()
            },
        });
    }

    let document_bounds = LengthBounds::for_word_count(word_count);
    let summarizer = resolve_summarizer(config)?;

    let jobs: Vec<(Window, String)> = plan.windows().map(|w| (w, plan.text(&w))).collect();
    let total_windows = jobs.len();
    info!(
        "Summarising {} windows (max {} words, overlap {})",
        total_windows, config.max_tokens, config.overlap
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_summary_start(total_windows);
    }

    // ── Per-window summaries ─────────────────────────────────────────────
    let oracle_start = Instant::now();
    let mut windows = process_windows(&summarizer, jobs, config).await;
    let oracle_duration_ms = oracle_start.elapsed().as_millis() as u64;

    // Completion order depends on concurrency; merge order must not.
    windows.sort_by_key(|w| w.index);

    // ── Merge + encode ───────────────────────────────────────────────────
    let (summary, fallback_used) = merge_summaries(&windows, &config.fallback_summary);
    if fallback_used {
        warn!("All {} windows failed; using fallback summary", total_windows);
    }
    let braille = braille::encode(&summary);

    let succeeded = windows.iter().filter(|w| w.is_success()).count();
    let stats = SummaryStats {
        word_count,
        summarized: true,
        total_windows,
        succeeded_windows: succeeded,
        failed_windows: total_windows - succeeded,
        fallback_used,
        document_bounds: Some(document_bounds),
        total_input_tokens: windows.iter().map(|w| w.input_tokens as u64).sum(),
        total_output_tokens: windows.iter().map(|w| w.output_tokens as u64).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        oracle_duration_ms,
    };

    info!(
        "Summary complete: {}/{} windows, {} words → {} words, {}ms total",
        succeeded,
        total_windows,
        word_count,
        summary.split_whitespace().count(),
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_summary_complete(total_windows, succeeded);
    }

    Ok(SummaryOutput {
        summary,
        braille,
        windows,
        stats,
    })
}

/// Summarise `text` and return just `(summary, braille)`.
pub async fn summarize(
    text: &str,
    config: &SummaryConfig,
) -> Result<(String, String), Text2BrailleError> {
    let output = summarize_text(text, config).await?;
    Ok((output.summary, output.braille))
}

/// Resolve a file path or URL, extract its text and summarise it.
///
/// An unreadable document yields an extraction marker, which is summarised
/// like any other (short) text rather than reported as an error.
pub async fn summarize_document(
    input_str: impl AsRef<str>,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Text2BrailleError> {
    let input_str = input_str.as_ref();
    info!("Starting summary of document: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let text = extract::extract_text(&resolved).await?;
    if extract::is_extraction_marker(&text) {
        warn!("No text could be extracted from {}: {}", input_str, text);
    }

    summarize_text(&text, config).await
}

/// Summarise a document and write the JSON output to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn summarize_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<SummaryStats, Text2BrailleError> {
    let output = summarize_document(input_str, config).await?;
    let path = output_path.as_ref();

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Text2BrailleError::Internal(format!("Failed to serialise output: {e}")))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Text2BrailleError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(|e| Text2BrailleError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Text2BrailleError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`summarize_text`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn summarize_sync(text: &str, config: &SummaryConfig) -> Result<SummaryOutput, Text2BrailleError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Text2BrailleError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(summarize_text(text, config))
}

/// Join successful window summaries in ascending window order.
///
/// Returns the merged text and whether the fallback was used because no
/// window produced a summary.
pub fn merge_summaries(windows: &[WindowResult], fallback: &str) -> (String, bool) {
    let mut ordered: Vec<&WindowResult> = windows.iter().collect();
    ordered.sort_by_key(|w| w.index);

    let parts: Vec<&str> = ordered
        .iter()
        .filter_map(|w| w.summary.as_deref())
        .collect();

    if parts.is_empty() {
        (fallback.to_string(), true)
    } else {
        (parts.join(" "), false)
    }
}

/// Summarise windows with up to `config.concurrency` calls in flight.
///
/// Results come back in completion order; callers sort by index.
async fn process_windows(
    summarizer: &Arc<dyn Summarizer>,
    jobs: Vec<(Window, String)>,
    config: &SummaryConfig,
) -> Vec<WindowResult> {
    let total_windows = jobs.len();
    stream::iter(jobs.into_iter().map(|(window, text)| {
        let summarizer = Arc::clone(summarizer);
        async move {
            if let Some(ref cb) = config.progress_callback {
                cb.on_window_start(window.index, total_windows);
            }
            let result = oracle::summarize_window(&summarizer, window, &text, config).await;
            if let Some(ref cb) = config.progress_callback {
                match (&result.summary, &result.error) {
                    (Some(s), _) => cb.on_window_complete(window.index, total_windows, s.len()),
                    (None, Some(e)) => cb.on_window_error(window.index, total_windows, &e.to_string()),
                    (None, None) => {}
                }
            }
            result
        }
    }))
    .buffer_unordered(config.concurrency)
    .collect()
    .await
}
