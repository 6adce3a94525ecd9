//! Streaming summarisation API: emit window results as they complete.
//!
//! Unlike [`crate::summarize::summarize_text`], which returns once every
//! window is done, [`summarize_stream`] yields each window's result as soon
//! as its summariser call finishes. Items arrive in completion order; collect
//! them and pass them to [`crate::summarize::merge_summaries`] to get the
//! same merged text the eager API produces.
//!
//! Inputs below the summarisation threshold produce an empty stream: there
//! is nothing to summarise, and the verbatim passthrough belongs to the eager
//! API.

use crate::config::SummaryConfig;
use crate::error::{Text2BrailleError, WindowError};
use crate::output::WindowResult;
use crate::pipeline::chunk::{Window, WindowPlan};
use crate::pipeline::oracle;
use crate::summarizer::resolve_summarizer;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of window results.
pub type WindowStream = Pin<Box<dyn Stream<Item = Result<WindowResult, WindowError>> + Send>>;

/// Summarise `text`, streaming window results as they are ready.
///
/// # Returns
/// - `Ok(WindowStream)` — `Ok(WindowResult)` for a summarised window,
///   `Err(WindowError)` for a failed one
/// - `Err(Text2BrailleError)` — empty input, invalid config, or no summariser
pub async fn summarize_stream(
    text: impl AsRef<str>,
    config: &SummaryConfig,
) -> Result<WindowStream, Text2BrailleError> {
    let text = text.as_ref();
    config.validate()?;

    if text.trim().is_empty() {
        return Err(Text2BrailleError::EmptyInput);
    }

    let plan = WindowPlan::new(text, config.max_tokens, config.overlap)?;
    if plan.word_count() < config.threshold_words {
        info!(
            "{} words is below the threshold; nothing to stream",
            plan.word_count()
        );
        return Ok(Box::pin(stream::empty()));
    }

    let summarizer = resolve_summarizer(config)?;
    let jobs: Vec<(Window, String)> = plan.windows().map(|w| (w, plan.text(&w))).collect();
    info!("Starting streaming summary of {} windows", jobs.len());

    let concurrency = config.concurrency;
    let config_clone = config.clone();

    let s = stream::iter(jobs.into_iter().map(move |(window, window_text)| {
        let summarizer = Arc::clone(&summarizer);
        let cfg = config_clone.clone();
        async move {
            let mut result = oracle::summarize_window(&summarizer, window, &window_text, &cfg).await;
            match result.error.take() {
                None => Ok(result),
                Some(err) => Err(err),
            }
        }
    }))
    .buffer_unordered(concurrency);

    Ok(Box::pin(s))
}
