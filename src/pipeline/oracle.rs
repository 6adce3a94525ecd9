//! Summarise one window: retry and timeout around a [`Summarizer`].
//!
//! ## Retry Strategy
//!
//! Provider errors under concurrent load are mostly transient (429 / 503).
//! Exponential backoff (`retry_backoff_ms * 2^attempt`) keeps concurrent
//! windows from retrying in lockstep: with 500 ms base and 2 retries the
//! waits are 500 ms → 1 s.
//!
//! Every attempt is bounded by `api_timeout_secs`, so one slow window ends up
//! absent from the merge instead of stalling the whole request.
//!
//! Replies are merged exactly as the summariser returned them. Only a reply
//! that is empty or whitespace-only counts as a failed attempt.

use crate::config::SummaryConfig;
use crate::error::WindowError;
use crate::output::WindowResult;
use crate::pipeline::chunk::Window;
use crate::summarizer::{LengthBounds, OracleError, Summarizer};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

enum Failure {
    Oracle(String),
    Timeout,
    Empty,
}

/// Summarise `text` (the words of `window`) and record the outcome.
///
/// Always returns a `WindowResult` — never propagates the error upward, so a
/// single bad window doesn't abort the request. Callers check
/// `result.summary` to decide whether the window takes part in the merge.
pub async fn summarize_window(
    summarizer: &Arc<dyn Summarizer>,
    window: Window,
    text: &str,
    config: &SummaryConfig,
) -> WindowResult {
    let start = Instant::now();
    let word_count = window.len();
    let bounds = LengthBounds::for_word_count(word_count);
    let call_timeout = Duration::from_secs(config.api_timeout_secs);

    debug!(
        "Window {}: {} words, min_len {}, max_len {}",
        window.index, word_count, bounds.min_length, bounds.max_length
    );

    let mut last_failure = Failure::Oracle("Unknown error".to_string());

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = backoff_ms(config.retry_backoff_ms, attempt);
            warn!(
                "Window {}: retry {}/{} after {}ms",
                window.index, attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        match timeout(call_timeout, summarizer.summarize(text, bounds)).await {
            Ok(Ok(reply)) => {
                if reply.text.trim().is_empty() {
                    warn!("Window {}: attempt {} returned no text", window.index, attempt + 1);
                    last_failure = Failure::Empty;
                    continue;
                }

                let duration = start.elapsed();
                debug!(
                    "Window {}: {} input tokens, {} output tokens, {:?}",
                    window.index, reply.input_tokens, reply.output_tokens, duration
                );

                return WindowResult {
                    index: window.index,
                    start: window.start,
                    end: window.end,
                    word_count,
                    bounds,
                    summary: Some(reply.text),
                    input_tokens: reply.input_tokens,
                    output_tokens: reply.output_tokens,
                    duration_ms: duration.as_millis() as u64,
                    retries: attempt,
                    error: None,
                };
            }
            Ok(Err(OracleError::Empty)) => {
                warn!("Window {}: attempt {} returned no text", window.index, attempt + 1);
                last_failure = Failure::Empty;
            }
            Ok(Err(e)) => {
                let err_msg = e.to_string();
                warn!("Window {}: attempt {} failed — {}", window.index, attempt + 1, err_msg);
                last_failure = Failure::Oracle(err_msg);
            }
            Err(_) => {
                warn!(
                    "Window {}: attempt {} timed out after {}s",
                    window.index,
                    attempt + 1,
                    config.api_timeout_secs
                );
                last_failure = Failure::Timeout;
            }
        }
    }

    let error = match last_failure {
        Failure::Oracle(detail) => WindowError::OracleFailed {
            window: window.index,
            retries: config.max_retries,
            detail,
        },
        Failure::Timeout => WindowError::Timeout {
            window: window.index,
            secs: config.api_timeout_secs,
        },
        Failure::Empty => WindowError::EmptySummary {
            window: window.index,
        },
    };

    WindowResult {
        index: window.index,
        start: window.start,
        end: window.end,
        word_count,
        bounds,
        summary: None,
        input_tokens: 0,
        output_tokens: 0,
        duration_ms: start.elapsed().as_millis() as u64,
        retries: config.max_retries,
        error: Some(error),
    }
}

/// Delay before retry `attempt` (1-based): `base * 2^(attempt - 1)`, saturating.
fn backoff_ms(base: u64, attempt: u32) -> u64 {
    base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::OracleReply;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails `failures` times, then answers.
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for Flaky {
        async fn summarize(&self, _text: &str, _b: LengthBounds) -> Result<OracleReply, OracleError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(OracleError::Provider(format!("boom {n}")))
            } else {
                Ok(OracleReply {
                    text: "  A short summary.  ".into(),
                    input_tokens: 10,
                    output_tokens: 4,
                })
            }
        }
    }

    struct Blank;

    #[async_trait]
    impl Summarizer for Blank {
        async fn summarize(&self, _text: &str, _b: LengthBounds) -> Result<OracleReply, OracleError> {
            Ok(" \n\t ".into())
        }
    }

    struct Slow;

    #[async_trait]
    impl Summarizer for Slow {
        async fn summarize(&self, _text: &str, _b: LengthBounds) -> Result<OracleReply, OracleError> {
            sleep(Duration::from_secs(3600)).await;
            Ok("never".into())
        }
    }

    fn config(retries: u32) -> SummaryConfig {
        SummaryConfig::builder()
            .max_retries(retries)
            .retry_backoff_ms(1)
            .api_timeout_secs(1)
            .build()
            .unwrap()
    }

    fn window() -> Window {
        Window {
            index: 3,
            start: 100,
            end: 300,
        }
    }

    #[tokio::test]
    async fn succeeds_after_retry() {
        let s: Arc<dyn Summarizer> = Arc::new(Flaky {
            failures: 1,
            calls: AtomicUsize::new(0),
        });
        let r = summarize_window(&s, window(), "text", &config(2)).await;
        assert_eq!(r.summary.as_deref(), Some("  A short summary.  "));
        assert_eq!(r.retries, 1);
        assert_eq!(r.index, 3);
        assert_eq!(r.word_count, 200);
        assert_eq!(r.bounds, LengthBounds::for_word_count(200));
        assert_eq!(r.input_tokens, 10);
        assert!(r.error.is_none());
    }

    #[tokio::test]
    async fn exhausted_retries_record_last_error() {
        let s: Arc<dyn Summarizer> = Arc::new(Flaky {
            failures: 10,
            calls: AtomicUsize::new(0),
        });
        let r = summarize_window(&s, window(), "text", &config(2)).await;
        assert!(r.summary.is_none());
        match r.error {
            Some(WindowError::OracleFailed { window, retries, detail }) => {
                assert_eq!(window, 3);
                assert_eq!(retries, 2);
                assert_eq!(detail, "boom 2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_output_is_empty_summary() {
        let s: Arc<dyn Summarizer> = Arc::new(Blank);
        let r = summarize_window(&s, window(), "text", &config(0)).await;
        assert_eq!(r.error, Some(WindowError::EmptySummary { window: 3 }));
    }

    struct Refuses;

    #[async_trait]
    impl Summarizer for Refuses {
        async fn summarize(&self, _text: &str, _b: LengthBounds) -> Result<OracleReply, OracleError> {
            Err(OracleError::Empty)
        }
    }

    #[tokio::test]
    async fn empty_reply_error_is_empty_summary() {
        let s: Arc<dyn Summarizer> = Arc::new(Refuses);
        let r = summarize_window(&s, window(), "text", &config(1)).await;
        assert_eq!(r.error, Some(WindowError::EmptySummary { window: 3 }));
    }

    struct Verbatim;

    #[async_trait]
    impl Summarizer for Verbatim {
        async fn summarize(&self, _text: &str, _b: LengthBounds) -> Result<OracleReply, OracleError> {
            Ok("Summary: 1. first\n```end```".into())
        }
    }

    #[tokio::test]
    async fn reply_text_is_kept_verbatim() {
        let s: Arc<dyn Summarizer> = Arc::new(Verbatim);
        let r = summarize_window(&s, window(), "text", &config(0)).await;
        assert_eq!(r.summary.as_deref(), Some("Summary: 1. first\n```end```"));
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        assert_eq!(backoff_ms(500, 1), 500);
        assert_eq!(backoff_ms(500, 2), 1_000);
        assert_eq!(backoff_ms(500, 3), 2_000);
        assert_eq!(backoff_ms(500, 100), u64::MAX);
        assert_eq!(backoff_ms(0, u32::MAX), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_summariser_times_out() {
        let s: Arc<dyn Summarizer> = Arc::new(Slow);
        let r = summarize_window(&s, window(), "text", &config(0)).await;
        assert_eq!(r.error, Some(WindowError::Timeout { window: 3, secs: 1 }));
    }
}
