//! Offline integration tests for the summarise-then-encode pipeline.
//!
//! Every test injects a deterministic [`Summarizer`] so no provider or API
//! key is involved. The fakes answer with the first word of the window they
//! are given, which makes the expected merged text easy to write down: the
//! input is `w0 w1 w2 …`, so a window starting at word 90 summarises to
//! `w90`.

use async_trait::async_trait;
use edgequake_text2braille::{
    merge_summaries, summarize_document, summarize_stream, summarize_sync, summarize_text,
    summarize_to_file, to_braille, LengthBounds, OracleError, OracleReply, SummaryConfig,
    SummaryOutput, SummaryProgressCallback, Summarizer, Text2BrailleError, WindowError,
};
use futures::StreamExt;
use std::collections::HashSet;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Fakes ────────────────────────────────────────────────────────────────────

fn first_word(text: &str) -> String {
    text.split_whitespace().next().unwrap_or_default().to_string()
}

/// Answers with the window's first word; records every call.
#[derive(Default)]
struct FirstWord {
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, LengthBounds)>>,
}

#[async_trait]
impl Summarizer for FirstWord {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<OracleReply, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((first_word(text), bounds));
        Ok(OracleReply {
            text: first_word(text),
            input_tokens: text.split_whitespace().count(),
            output_tokens: 1,
        })
    }
}

/// Early windows take longest, so completion order is reversed.
struct SlowStart;

#[async_trait]
impl Summarizer for SlowStart {
    async fn summarize(&self, text: &str, _bounds: LengthBounds) -> Result<OracleReply, OracleError> {
        let start: u64 = first_word(text).trim_start_matches('w').parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(1_000 - start)).await;
        Ok(first_word(text).into())
    }
}

/// Fails for windows whose first word is in `failing`.
struct FailSome {
    failing: HashSet<&'static str>,
}

#[async_trait]
impl Summarizer for FailSome {
    async fn summarize(&self, text: &str, _bounds: LengthBounds) -> Result<OracleReply, OracleError> {
        let word = first_word(text);
        if self.failing.contains(word.as_str()) {
            Err(OracleError::Provider(format!("refused {word}")))
        } else {
            Ok(word.into())
        }
    }
}

/// Answers with a preamble, a list marker and a line break around the first word.
struct Chatty;

#[async_trait]
impl Summarizer for Chatty {
    async fn summarize(&self, text: &str, _bounds: LengthBounds) -> Result<OracleReply, OracleError> {
        Ok(format!("Summary: 1. {}\nend", first_word(text)).into())
    }
}

struct AlwaysFail;

#[async_trait]
impl Summarizer for AlwaysFail {
    async fn summarize(&self, _text: &str, _bounds: LengthBounds) -> Result<OracleReply, OracleError> {
        Err(OracleError::Provider("503 Service Unavailable".into()))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// `w0 w1 … w{n-1}`
fn numbered_words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

/// 100-word windows with 10 words of overlap: 400 words → 5 windows
/// starting at 0, 90, 180, 270, 360.
fn config_with(summarizer: Arc<dyn Summarizer>) -> SummaryConfig {
    SummaryConfig::builder()
        .max_tokens(100)
        .overlap(10)
        .concurrency(5)
        .max_retries(0)
        .retry_backoff_ms(1)
        .summarizer(summarizer)
        .build()
        .unwrap()
}

const EXPECTED_400: &str = "w0 w90 w180 w270 w360";

// ── Merge ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_window_is_summarised_once_and_merged_in_order() {
    let fake = Arc::new(FirstWord::default());
    let out = summarize_text(&numbered_words(400), &config_with(fake.clone()))
        .await
        .unwrap();

    assert_eq!(fake.calls.load(Ordering::SeqCst), 5);
    assert_eq!(out.summary, EXPECTED_400);
    assert_eq!(out.braille, to_braille(EXPECTED_400));
    assert!(out.stats.summarized);
    assert_eq!(out.stats.total_windows, 5);
    assert_eq!(out.stats.succeeded_windows, 5);
    assert_eq!(out.stats.total_input_tokens, 4 * 100 + 40);
    assert_eq!(out.stats.total_output_tokens, 5);

    let indices: Vec<usize> = out.windows.iter().map(|w| w.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn summariser_replies_are_merged_verbatim() {
    let out = summarize_text(&numbered_words(400), &config_with(Arc::new(Chatty)))
        .await
        .unwrap();
    let expected = ["w0", "w90", "w180", "w270", "w360"]
        .iter()
        .map(|w| format!("Summary: 1. {w}\nend"))
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(out.summary, expected);
    assert!(out.summary.starts_with("Summary: 1. w0\nend Summary:"));
    assert_eq!(out.braille, to_braille(&expected));
}

#[tokio::test(start_paused = true)]
async fn merge_order_does_not_follow_completion_order() {
    let out = summarize_text(&numbered_words(400), &config_with(Arc::new(SlowStart)))
        .await
        .unwrap();
    assert_eq!(out.summary, EXPECTED_400);
}

#[tokio::test(start_paused = true)]
async fn sequential_and_concurrent_runs_agree() {
    let text = numbered_words(400);
    let mut sequential = config_with(Arc::new(SlowStart));
    sequential.concurrency = 1;
    let a = summarize_text(&text, &sequential).await.unwrap();
    let b = summarize_text(&text, &config_with(Arc::new(SlowStart)))
        .await
        .unwrap();
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.braille, b.braille);
}

#[tokio::test]
async fn bounds_are_computed_per_window() {
    let fake = Arc::new(FirstWord::default());
    let out = summarize_text(&numbered_words(400), &config_with(fake.clone()))
        .await
        .unwrap();

    let seen = fake.seen.lock().unwrap().clone();
    for (word, bounds) in seen {
        if word == "w360" {
            // 40-word tail: min 30, max 20, passed through as-is
            assert_eq!(bounds, LengthBounds { min_length: 30, max_length: 20 });
        } else {
            assert_eq!(bounds, LengthBounds { min_length: 30, max_length: 50 });
        }
    }
    assert_eq!(
        out.stats.document_bounds,
        Some(LengthBounds { min_length: 40, max_length: 200 })
    );
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_windows_are_left_out_of_the_merge() {
    let fake = Arc::new(FailSome {
        failing: ["w90", "w270"].into_iter().collect(),
    });
    let out = summarize_text(&numbered_words(400), &config_with(fake))
        .await
        .unwrap();

    assert_eq!(out.summary, "w0 w180 w360");
    assert!(!out.stats.fallback_used);
    assert_eq!(out.stats.failed_windows, 2);

    let failed: Vec<usize> = out
        .windows
        .iter()
        .filter_map(|w| w.error.as_ref().map(WindowError::window))
        .collect();
    assert_eq!(failed, vec![1, 3]);

    match out.into_result() {
        Err(Text2BrailleError::PartialFailure { success, failed, total }) => {
            assert_eq!((success, failed, total), (3, 2, 5));
        }
        other => panic!("expected PartialFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn total_failure_uses_fallback_summary() {
    let out = summarize_text(&numbered_words(400), &config_with(Arc::new(AlwaysFail)))
        .await
        .unwrap();

    assert_eq!(out.summary, "Summarization failed.");
    assert_eq!(out.braille, to_braille("Summarization failed."));
    assert!(out.stats.fallback_used);
    assert_eq!(out.stats.succeeded_windows, 0);
    assert!(out.windows.iter().all(|w| matches!(
        w.error,
        Some(WindowError::OracleFailed { ref detail, .. }) if detail.contains("503")
    )));
}

#[tokio::test]
async fn custom_fallback_is_honoured() {
    let mut config = config_with(Arc::new(AlwaysFail));
    config.fallback_summary = "No summary.".into();
    let out = summarize_text(&numbered_words(400), &config).await.unwrap();
    assert_eq!(out.summary, "No summary.");
}

// ── Threshold ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn below_threshold_is_returned_verbatim() {
    let fake = Arc::new(FirstWord::default());
    let text = numbered_words(149);
    let out = summarize_text(&text, &config_with(fake.clone())).await.unwrap();

    assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    assert_eq!(out.summary, text);
    assert_eq!(out.braille, to_braille(&text));
    assert!(!out.stats.summarized);
    assert_eq!(out.stats.document_bounds, None);
}

#[tokio::test]
async fn threshold_itself_is_summarised() {
    let fake = Arc::new(FirstWord::default());
    let out = summarize_text(&numbered_words(150), &config_with(fake.clone()))
        .await
        .unwrap();
    assert!(out.stats.summarized);
    // 150 words, step 90: windows at 0 and 90
    assert_eq!(fake.calls.load(Ordering::SeqCst), 2);
    assert_eq!(out.summary, "w0 w90");
}

#[tokio::test]
async fn whitespace_only_input_is_an_error() {
    let err = summarize_text("\n \t", &config_with(Arc::new(FirstWord::default())))
        .await
        .unwrap_err();
    assert!(matches!(err, Text2BrailleError::EmptyInput));
}

#[tokio::test]
async fn overlap_not_below_max_tokens_is_rejected() {
    let fake = Arc::new(FirstWord::default());
    let mut config = config_with(fake.clone());
    config.overlap = 100;
    let err = summarize_text(&numbered_words(400), &config).await.unwrap_err();
    assert!(matches!(err, Text2BrailleError::InvalidConfig(_)));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
}

// ── Progress ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Counting {
    started: AtomicUsize,
    completed: AtomicUsize,
    errored: AtomicUsize,
    finished_success: AtomicUsize,
}

impl SummaryProgressCallback for Counting {
    fn on_window_start(&self, _window: usize, _total: usize) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }
    fn on_window_complete(&self, _window: usize, _total: usize, _len: usize) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
    fn on_window_error(&self, _window: usize, _total: usize, _error: &str) {
        self.errored.fetch_add(1, Ordering::SeqCst);
    }
    fn on_summary_complete(&self, _total: usize, success_count: usize) {
        self.finished_success.store(success_count, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn progress_callback_sees_every_window() {
    let cb = Arc::new(Counting::default());
    let mut config = config_with(Arc::new(FailSome {
        failing: ["w180"].into_iter().collect(),
    }));
    config.progress_callback = Some(cb.clone() as Arc<dyn SummaryProgressCallback>);

    summarize_text(&numbered_words(400), &config).await.unwrap();

    assert_eq!(cb.started.load(Ordering::SeqCst), 5);
    assert_eq!(cb.completed.load(Ordering::SeqCst), 4);
    assert_eq!(cb.errored.load(Ordering::SeqCst), 1);
    assert_eq!(cb.finished_success.load(Ordering::SeqCst), 4);
}

// ── Streaming ────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn stream_yields_every_window_and_merges_like_eager() {
    let config = config_with(Arc::new(SlowStart));
    let mut stream = summarize_stream(numbered_words(400), &config).await.unwrap();

    let mut results = Vec::new();
    while let Some(item) = stream.next().await {
        results.push(item.expect("window succeeds"));
    }

    // Reversed sleep: the last window finishes first.
    assert_eq!(results.first().map(|r| r.index), Some(4));
    assert_eq!(results.len(), 5);
    assert_eq!(
        merge_summaries(&results, &config.fallback_summary),
        (EXPECTED_400.to_string(), false)
    );
}

#[tokio::test]
async fn stream_reports_failed_windows_as_errors() {
    let config = config_with(Arc::new(FailSome {
        failing: ["w0"].into_iter().collect(),
    }));
    let items: Vec<_> = summarize_stream(numbered_words(400), &config)
        .await
        .unwrap()
        .collect()
        .await;
    let errors: Vec<&WindowError> = items.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].window(), 0);
}

#[tokio::test]
async fn stream_of_short_input_is_empty() {
    let config = config_with(Arc::new(FirstWord::default()));
    let items: Vec<_> = summarize_stream("just a few words", &config)
        .await
        .unwrap()
        .collect()
        .await;
    assert!(items.is_empty());
}

// ── Documents ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_document_is_read_and_summarised() {
    let mut f = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(f, "{}", numbered_words(400)).unwrap();

    let config = config_with(Arc::new(FirstWord::default()));
    let out = summarize_document(f.path().to_str().unwrap(), &config)
        .await
        .unwrap();
    assert_eq!(out.summary, EXPECTED_400);
}

#[tokio::test]
async fn missing_document_is_reported() {
    let config = config_with(Arc::new(FirstWord::default()));
    let err = summarize_document("/no/such/file.txt", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, Text2BrailleError::FileNotFound { .. }));
}

#[tokio::test]
async fn summary_json_is_written_atomically() {
    let mut input = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
    write!(input, "{}", numbered_words(400)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("nested/out.json");

    let config = config_with(Arc::new(FirstWord::default()));
    let stats = summarize_to_file(input.path().to_str().unwrap(), &out_path, &config)
        .await
        .unwrap();
    assert_eq!(stats.total_windows, 5);

    let json = std::fs::read_to_string(&out_path).unwrap();
    let parsed: SummaryOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.summary, EXPECTED_400);
    assert!(!out_path.with_extension("json.tmp").exists());
}

// ── Sync wrapper ─────────────────────────────────────────────────────────────

#[test]
fn sync_wrapper_runs_without_a_runtime() {
    let config = config_with(Arc::new(FirstWord::default()));
    let out = summarize_sync(&numbered_words(400), &config).unwrap();
    assert_eq!(out.summary, EXPECTED_400);
}
