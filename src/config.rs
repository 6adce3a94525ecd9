//! Configuration types for document summarisation.
//!
//! Every knob lives in [`SummaryConfig`], built via its
//! [`SummaryConfigBuilder`]. Setters clamp obviously-out-of-range numbers;
//! [`SummaryConfigBuilder::build`] rejects combinations that cannot work,
//! most importantly an `overlap` that is not smaller than `max_tokens`.

use crate::error::Text2BrailleError;
use crate::pipeline::chunk::validate_window_params;
use crate::progress::ProgressCallback;
use crate::summarizer::Summarizer;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Summary returned when every window fails.
pub const DEFAULT_FALLBACK_SUMMARY: &str = "Summarization failed.";

/// Configuration for a summarisation request.
///
/// # Example
/// ```rust
/// use edgequake_text2braille::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .max_tokens(400)
///     .overlap(40)
///     .concurrency(8)
///     .model("gpt-4.1-mini")
///     .build()
///     .unwrap();
/// assert_eq!(config.threshold_words, 150);
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// Maximum words per window. Default: 512.
    pub max_tokens: usize,

    /// Words shared by consecutive windows. Default: 50. Must be `< max_tokens`.
    pub overlap: usize,

    /// Inputs with fewer words than this are returned verbatim. Default: 150.
    ///
    /// Summarisation models tuned for long passages tend to pad or distort
    /// very short ones, so those skip the model entirely.
    pub threshold_words: usize,

    /// Number of windows summarised concurrently. Default: 4.
    ///
    /// Output order never depends on this: results are re-sorted by window
    /// index before merging.
    pub concurrency: usize,

    /// LLM model identifier. If None, [`crate::summarizer::DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed summariser. Takes precedence over every provider setting.
    pub summarizer: Option<Arc<dyn Summarizer>>,

    /// Sampling temperature. Default: 0.2.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate per window. Default: 512.
    pub max_output_tokens: usize,

    /// Retries per window after the first attempt. Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled per attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// Custom system prompt. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Summary used when every window fails. Default: "Summarization failed."
    pub fallback_summary: String,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-summariser-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Optional progress callback for per-window events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            overlap: 50,
            threshold_words: 150,
            concurrency: 4,
            model: None,
            provider_name: None,
            provider: None,
            summarizer: None,
            temperature: 0.2,
            max_output_tokens: 512,
            max_retries: 2,
            retry_backoff_ms: 500,
            system_prompt: None,
            fallback_summary: DEFAULT_FALLBACK_SUMMARY.to_string(),
            download_timeout_secs: 120,
            api_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("max_tokens", &self.max_tokens)
            .field("overlap", &self.overlap)
            .field("threshold_words", &self.threshold_words)
            .field("concurrency", &self.concurrency)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("summarizer", &self.summarizer.as_ref().map(|_| "<dyn Summarizer>"))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("max_retries", &self.max_retries)
            .field("fallback_summary", &self.fallback_summary)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// Re-check invariants on a config whose fields were set directly.
    pub fn validate(&self) -> Result<(), Text2BrailleError> {
        validate_window_params(self.max_tokens, self.overlap)?;
        if self.concurrency == 0 {
            return Err(Text2BrailleError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`SummaryConfig`].
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl fmt::Debug for SummaryConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl SummaryConfigBuilder {
    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn overlap(mut self, n: usize) -> Self {
        self.config.overlap = n;
        self
    }

    pub fn threshold_words(mut self, n: usize) -> Self {
        self.config.threshold_words = n;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.config.summarizer = Some(summarizer);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn fallback_summary(mut self, text: impl Into<String>) -> Self {
        self.config.fallback_summary = text.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, Text2BrailleError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
