//! The summarisation oracle and the LLM-backed implementation.
//!
//! The orchestrator never talks to a model directly. It goes through the
//! [`Summarizer`] trait, which takes one window of text plus the length
//! bounds for that window and returns a summary or an error. Tests plug in
//! deterministic fakes; production uses [`LlmSummarizer`] over any
//! `edgequake_llm` chat provider.
//!
//! Retries and timeouts are applied by the pipeline around every summariser,
//! so implementations only need to make a single attempt. Whatever text they
//! return is merged unchanged. [`LlmSummarizer`] therefore cleans model
//! artefacts (fences, "Summary:" preambles, list markers) itself.

use crate::config::SummaryConfig;
use crate::error::Text2BrailleError;
use crate::pipeline::postprocess::clean_summary;
use crate::prompts::{length_instruction, DEFAULT_SYSTEM_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default model used when the provider is resolved from the environment.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Target summary length in words, passed to the summariser per window.
///
/// `min_length` may exceed `max_length` for short windows (a 40-word tail
/// gets `min = 30`, `max = 20`); the values are passed through unchanged and
/// each summariser decides how to honour them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub min_length: usize,
    pub max_length: usize,
}

impl LengthBounds {
    /// `max = min(200, words / 2)`, `min = max(30, words / 10)`.
    pub fn for_word_count(words: usize) -> Self {
        Self {
            min_length: (words / 10).max(30),
            max_length: (words / 2).min(200),
        }
    }
}

/// One successful summariser answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OracleReply {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl From<String> for OracleReply {
    fn from(text: String) -> Self {
        Self {
            text,
            ..Default::default()
        }
    }
}

impl From<&str> for OracleReply {
    fn from(text: &str) -> Self {
        text.to_string().into()
    }
}

/// Why a single summariser attempt failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
    /// The backing model or service returned an error.
    #[error("{0}")]
    Provider(String),

    /// The summariser produced nothing usable.
    #[error("summariser returned no text")]
    Empty,
}

/// Summarise one window of text.
///
/// Implementations must be `Send + Sync`: windows are summarised
/// concurrently and the same instance is shared by every window of a request.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<OracleReply, OracleError>;
}

/// [`Summarizer`] backed by an `edgequake_llm` chat provider.
pub struct LlmSummarizer {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    temperature: f32,
    max_output_tokens: usize,
}

impl LlmSummarizer {
    /// Wrap `provider` using the prompt and sampling settings of `config`.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &SummaryConfig) -> Self {
        Self {
            provider,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }

    fn build_messages(&self, text: &str, bounds: LengthBounds) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(format!("{}\n\n{}", length_instruction(bounds), text)),
        ]
    }

    fn build_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_output_tokens),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<OracleReply, OracleError> {
        let messages = self.build_messages(text, bounds);
        let options = self.build_options();

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| OracleError::Provider(e.to_string()))?;

        debug!(
            "{} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        let text = clean_summary(&response.content);
        if text.is_empty() {
            return Err(OracleError::Empty);
        }

        Ok(OracleReply {
            text,
            input_tokens: response.prompt_tokens as usize,
            output_tokens: response.completion_tokens as usize,
        })
    }
}

/// Resolve the summariser, from most-specific to least-specific.
///
/// 1. **Pre-built summariser** (`config.summarizer`) — used as-is.
/// 2. **Pre-built provider** (`config.provider`) — wrapped in [`LlmSummarizer`].
/// 3. **Named provider + model** (`config.provider_name`).
/// 4. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 5. **`OPENAI_API_KEY`** present → OpenAI with the configured or default model.
/// 6. **Full auto-detection** (`ProviderFactory::from_env`).
///
/// Only called once a request actually needs a summary, so short inputs
/// never require an API key.
pub fn resolve_summarizer(config: &SummaryConfig) -> Result<Arc<dyn Summarizer>, Text2BrailleError> {
    if let Some(ref summarizer) = config.summarizer {
        return Ok(Arc::clone(summarizer));
    }
    let provider = resolve_provider(config)?;
    Ok(Arc::new(LlmSummarizer::new(provider, config)))
}

fn resolve_provider(config: &SummaryConfig) -> Result<Arc<dyn LLMProvider>, Text2BrailleError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    // With several keys present, OpenAI wins unless another provider is named.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| Text2BrailleError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, Text2BrailleError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        Text2BrailleError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
