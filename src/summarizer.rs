//! The external summarizer as a capability.
//!
//! The pipeline never talks to an LLM API directly — it goes through the
//! narrow [`Summarizer`] trait (`summarize(instructions, corpus) → text`),
//! which fails with an opaque [`SummarizeError`]. This keeps the core
//! testable with a deterministic fake, independent of network and
//! credentials, and leaves the provider zoo (OpenAI, Anthropic, Gemini,
//! Ollama, …) entirely to [`ChatSummarizer`].

use crate::config::ReportConfig;
use crate::error::VipReportError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Opaque failure from a summarizer backend.
///
/// Network, auth, and quota problems all look the same to the pipeline:
/// the call failed and the batch fails with it. Any taxonomy the backend
/// offers is flattened into the message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SummarizeError(pub String);

/// Text-in, text-out summarization capability.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a narrative from `corpus` under `instructions`.
    async fn summarize(&self, instructions: &str, corpus: &str) -> Result<String, SummarizeError>;
}

/// Proxy-related variables scrubbed before constructing the LLM client.
///
/// Stale values left over in container environments have broken the HTTP
/// client with opaque connect errors; the deployed service removed them
/// unconditionally and we keep that behavior (opt out via
/// [`ReportConfig::scrub_proxy_vars`]).
const PROXY_VARS: [&str; 8] = [
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "ALL_PROXY",
    "http_proxy",
    "https_proxy",
    "all_proxy",
    "OPENAI_HTTP_PROXY",
    "OPENAI_PROXY",
];

/// Default model when the config names neither model nor provider.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// [`Summarizer`] backed by an `edgequake-llm` chat provider.
pub struct ChatSummarizer {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
    timeout: Duration,
}

impl ChatSummarizer {
    /// Construct the summarizer from the batch configuration.
    ///
    /// Fails with [`VipReportError::MissingCredential`] when no API key is
    /// configured, and with [`VipReportError::Summarization`] when the
    /// provider itself cannot be constructed.
    pub fn from_config(config: &ReportConfig) -> Result<Self, VipReportError> {
        if config.credential.is_none() {
            return Err(VipReportError::MissingCredential {
                hint: format!(
                    "Set {} in the environment, or inject a Summarizer via ReportConfig.",
                    crate::config::ENV_API_KEY
                ),
            });
        }

        if config.scrub_proxy_vars {
            for var in PROXY_VARS {
                if std::env::var_os(var).is_some() {
                    warn!("Removing stale proxy variable {var} before LLM client construction");
                    std::env::remove_var(var);
                }
            }
        }

        let provider_name = config.provider_name.as_deref().unwrap_or("openai");
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            VipReportError::Summarization {
                detail: format!("provider '{provider_name}' could not be constructed: {e}"),
            }
        })?;

        Ok(Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.api_timeout_secs),
        })
    }

    /// Wrap an already-constructed provider (useful for custom middleware).
    pub fn with_provider(provider: Arc<dyn LLMProvider>, config: &ReportConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, instructions: &str, corpus: &str) -> Result<String, SummarizeError> {
        let messages = vec![
            ChatMessage::system(instructions),
            ChatMessage::user(corpus),
        ];
        let options = CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        };

        let response = tokio::time::timeout(self.timeout, self.provider.chat(&messages, Some(&options)))
            .await
            .map_err(|_| SummarizeError(format!("call timed out after {:?}", self.timeout)))?
            .map_err(|e| SummarizeError(format!("{e}")))?;

        debug!(
            "Summarizer returned {} chars ({} in / {} out tokens)",
            response.content.len(),
            response.prompt_tokens,
            response.completion_tokens
        );

        Ok(response.content)
    }
}
