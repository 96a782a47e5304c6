//! Configuration for the report pipeline.
//!
//! Every knob lives in one [`ReportConfig`] struct, built via its
//! [`ReportConfigBuilder`] or loaded from the environment with
//! [`ReportConfig::from_env`]. The pipeline itself never reads environment
//! variables — keeping all configuration in one explicit value makes batches
//! reproducible and lets tests inject a fake summarizer without touching the
//! process environment.

use crate::error::VipReportError;
use crate::summarizer::Summarizer;
use std::fmt;
use std::sync::Arc;

/// Environment variables honoured by [`ReportConfig::from_env`].
///
/// These names come from the original deployment and are kept for
/// compatibility with existing `.env` files.
pub const ENV_MAX_DOCS: &str = "MAX_PDFS_IA";
pub const ENV_MAX_CHARS: &str = "MAX_CHARS_GPT";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_KEY_LOWER: &str = "openai_api_key";
pub const ENV_REQUEST_TIMEOUT: &str = "OPENAI_REQUEST_TIMEOUT";

/// Configuration for one report-generation batch.
///
/// Built via [`ReportConfig::builder()`], [`ReportConfig::from_env()`], or
/// [`ReportConfig::default()`].
///
/// # Example
/// ```rust
/// use vipreport::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .max_docs_for_llm(13)
///     .max_corpus_chars(12_000)
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ReportConfig {
    /// Largest batch still sent to the LLM. Default: 13.
    ///
    /// A batch of exactly this many documents uses the LLM; one more falls
    /// back to the local summary. This is a resource-protection measure
    /// (request timeouts, memory pressure on large corpora), not a quality
    /// decision, which is why it degrades gracefully instead of failing.
    pub max_docs_for_llm: usize,

    /// Maximum characters of corpus text sent to the summarizer. Default: 12 000.
    ///
    /// The corpus is truncated (on a char boundary) before the call; the
    /// cleaned per-category text is front-loaded with findings, so the tail
    /// loses mostly administrative remnants.
    pub max_corpus_chars: usize,

    /// LLM model identifier, e.g. "gpt-4o-mini". If None, uses the provider
    /// default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None, defaults to "openai".
    pub provider_name: Option<String>,

    /// Pre-constructed summarizer. Takes precedence over `provider_name` and
    /// bypasses the credential check — this is the seam tests use to run the
    /// whole pipeline against a deterministic fake.
    pub summarizer: Option<Arc<dyn Summarizer>>,

    /// API credential for the summarizer provider. If None when the LLM path
    /// is selected and no `summarizer` override is set, the batch fails with
    /// [`VipReportError::MissingCredential`].
    pub credential: Option<String>,

    /// Sampling temperature for the narrative completion. Default: 0.4.
    ///
    /// Slightly above zero: the body is prose, not transcription, so a
    /// little variation reads better, while staying faithful to the corpus.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate for the body. Default: 900.
    pub max_tokens: usize,

    /// Per-call timeout for the summarizer in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Always use the local extractive summary, regardless of batch size.
    /// Default: false.
    ///
    /// Distinct from the size threshold: a forced local run is a caller
    /// choice, so the body carries no over-threshold notice.
    pub force_local: bool,

    /// Custom system instruction. If None, uses the built-in default from
    /// [`crate::prompts`].
    pub system_prompt: Option<String>,

    /// Remove `HTTP_PROXY`-family variables from the process environment
    /// before constructing the LLM client. Default: true.
    ///
    /// Stale proxy variables in container environments have broken the
    /// upstream HTTP client in ways that surface as opaque connect errors.
    pub scrub_proxy_vars: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_docs_for_llm: 13,
            max_corpus_chars: 12_000,
            model: None,
            provider_name: None,
            summarizer: None,
            credential: None,
            temperature: 0.4,
            max_tokens: 900,
            api_timeout_secs: 60,
            force_local: false,
            system_prompt: None,
            scrub_proxy_vars: true,
        }
    }
}

impl fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportConfig")
            .field("max_docs_for_llm", &self.max_docs_for_llm)
            .field("max_corpus_chars", &self.max_corpus_chars)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("summarizer", &self.summarizer.as_ref().map(|_| "<dyn Summarizer>"))
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("force_local", &self.force_local)
            .field("scrub_proxy_vars", &self.scrub_proxy_vars)
            .finish()
    }
}

impl ReportConfig {
    /// Create a new builder for `ReportConfig`.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// Unset or unparsable numeric variables fall back to the defaults. The
    /// credential is read from `OPENAI_API_KEY`, or `openai_api_key` as a
    /// legacy alias.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_parse::<usize>(ENV_MAX_DOCS) {
            config.max_docs_for_llm = n;
        }
        if let Some(n) = env_parse::<usize>(ENV_MAX_CHARS) {
            config.max_corpus_chars = n;
        }
        if let Some(secs) = env_parse::<u64>(ENV_REQUEST_TIMEOUT) {
            config.api_timeout_secs = secs;
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = Some(model.trim().to_string());
            }
        }
        config.credential = std::env::var(ENV_API_KEY)
            .or_else(|_| std::env::var(ENV_API_KEY_LOWER))
            .ok()
            .filter(|k| !k.is_empty());

        config
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Builder for [`ReportConfig`].
#[derive(Debug)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    pub fn max_docs_for_llm(mut self, n: usize) -> Self {
        self.config.max_docs_for_llm = n;
        self
    }

    pub fn max_corpus_chars(mut self, n: usize) -> Self {
        self.config.max_corpus_chars = n;
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

    pub fn summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.config.summarizer = Some(summarizer);
        self
    }

    pub fn credential(mut self, key: impl Into<String>) -> Self {
        self.config.credential = Some(key.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn force_local(mut self, v: bool) -> Self {
        self.config.force_local = v;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn scrub_proxy_vars(mut self, v: bool) -> Self {
        self.config.scrub_proxy_vars = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ReportConfig, VipReportError> {
        let c = &self.config;
        if c.max_corpus_chars == 0 {
            return Err(VipReportError::InvalidConfig(
                "max_corpus_chars must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(VipReportError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_values() {
        let c = ReportConfig::default();
        assert_eq!(c.max_docs_for_llm, 13);
        assert_eq!(c.max_corpus_chars, 12_000);
        assert_eq!(c.max_tokens, 900);
        assert!(c.scrub_proxy_vars);
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = ReportConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn builder_rejects_zero_corpus_budget() {
        let err = ReportConfig::builder().max_corpus_chars(0).build();
        assert!(matches!(err, Err(VipReportError::InvalidConfig(_))));
    }

    #[test]
    fn debug_redacts_credential() {
        let c = ReportConfig::builder().credential("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("redacted"));
    }
}
