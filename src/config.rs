//! Configuration types for summarization.
//!
//! All behaviour is controlled through [`SummaryConfig`], built via its
//! [`SummaryConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::SummaryError;
use crate::pipeline::invoke::CompletionBackend;
use std::fmt;
use std::sync::Arc;

/// Default size cap for a PDF payload: 5 MB of decoded bytes, the intake
/// limit the product has always enforced at the upload boundary.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Configuration for a summarization call.
///
/// Built via [`SummaryConfig::builder()`] or [`SummaryConfig::default()`].
///
/// # Example
/// ```rust
/// use scisummary::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .model("gpt-4.1-mini")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// LLM model identifier, e.g. "gpt-4.1-nano", "claude-sonnet-4-20250514".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "gemini").
    /// If None along with `backend`, the provider is auto-detected from the
    /// environment.
    pub provider_name: Option<String>,

    /// Pre-constructed completion backend. Takes precedence over
    /// `provider_name`; the seam used by tests and by callers that need
    /// custom middleware around the model call.
    pub backend: Option<Arc<dyn CompletionBackend>>,

    /// Sampling temperature. Default: 0.2.
    ///
    /// Summaries should stay faithful to the article; a low temperature
    /// keeps the model from embellishing while leaving it enough latitude
    /// to rephrase for the target audience.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2048.
    ///
    /// The large tier tops out around 1200 words; 2048 tokens covers that
    /// with headroom. Setting this too low truncates the JSON reply
    /// mid-object and the decode fails.
    pub max_tokens: usize,

    /// Decoded-size cap for PDF payloads in bytes. Default: 5 MB.
    pub max_document_bytes: usize,

    /// Timeout applied around the single completion call, in seconds.
    /// Default: 120.
    ///
    /// The invoker itself exposes no cancellation; this is the
    /// caller-level wrap around the one invocation. On expiry the request
    /// fails with [`SummaryError::CompletionTimeout`] — there is no retry.
    pub api_timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            backend: None,
            temperature: 0.2,
            max_tokens: 2048,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            api_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn CompletionBackend>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_document_bytes", &self.max_document_bytes)
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
}

/// Builder for [`SummaryConfig`].
#[derive(Debug)]
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn backend(mut self, backend: Arc<dyn CompletionBackend>) -> Self {
        self.config.backend = Some(backend);
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

    pub fn max_document_bytes(mut self, n: usize) -> Self {
        self.config.max_document_bytes = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, SummaryError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(SummaryError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.max_document_bytes == 0 {
            return Err(SummaryError::InvalidConfig(
                "max_document_bytes must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
