//! Summarization entry points.
//!
//! One request flows through validate → compose → invoke as a single
//! async suspension: no parallel sub-tasks, no shared state between
//! requests, exactly one outbound model call. Validation runs before the
//! provider is resolved, so a malformed request never touches the network.

use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::output::{SummaryOutput, SummaryResponse, SummaryStats};
use crate::pipeline::invoke::{CompletionBackend, ProviderBackend};
use crate::pipeline::{compose, invoke, validate};
use crate::request::SummaryRequest;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

/// Model used when the caller names a provider but no model.
const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Summarize an article for the described reader.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `request` — article (text or PDF data URI), reader context, length tier
/// * `config` — model selection and call limits
///
/// # Errors
/// Validation errors surface before any external call; completion errors
/// report the single failed call. There is no internal retry — a caller
/// that wants one re-invokes this function.
pub async fn summarize(
    request: &SummaryRequest,
    config: &SummaryConfig,
) -> Result<SummaryOutput, SummaryError> {
    let start = Instant::now();

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let validated = validate::validate(request, config)?;
    info!(length = %validated.summary_length, "starting summarization");

    // ── Step 2: Compose the prompt ───────────────────────────────────────
    let prompt = compose::compose_prompt(&validated);
    debug!(prompt_chars = prompt.len(), "prompt composed");

    // ── Step 3: Resolve the backend ──────────────────────────────────────
    let backend = resolve_backend(config)?;

    // ── Step 4: The single completion call, under the configured timeout ─
    let call = invoke::invoke(backend.as_ref(), &prompt, validated.document());
    let invocation = match timeout(Duration::from_secs(config.api_timeout_secs), call).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(SummaryError::CompletionTimeout {
                secs: config.api_timeout_secs,
            })
        }
    };

    let stats = SummaryStats {
        input_tokens: invocation.input_tokens,
        output_tokens: invocation.output_tokens,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        input_tokens = stats.input_tokens,
        output_tokens = stats.output_tokens,
        duration_ms = stats.duration_ms,
        "summarization complete"
    );

    Ok(SummaryOutput {
        summary: invocation.result.summary,
        stats,
    })
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally.
pub fn summarize_sync(
    request: &SummaryRequest,
    config: &SummaryConfig,
) -> Result<SummaryOutput, SummaryError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SummaryError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(summarize(request, config))
}

/// The outermost boundary: always resolves to a summary or a single
/// human-readable error string, never both and never internal detail.
///
/// Validation messages pass through so the caller can fix the request;
/// completion failures collapse to a fixed message; anything else is
/// logged here and replaced with a generic one.
pub async fn summarize_response(
    request: &SummaryRequest,
    config: &SummaryConfig,
) -> SummaryResponse {
    match summarize(request, config).await {
        Ok(output) => SummaryResponse::Success {
            summary: output.summary,
        },
        Err(e) => {
            if !e.is_validation() {
                error!(detail = %e, "summarization failed");
            }
            SummaryResponse::Failure {
                error: e.user_message(),
            }
        }
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the completion backend, from most-specific to least-specific.
///
/// The fallback chain lets library users and CLI users each set exactly
/// as much or as little as they need:
///
/// 1. **Pre-built backend** (`config.backend`) — the caller constructed it
///    entirely; used as-is. This is also the test seam.
///
/// 2. **Named provider + model** (`config.provider_name`) — resolved via
///    [`ProviderFactory::create_llm_provider`], which reads the matching
///    API key (`OPENAI_API_KEY`, etc.) from the environment.
///
/// 3. **Environment pair** (`SCISUMMARY_LLM_PROVIDER` + `SCISUMMARY_MODEL`)
///    — both set means the execution environment chose; checked before
///    auto-detection so the choice is honoured even when several API keys
///    are present.
///
/// 4. **OpenAI preference** — an `OPENAI_API_KEY` in the environment wins
///    over full auto-detection, so multi-key setups default predictably.
///
/// 5. **Full auto-detection** (`ProviderFactory::from_env`) — the factory
///    scans known API-key variables and picks the first available
///    provider.
fn resolve_backend(config: &SummaryConfig) -> Result<Arc<dyn CompletionBackend>, SummaryError> {
    // 1) User-provided backend takes priority
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let provider = create_provider(name, model)?;
        return Ok(wrap_provider(provider, config));
    }

    // 3) Environment pair
    if let (Ok(prov), Ok(model)) = (
        std::env::var("SCISUMMARY_LLM_PROVIDER"),
        std::env::var("SCISUMMARY_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            let provider = create_provider(&prov, &model)?;
            return Ok(wrap_provider(provider, config));
        }
    }

    // 4) Prefer OpenAI when its key is present
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            let provider = create_provider("openai", model)?;
            return Ok(wrap_provider(provider, config));
        }
    }

    // 5) Full auto-detection
    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| SummaryError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from the environment.\n\
                 Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                 Error: {e}"
            ),
        })?;

    Ok(wrap_provider(provider, config))
}

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, SummaryError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        SummaryError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

fn wrap_provider(
    provider: Arc<dyn LLMProvider>,
    config: &SummaryConfig,
) -> Arc<dyn CompletionBackend> {
    Arc::new(ProviderBackend::new(
        provider,
        config.temperature,
        config.max_tokens,
    ))
}
