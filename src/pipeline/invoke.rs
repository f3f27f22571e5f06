//! Completion invocation: the single outbound model call.
//!
//! This stage is intentionally thin — all prompt text lives in
//! [`crate::prompts`] and the composed prompt arrives ready-made, so the
//! module only assembles messages, performs exactly one call, and decodes
//! the reply. It is stateless across calls and never retries; a transient
//! provider failure is reported once, as a terminal completion error for
//! that request.
//!
//! The provider boundary is the [`CompletionBackend`] trait so tests and
//! middleware can stand in for the network. The default implementation,
//! [`ProviderBackend`], adapts any `edgequake_llm` provider.

use crate::error::SummaryError;
use crate::output::SummaryResult;
use crate::prompts;
use crate::request::PdfDocument;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use std::sync::Arc;
use tracing::debug;

/// Raw reply from one completion call.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// The model's text output, expected to be a JSON object.
    pub content: String,
    /// Prompt tokens consumed.
    pub input_tokens: u64,
    /// Completion tokens generated.
    pub output_tokens: u64,
}

/// One call to an external text-completion capability.
///
/// Implementations must be `Send + Sync`; the pipeline holds them behind
/// an `Arc`. A call must map to exactly one outbound request — retry and
/// backoff policy, if any, belongs to the caller, not the backend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Submit the composed prompt, with the article document attached when
    /// the request arrived in PDF form, and return the raw reply.
    async fn complete(
        &self,
        prompt: &str,
        document: Option<&PdfDocument>,
    ) -> Result<ModelReply, SummaryError>;
}

/// Default backend: an `edgequake_llm` provider plus completion options.
///
/// ## Message Layout
///
/// 1. **System message** — the JSON-only instruction with the generated
///    [`SummaryResult`] schema
/// 2. **User message** — the composed prompt; for the PDF form the
///    document rides along as a base64 media attachment
pub struct ProviderBackend {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl ProviderBackend {
    /// Wrap a provider with the given sampling options.
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            options: CompletionOptions {
                temperature: Some(temperature),
                max_tokens: Some(max_tokens),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl CompletionBackend for ProviderBackend {
    async fn complete(
        &self,
        prompt: &str,
        document: Option<&PdfDocument>,
    ) -> Result<ModelReply, SummaryError> {
        let mut messages = vec![ChatMessage::system(prompts::structured_output_instruction())];

        match document {
            None => messages.push(ChatMessage::user(prompt)),
            Some(doc) => messages.push(ChatMessage::user_with_images(
                prompt,
                vec![ImageData::new(doc.base64_data.clone(), doc.mime_type.as_str())],
            )),
        }

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| SummaryError::CompletionFailed {
                detail: e.to_string(),
            })?;

        debug!(
            input_tokens = response.prompt_tokens,
            output_tokens = response.completion_tokens,
            "completion call returned"
        );

        Ok(ModelReply {
            content: response.content,
            input_tokens: response.prompt_tokens as u64,
            output_tokens: response.completion_tokens as u64,
        })
    }
}

/// Outcome of a successful invocation: the decoded result plus accounting.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub result: SummaryResult,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Perform the single completion call and decode the reply.
///
/// # Errors
/// - [`SummaryError::CompletionFailed`] — the outbound call failed
/// - [`SummaryError::MalformedResponse`] — the reply is not a
///   [`SummaryResult`] JSON object
/// - [`SummaryError::EmptySummary`] — the reply decoded but the summary
///   field is blank
pub async fn invoke(
    backend: &dyn CompletionBackend,
    prompt: &str,
    document: Option<&PdfDocument>,
) -> Result<Invocation, SummaryError> {
    let reply = backend.complete(prompt, document).await?;
    let result = decode_reply(&reply.content)?;

    Ok(Invocation {
        result,
        input_tokens: reply.input_tokens,
        output_tokens: reply.output_tokens,
    })
}

/// Decode the model's text reply into a [`SummaryResult`].
fn decode_reply(content: &str) -> Result<SummaryResult, SummaryError> {
    let cleaned = strip_json_fences(content);

    let result: SummaryResult =
        serde_json::from_str(cleaned).map_err(|e| SummaryError::MalformedResponse {
            detail: e.to_string(),
        })?;

    if result.summary.trim().is_empty() {
        return Err(SummaryError::EmptySummary);
    }

    Ok(result)
}

/// Strip a markdown code-fence wrapper from a JSON reply.
///
/// Models occasionally disobey the JSON-only instruction and wrap the
/// object in ```` ```json … ``` ````; the payload inside is usually fine,
/// so unwrap it rather than fail the request.
fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        if let Some(end) = inner.rfind("```") {
            return inner[..end].trim();
        }
    }

    trimmed
}
