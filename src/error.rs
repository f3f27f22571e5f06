//! Error types for the scisummary library.
//!
//! One enum, three failure classes:
//!
//! * **Validation** — the request itself is malformed (missing article,
//!   empty context, bad length tier, broken data URI). Raised before any
//!   network call; the caller can correct the input and resubmit.
//!
//! * **Completion** — the external model call failed, timed out, or the
//!   reply does not decode into the expected shape (or decodes to an empty
//!   summary). Terminal for the request; no automatic retry.
//!
//! * **Configuration / internal** — provider not configured, invalid
//!   config, or anything else. At the outermost boundary these are logged
//!   and replaced with a generic message — the detail never reaches the
//!   caller.
//!
//! [`SummaryError::user_message`] implements that boundary mapping, so the
//! response surface is always a populated summary or a single
//! human-readable error string, never both and never a stack trace.

use thiserror::Error;

/// All errors returned by the scisummary library.
#[derive(Debug, Error)]
pub enum SummaryError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Neither article text nor a PDF document was supplied.
    #[error("No article content provided: supply either article text or a PDF data URI.")]
    MissingArticle,

    /// Both article forms were supplied; the request must carry exactly one.
    #[error("Both article text and a PDF document were provided: supply exactly one.")]
    ConflictingArticleForms,

    /// The user-context field is missing or blank.
    #[error("User context must not be empty: describe the reader's background or field.")]
    EmptyUserContext,

    /// The summary-length selector is not one of short/medium/large.
    #[error("Invalid summary length '{value}': expected one of short, medium, large.")]
    InvalidSummaryLength { value: String },

    /// The PDF payload is not a well-formed base64 data URI.
    #[error("Invalid PDF data URI: {detail}\nExpected format: 'data:application/pdf;base64,<encoded_data>'.")]
    InvalidDataUri { detail: String },

    /// The data URI decoded, but the payload is not a PDF.
    #[error("Document payload is not a valid PDF.\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    /// The decoded document exceeds the configured size cap.
    #[error("PDF document is too large: {bytes} bytes (limit {limit} bytes)")]
    DocumentTooLarge { bytes: usize, limit: usize },

    // ── Completion errors ─────────────────────────────────────────────────
    /// The completion call to the external model failed.
    #[error("Completion call failed: {detail}")]
    CompletionFailed { detail: String },

    /// The completion call did not resolve within the configured timeout.
    #[error("Completion call timed out after {secs}s")]
    CompletionTimeout { secs: u64 },

    /// The model reply could not be decoded into the expected shape.
    #[error("Model reply did not match the expected shape: {detail}")]
    MalformedResponse { detail: String },

    /// The reply decoded, but the summary field is empty.
    #[error("Model returned an empty summary")]
    EmptySummary,

    // ── Config errors ─────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fixed user-facing message for completion-class failures.
///
/// Wording follows the original product copy: the article may genuinely be
/// too short or the context too ambiguous for the model to work with.
pub const COMPLETION_FAILURE_MESSAGE: &str =
    "The AI failed to generate a summary. The article may be too short or the context too \
     ambiguous. Please try again.";

/// Fixed user-facing message for internal failures.
pub const UNEXPECTED_FAILURE_MESSAGE: &str =
    "An unexpected error occurred while generating the summary. Please try again later.";

impl SummaryError {
    /// True for errors the caller can fix by correcting the request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SummaryError::MissingArticle
                | SummaryError::ConflictingArticleForms
                | SummaryError::EmptyUserContext
                | SummaryError::InvalidSummaryLength { .. }
                | SummaryError::InvalidDataUri { .. }
                | SummaryError::NotAPdf { .. }
                | SummaryError::DocumentTooLarge { .. }
        )
    }

    /// True for failures of the single external completion call.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            SummaryError::CompletionFailed { .. }
                | SummaryError::CompletionTimeout { .. }
                | SummaryError::MalformedResponse { .. }
                | SummaryError::EmptySummary
        )
    }

    /// The single human-readable string surfaced to the caller.
    ///
    /// Validation errors pass through verbatim — they tell the caller what
    /// to fix. Completion failures collapse to one fixed message, and
    /// anything else to a generic one; the underlying detail is for logs
    /// only.
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            self.to_string()
        } else if self.is_completion() {
            COMPLETION_FAILURE_MESSAGE.to_string()
        } else {
            UNEXPECTED_FAILURE_MESSAGE.to_string()
        }
    }
}
