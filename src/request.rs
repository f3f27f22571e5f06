//! Request types: the wire-level [`SummaryRequest`] and its validated form.
//!
//! The wire field names (`articleText`, `pdfDataUri`, `userContext`,
//! `summaryLength`) are camelCase so a JSON request body round-trips
//! unchanged through whatever transport the integrator puts in front of
//! the library. Validation lives in [`crate::pipeline::validate`]; the
//! types here only describe shape.

use crate::error::SummaryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A summarization request as submitted by the caller.
///
/// Exactly one of `article_text` / `pdf_data_uri` must be present; a
/// whitespace-only string counts as absent. `user_context` describes the
/// reader the summary is tailored to ("high school student",
/// "immunologist", "software engineer curious about biology", …).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// The article as plain text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_text: Option<String>,

    /// The article as a PDF, encoded as a base64 data URI:
    /// `data:application/pdf;base64,<encoded_data>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_data_uri: Option<String>,

    /// The reader's background or field of expertise.
    pub user_context: String,

    /// Desired summary length tier.
    pub summary_length: SummaryLength,
}

impl SummaryRequest {
    /// Convenience constructor for the text form.
    pub fn from_text(
        article_text: impl Into<String>,
        user_context: impl Into<String>,
        summary_length: SummaryLength,
    ) -> Self {
        Self {
            article_text: Some(article_text.into()),
            pdf_data_uri: None,
            user_context: user_context.into(),
            summary_length,
        }
    }

    /// Convenience constructor for the PDF form.
    pub fn from_pdf_data_uri(
        pdf_data_uri: impl Into<String>,
        user_context: impl Into<String>,
        summary_length: SummaryLength,
    ) -> Self {
        Self {
            article_text: None,
            pdf_data_uri: Some(pdf_data_uri.into()),
            user_context: user_context.into(),
            summary_length,
        }
    }
}

/// Desired summary length, each tier mapped to a word band in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// ~200–400 words.
    Short,
    /// ~400–800 words. (default)
    #[default]
    Medium,
    /// ~800–1200 words.
    Large,
}

impl SummaryLength {
    /// The wire literal for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Large => "large",
        }
    }

    /// Target word-count band `(min, max)` for this tier.
    pub fn word_band(&self) -> (u32, u32) {
        match self {
            SummaryLength::Short => (200, 400),
            SummaryLength::Medium => (400, 800),
            SummaryLength::Large => (800, 1200),
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = SummaryError;

    /// Parse a tier literal; anything outside the closed set is rejected
    /// with a validation error naming the illegal value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "large" => Ok(SummaryLength::Large),
            other => Err(SummaryError::InvalidSummaryLength {
                value: other.to_string(),
            }),
        }
    }
}

/// A request that has passed [`crate::pipeline::validate`].
///
/// The article is collapsed into a single [`ArticleSource`] so downstream
/// stages cannot observe the invalid both-or-neither states.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub article: ArticleSource,
    pub user_context: String,
    pub summary_length: SummaryLength,
}

impl ValidatedRequest {
    /// The PDF document, when the article arrived in document form.
    pub fn document(&self) -> Option<&PdfDocument> {
        match &self.article {
            ArticleSource::Text(_) => None,
            ArticleSource::Pdf(doc) => Some(doc),
        }
    }
}

/// Exactly one form of the article survives validation.
#[derive(Debug, Clone)]
pub enum ArticleSource {
    /// Plain text, embedded verbatim in the prompt.
    Text(String),
    /// A PDF, attached to the model call as a base64 media object.
    Pdf(PdfDocument),
}

/// A decoded-and-checked PDF payload ready to attach to the model call.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    /// MIME type from the data URI (always `application/pdf` today).
    pub mime_type: String,
    /// The base64 payload, exactly as it will travel to the provider.
    pub base64_data: String,
}
