//! # scisummary
//!
//! Audience-tailored summaries of scientific articles via LLMs.
//!
//! ## Why this crate?
//!
//! A scientific article reads very differently to an immunologist, a
//! software engineer, and a high-school student. This crate turns an
//! article (plain text or a PDF) plus a one-line description of the reader
//! into a summary pitched at exactly that reader: the prompt encodes how
//! to analyse the article, how to adapt register across four audience
//! tiers, the section structure of the output, and a word budget per
//! length tier. The model does the summarizing; this crate does everything
//! around the call — validation, prompt assembly, structured-output
//! decoding, and a clean error surface.
//!
//! ## Pipeline Overview
//!
//! ```text
//! request
//!  │
//!  ├─ 1. Validate  exactly one article form, non-empty context, PDF checks
//!  ├─ 2. Compose   deterministic instruction prompt from fixed templates
//!  ├─ 3. Invoke    one completion call (JSON-schema constrained reply)
//!  └─ 4. Output    summary + token/latency stats, or one error string
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scisummary::{summarize, SummaryConfig, SummaryLength, SummaryRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let config = SummaryConfig::default();
//!     let request = SummaryRequest::from_text(
//!         std::fs::read_to_string("article.txt")?,
//!         "high school student",
//!         SummaryLength::Short,
//!     );
//!     let output = summarize(&request, &config).await?;
//!     println!("{}", output.summary);
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.input_tokens,
//!         output.stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scisummary` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! scisummary = { version = "0.3", default-features = false }
//! ```
//!
//! ## Known limitations
//!
//! User-supplied text is interpolated into the prompt verbatim — there is
//! no prompt-injection mitigation. There is no retry, no backoff, and no
//! rate limiting: one request maps to exactly one model call. All three
//! are deliberate scope decisions, not oversights.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod request;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SummaryConfig, SummaryConfigBuilder, DEFAULT_MAX_DOCUMENT_BYTES};
pub use error::{SummaryError, COMPLETION_FAILURE_MESSAGE, UNEXPECTED_FAILURE_MESSAGE};
pub use output::{SummaryOutput, SummaryResponse, SummaryResult, SummaryStats};
pub use pipeline::invoke::{CompletionBackend, ModelReply, ProviderBackend};
pub use request::{ArticleSource, PdfDocument, SummaryLength, SummaryRequest, ValidatedRequest};
pub use summarize::{summarize, summarize_response, summarize_sync};
