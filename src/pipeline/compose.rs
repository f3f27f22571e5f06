//! Prompt composition: render the instruction text for the model.
//!
//! Deterministic: identical input produces byte-identical output, with no
//! randomness and no clock. All template text lives in [`crate::prompts`];
//! this module only selects the article branch and interpolates fields.
//!
//! The user context and article text are interpolated verbatim. Nothing
//! here escapes or sanitises them against prompt injection — an accepted
//! limitation of the product, inherited deliberately.

use crate::prompts;
use crate::request::{ArticleSource, ValidatedRequest};

/// Render the complete instruction prompt for a validated request.
///
/// Layout:
/// 1. Task header with the reader's background
/// 2. Article section — verbatim text under its heading, or the
///    attached-document marker for the PDF form
/// 3. Length line with the tier's word band
/// 4. The fixed guidance blocks
pub fn compose_prompt(request: &ValidatedRequest) -> String {
    let article_section = match &request.article {
        ArticleSource::Text(text) => {
            format!("{}\n{}", prompts::ARTICLE_TEXT_HEADING, text)
        }
        ArticleSource::Pdf(_) => prompts::ATTACHED_DOCUMENT_MARKER.to_string(),
    };

    format!(
        "{header}{context}.\n\n{article}\n\n{length}\n\n{guidance}",
        header = prompts::TASK_HEADER,
        context = request.user_context,
        article = article_section,
        length = prompts::length_instruction(request.summary_length),
        guidance = prompts::SUMMARY_GUIDANCE,
    )
}
