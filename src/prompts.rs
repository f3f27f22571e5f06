//! Prompt templates for audience-tailored article summarization.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the original product accumulated three
//!    near-identical copies of this template; exactly one canonical version
//!    lives here, created at process start and never mutated.
//!
//! 2. **Testability** — unit tests can inspect the template and the
//!    composed prompt directly without calling a real model.
//!
//! User-supplied fields are interpolated verbatim by
//! [`crate::pipeline::compose`]; the template carries no defence against
//! prompt injection. That is a known, accepted limitation of the product,
//! stated here rather than silently patched.

use crate::output::SummaryResult;
use crate::request::SummaryLength;
use once_cell::sync::Lazy;
use schemars::schema_for;

/// Task header; `{}` receives the user context verbatim.
pub const TASK_HEADER: &str = "Summarize the following scientific article, tailoring the summary \
                               to a reader with the following background and expertise: ";

/// Heading under which a plain-text article is embedded verbatim.
pub const ARTICLE_TEXT_HEADING: &str = "Article Text:";

/// Section emitted for the document form of an article. The document
/// itself travels to the model as an attached media object, not inlined
/// text; this marker tells the model where to look.
pub const ATTACHED_DOCUMENT_MARKER: &str = "Article PDF:\n[attached document]";

/// Fixed guidance appended to every prompt.
///
/// Four numbered rule blocks: what to extract, how to adapt register to
/// the reader, the section structure of the output, and length discipline.
pub const SUMMARY_GUIDANCE: &str = r#"Follow these rules precisely:

1. CONTENT ANALYSIS
   - Identify the research question, the methods used, the key results, and their significance
   - Preserve the authors' actual claims; do not overstate certainty beyond what the article supports
   - Keep quantitative results (effect sizes, sample sizes, error bars) when they carry the finding

2. AUDIENCE ADAPTATION
   Judge how far the reader's stated background is from the article's field and adapt:
   - Same field: keep standard technical terminology; focus on what is novel relative to prior work
   - Related field: keep shared vocabulary, briefly bridge field-specific concepts on first use
   - Different field: prefer plain descriptions and analogies; introduce only essential terms, defined inline
   - Non-technical reader: everyday language and concrete analogies throughout; no unexplained jargon

3. STRUCTURE
   Organise the summary into this fixed sequence of parts:
   - Executive summary: the finding and why it matters, in a few sentences
   - Background: the problem and what was known before
   - Methodology: how the study was conducted, at a depth the reader can follow
   - Findings: the results, including the key numbers where appropriate
   - Implications: what the results mean for the field and beyond
   - Limitations: what the study cannot conclude

4. LENGTH
   - Respect the requested length band; do not pad a thin article to reach it
   - Spend the word budget on findings and implications first"#;

/// Render the length line for the requested tier, including its word band.
pub fn length_instruction(length: SummaryLength) -> String {
    let (lo, hi) = length.word_band();
    format!(
        "Desired summary length: {} (aim for {}-{} words).",
        length, lo, hi
    )
}

/// System instruction requesting JSON-only output conforming to the
/// [`SummaryResult`] schema.
///
/// Built once at process start; the schema text is generated from the type
/// so the instruction can never drift from what the decoder accepts.
pub fn structured_output_instruction() -> &'static str {
    static INSTRUCTION: Lazy<String> = Lazy::new(|| {
        let schema = schema_for!(SummaryResult);
        let schema_text =
            serde_json::to_string_pretty(&schema).expect("SummaryResult schema serialises");
        format!(
            "You are a precise scientific summarizer. You MUST respond with a single valid JSON \
             object and nothing else. Do NOT wrap it in markdown code fences. Do NOT add \
             commentary before or after it.\n\n\
             The response must conform to this JSON Schema:\n{schema_text}"
        )
    });
    &INSTRUCTION
}
