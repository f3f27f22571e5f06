//! Output types: the schema-constrained model result, the library-level
//! output with call accounting, and the boundary response surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The structured output the model is asked to produce.
///
/// This is the shape sent to the completion service as a JSON Schema (see
/// [`crate::prompts::structured_output_instruction`]) and the shape its
/// reply is decoded into. A present-but-empty `summary` is treated as a
/// failure by the invoker, never returned as success.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResult {
    /// The summarized article text.
    pub summary: String,
}

/// Successful result of [`crate::summarize`]: the summary plus accounting
/// for the single completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// The audience-tailored summary.
    pub summary: String,
    /// Token and latency accounting.
    pub stats: SummaryStats,
}

/// Accounting for one summarization call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Prompt tokens consumed by the completion call.
    pub input_tokens: u64,
    /// Completion tokens generated.
    pub output_tokens: u64,
    /// Wall-clock duration of the whole pipeline in milliseconds.
    pub duration_ms: u64,
}

/// The outermost response surface: a populated summary or a single
/// human-readable error string — structurally never both.
///
/// Serialises to `{"summary": "..."}` or `{"error": "..."}`, matching the
/// request-submission interface contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SummaryResponse {
    Success { summary: String },
    Failure { error: String },
}

impl SummaryResponse {
    /// The summary, when this is a success.
    pub fn summary(&self) -> Option<&str> {
        match self {
            SummaryResponse::Success { summary } => Some(summary),
            SummaryResponse::Failure { .. } => None,
        }
    }

    /// The error message, when this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            SummaryResponse::Success { .. } => None,
            SummaryResponse::Failure { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serialises_without_error_key() {
        let r = SummaryResponse::Success {
            summary: "Plants turn sunlight into food...".into(),
        };
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"summary\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn failure_serialises_without_summary_key() {
        let r = SummaryResponse::Failure {
            error: "User context must not be empty".into(),
        };
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"error\""));
        assert!(!json.contains("\"summary\""));
    }

    #[test]
    fn result_round_trips_through_json() {
        let parsed: SummaryResult =
            serde_json::from_str(r#"{"summary": "A short summary."}"#).unwrap();
        assert_eq!(parsed.summary, "A short summary.");
    }

    #[test]
    fn result_schema_names_summary_field() {
        let schema = schemars::schema_for!(SummaryResult);
        let text = serde_json::to_string(&schema).unwrap();
        assert!(text.contains("summary"));
    }
}
