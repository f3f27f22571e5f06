//! End-to-end pipeline tests over a scripted completion backend.
//!
//! The backend seam (`SummaryConfig::backend`) stands in for the external
//! model, so these tests drive the full validate → compose → invoke flow
//! without network access: they assert what the composed prompt carried,
//! how failures surface at each boundary, and — for rejected requests —
//! that the invoker was never called at all.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use scisummary::{
    summarize, summarize_response, CompletionBackend, ModelReply, PdfDocument, SummaryConfig,
    SummaryError, SummaryLength, SummaryRequest, SummaryResponse, COMPLETION_FAILURE_MESSAGE,
    UNEXPECTED_FAILURE_MESSAGE,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// What the scripted backend should do when called.
enum Script {
    /// Return this content as the model reply.
    Reply(String),
    /// Fail with an internal (transport-class) error.
    TransportError(String),
    /// Never resolve within any realistic timeout.
    Hang,
}

/// Scripted backend: records every call so tests can assert on the prompt
/// the pipeline actually sent — or on the absence of any call.
struct ScriptedBackend {
    script: Script,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    saw_document: AtomicBool,
}

impl ScriptedBackend {
    fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self::new(Script::Reply(content.to_string())))
    }

    fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            saw_document: AtomicBool::new(false),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.last_prompt.lock().unwrap().clone().expect("no call recorded")
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        prompt: &str,
        document: Option<&PdfDocument>,
    ) -> Result<ModelReply, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.saw_document.store(document.is_some(), Ordering::SeqCst);

        match &self.script {
            Script::Reply(content) => Ok(ModelReply {
                content: content.clone(),
                input_tokens: 320,
                output_tokens: 75,
            }),
            Script::TransportError(detail) => Err(SummaryError::Internal(detail.clone())),
            Script::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                unreachable!("hung backend must be cut off by the pipeline timeout")
            }
        }
    }
}

fn config_with(backend: Arc<ScriptedBackend>) -> SummaryConfig {
    SummaryConfig::builder()
        .backend(backend as Arc<dyn CompletionBackend>)
        .build()
        .expect("valid config")
}

fn pdf_data_uri(body: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(body))
}

// ── Scenario 1: happy path with a text article ───────────────────────────────

#[tokio::test]
async fn text_article_flows_end_to_end() {
    let backend = ScriptedBackend::replying(r#"{"summary": "Plants turn sunlight into food..."}"#);
    let config = config_with(Arc::clone(&backend));

    let request = SummaryRequest::from_text(
        "Photosynthesis converts light into chemical energy...",
        "high school student",
        SummaryLength::Short,
    );

    let output = summarize(&request, &config).await.expect("should succeed");

    assert_eq!(output.summary, "Plants turn sunlight into food...");
    assert_eq!(output.stats.input_tokens, 320);
    assert_eq!(output.stats.output_tokens, 75);
    assert_eq!(backend.calls(), 1, "exactly one outbound call");

    // The composed prompt carried both inputs and the short-tier band.
    let prompt = backend.last_prompt();
    assert!(prompt.contains("Photosynthesis converts light into chemical energy..."));
    assert!(prompt.contains("high school student"));
    assert!(prompt.contains("200-400 words"));
    assert!(
        !backend.saw_document.load(Ordering::SeqCst),
        "text form must not attach a document"
    );
}

#[tokio::test]
async fn response_surface_returns_summary_only() {
    let backend = ScriptedBackend::replying(r#"{"summary": "Plants turn sunlight into food..."}"#);
    let config = config_with(backend);

    let request = SummaryRequest::from_text(
        "Photosynthesis converts light into chemical energy...",
        "high school student",
        SummaryLength::Short,
    );

    let response = summarize_response(&request, &config).await;
    assert_eq!(
        response.summary(),
        Some("Plants turn sunlight into food...")
    );
    assert!(response.error().is_none());

    let json = serde_json::to_string(&response).unwrap();
    assert!(!json.contains("\"error\""), "success must not carry an error key");
}

// ── Scenario 2: validation rejects before any external call ──────────────────

#[tokio::test]
async fn empty_context_is_rejected_before_invocation() {
    let backend = ScriptedBackend::replying(r#"{"summary": "never used"}"#);
    let config = config_with(Arc::clone(&backend));

    let request = SummaryRequest::from_text("article body", "", SummaryLength::Medium);

    let err = summarize(&request, &config).await.unwrap_err();
    assert!(matches!(err, SummaryError::EmptyUserContext));
    assert_eq!(backend.calls(), 0, "invoker must never be called");
}

#[tokio::test]
async fn missing_article_is_rejected_before_invocation() {
    let backend = ScriptedBackend::replying(r#"{"summary": "never used"}"#);
    let config = config_with(Arc::clone(&backend));

    let request = SummaryRequest {
        article_text: None,
        pdf_data_uri: None,
        user_context: "quantum chemist".to_string(),
        summary_length: SummaryLength::Medium,
    };

    let response = summarize_response(&request, &config).await;
    let error = response.error().expect("must be a failure");
    assert!(error.contains("No article content"));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn both_article_forms_are_rejected() {
    let backend = ScriptedBackend::replying(r#"{"summary": "never used"}"#);
    let config = config_with(Arc::clone(&backend));

    let request = SummaryRequest {
        article_text: Some("text form".to_string()),
        pdf_data_uri: Some(pdf_data_uri(b"%PDF-1.7 body")),
        user_context: "quantum chemist".to_string(),
        summary_length: SummaryLength::Medium,
    };

    let err = summarize(&request, &config).await.unwrap_err();
    assert!(matches!(err, SummaryError::ConflictingArticleForms));
    assert_eq!(backend.calls(), 0);
}

// ── Scenario 3: transport failure surfaces as a generic message ───────────────

#[tokio::test]
async fn transport_error_yields_generic_message_not_detail() {
    let backend = Arc::new(ScriptedBackend::new(Script::TransportError(
        "connection reset by peer (os error 104)".to_string(),
    )));
    let config = config_with(Arc::clone(&backend));

    let request =
        SummaryRequest::from_text("article body", "science journalist", SummaryLength::Medium);

    let response = summarize_response(&request, &config).await;
    let error = response.error().expect("must be a failure");
    assert_eq!(error, UNEXPECTED_FAILURE_MESSAGE);
    assert!(!error.contains("connection reset"), "detail must stay in logs");
    assert_eq!(backend.calls(), 1);
}

// ── Completion-shape failures ────────────────────────────────────────────────

#[tokio::test]
async fn empty_model_summary_is_an_error_not_success() {
    let backend = ScriptedBackend::replying(r#"{"summary": ""}"#);
    let config = config_with(backend);

    let request =
        SummaryRequest::from_text("article body", "marine biologist", SummaryLength::Medium);

    let err = summarize(&request, &config).await.unwrap_err();
    assert!(matches!(err, SummaryError::EmptySummary));

    let response = summarize_response(&request, &config).await;
    assert_eq!(response.error(), Some(COMPLETION_FAILURE_MESSAGE));
}

#[tokio::test]
async fn malformed_model_reply_is_a_completion_error() {
    let backend = ScriptedBackend::replying("I'd be happy to summarize this article!");
    let config = config_with(backend);

    let request =
        SummaryRequest::from_text("article body", "marine biologist", SummaryLength::Medium);

    let err = summarize(&request, &config).await.unwrap_err();
    assert!(matches!(err, SummaryError::MalformedResponse { .. }));
}

// ── PDF form ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_article_attaches_document_and_uses_marker() {
    let backend = ScriptedBackend::replying(r#"{"summary": "A tailored summary."}"#);
    let config = config_with(Arc::clone(&backend));

    let request = SummaryRequest::from_pdf_data_uri(
        pdf_data_uri(b"%PDF-1.7 minimal article body"),
        "immunologist",
        SummaryLength::Large,
    );

    let output = summarize(&request, &config).await.expect("should succeed");
    assert_eq!(output.summary, "A tailored summary.");

    let prompt = backend.last_prompt();
    assert!(prompt.contains("[attached document]"));
    assert!(prompt.contains("800-1200 words"));
    assert!(
        backend.saw_document.load(Ordering::SeqCst),
        "PDF form must attach the document"
    );
}

#[tokio::test]
async fn broken_data_uri_never_reaches_the_backend() {
    let backend = ScriptedBackend::replying(r#"{"summary": "never used"}"#);
    let config = config_with(Arc::clone(&backend));

    let request = SummaryRequest::from_pdf_data_uri(
        "data:application/pdf;base64,!!!not-base64!!!",
        "immunologist",
        SummaryLength::Short,
    );

    let err = summarize(&request, &config).await.unwrap_err();
    assert!(matches!(err, SummaryError::InvalidDataUri { .. }));
    assert_eq!(backend.calls(), 0);
}

// ── Timeout ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn hung_backend_is_cut_off_by_the_configured_timeout() {
    let backend = Arc::new(ScriptedBackend::new(Script::Hang));
    let config = SummaryConfig::builder()
        .backend(Arc::clone(&backend) as Arc<dyn CompletionBackend>)
        .api_timeout_secs(1)
        .build()
        .expect("valid config");

    let request = SummaryRequest::from_text("article body", "geologist", SummaryLength::Medium);

    let err = summarize(&request, &config).await.unwrap_err();
    assert!(matches!(err, SummaryError::CompletionTimeout { secs: 1 }));
    assert_eq!(backend.calls(), 1, "the one call was made, then cut off");
}

// ── Sync wrapper ─────────────────────────────────────────────────────────────

#[test]
fn sync_wrapper_runs_without_an_async_context() {
    use scisummary::summarize_sync;

    let backend = ScriptedBackend::replying(r#"{"summary": "Synchronously summarized."}"#);
    let config = config_with(backend);

    let request = SummaryRequest::from_text("article body", "astronomer", SummaryLength::Short);

    let output = summarize_sync(&request, &config).expect("should succeed");
    assert_eq!(output.summary, "Synchronously summarized.");
}

// ── Wire-format round trip ───────────────────────────────────────────────────

#[tokio::test]
async fn json_request_body_drives_the_pipeline() {
    let backend = ScriptedBackend::replying(r#"{"summary": "Decoded from the wire."}"#);
    let config = config_with(Arc::clone(&backend));

    let request: SummaryRequest = serde_json::from_str(
        r#"{
            "articleText": "CRISPR-Cas9 enables precise genome editing...",
            "userContext": "software engineer curious about biology",
            "summaryLength": "medium"
        }"#,
    )
    .expect("wire format must deserialize");

    let response = summarize_response(&request, &config).await;
    assert!(matches!(response, SummaryResponse::Success { .. }));
    assert!(backend.last_prompt().contains("CRISPR-Cas9"));
    assert!(backend.last_prompt().contains("400-800 words"));
}
