//! Input validation: check a [`SummaryRequest`] before any external work.
//!
//! Pure predicate/transform over the request — no I/O, no side effects.
//! Runs to completion before the provider is even resolved, so a rejected
//! request never costs a network call.
//!
//! A whitespace-only article field counts as absent, matching the
//! behaviour the product has always had at this boundary. The PDF form is
//! decoded here so later stages can rely on a payload that parses, carries
//! the `%PDF` magic, and respects the size cap — a meaningful error now
//! beats an opaque provider rejection later.

use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::request::{ArticleSource, PdfDocument, SummaryRequest, ValidatedRequest};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// MIME type the data URI must declare.
const PDF_MIME: &str = "application/pdf";

/// Validate a request, collapsing the article into its single source form.
///
/// # Errors
/// - [`SummaryError::MissingArticle`] — neither form supplied
/// - [`SummaryError::ConflictingArticleForms`] — both forms supplied
/// - [`SummaryError::EmptyUserContext`] — blank context
/// - [`SummaryError::InvalidDataUri`] / [`SummaryError::NotAPdf`] /
///   [`SummaryError::DocumentTooLarge`] — broken PDF payload
pub fn validate(
    request: &SummaryRequest,
    config: &SummaryConfig,
) -> Result<ValidatedRequest, SummaryError> {
    let user_context = request.user_context.trim();
    if user_context.is_empty() {
        return Err(SummaryError::EmptyUserContext);
    }

    let text = request
        .article_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let data_uri = request
        .pdf_data_uri
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let article = match (text, data_uri) {
        (None, None) => return Err(SummaryError::MissingArticle),
        (Some(_), Some(_)) => return Err(SummaryError::ConflictingArticleForms),
        (Some(text), None) => ArticleSource::Text(text.to_string()),
        (None, Some(uri)) => {
            ArticleSource::Pdf(decode_data_uri(uri, config.max_document_bytes)?)
        }
    };

    debug!(
        length = %request.summary_length,
        context_chars = user_context.len(),
        "request validated"
    );

    Ok(ValidatedRequest {
        article,
        user_context: user_context.to_string(),
        summary_length: request.summary_length,
    })
}

/// Parse and check a `data:application/pdf;base64,…` URI.
///
/// The decoded bytes are only inspected — the base64 payload is what
/// travels onward, so the document is decoded once, here, and never again.
fn decode_data_uri(uri: &str, max_bytes: usize) -> Result<PdfDocument, SummaryError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| SummaryError::InvalidDataUri {
            detail: "missing 'data:' scheme".to_string(),
        })?;

    let (mime_type, payload) =
        rest.split_once(";base64,")
            .ok_or_else(|| SummaryError::InvalidDataUri {
                detail: "missing ';base64,' marker".to_string(),
            })?;

    if mime_type != PDF_MIME {
        return Err(SummaryError::InvalidDataUri {
            detail: format!("unsupported MIME type '{mime_type}', expected '{PDF_MIME}'"),
        });
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| SummaryError::InvalidDataUri {
            detail: format!("payload is not valid base64: {e}"),
        })?;

    if bytes.len() < 4 {
        return Err(SummaryError::InvalidDataUri {
            detail: format!("payload too short to be a PDF ({} bytes)", bytes.len()),
        });
    }

    if &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(SummaryError::NotAPdf { magic });
    }

    if bytes.len() > max_bytes {
        return Err(SummaryError::DocumentTooLarge {
            bytes: bytes.len(),
            limit: max_bytes,
        });
    }

    debug!(decoded_bytes = bytes.len(), "PDF data URI accepted");

    Ok(PdfDocument {
        mime_type: mime_type.to_string(),
        base64_data: payload.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SummaryLength;

    fn pdf_data_uri(body: &[u8]) -> String {
        format!("data:application/pdf;base64,{}", STANDARD.encode(body))
    }

    fn request(text: Option<&str>, uri: Option<String>) -> SummaryRequest {
        SummaryRequest {
            article_text: text.map(str::to_string),
            pdf_data_uri: uri,
            user_context: "high school student".to_string(),
            summary_length: SummaryLength::Short,
        }
    }

    #[test]
    fn accepts_text_form() {
        let req = request(Some("Photosynthesis converts light..."), None);
        let v = validate(&req, &SummaryConfig::default()).unwrap();
        assert!(matches!(v.article, ArticleSource::Text(ref t) if t.contains("Photosynthesis")));
        assert!(v.document().is_none());
    }

    #[test]
    fn accepts_pdf_form() {
        let req = request(None, Some(pdf_data_uri(b"%PDF-1.7 minimal body")));
        let v = validate(&req, &SummaryConfig::default()).unwrap();
        let doc = v.document().expect("document form");
        assert_eq!(doc.mime_type, "application/pdf");
    }

    #[test]
    fn rejects_when_both_forms_missing() {
        let err = validate(&request(None, None), &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::MissingArticle));
    }

    #[test]
    fn whitespace_only_text_counts_as_missing() {
        let err = validate(&request(Some("   \n\t"), None), &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::MissingArticle));
    }

    #[test]
    fn rejects_when_both_forms_present() {
        let req = request(Some("text"), Some(pdf_data_uri(b"%PDF-1.7")));
        let err = validate(&req, &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::ConflictingArticleForms));
    }

    #[test]
    fn rejects_empty_user_context() {
        let mut req = request(Some("text"), None);
        req.user_context = "  ".to_string();
        let err = validate(&req, &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::EmptyUserContext));
    }

    #[test]
    fn rejects_uri_without_data_scheme() {
        let req = request(None, Some("https://example.com/paper.pdf".to_string()));
        let err = validate(&req, &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidDataUri { .. }));
    }

    #[test]
    fn rejects_wrong_mime_type() {
        let uri = format!("data:text/plain;base64,{}", STANDARD.encode(b"%PDF-1.7"));
        let err = validate(&request(None, Some(uri)), &SummaryConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SummaryError::InvalidDataUri { ref detail } if detail.contains("text/plain")
        ));
    }

    #[test]
    fn rejects_invalid_base64_payload() {
        let uri = "data:application/pdf;base64,@@not-base64@@".to_string();
        let err = validate(&request(None, Some(uri)), &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidDataUri { .. }));
    }

    #[test]
    fn rejects_payload_without_pdf_magic() {
        let req = request(None, Some(pdf_data_uri(b"<html>not a pdf</html>")));
        let err = validate(&req, &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::NotAPdf { magic } if &magic == b"<htm"));
    }

    #[test]
    fn rejects_oversized_document() {
        let config = SummaryConfig::builder()
            .max_document_bytes(16)
            .build()
            .unwrap();
        let req = request(None, Some(pdf_data_uri(b"%PDF-1.7 well over sixteen bytes")));
        let err = validate(&req, &config).unwrap_err();
        assert!(matches!(err, SummaryError::DocumentTooLarge { limit: 16, .. }));
    }

    #[test]
    fn context_is_trimmed_in_validated_form() {
        let mut req = request(Some("text"), None);
        req.user_context = "  immunologist  ".to_string();
        let v = validate(&req, &SummaryConfig::default()).unwrap();
        assert_eq!(v.user_context, "immunologist");
    }
}
