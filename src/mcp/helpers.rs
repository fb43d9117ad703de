//! Result normalization and shared validation for the MCP tools.
//!
//! Every tool body runs under [`with_error_boundary`]: whatever fails inside
//! (configuration, network, parsing) is converted into a well-formed tool
//! result carrying a human-readable message. Nothing escapes a tool as an
//! unhandled failure; that is the availability contract this layer gives the
//! protocol host.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::StatusCode;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

use super::messages;
use crate::api::{ApiError, ApiResponse};

/// Magic bytes every PDF starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Substring the backend uses on a 400 when a client still has cases.
const ASSOCIATED_CASES_MARKER: &str = "associated cases";

/// Run one tool body; convert any escaped failure into the fallback result.
pub async fn with_error_boundary<F>(tool: F) -> CallToolResult
where
    F: Future<Output = anyhow::Result<CallToolResult>>,
{
    match tool.await {
        Ok(result) => result,
        Err(error) => text_result(messages::process_error(&error)),
    }
}

/// Tool result with a single human-readable text item.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Tool result pairing the human-readable text with a JSON payload.
pub fn structured_result(text: impl Into<String>, payload: &Value) -> CallToolResult {
    let json = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult::success(vec![Content::text(text.into()), Content::text(json)])
}

/// List endpoints respond with either a bare array or an object wrapping
/// one under a known key; accept both.
pub fn extract_list<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value
        .as_array()
        .or_else(|| value.get(key).and_then(Value::as_array))
}

/// A download only counts as a PDF when the content type says so and the
/// body carries the `%PDF-` signature; a mislabelling header alone is not
/// trusted.
pub fn looks_like_pdf(content_type: Option<&str>, body: &[u8]) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/pdf")) && body.starts_with(PDF_MAGIC)
}

/// Court dates must be ISO 8601: a plain date, a naive date-time or a full
/// RFC 3339 timestamp.
pub fn is_valid_court_date(input: &str) -> bool {
    DateTime::parse_from_rfc3339(input).is_ok()
        || NaiveDate::parse_from_str(input, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Map the delete-document response: a 404 gets the dedicated not-found
/// message instead of the generic error template.
pub fn delete_document_text(response: ApiResponse, name: &str) -> Result<String, ApiError> {
    if response.status == StatusCode::NOT_FOUND {
        return Ok(messages::document_not_found(name));
    }
    response.into_result()?;
    Ok(messages::document_deleted(name))
}

/// Map the delete-client response: a 400 mentioning associated cases gets
/// the dedicated conflict message; any other non-2xx is generic.
pub fn delete_client_text(response: ApiResponse, id: u64) -> Result<String, ApiError> {
    if response.status == StatusCode::BAD_REQUEST
        && response
            .body
            .to_ascii_lowercase()
            .contains(ASSOCIATED_CASES_MARKER)
    {
        return Ok(messages::client_has_cases(id));
    }
    response.into_result()?;
    Ok(messages::client_deleted(id))
}

/// Map the delete-case response: a 404 gets the dedicated not-found message.
pub fn delete_case_text(response: ApiResponse, id: u64) -> Result<String, ApiError> {
    if response.status == StatusCode::NOT_FOUND {
        return Ok(messages::case_not_found(id));
    }
    response.into_result()?;
    Ok(messages::case_deleted(id))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn response(status: StatusCode, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn boundary_converts_failures_into_results() {
        let result = with_error_boundary(async { Err(anyhow::anyhow!("fallo de red")) }).await;

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["text"], "Error en el proceso: fallo de red");
    }

    #[tokio::test]
    async fn boundary_passes_successes_through() {
        let result = with_error_boundary(async { Ok(text_result("listo")) }).await;

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["text"], "listo");
    }

    #[test]
    fn structured_result_carries_text_then_payload() {
        let result = structured_result("1 cliente", &json!({ "clients": [{ "id": 1 }] }));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["text"], "1 cliente");
        let payload: serde_json::Value =
            serde_json::from_str(value["content"][1]["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload, json!({ "clients": [{ "id": 1 }] }));
    }

    #[test]
    fn pdf_check_requires_header_and_signature() {
        assert!(looks_like_pdf(Some("application/pdf"), b"%PDF-1.7 rest"));
        // header claims PDF but the bytes do not
        assert!(!looks_like_pdf(Some("application/pdf"), b"<html>no</html>"));
        assert!(!looks_like_pdf(Some("text/html"), b"%PDF-1.7 rest"));
        assert!(!looks_like_pdf(None, b"%PDF-1.7 rest"));
    }

    #[test]
    fn court_date_accepts_iso_8601_forms() {
        assert!(is_valid_court_date("2025-03-01"));
        assert!(is_valid_court_date("2025-03-01T10:30:00"));
        assert!(is_valid_court_date("2025-03-01T10:30:00Z"));
        assert!(is_valid_court_date("2025-03-01T10:30:00+02:00"));
    }

    #[test]
    fn court_date_rejects_other_formats() {
        assert!(!is_valid_court_date("01/03/2025"));
        assert!(!is_valid_court_date("mañana"));
        assert!(!is_valid_court_date(""));
    }

    #[test]
    fn delete_document_maps_404_to_not_found() {
        let text =
            delete_document_text(response(StatusCode::NOT_FOUND, ""), "contrato.pdf").unwrap();
        assert_eq!(text, "No se encontró ningún documento llamado 'contrato.pdf'");
    }

    #[test]
    fn delete_document_maps_other_errors_to_generic() {
        let err = delete_document_text(
            response(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            "contrato.pdf",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "La operación falló (500 Internal Server Error): boom"
        );
    }

    #[test]
    fn delete_client_maps_association_conflict() {
        let body = r#"{"message":"Cannot delete client with associated cases"}"#;
        let text = delete_client_text(response(StatusCode::BAD_REQUEST, body), 5).unwrap();
        assert_eq!(
            text,
            "No se puede eliminar el cliente 5: tiene expedientes asociados"
        );
    }

    #[test]
    fn delete_client_other_400s_stay_generic() {
        let err =
            delete_client_text(response(StatusCode::BAD_REQUEST, "bad id"), 5).unwrap_err();
        assert!(err.to_string().starts_with("La operación falló (400"));
    }

    #[test]
    fn delete_case_maps_404_to_not_found() {
        let text = delete_case_text(response(StatusCode::NOT_FOUND, ""), 9).unwrap();
        assert_eq!(text, "No se encontró el expediente con ID 9");
    }

    #[test]
    fn list_extraction_accepts_bare_and_wrapped_arrays() {
        let bare = json!([1, 2, 3]);
        let wrapped = json!({ "clients": [1, 2] });
        let neither = json!({ "raw": "oops" });

        assert_eq!(extract_list(&bare, "clients").map(Vec::len), Some(3));
        assert_eq!(extract_list(&wrapped, "clients").map(Vec::len), Some(2));
        assert_eq!(extract_list(&neither, "clients"), None);
    }
}
