//! HTTP operation executor for the backend REST API.
//!
//! An [`Operation`] describes one backend call (method, path segments, body
//! shape); [`ApiClient::execute`] issues it with the bearer token attached
//! and classifies the response. Response bodies are read as text first and
//! parsed tolerantly: malformed JSON degrades to a raw-text payload instead
//! of an error.

use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use super::error::ApiError;
use crate::config::DEFAULT_API_URL;

/// Backend response body: JSON when it parses, the raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Parsed(Value),
    Raw(String),
}

impl Payload {
    /// Tolerant parse. Callers never see a parse error; non-JSON bodies
    /// become [`Payload::Raw`].
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => Payload::Parsed(value),
            Err(_) => Payload::Raw(text.to_string()),
        }
    }

    /// JSON view of the payload; raw text is wrapped as `{ "raw": text }`.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Parsed(value) => value,
            Payload::Raw(text) => json!({ "raw": text }),
        }
    }
}

/// One backend HTTP call. Immutable once built; the executor owns header
/// construction and URL assembly.
#[derive(Debug)]
pub struct Operation {
    method: Method,
    path: Vec<String>,
    body: OperationBody,
    event_stream: bool,
}

#[derive(Debug)]
enum OperationBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

impl Operation {
    fn new(method: Method, path: &[&str], body: OperationBody) -> Self {
        Self {
            method,
            path: path.iter().map(|s| s.to_string()).collect(),
            body,
            event_stream: false,
        }
    }

    pub fn get(path: &[&str]) -> Self {
        Self::new(Method::GET, path, OperationBody::Empty)
    }

    pub fn delete(path: &[&str]) -> Self {
        Self::new(Method::DELETE, path, OperationBody::Empty)
    }

    pub fn post_json(path: &[&str], body: Value) -> Self {
        Self::new(Method::POST, path, OperationBody::Json(body))
    }

    pub fn put_json(path: &[&str], body: Value) -> Self {
        Self::new(Method::PUT, path, OperationBody::Json(body))
    }

    pub fn post_multipart(path: &[&str], form: Form) -> Self {
        Self::new(Method::POST, path, OperationBody::Multipart(form))
    }

    /// Ask the backend for a server-sent-event response.
    pub fn event_stream(mut self) -> Self {
        self.event_stream = true;
        self
    }
}

/// Classified backend response: HTTP status plus the body text.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn payload(&self) -> Payload {
        Payload::from_text(&self.body)
    }

    /// Promote a non-2xx response to the generic operation error.
    pub fn into_result(self) -> Result<ApiResponse, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Thin client over the backend REST API. Holds no credentials and no
/// per-call state; one instance lives for the duration of a single tool call.
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = if base_url.trim().is_empty() {
            DEFAULT_API_URL
        } else {
            base_url
        };
        let base = Url::parse(base).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    /// Bare HTTP client, for calls outside the backend (document downloads).
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Build the endpoint URL; each path segment is percent-encoded.
    pub(crate) fn endpoint<I, S>(&self, segments: I) -> Result<Url, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue the call and hand back the raw response, for callers that
    /// consume the body incrementally (the ask operation's SSE stream).
    pub async fn send(&self, token: &str, operation: Operation) -> Result<Response, ApiError> {
        let url = self.endpoint(&operation.path)?;
        debug!(method = %operation.method, path = %url.path(), "backend call");

        let mut request = self
            .http
            .request(operation.method, url)
            .bearer_auth(token);
        request = match operation.body {
            OperationBody::Empty => request,
            OperationBody::Json(value) => request.json(&value),
            OperationBody::Multipart(form) => request.multipart(form),
        };
        if operation.event_stream {
            request = request.header(ACCEPT, "text/event-stream");
        }

        Ok(request.send().await?)
    }

    /// Issue the call, read the body to completion and classify the result.
    pub async fn execute(
        &self,
        token: &str,
        operation: Operation,
    ) -> Result<ApiResponse, ApiError> {
        let response = self.send(token, operation).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(%status, "backend call failed");
        }
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_parses_valid_json() {
        let payload = Payload::from_text(r#"{"id": 3, "name": "Acme"}"#);
        assert_eq!(payload, Payload::Parsed(json!({ "id": 3, "name": "Acme" })));
    }

    #[test]
    fn malformed_json_degrades_to_raw_text() {
        let payload = Payload::from_text("Internal Server Error");
        assert_eq!(payload, Payload::Raw("Internal Server Error".to_string()));
        assert_eq!(
            payload.into_value(),
            json!({ "raw": "Internal Server Error" })
        );
    }

    #[test]
    fn endpoint_percent_encodes_path_segments() {
        let client = ApiClient::new("http://localhost:3000").unwrap();

        let url = client
            .endpoint(["api", "files", "contrato marco.pdf"])
            .unwrap();
        assert_eq!(url.path(), "/api/files/contrato%20marco.pdf");
    }

    #[test]
    fn empty_base_url_falls_back_to_local_default() {
        let client = ApiClient::new("").unwrap();

        let url = client.endpoint(["api", "clients"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/clients");
    }

    #[test]
    fn non_2xx_response_becomes_status_error() {
        let response = ApiResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };

        let err = response.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "La operación falló (500 Internal Server Error): boom"
        );
    }

    #[test]
    fn success_response_passes_through() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: "[]".to_string(),
        };

        let response = response.into_result().unwrap();
        assert_eq!(response.payload(), Payload::Parsed(json!([])));
    }
}
