//! Wire types for the backend REST API.
//!
//! The backend speaks camelCase JSON. Entities fetched for read-modify-write
//! edits are handled as raw `serde_json::Value` objects so fields the adapter
//! does not model survive the round trip; only the payloads the adapter
//! builds itself are typed here.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    /// Seconds until the token expires, when the backend reports it.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Short-lived credentials for one tool call. Never cached across calls.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CaseStatus {
    #[default]
    Open,
    Closed,
    Pending,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Open => "Open",
            CaseStatus::Closed => "Closed",
            CaseStatus::Pending => "Pending",
        }
    }
}

/// Body for `POST /api/clients`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient<'a> {
    pub name: &'a str,
    pub contact_information: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

/// Body for `POST /api/cases`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase<'a> {
    pub title: &'a str,
    pub client_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court_date: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_case_serializes_camel_case_and_skips_absent_fields() {
        let body = NewCase {
            title: "Demanda laboral",
            client_id: 7,
            description: None,
            status: CaseStatus::default(),
            court_date: None,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "title": "Demanda laboral", "clientId": 7, "status": "Open" })
        );
    }

    #[test]
    fn status_defaults_to_open() {
        assert_eq!(CaseStatus::default(), CaseStatus::Open);
        assert_eq!(CaseStatus::default().as_str(), "Open");
    }

    #[test]
    fn login_response_tolerates_missing_expiry() {
        let parsed: LoginResponse = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(parsed.token.as_deref(), Some("abc"));
        assert_eq!(parsed.expires_in, None);
    }
}
