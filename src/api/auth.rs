//! Credential provider for the backend API.
//!
//! Every top-level tool call authenticates from scratch; there is no token
//! cache, so expiry tracking never needs to happen here. Resolving the
//! current user's id authenticates again before hitting the user-id
//! endpoint, trading an extra round trip for per-call statelessness.

use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{Credentials, LoginRequest, LoginResponse};
use crate::config::ApiConfig;

/// Obtain a fresh bearer token from `POST /api/auth/login`.
pub async fn authenticate(api: &ApiClient, config: &ApiConfig) -> Result<Credentials, ApiError> {
    let url = api.endpoint(["api", "auth", "login"])?;
    debug!(path = %url.path(), "authenticating");

    let response = api
        .http()
        .post(url)
        .json(&LoginRequest {
            email: &config.email,
            password: &config.password,
        })
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status { status, body });
    }

    let login: LoginResponse =
        serde_json::from_str(&body).map_err(|_| ApiError::MissingField("token"))?;
    let token = login.token.ok_or(ApiError::MissingField("token"))?;
    let expires_at = login.expires_in.map(|secs| Utc::now() + Duration::seconds(secs));

    Ok(Credentials { token, expires_at })
}

/// Resolve the identifier of the account the adapter logs in as.
///
/// Authenticates again (no token reuse) and then queries
/// `GET /api/auth/user-id` with the fresh token.
pub async fn resolve_user_id(api: &ApiClient, config: &ApiConfig) -> Result<String, ApiError> {
    let credentials = authenticate(api, config).await?;

    let url = api.endpoint(["api", "auth", "user-id"])?;
    let response = api
        .http()
        .get(url)
        .bearer_auth(&credentials.token)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status { status, body });
    }

    let value: Value = serde_json::from_str(&body).map_err(|_| ApiError::MissingField("userId"))?;
    user_id_from(&value).ok_or(ApiError::MissingField("userId"))
}

/// The backend has answered both `{"userId": "..."}` and a bare id; accept
/// strings and numbers in either shape.
fn user_id_from(value: &Value) -> Option<String> {
    let id = value.get("userId").unwrap_or(value);
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
