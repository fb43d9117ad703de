//! Error taxonomy for the backend client layer.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty required environment variables.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend was unreachable or the transport failed mid-call.
    /// Never retried; surfaced to the caller as-is.
    #[error("no se pudo contactar con el servidor: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx backend response that no tool-specific rule claimed.
    #[error("La operación falló ({status}): {body}")]
    Status { status: StatusCode, body: String },

    /// A 2xx response whose payload lacks a field the adapter needs.
    #[error("la respuesta del servidor no incluye el campo '{0}'")]
    MissingField(&'static str),

    /// The configured base URL cannot be used to build endpoint URLs.
    #[error("la URL base del API no es válida: {0}")]
    InvalidBaseUrl(String),
}
