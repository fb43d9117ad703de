//! Environment configuration for the backend API connection.
//!
//! The adapter is stateless: configuration is read from the process
//! environment at the start of every tool call and discarded afterwards,
//! together with the credentials obtained from it.

use std::env;

use thiserror::Error;

/// Fallback base URL used by the HTTP layer when no explicit URL reaches it.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub const ENV_API_URL: &str = "API_URL";
pub const ENV_API_EMAIL: &str = "API_EMAIL";
pub const ENV_API_PASSWORD: &str = "API_PASSWORD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    /// Raised before any network activity.
    #[error(
        "Faltan variables de entorno obligatorias: {0}. Define API_URL, API_EMAIL y API_PASSWORD"
    )]
    MissingVars(String),
}

/// Connection settings for the legal-document backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
}

impl ApiConfig {
    /// Read the connection settings from the process environment.
    ///
    /// All three variables must be present and non-empty; otherwise this
    /// fails with a configuration error naming the missing ones, before
    /// any network call is made.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var(ENV_API_URL).ok(),
            env::var(ENV_API_EMAIL).ok(),
            env::var(ENV_API_PASSWORD).ok(),
        )
    }

    fn from_values(
        url: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ConfigError> {
        let url = url.filter(|v| !v.trim().is_empty());
        let email = email.filter(|v| !v.trim().is_empty());
        let password = password.filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = [
            (ENV_API_URL, url.is_none()),
            (ENV_API_EMAIL, email.is_none()),
            (ENV_API_PASSWORD, password.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();

        match (url, email, password) {
            (Some(base_url), Some(email), Some(password)) => Ok(Self {
                base_url,
                email,
                password,
            }),
            _ => Err(ConfigError::MissingVars(missing.join(", "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn accepts_complete_configuration() {
        let config = ApiConfig::from_values(
            some("http://localhost:3000"),
            some("user@example.com"),
            some("secret"),
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.email, "user@example.com");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn rejects_missing_url() {
        let err =
            ApiConfig::from_values(None, some("user@example.com"), some("secret")).unwrap_err();

        assert_eq!(err, ConfigError::MissingVars("API_URL".to_string()));
    }

    #[test]
    fn rejects_empty_values_as_missing() {
        let err =
            ApiConfig::from_values(some("  "), some("user@example.com"), some("")).unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingVars("API_URL, API_PASSWORD".to_string())
        );
    }

    #[test]
    fn names_every_missing_variable() {
        let err = ApiConfig::from_values(None, None, None).unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingVars("API_URL, API_EMAIL, API_PASSWORD".to_string())
        );
    }
}
