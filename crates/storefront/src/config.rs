//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CHICKYEN_API_URL` - Backend API base (default: `http://localhost:5000/api`)
//! - `CHICKYEN_STATE_FILE` - Cart and session file (default: `.chickyen/state.json`)
//! - `CHICKYEN_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when `CHICKYEN_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// State file used when `CHICKYEN_STATE_FILE` is unset.
pub const DEFAULT_STATE_FILE: &str = ".chickyen/state.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API base URL
    pub api_url: Url,
    /// Key-value state file holding the cart and customer session
    pub state_file: PathBuf,
    /// Per-request timeout; platform default when unset
    pub http_timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(
            "CHICKYEN_API_URL",
            &get_env_or_default(&lookup, "CHICKYEN_API_URL", DEFAULT_API_URL),
        )?;
        let state_file = PathBuf::from(get_env_or_default(
            &lookup,
            "CHICKYEN_STATE_FILE",
            DEFAULT_STATE_FILE,
        ));
        let http_timeout = parse_timeout(&lookup, "CHICKYEN_HTTP_TIMEOUT_SECS")?;
        let sentry_dsn = get_optional_env(&lookup, "SENTRY_DSN");
        let sentry_environment = get_optional_env(&lookup, "SENTRY_ENVIRONMENT");

        Ok(Self {
            api_url,
            state_file,
            http_timeout,
            sentry_dsn,
            sentry_environment,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an API base URL. Only `http` and `https` are accepted.
fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse an optional timeout in whole seconds. Zero is rejected.
fn parse_timeout(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = get_optional_env(lookup, key) else {
        return Ok(None);
    };
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1 second".to_string(),
        ));
    }
    Ok(Some(Duration::from_secs(secs)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert!(config.http_timeout.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("CHICKYEN_API_URL", "https://api.chickyen.in/api/"),
            ("CHICKYEN_STATE_FILE", "/tmp/shop.json"),
            ("CHICKYEN_HTTP_TIMEOUT_SECS", "15"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("api.chickyen.in"));
        assert_eq!(config.state_file, PathBuf::from("/tmp/shop.json"));
        assert_eq!(config.http_timeout, Some(Duration::from_secs(15)));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            StorefrontConfig::from_lookup(lookup(&[("CHICKYEN_API_URL", "  "), ("SENTRY_DSN", "")]))
                .unwrap();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let err = StorefrontConfig::from_lookup(lookup(&[("CHICKYEN_API_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "CHICKYEN_API_URL"));

        let err = StorefrontConfig::from_lookup(lookup(&[("CHICKYEN_API_URL", "ftp://x.in/api")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err =
            StorefrontConfig::from_lookup(lookup(&[("CHICKYEN_HTTP_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = StorefrontConfig::from_lookup(lookup(&[("CHICKYEN_HTTP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }
}
