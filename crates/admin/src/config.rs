//! Admin console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CHICKYEN_ADMIN_API_URL` - Backend API base for staff calls (falls back to `CHICKYEN_API_URL`)
//! - `CHICKYEN_API_URL` - Shared backend API base (default: `http://localhost:5000/api`)
//! - `CHICKYEN_ADMIN_STATE_FILE` - Staff session file (default: `.chickyen/admin-state.json`)
//! - `CHICKYEN_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! The admin session lives in its own file: logging out wipes the whole admin
//! store, which must not take a shopper's cart with it.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when neither API variable is set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// State file used when `CHICKYEN_ADMIN_STATE_FILE` is unset.
pub const DEFAULT_STATE_FILE: &str = ".chickyen/admin-state.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin console configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend API base URL
    pub api_url: Url,
    /// Key-value state file holding the staff session
    pub state_file: PathBuf,
    /// Per-request timeout; platform default when unset
    pub http_timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
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
        let api_url = match get_optional_env(&lookup, "CHICKYEN_ADMIN_API_URL") {
            Some(admin_url) => parse_api_url("CHICKYEN_ADMIN_API_URL", &admin_url)?,
            None => parse_api_url(
                "CHICKYEN_API_URL",
                &get_env_or_default(&lookup, "CHICKYEN_API_URL", DEFAULT_API_URL),
            )?,
        };
        let state_file = PathBuf::from(get_env_or_default(
            &lookup,
            "CHICKYEN_ADMIN_STATE_FILE",
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

fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

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

fn parse_timeout(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = get_optional_env(lookup, key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1 second".to_string(),
        )),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
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
        let config = AdminConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert!(config.http_timeout.is_none());
    }

    #[test]
    fn test_admin_url_overrides_shared_url() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("CHICKYEN_API_URL", "https://shop.chickyen.in/api"),
            ("CHICKYEN_ADMIN_API_URL", "https://staff.chickyen.in/api"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("staff.chickyen.in"));

        let config =
            AdminConfig::from_lookup(lookup(&[("CHICKYEN_API_URL", "https://shop.chickyen.in/api")]))
                .unwrap();
        assert_eq!(config.api_url.host_str(), Some("shop.chickyen.in"));
    }

    #[test]
    fn test_state_file_is_separate_from_storefront() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("CHICKYEN_STATE_FILE", "/tmp/shop.json"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ]))
        .unwrap();
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_values() {
        let err = AdminConfig::from_lookup(lookup(&[("CHICKYEN_ADMIN_API_URL", "file:///etc")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "CHICKYEN_ADMIN_API_URL"));

        let err = AdminConfig::from_lookup(lookup(&[("CHICKYEN_HTTP_TIMEOUT_SECS", "-3")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }
}
