//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults target a local backend.
//!
//! - `HIWHIW_HOST` - Bind address (default: 127.0.0.1)
//! - `HIWHIW_PORT` - Listen port (default: 3000)
//! - `HIWHIW_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `HIWHIW_API_URL` - Backend REST API base URL (default: <http://localhost:5001/api>)
//! - `HIWHIW_API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 10)
//! - `HIWHIW_CHAT_POLL_SECS` - Chat refresh interval (default: 3)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5001/api";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CHAT_POLL_SECS: u64 = 3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// How often open chat pages re-fetch their message list
    pub chat_poll_interval: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (no trailing slash)
    pub base_url: String,
    /// Timeout applied to each request
    pub timeout: Duration,
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HIWHIW_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HIWHIW_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("HIWHIW_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("HIWHIW_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("HIWHIW_BASE_URL", "http://localhost:3000");

        let api_url = get_env_or_default("HIWHIW_API_URL", DEFAULT_API_URL);
        validate_url(&api_url, "HIWHIW_API_URL")?;
        let api_timeout = get_secs("HIWHIW_API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?;
        let chat_poll_interval = get_secs("HIWHIW_CHAT_POLL_SECS", DEFAULT_CHAT_POLL_SECS)?;

        Ok(Self {
            host,
            port,
            base_url,
            api: ApiConfig {
                timeout: api_timeout,
                ..ApiConfig::new(api_url)
            },
            chat_poll_interval,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for tests and embedding: local bind, the given backend,
    /// default intervals, no Sentry.
    #[must_use]
    pub fn for_backend(api_url: impl Into<String>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig::new(api_url),
            chat_poll_interval: Duration::from_secs(DEFAULT_CHAT_POLL_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a positive whole number of seconds.
fn get_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(Duration::from_secs(default));
    };
    parse_secs(&raw).map_err(|reason| ConfigError::InvalidEnvVar(key.to_string(), reason))
}

fn parse_secs(raw: &str) -> Result<Duration, String> {
    let secs = raw.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Validate that a URL parses and uses http(s).
fn validate_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("5").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_secs(" 3 ").unwrap(), Duration::from_secs(3));
        assert!(parse_secs("0").is_err());
        assert!(parse_secs("soon").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://localhost:5001/api", "TEST").is_ok());
        assert!(validate_url("https://api.example.com", "TEST").is_ok());
        assert!(matches!(
            validate_url("ftp://example.com", "TEST"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(validate_url("not a url", "TEST").is_err());
    }

    #[test]
    fn test_api_config_strips_trailing_slash() {
        let api = ApiConfig::new("http://localhost:5001/api/");
        assert_eq!(api.base_url, "http://localhost:5001/api");
        assert_eq!(api.timeout, Duration::from_secs(DEFAULT_API_TIMEOUT_SECS));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::for_backend("http://localhost:5001/api");
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_secure_base_url() {
        let config = StorefrontConfig {
            base_url: "https://hiwhiw.app".to_string(),
            ..StorefrontConfig::for_backend("http://localhost:5001/api")
        };
        assert!(config.is_secure());
    }
}
