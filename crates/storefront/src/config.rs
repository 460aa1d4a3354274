//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WAGTAIL_BASE_URL` - Public URL for the storefront
//! - `WAGTAIL_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `WAGTAIL_API_URL` - Base URL of the remote pet-shop REST API
//! - `WAGTAIL_AUTH_CLIENT_ID` - OAuth client ID registered with the API
//! - `PAYMENTS_PUBLIC_KEY` - Payment provider publishable key
//! - `PAYMENTS_ACCESS_TOKEN` - Payment provider server-side access token
//!
//! ## Optional
//! - `WAGTAIL_HOST` - Bind address (default: 127.0.0.1)
//! - `WAGTAIL_PORT` - Listen port (default: 3000)
//! - `WAGTAIL_DATA_DIR` - Directory for locally persisted state (shipping
//!   drafts); when unset, persistence is disabled and the store is a no-op
//! - `WAGTAIL_PRODUCT_CACHE_TTL_SECS` - Product read cache TTL (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
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
    /// Session signing secret
    pub session_secret: SecretString,
    /// Remote pet-shop API configuration
    pub api: BackendApiConfig,
    /// Payment provider configuration
    pub payments: PaymentProviderConfig,
    /// Directory for locally persisted state; `None` disables persistence
    pub data_dir: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Remote pet-shop REST API configuration.
#[derive(Debug, Clone)]
pub struct BackendApiConfig {
    /// Base URL of the API (e.g., <https://api.wagtailpets.example/v1/>)
    pub base_url: Url,
    /// OAuth client ID for the authorization-code flow
    pub auth_client_id: String,
    /// TTL for the product read cache
    pub product_cache_ttl: Duration,
}

/// Payment provider configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct PaymentProviderConfig {
    /// Provider API base URL
    pub base_url: Url,
    /// Publishable key (safe to expose to the browser)
    pub public_key: String,
    /// Server-side access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for PaymentProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentProviderConfig")
            .field("base_url", &self.base_url.as_str())
            .field("public_key", &self.public_key)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("WAGTAIL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WAGTAIL_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("WAGTAIL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WAGTAIL_PORT".to_owned(), e.to_string()))?;

        let base_url = require_env("WAGTAIL_BASE_URL")?;
        let session_secret = validate_session_secret(require_env("WAGTAIL_SESSION_SECRET")?)?;

        let api = BackendApiConfig {
            base_url: parse_url_env("WAGTAIL_API_URL")?,
            auth_client_id: require_env("WAGTAIL_AUTH_CLIENT_ID")?,
            product_cache_ttl: Duration::from_secs(
                get_env_or_default("WAGTAIL_PRODUCT_CACHE_TTL_SECS", "60")
                    .parse::<u64>()
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar(
                            "WAGTAIL_PRODUCT_CACHE_TTL_SECS".to_owned(),
                            e.to_string(),
                        )
                    })?,
            ),
        };

        let payments = PaymentProviderConfig {
            base_url: parse_url_env_or_default(
                "PAYMENTS_API_URL",
                "https://api.mercadopago.com/",
            )?,
            public_key: require_env("PAYMENTS_PUBLIC_KEY")?,
            access_token: SecretString::from(require_env("PAYMENTS_ACCESS_TOKEN")?),
        };

        let data_dir = std::env::var("WAGTAIL_DATA_DIR").ok().map(PathBuf::from);
        let sentry_dsn = std::env::var("SENTRY_DSN").ok().filter(|s| !s.is_empty());

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            api,
            payments,
            data_dir,
            sentry_dsn,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn parse_url_env(name: &str) -> Result<Url, ConfigError> {
    Url::parse(&require_env(name)?)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

fn parse_url_env_or_default(name: &str, default: &str) -> Result<Url, ConfigError> {
    Url::parse(&get_env_or_default(name, default))
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

/// Validate the session secret: length and placeholder checks.
fn validate_session_secret(secret: String) -> Result<SecretString, ConfigError> {
    let name = "WAGTAIL_SESSION_SECRET";

    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = secret.to_ascii_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lowered.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("looks like a placeholder (contains \"{pattern}\")"),
        ));
    }

    Ok(SecretString::from(secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_session_secret_rejected() {
        let result = validate_session_secret("tooshort".to_owned());
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn placeholder_session_secret_rejected() {
        let result =
            validate_session_secret("changeme-changeme-changeme-changeme-1234".to_owned());
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn strong_session_secret_accepted() {
        let result = validate_session_secret("kD93hfz02mQ81lrVbN56wyTgXc47JpRa".to_owned());
        assert!(result.is_ok());
    }
}
