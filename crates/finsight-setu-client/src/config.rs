//! Setu client configuration.
//!
//! Base URL defaults to the Setu UAT environment; credentials are required.
//! Override via environment variables or explicit construction for testing.

use url::Url;

/// Default base URL — the Setu FIU UAT environment.
pub const DEFAULT_BASE_URL: &str = "https://fiu-uat.setu.co/v2";

/// Configuration for connecting to the Setu Account Aggregator API.
///
/// Custom `Debug` implementation redacts `client_secret` to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct SetuConfig {
    /// Base URL of the consent API.
    pub base_url: Url,
    /// `x-client-id` header value.
    pub client_id: String,
    /// `x-client-secret` header value.
    pub client_secret: String,
    /// `x-product-instance-id` header value.
    pub product_instance_id: String,
    /// Redirect URL the end user is sent back to after approving consent.
    /// Forwarded to the upstream; this service hosts no receiver for it.
    pub redirect_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SetuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetuConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("product_instance_id", &self.product_instance_id)
            .field("redirect_url", &self.redirect_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SetuConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SETU_BASE_URL` (default: [`DEFAULT_BASE_URL`])
    /// - `SETU_CLIENT_ID` (required)
    /// - `SETU_CLIENT_SECRET` (required)
    /// - `SETU_PRODUCT_ID` (required)
    /// - `SETU_CALLBACK_URL` (optional)
    /// - `SETU_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("SETU_BASE_URL", DEFAULT_BASE_URL)?,
            client_id: required_var("SETU_CLIENT_ID")?,
            client_secret: required_var("SETU_CLIENT_SECRET")?,
            product_instance_id: required_var("SETU_PRODUCT_ID")?,
            redirect_url: std::env::var("SETU_CALLBACK_URL").ok(),
            timeout_secs: std::env::var("SETU_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}

fn required_var(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("{0} contains characters not valid in an HTTP header")]
    InvalidCredential(&'static str),
}
