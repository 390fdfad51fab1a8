//! Setu API client error types.

/// Errors from Setu consent API calls.
///
/// A reply that is well-formed JSON is NOT an error regardless of its HTTP
/// status — rejections pass through to the caller with the upstream status
/// intact. Only transport failures and undecodable bodies land here.
#[derive(Debug, thiserror::Error)]
pub enum SetuApiError {
    /// HTTP transport error: upstream unreachable, DNS failure, timeout.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Upstream replied with a body that is not JSON.
    #[error("{endpoint} returned {status} with a non-JSON body")]
    MalformedResponse {
        endpoint: String,
        status: u16,
        raw: String,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
