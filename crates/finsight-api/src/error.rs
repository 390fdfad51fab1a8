//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Responses carry a flat JSON body `{"error": "<message>"}`.
//!
//! Upstream failure descriptions are echoed to the client so a caller can
//! see why consent initiation failed; internal (store) failure details are
//! logged and replaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use finsight_setu_client::SetuApiError;
use finsight_store::StoreError;

/// Flat JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body could not be parsed or has the wrong shape (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// The upstream consent API failed: unreachable, timed out, or replied
    /// with an undecodable body (502). Message is echoed to the client.
    #[error("upstream consent API error: {0}")]
    Upstream(String),

    /// A required dependency is not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "upstream consent API error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let message = match self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::NotFound(m)
            | Self::Validation(m)
            | Self::Upstream(m)
            | Self::ServiceUnavailable(m) => m,
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Store failures are internal: logged, not echoed.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Setu client failures map onto the upstream taxonomy: transport errors
/// and malformed reply bodies are both 502, with the raw body excerpted in
/// the malformed case.
impl From<SetuApiError> for AppError {
    fn from(err: SetuApiError) -> Self {
        match err {
            SetuApiError::Http { .. } => Self::Upstream(err.to_string()),
            SetuApiError::MalformedResponse { status, raw, .. } => Self::Upstream(format!(
                "upstream returned {status} with a non-JSON body: {}",
                excerpt(&raw)
            )),
            SetuApiError::Config(_) => Self::Internal(err.to_string()),
        }
    }
}

/// First 256 chars of an upstream body, enough to diagnose without
/// relaying arbitrarily large payloads.
fn excerpt(raw: &str) -> &str {
    let mut end = raw.len().min(256);
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}
