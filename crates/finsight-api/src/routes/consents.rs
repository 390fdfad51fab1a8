//! # Consent API
//!
//! The Account Aggregator consent flow: initiate a consent request with
//! the upstream and track the resulting record locally.
//!
//! A consent record is persisted only when the upstream accepted the
//! request (HTTP 200 with an `id` in the body). The upstream call and the
//! store insert are not atomic: a crash between them loses the local
//! record while the upstream consent still exists.
//!
//! There is no callback receiver — a stored record's `status` never
//! changes after creation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::Value;

use finsight_setu_client::SetuClient;
use finsight_store::ConsentRecord;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Build the consents router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/initiate-consent", post(initiate_consent))
        .route("/api/consent-status/:consent_id", get(consent_status))
}

/// Helper: extract the Setu client from AppState or return 503.
fn require_setu_client(state: &AppState) -> Result<&SetuClient, AppError> {
    state.setu.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable(
            "Setu client not configured. Set SETU_CLIENT_ID, SETU_CLIENT_SECRET \
             and SETU_PRODUCT_ID."
                .to_string(),
        )
    })
}

/// POST /api/initiate-consent — Initiate a consent request upstream.
///
/// The request body is ignored; consent parameters are fixed sandbox
/// defaults. The upstream's status and JSON body are relayed verbatim.
#[utoipa::path(
    post,
    path = "/api/initiate-consent",
    responses(
        (status = 200, description = "Upstream accepted; reply relayed verbatim and a consent record stored"),
        (status = 502, description = "Upstream unreachable or replied with a non-JSON body", body = ErrorBody),
        (status = 503, description = "Setu client not configured", body = ErrorBody),
    ),
    tag = "consents"
)]
pub async fn initiate_consent(State(state): State<AppState>) -> Result<Response, AppError> {
    let client = require_setu_client(&state)?;
    let reply = client.initiate_consent().await?;

    if let Some(id) = reply.accepted_id() {
        let record = ConsentRecord {
            consent_id: id.to_string(),
            status: reply
                .body
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("PENDING")
                .to_string(),
            url: reply.body.get("url").and_then(Value::as_str).map(String::from),
            created_at: Utc::now(),
        };
        state.store.insert_consent(&record).await?;
        tracing::info!(
            consent_id = %record.consent_id,
            status = %record.status,
            "consent record stored"
        );
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(reply.body)).into_response())
}

/// GET /api/consent-status/{consent_id} — Look up a tracked consent.
///
/// Reads only the locally stored record; the upstream is not re-polled.
#[utoipa::path(
    get,
    path = "/api/consent-status/{consent_id}",
    params(("consent_id" = String, Path, description = "Upstream consent identifier")),
    responses(
        (status = 200, description = "The tracked consent record", body = ConsentRecord),
        (status = 404, description = "No record with that id", body = ErrorBody),
    ),
    tag = "consents"
)]
pub async fn consent_status(
    State(state): State<AppState>,
    Path(consent_id): Path<String>,
) -> Result<Json<ConsentRecord>, AppError> {
    let record = state
        .store
        .find_consent(&consent_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Consent not found".to_string()))?;

    Ok(Json(record))
}
