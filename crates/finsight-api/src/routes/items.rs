//! # Item API
//!
//! Schema-less CRD over the `items` collection: create with a
//! server-assigned `_id`, list all in insertion order, delete by id.
//! There is no update operation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Confirmation payload for deletes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Build the items router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/items", post(create_item).get(list_items))
        .route("/api/items/:id", delete(delete_item))
}

/// POST /api/items — Store an arbitrary JSON document.
///
/// Any JSON object is accepted as-is; the response is the stored document
/// with the assigned `_id` merged in.
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = Object,
    responses(
        (status = 201, description = "Stored document including its assigned `_id`"),
        (status = 422, description = "Body was missing, malformed, or not a JSON object", body = ErrorBody),
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(doc) =
        body.map_err(|e| AppError::Validation(format!("item body must be a JSON object: {e}")))?;

    let stored = state.store.insert_item(doc).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/items — List every stored document, unfiltered and unpaginated.
#[utoipa::path(
    get,
    path = "/api/items",
    responses((status = 200, description = "All stored documents in insertion order")),
    tag = "items"
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let items = state.store.list_items().await?;
    Ok(Json(items))
}

/// DELETE /api/items/{id} — Delete at most one document.
///
/// Reports success whether or not the id matched anything.
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses((status = 200, description = "Confirmation, even when nothing was deleted", body = MessageResponse)),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.delete_item(&id).await?;
    Ok(Json(MessageResponse {
        message: "Item deleted".to_string(),
    }))
}
