//! Static greeting endpoints.

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Fixed greeting payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GreetingResponse {
    pub message: String,
}

/// Build the greeting router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/api/hello", get(hello))
}

/// GET / — Root greeting.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = GreetingResponse)),
    tag = "greeting"
)]
pub async fn home() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Welcome to the Finsight backend!".to_string(),
    })
}

/// GET /api/hello — API greeting.
#[utoipa::path(
    get,
    path = "/api/hello",
    responses((status = 200, description = "Greeting", body = GreetingResponse)),
    tag = "greeting"
)]
pub async fn hello() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello from Finsight!".to_string(),
    })
}
