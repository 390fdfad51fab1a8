//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finsight Backend API",
        version = "0.1.0",
        description = "Item CRUD over the record store and the Setu Account Aggregator consent flow.",
        license(name = "Apache-2.0")
    ),
    paths(
        // Greetings
        crate::routes::greeting::home,
        crate::routes::greeting::hello,
        // Items
        crate::routes::items::create_item,
        crate::routes::items::list_items,
        crate::routes::items::delete_item,
        // Consents
        crate::routes::consents::initiate_consent,
        crate::routes::consents::consent_status,
    ),
    components(schemas(
        finsight_store::ConsentRecord,
        crate::error::ErrorBody,
        crate::routes::greeting::GreetingResponse,
        crate::routes::items::MessageResponse,
    )),
    tags(
        (name = "greeting", description = "Static greetings"),
        (name = "items", description = "Schema-less item collection"),
        (name = "consents", description = "Account Aggregator consent flow"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
