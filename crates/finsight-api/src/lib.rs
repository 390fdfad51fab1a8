//! # finsight-api — Axum HTTP API for the Finsight backend
//!
//! ## API Surface
//!
//! | Method + Path                          | Module                  | Behavior                      |
//! |----------------------------------------|-------------------------|-------------------------------|
//! | `GET /`                                | [`routes::greeting`]    | Static greeting               |
//! | `GET /api/hello`                       | [`routes::greeting`]    | Static greeting               |
//! | `POST /api/items`                      | [`routes::items`]       | Store a JSON document         |
//! | `GET /api/items`                       | [`routes::items`]       | List all documents            |
//! | `DELETE /api/items/{id}`               | [`routes::items`]       | Delete one document           |
//! | `POST /api/initiate-consent`           | [`routes::consents`]    | Initiate upstream consent     |
//! | `GET /api/consent-status/{consent_id}` | [`routes::consents`]    | Look up a tracked consent     |
//! | `GET /health/liveness` / `readiness`   | here                    | Probes                        |
//! | `GET /metrics`                         | [`middleware::metrics`] | Prometheus text               |
//! | `GET /openapi.json`                    | [`openapi`]             | OpenAPI spec                  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! CORS is permissively open: any origin, methods GET/POST/DELETE/OPTIONS,
//! headers Content-Type and Authorization, on every response.

pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::Extension;
use axum::http::{header, Method};
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    let api = Router::new()
        .merge(routes::greeting::router())
        .merge(routes::items::router())
        .merge(routes::consents::router())
        .merge(openapi::router())
        .route("/metrics", get(serve_metrics))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(metrics))
        .with_state(state);

    // Health probes sit outside the metrics middleware so scrapes and
    // probes do not count themselves.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api).layer(cors_layer())
}

/// Permissive CORS for every route: origin `*`, the three verbs this API
/// serves plus OPTIONS, and the two headers browsers send here.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics — Prometheus text exposition.
async fn serve_metrics(Extension(metrics): Extension<ApiMetrics>) -> Result<String, AppError> {
    metrics.gather_and_encode().map_err(AppError::Internal)
}
