//! Axum middleware.

pub mod metrics;
