//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Holds the record store (selected once at
//! startup), the optional Setu client, and server configuration.
//!
//! The store and client are dependency-injected here rather than living in
//! module-level globals, so tests construct isolated instances freely.

use finsight_setu_client::SetuClient;
use finsight_store::RecordStore;

/// Server configuration from the environment.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Listen port (`PORT`, default 8080 — applied in `main`).
    pub port: u16,
    /// `SECRET_KEY` from the environment. Held for parity with the
    /// deployment surface; no endpoint consumes it.
    pub secret_key: Option<String>,
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The record store backend selected at startup.
    pub store: RecordStore,
    /// Setu consent client; `None` when credentials are not configured,
    /// in which case the consent endpoints answer 503.
    pub setu: Option<SetuClient>,
    /// Server configuration.
    pub config: AppConfig,
}

impl AppState {
    /// State with a fresh in-memory store, no Setu client, and default
    /// configuration. Used by tests.
    pub fn new() -> Self {
        Self {
            store: RecordStore::memory(),
            setu: None,
            config: AppConfig::default(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
