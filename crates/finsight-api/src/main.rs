//! # finsight-api — Binary Entry Point
//!
//! Starts the Axum HTTP server: selects the record store backend,
//! constructs the Setu client when credentials are present, binds to all
//! interfaces on the configured port.

use finsight_api::state::{AppConfig, AppState};
use finsight_setu_client::{SetuClient, SetuConfig};
use finsight_store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let secret_key = std::env::var("SECRET_KEY").ok();
    let config = AppConfig { port, secret_key };

    // Select the store backend. Absent or unreachable database degrades to
    // the in-memory store with a logged warning; it never aborts startup.
    let store = RecordStore::from_env().await;

    // Attempt to create the Setu client from environment.
    let setu = match SetuConfig::from_env() {
        Ok(setu_config) => {
            tracing::info!("Setu client configured");
            match SetuClient::new(setu_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Failed to create Setu client: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::warn!("Setu client not configured: {e}. Consent endpoints will return 503.");
            None
        }
    };

    let state = AppState {
        store,
        setu,
        config,
    };
    let app = finsight_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Finsight API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
