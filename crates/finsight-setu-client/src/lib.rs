//! # finsight-setu-client — HTTP client for the Setu consent API
//!
//! Issues the single outbound call this backend makes: `POST
//! {base}/consents` against the Setu Account Aggregator, authenticated with
//! the `x-client-id` / `x-client-secret` / `x-product-instance-id` header
//! triple from configuration.
//!
//! Exactly one attempt per call — no retry, no backoff. The only timeout is
//! the client-wide one from [`SetuConfig::timeout_secs`].
//!
//! ## Outcomes
//!
//! | Upstream behavior            | Result                                   |
//! |------------------------------|------------------------------------------|
//! | JSON reply, any status       | `Ok(ConsentReply)` — status passes through |
//! | Non-JSON reply body          | `Err(SetuApiError::MalformedResponse)`   |
//! | Unreachable / timeout        | `Err(SetuApiError::Http)`                |

pub mod config;
pub mod error;
pub mod types;

pub use config::SetuConfig;
pub use error::SetuApiError;
pub use types::InitiateConsentRequest;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

/// Client for the Setu Account Aggregator consent API.
#[derive(Debug, Clone)]
pub struct SetuClient {
    http: reqwest::Client,
    base_url: url::Url,
    redirect_url: Option<String>,
}

/// A well-formed reply from the upstream, successful or not.
///
/// `status` and `body` are relayed verbatim by the route layer, so a
/// rejected consent request surfaces to the caller exactly as the upstream
/// phrased it.
#[derive(Debug, Clone)]
pub struct ConsentReply {
    pub status: u16,
    pub body: Value,
}

impl ConsentReply {
    /// The upstream consent id, present only when the upstream accepted the
    /// request: HTTP 200 with an `id` field in the body.
    pub fn accepted_id(&self) -> Option<&str> {
        if self.status != 200 {
            return None;
        }
        self.body.get("id").and_then(Value::as_str)
    }
}

impl SetuClient {
    /// Create a new client from configuration.
    ///
    /// The credential headers are applied to every request by the underlying
    /// `reqwest::Client`; a credential containing bytes not valid in an HTTP
    /// header is rejected here rather than at call time.
    pub fn new(config: SetuConfig) -> Result<Self, SetuApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-client-id", header_value(&config.client_id, "SETU_CLIENT_ID")?);
        headers.insert(
            "x-client-secret",
            header_value(&config.client_secret, "SETU_CLIENT_SECRET")?,
        );
        headers.insert(
            "x-product-instance-id",
            header_value(&config.product_instance_id, "SETU_PRODUCT_ID")?,
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| SetuApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            redirect_url: config.redirect_url,
        })
    }

    /// Initiate a consent request with the fixed sandbox parameters.
    ///
    /// Calls `POST {base_url}/consents` once.
    pub async fn initiate_consent(&self) -> Result<ConsentReply, SetuApiError> {
        let endpoint = "POST /consents";
        let url = format!("{}/consents", self.base_url.as_str().trim_end_matches('/'));
        let payload = InitiateConsentRequest::sandbox(self.redirect_url.clone());

        tracing::info!(url = %url, "initiating consent with upstream");

        let resp = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SetuApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| SetuApiError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        tracing::info!(status, "upstream consent reply received");

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(ConsentReply { status, body }),
            Err(_) => Err(SetuApiError::MalformedResponse {
                endpoint: endpoint.into(),
                status,
                raw: text,
            }),
        }
    }
}

fn header_value(raw: &str, var: &'static str) -> Result<HeaderValue, SetuApiError> {
    HeaderValue::from_str(raw)
        .map_err(|_| SetuApiError::Config(config::ConfigError::InvalidCredential(var)))
}
