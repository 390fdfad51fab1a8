//! Request types matching the Setu consent API schema.
//!
//! Consent parameters are the fixed sandbox defaults of this deployment:
//! callers cannot parametrize the duration, handle, or data range.

use serde::Serialize;

/// Sandbox virtual user address the consent is requested against.
pub const SANDBOX_VUA: &str = "999999999@onemoney";

/// Fixed financial-data range requested with every consent.
pub const DATA_RANGE_FROM: &str = "2024-01-01T00:00:00Z";
/// See [`DATA_RANGE_FROM`].
pub const DATA_RANGE_TO: &str = "2025-09-04T00:00:00Z";

/// Tags attached to every consent request.
pub const CONSENT_TAGS: [&str; 2] = ["Loan_Tracking", "Spending_Analysis"];

/// Body of `POST /consents`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateConsentRequest {
    pub consent_duration: ConsentDuration,
    pub vua: String,
    pub data_range: DataRange,
    pub context: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    pub additional_params: AdditionalParams,
}

/// Consent validity period.
#[derive(Debug, Clone, Serialize)]
pub struct ConsentDuration {
    pub unit: String,
    pub value: String,
}

/// Inclusive range of financial data the consent covers.
#[derive(Debug, Clone, Serialize)]
pub struct DataRange {
    pub from: String,
    pub to: String,
}

/// Free-form parameters forwarded to the upstream.
#[derive(Debug, Clone, Serialize)]
pub struct AdditionalParams {
    pub tags: Vec<String>,
}

impl InitiateConsentRequest {
    /// The fixed sandbox payload: 4-month duration, sandbox VUA, fixed data
    /// range, empty context, the two standard tags.
    pub fn sandbox(redirect_url: Option<String>) -> Self {
        Self {
            consent_duration: ConsentDuration {
                unit: "MONTH".to_string(),
                value: "4".to_string(),
            },
            vua: SANDBOX_VUA.to_string(),
            data_range: DataRange {
                from: DATA_RANGE_FROM.to_string(),
                to: DATA_RANGE_TO.to_string(),
            },
            context: Vec::new(),
            redirect_url,
            additional_params: AdditionalParams {
                tags: CONSENT_TAGS.iter().map(|t| t.to_string()).collect(),
            },
        }
    }
}
