//! HTTP client for remote model-serving endpoints
//!
//! Sends one bearer-authenticated POST per call and maps the response to a
//! tagged outcome. HTTP 503 is the inference service's cold-start signal
//! and is reported as `Loading`, never as an error; whether and how to
//! retry is the caller's decision.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::Settings;

/// Synthetic status used when the request never produced an HTTP response
/// (connection refused, DNS failure, timeout).
pub const SYNTHETIC_NETWORK_STATUS: u16 = 0;

/// Request body for one inference call.
#[derive(Debug, Clone)]
pub enum InferencePayload {
    /// Raw bytes (normalized WAV for transcription)
    Binary(Vec<u8>),
    /// JSON body (`inputs` + `parameters` for summarization)
    Json(Value),
}

/// Result of one inference call. Callers must branch on the tag; no variant
/// is ever folded into another.
#[derive(Debug, Clone)]
pub enum InferenceOutcome {
    /// HTTP 200 with a parsed JSON body
    Success(Value),
    /// HTTP 503: model is cold-loading; the hint comes from the body's
    /// `estimated_time` field when the service provides one
    Loading { estimated_secs: Option<f64> },
    /// Any other status, or a transport-level failure
    Failure { status: u16, message: String },
}

/// Contract for calling a remote model endpoint. The production
/// implementation is [`HttpInferenceClient`]; tests script outcomes through
/// this seam.
#[async_trait]
pub trait InferenceApi: Send + Sync {
    async fn invoke(&self, endpoint: &str, payload: InferencePayload) -> InferenceOutcome;
}

/// reqwest-backed inference client with bearer-token auth.
pub struct HttpInferenceClient {
    http: Client,
    api_token: String,
}

impl HttpInferenceClient {
    /// Build a client from runtime settings. Fails fast when the API token
    /// is absent; the pipeline never sees a missing credential.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_token = settings.require_api_token()?.to_string();

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(
                settings.inference.request_timeout_secs,
            ))
            .build()
            .context("Failed to build inference HTTP client")?;

        Ok(Self { http, api_token })
    }
}

#[async_trait]
impl InferenceApi for HttpInferenceClient {
    async fn invoke(&self, endpoint: &str, payload: InferencePayload) -> InferenceOutcome {
        let request = self.http.post(endpoint).bearer_auth(&self.api_token);

        let request = match payload {
            InferencePayload::Binary(bytes) => request.body(bytes),
            InferencePayload::Json(value) => request.json(&value),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return InferenceOutcome::Failure {
                    status: SYNTHETIC_NETWORK_STATUS,
                    message: e.to_string(),
                }
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return InferenceOutcome::Failure {
                    status: SYNTHETIC_NETWORK_STATUS,
                    message: format!("Failed to read response body: {e}"),
                }
            }
        };

        outcome_from_response(status, &body)
    }
}

/// Map an HTTP status + body to the tagged outcome.
fn outcome_from_response(status: u16, body: &str) -> InferenceOutcome {
    match status {
        200 => match serde_json::from_str(body) {
            Ok(value) => InferenceOutcome::Success(value),
            Err(e) => InferenceOutcome::Failure {
                status,
                message: format!("Response was not valid JSON: {e}"),
            },
        },
        503 => InferenceOutcome::Loading {
            estimated_secs: serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("estimated_time").and_then(Value::as_f64)),
        },
        _ => InferenceOutcome::Failure {
            status,
            message: body.trim().to_string(),
        },
    }
}
