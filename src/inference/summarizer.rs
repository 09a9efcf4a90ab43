//! Summarization driver
//!
//! One request, no poll loop: unlike transcription, a cold-starting
//! summarization model is surfaced to the user instead of retried. The
//! length and sampling parameters are fixed policy, not configuration.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Settings;
use crate::inference::{InferenceApi, InferenceOutcome, InferencePayload};

/// Upper bound on summary length, in tokens.
pub const SUMMARY_MAX_LENGTH: u32 = 50;
/// Lower bound on summary length, in tokens.
pub const SUMMARY_MIN_LENGTH: u32 = 10;
/// Deterministic generation; no sampling.
pub const SUMMARY_DO_SAMPLE: bool = false;

#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("Summarization endpoint returned {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error("Summarization model is cold-starting; try again shortly")]
    ColdStart,

    #[error("Summarization response did not contain a summary_text field")]
    MissingSummary,
}

/// Drives the summarization endpoint with transcript text.
pub struct Summarizer {
    api: Arc<dyn InferenceApi>,
    endpoint: String,
}

impl Summarizer {
    pub fn new(api: Arc<dyn InferenceApi>, endpoint: impl Into<String>) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_settings(api: Arc<dyn InferenceApi>, settings: &Settings) -> Self {
        Self::new(api, settings.inference.summarization_url.clone())
    }

    /// Summarize a transcript with the fixed generation parameters.
    pub async fn summarize(&self, transcript: &str) -> Result<String, SummarizationError> {
        let payload = json!({
            "inputs": transcript,
            "parameters": {
                "max_length": SUMMARY_MAX_LENGTH,
                "min_length": SUMMARY_MIN_LENGTH,
                "do_sample": SUMMARY_DO_SAMPLE,
            },
        });

        let outcome = self
            .api
            .invoke(&self.endpoint, InferencePayload::Json(payload))
            .await;

        match outcome {
            InferenceOutcome::Success(body) => extract_summary(&body),
            InferenceOutcome::Loading { .. } => Err(SummarizationError::ColdStart),
            InferenceOutcome::Failure { status, message } => {
                Err(SummarizationError::Endpoint { status, message })
            }
        }
    }
}

/// The endpoint answers with a list; the summary is `summary_text` of the
/// first element.
fn extract_summary(body: &Value) -> Result<String, SummarizationError> {
    body.get(0)
        .and_then(|item| item.get("summary_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(SummarizationError::MissingSummary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::ScriptedApi;

    #[tokio::test]
    async fn extracts_summary_from_list_shaped_body() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Success(json!([
            { "summary_text": "Budget discussed." }
        ]))]);

        let summarizer = Summarizer::new(api.clone(), "http://sum");
        let summary = summarizer.summarize("We discussed budget.").await.unwrap();

        assert_eq!(summary, "Budget discussed.");
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn never_retries_on_loading() {
        let api = ScriptedApi::new(vec![
            InferenceOutcome::Loading {
                estimated_secs: Some(10.0),
            },
            // Would succeed if the summarizer retried; it must not.
            InferenceOutcome::Success(json!([{ "summary_text": "late" }])),
        ]);

        let summarizer = Summarizer::new(api.clone(), "http://sum");
        let err = summarizer.summarize("transcript").await.unwrap_err();

        assert!(matches!(err, SummarizationError::ColdStart));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn endpoint_errors_carry_status_and_message() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Failure {
            status: 429,
            message: "rate limited".to_string(),
        }]);

        let summarizer = Summarizer::new(api, "http://sum");
        let err = summarizer.summarize("transcript").await.unwrap_err();

        match err {
            SummarizationError::Endpoint { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected Endpoint error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_list_is_a_missing_summary() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Success(json!([]))]);

        let summarizer = Summarizer::new(api, "http://sum");
        assert!(matches!(
            summarizer.summarize("transcript").await,
            Err(SummarizationError::MissingSummary)
        ));
    }

    #[tokio::test]
    async fn request_body_carries_fixed_parameters() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Success(json!([
            { "summary_text": "ok" }
        ]))]);

        let summarizer = Summarizer::new(api.clone(), "http://sum");
        summarizer.summarize("the transcript").await.unwrap();

        let requests = api.requests();
        match &requests[0].1 {
            crate::inference::InferencePayload::Json(body) => {
                assert_eq!(body["inputs"], "the transcript");
                assert_eq!(body["parameters"]["max_length"], 50);
                assert_eq!(body["parameters"]["min_length"], 10);
                assert_eq!(body["parameters"]["do_sample"], false);
            }
            other => panic!("expected JSON payload, got {other:?}"),
        }
    }
}
