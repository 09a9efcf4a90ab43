//! Speech-to-text driver with the cold-start poll loop
//!
//! The endpoint answers 503 while the model warms up; the transcriber waits
//! a fixed interval and retries, up to a configurable attempt cap. The wait
//! is a non-blocking tokio sleep and the cancellation token is honored both
//! before each request and during each wait.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::audio::NormalizedAudio;
use crate::config::Settings;
use crate::inference::{InferenceApi, InferenceOutcome, InferencePayload};

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("Transcription endpoint returned {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error("Transcription model still loading after {attempts} polls")]
    RetriesExhausted { attempts: u32 },

    #[error("Transcription was cancelled")]
    Cancelled,

    #[error("Transcription response did not contain a text field")]
    MissingText,
}

/// Cold-start polling policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Wait between polls (legacy constant: 30 seconds)
    pub interval: Duration,
    /// Maximum polls before giving up; `None` reproduces the legacy
    /// unbounded loop
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval: Duration::from_secs(settings.inference.poll_interval_secs),
            max_attempts: match settings.inference.max_poll_attempts {
                0 => None,
                n => Some(n),
            },
        }
    }
}

/// Drives the speech-to-text endpoint with the normalized WAV payload.
pub struct Transcriber {
    api: Arc<dyn InferenceApi>,
    endpoint: String,
    policy: RetryPolicy,
}

impl Transcriber {
    pub fn new(api: Arc<dyn InferenceApi>, endpoint: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
            policy,
        }
    }

    pub fn from_settings(api: Arc<dyn InferenceApi>, settings: &Settings) -> Self {
        Self::new(
            api,
            settings.inference.transcription_url.clone(),
            RetryPolicy::from_settings(settings),
        )
    }

    /// Transcribe a normalized upload.
    ///
    /// Success requires a `text` field in the response body; `Failure`
    /// outcomes terminate immediately without retry.
    pub async fn transcribe(
        &self,
        audio: &NormalizedAudio,
        cancel: &CancellationToken,
    ) -> Result<String, TranscriptionError> {
        let mut attempts = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(TranscriptionError::Cancelled);
            }

            let outcome = self
                .api
                .invoke(
                    &self.endpoint,
                    InferencePayload::Binary(audio.wav_bytes.clone()),
                )
                .await;

            match outcome {
                InferenceOutcome::Success(body) => return extract_text(&body),
                InferenceOutcome::Loading { estimated_secs } => {
                    attempts += 1;
                    if let Some(max) = self.policy.max_attempts {
                        if attempts >= max {
                            return Err(TranscriptionError::RetriesExhausted { attempts });
                        }
                    }

                    tracing::info!(
                        attempt = attempts,
                        estimated_secs = estimated_secs,
                        "Transcription model is loading, retrying in {}s",
                        self.policy.interval.as_secs()
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                        _ = tokio::time::sleep(self.policy.interval) => {}
                    }
                }
                InferenceOutcome::Failure { status, message } => {
                    return Err(TranscriptionError::Endpoint { status, message });
                }
            }
        }
    }
}

fn extract_text(body: &Value) -> Result<String, TranscriptionError> {
    body.get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(TranscriptionError::MissingText)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::ScriptedApi;
    use serde_json::json;

    fn audio() -> NormalizedAudio {
        NormalizedAudio {
            wav_bytes: vec![0x52, 0x49, 0x46, 0x46],
            sample_rate: 16000,
            duration_secs: 0.0,
        }
    }

    fn fast_policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::ZERO,
            max_attempts,
        }
    }

    #[tokio::test]
    async fn retries_through_loading_then_succeeds() {
        let api = ScriptedApi::new(vec![
            InferenceOutcome::Loading {
                estimated_secs: Some(20.0),
            },
            InferenceOutcome::Loading {
                estimated_secs: None,
            },
            InferenceOutcome::Success(json!({ "text": "hello" })),
        ]);

        let transcriber = Transcriber::new(api.clone(), "http://stt", fast_policy(Some(20)));
        let text = transcriber
            .transcribe(&audio(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text, "hello");
        // One call per scripted outcome: two polls, then the success.
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn failure_terminates_without_retry() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Failure {
            status: 400,
            message: "bad audio".to_string(),
        }]);

        let transcriber = Transcriber::new(api.clone(), "http://stt", fast_policy(Some(20)));
        let err = transcriber
            .transcribe(&audio(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TranscriptionError::Endpoint { status: 400, .. }
        ));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn bounded_policy_gives_up_after_cap() {
        let api = ScriptedApi::new(vec![
            InferenceOutcome::Loading {
                estimated_secs: None
            };
            5
        ]);

        let transcriber = Transcriber::new(api.clone(), "http://stt", fast_policy(Some(3)));
        let err = transcriber
            .transcribe(&audio(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TranscriptionError::RetriesExhausted { attempts: 3 }
        ));
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn missing_text_field_is_an_explicit_error() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Success(json!({ "error": "oops" }))]);

        let transcriber = Transcriber::new(api, "http://stt", fast_policy(Some(20)));
        let err = transcriber
            .transcribe(&audio(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::MissingText));
    }

    #[tokio::test]
    async fn cancellation_stops_before_the_first_request() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Success(json!({ "text": "hi" }))]);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let transcriber = Transcriber::new(api.clone(), "http://stt", fast_policy(None));
        let err = transcriber.transcribe(&audio(), &cancel).await.unwrap_err();

        assert!(matches!(err, TranscriptionError::Cancelled));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn request_carries_the_wav_payload() {
        let api = ScriptedApi::new(vec![InferenceOutcome::Success(json!({ "text": "hi" }))]);

        let transcriber = Transcriber::new(api.clone(), "http://stt", fast_policy(Some(1)));
        transcriber
            .transcribe(&audio(), &CancellationToken::new())
            .await
            .unwrap();

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "http://stt");
        match &requests[0].1 {
            InferencePayload::Binary(bytes) => assert_eq!(bytes, &audio().wav_bytes),
            other => panic!("expected binary payload, got {other:?}"),
        }
    }
}
