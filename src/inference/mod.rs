//! Remote inference module for legallify
//!
//! One HTTP client seam (`InferenceApi`) shared by the transcription and
//! summarization drivers. The client never retries; polling policy lives
//! with the transcriber.

mod client;
mod summarizer;
mod transcriber;

pub use client::{
    HttpInferenceClient, InferenceApi, InferenceOutcome, InferencePayload,
    SYNTHETIC_NETWORK_STATUS,
};
pub use summarizer::{
    Summarizer, SummarizationError, SUMMARY_DO_SAMPLE, SUMMARY_MAX_LENGTH, SUMMARY_MIN_LENGTH,
};
pub use transcriber::{RetryPolicy, Transcriber, TranscriptionError};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::{InferenceApi, InferenceOutcome, InferencePayload};

    /// Inference fake that replays a scripted sequence of outcomes and
    /// records every request it receives.
    pub struct ScriptedApi {
        responses: Mutex<VecDeque<InferenceOutcome>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<(String, InferencePayload)>>,
    }

    impl ScriptedApi {
        pub fn new(responses: Vec<InferenceOutcome>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<(String, InferencePayload)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceApi for ScriptedApi {
        async fn invoke(&self, endpoint: &str, payload: InferencePayload) -> InferenceOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .unwrap()
                .push((endpoint.to_string(), payload));

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(InferenceOutcome::Failure {
                    status: 599,
                    message: "scripted responses exhausted".to_string(),
                })
        }
    }
}
