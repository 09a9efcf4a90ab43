//! Session orchestration
//!
//! Sequences one upload through normalize -> transcribe -> summarize and
//! maintains the append-only session history. Each interactive session owns
//! its own `SessionContext`; nothing here is process-global.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::audio::{self, AudioBlob, ConversionError};
use crate::inference::{SummarizationError, Summarizer, Transcriber, TranscriptionError};

/// Pipeline failures that abort the current upload. Summarization failures
/// are not pipeline errors; they are carried in the outcome.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// One history row. `summary` transitions at most once, from absent to
/// present, and never reverts.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub file_name: String,
    pub transcribed: bool,
    pub summary: Option<String>,
}

/// Per-session state: the append-only upload history. Created at session
/// start, dropped at session end.
#[derive(Debug, Default)]
pub struct SessionContext {
    history: Vec<HistoryEntry>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Record a successful transcription; the summary starts absent.
    fn push_transcribed(&mut self, file_name: String) -> usize {
        self.history.push(HistoryEntry {
            file_name,
            transcribed: true,
            summary: None,
        });
        self.history.len() - 1
    }

    /// Set the summary for an entry. A summary is written once; later calls
    /// for the same entry are ignored.
    fn set_summary(&mut self, index: usize, summary: String) {
        if let Some(entry) = self.history.get_mut(index) {
            if entry.summary.is_none() {
                entry.summary = Some(summary);
            }
        }
    }
}

/// Result of one completed upload. `summary` is absent when summarization
/// failed; the failure itself rides along for display.
#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub transcript: String,
    pub summary: Option<String>,
    pub summary_error: Option<SummarizationError>,
}

/// Sequences uploads and owns the session history.
pub struct SessionOrchestrator {
    session: Arc<Mutex<SessionContext>>,
    transcriber: Transcriber,
    summarizer: Summarizer,
}

impl SessionOrchestrator {
    pub fn new(transcriber: Transcriber, summarizer: Summarizer) -> Self {
        Self {
            session: Arc::new(Mutex::new(SessionContext::new())),
            transcriber,
            summarizer,
        }
    }

    /// Snapshot of the history in insertion order.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.session.lock().await.history().to_vec()
    }

    /// Run one upload through the full pipeline.
    ///
    /// Conversion and transcription failures abort before any history entry
    /// exists. After a successful transcription the entry is recorded, and a
    /// later summarization failure leaves it in place with `summary` absent.
    pub async fn process_upload(
        &self,
        blob: AudioBlob,
        cancel: &CancellationToken,
    ) -> Result<UploadOutcome, PipelineError> {
        self.run(blob, cancel, true).await
    }

    /// Like [`process_upload`](Self::process_upload), but stops after
    /// transcription. The history entry is recorded with `summary` absent.
    pub async fn transcribe_only(
        &self,
        blob: AudioBlob,
        cancel: &CancellationToken,
    ) -> Result<UploadOutcome, PipelineError> {
        self.run(blob, cancel, false).await
    }

    async fn run(
        &self,
        blob: AudioBlob,
        cancel: &CancellationToken,
        summarize: bool,
    ) -> Result<UploadOutcome, PipelineError> {
        let file_name = blob.file_name.clone();
        tracing::info!(file = %file_name, "Processing upload");

        let normalized = audio::normalize(blob)?;
        let transcript = self.transcriber.transcribe(&normalized, cancel).await?;
        drop(normalized);

        // History entry exists from this point on, whatever summarization does.
        let entry_index = {
            let mut session = self.session.lock().await;
            session.push_transcribed(file_name.clone())
        };

        if !summarize {
            return Ok(UploadOutcome {
                file_name,
                transcript,
                summary: None,
                summary_error: None,
            });
        }

        let (summary, summary_error) = match self.summarizer.summarize(&transcript).await {
            Ok(summary) => {
                let mut session = self.session.lock().await;
                session.set_summary(entry_index, summary.clone());
                (Some(summary), None)
            }
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "Summarization failed");
                (None, Some(e))
            }
        };

        Ok(UploadOutcome {
            file_name,
            transcript,
            summary,
            summary_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::ScriptedApi;
    use crate::inference::{InferenceOutcome, RetryPolicy};
    use serde_json::json;
    use std::io::Cursor;
    use std::time::Duration;

    fn wav_blob(name: &str) -> AudioBlob {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..1600i32 {
                writer.write_sample(((i % 64) * 128) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }

        AudioBlob::new(name, cursor.into_inner()).unwrap()
    }

    fn orchestrator(
        stt: Vec<InferenceOutcome>,
        sum: Vec<InferenceOutcome>,
    ) -> SessionOrchestrator {
        let policy = RetryPolicy {
            interval: Duration::ZERO,
            max_attempts: Some(5),
        };
        let transcriber = Transcriber::new(ScriptedApi::new(stt), "http://stt", policy);
        let summarizer = Summarizer::new(ScriptedApi::new(sum), "http://sum");
        SessionOrchestrator::new(transcriber, summarizer)
    }

    fn success_text(text: &str) -> InferenceOutcome {
        InferenceOutcome::Success(json!({ "text": text }))
    }

    fn success_summary(text: &str) -> InferenceOutcome {
        InferenceOutcome::Success(json!([{ "summary_text": text }]))
    }

    #[tokio::test]
    async fn full_pipeline_records_a_complete_entry() {
        let orch = orchestrator(
            vec![success_text("We discussed budget.")],
            vec![success_summary("Budget discussed.")],
        );

        let outcome = orch
            .process_upload(wav_blob("meeting.wav"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.transcript, "We discussed budget.");
        assert_eq!(outcome.summary.as_deref(), Some("Budget discussed."));
        assert!(outcome.summary_error.is_none());

        let history = orch.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].file_name, "meeting.wav");
        assert!(history[0].transcribed);
        assert_eq!(history[0].summary.as_deref(), Some("Budget discussed."));
    }

    #[tokio::test]
    async fn transcription_failure_leaves_no_history() {
        let orch = orchestrator(
            vec![InferenceOutcome::Failure {
                status: 500,
                message: "boom".to_string(),
            }],
            vec![],
        );

        let err = orch
            .process_upload(wav_blob("meeting.wav"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Transcription(_)));
        assert!(orch.history().await.is_empty());
    }

    #[tokio::test]
    async fn conversion_failure_leaves_no_history() {
        let orch = orchestrator(vec![], vec![]);
        let blob = AudioBlob::new("broken.mp3", vec![0u8; 16]).unwrap();

        let err = orch
            .process_upload(blob, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Conversion(_)));
        assert!(orch.history().await.is_empty());
    }

    #[tokio::test]
    async fn summarization_failure_keeps_entry_without_summary() {
        let orch = orchestrator(
            vec![success_text("transcript")],
            vec![InferenceOutcome::Loading {
                estimated_secs: None,
            }],
        );

        let outcome = orch
            .process_upload(wav_blob("meeting.wav"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.summary.is_none());
        assert!(matches!(
            outcome.summary_error,
            Some(SummarizationError::ColdStart)
        ));

        let history = orch.history().await;
        assert_eq!(history.len(), 1);
        assert!(history[0].transcribed);
        assert!(history[0].summary.is_none());
    }

    #[tokio::test]
    async fn history_grows_by_one_per_completed_upload() {
        let orch = orchestrator(
            vec![success_text("one"), success_text("two"), success_text("three")],
            vec![
                success_summary("s1"),
                InferenceOutcome::Failure {
                    status: 502,
                    message: "bad gateway".to_string(),
                },
                success_summary("s3"),
            ],
        );

        for name in ["a.wav", "b.wav", "c.wav"] {
            orch.process_upload(wav_blob(name), &CancellationToken::new())
                .await
                .unwrap();
        }

        let history = orch.history().await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].summary.as_deref(), Some("s1"));
        assert!(history[1].summary.is_none());
        assert_eq!(history[2].summary.as_deref(), Some("s3"));
        // Insertion order preserved.
        let names: Vec<_> = history.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, ["a.wav", "b.wav", "c.wav"]);
    }

    #[tokio::test]
    async fn transcribe_only_skips_the_summarizer() {
        // A scripted summary is queued; it must never be consumed.
        let orch = orchestrator(
            vec![success_text("transcript")],
            vec![success_summary("unused")],
        );

        let outcome = orch
            .transcribe_only(wav_blob("meeting.wav"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.transcript, "transcript");
        assert!(outcome.summary.is_none());
        assert!(outcome.summary_error.is_none());

        let history = orch.history().await;
        assert_eq!(history.len(), 1);
        assert!(history[0].summary.is_none());
    }

    #[tokio::test]
    async fn summary_transitions_only_once() {
        let mut session = SessionContext::new();
        let index = session.push_transcribed("meeting.wav".to_string());

        session.set_summary(index, "first".to_string());
        session.set_summary(index, "second".to_string());

        assert_eq!(session.history()[index].summary.as_deref(), Some("first"));
    }
}
