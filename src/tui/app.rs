//! Main TUI application state and logic

use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::audio::AudioBlob;
use crate::config::Settings;
use crate::inference::{HttpInferenceClient, InferenceApi, Summarizer, Transcriber};
use crate::session::{HistoryEntry, SessionOrchestrator, UploadOutcome};
use crate::tui::screens::{HistoryScreen, HomeScreen, UploadScreen, UploadStatus};

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Upload,
    History,
}

/// Messages from the spawned pipeline task back to the draw loop.
pub enum PipelineEvent {
    Finished(Box<UploadOutcome>),
    Failed(String),
}

/// Main application state
pub struct App {
    orchestrator: Option<Arc<SessionOrchestrator>>,
    /// Set when the orchestrator could not be built (missing token)
    setup_error: Option<String>,

    current_screen: AppScreen,

    // Screen states
    home: HomeScreen,
    upload: UploadScreen,
    history: HistoryScreen,
    history_rows: Vec<HistoryEntry>,

    // Running pipeline
    events_rx: Option<mpsc::UnboundedReceiver<PipelineEvent>>,
    cancel: Option<CancellationToken>,
}

impl App {
    /// Create a new app instance. A missing API token does not prevent the
    /// TUI from opening; it surfaces on the Upload screen instead.
    pub fn new(settings: Settings) -> Self {
        let (orchestrator, setup_error) = match HttpInferenceClient::from_settings(&settings) {
            Ok(client) => {
                let api: Arc<dyn InferenceApi> = Arc::new(client);
                let orchestrator = SessionOrchestrator::new(
                    Transcriber::from_settings(api.clone(), &settings),
                    Summarizer::from_settings(api, &settings),
                );
                (Some(Arc::new(orchestrator)), None)
            }
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            orchestrator,
            setup_error,
            current_screen: AppScreen::Home,
            home: HomeScreen::new(),
            upload: UploadScreen::new(),
            history: HistoryScreen::new(),
            history_rows: Vec::new(),
            events_rx: None,
            cancel: None,
        }
    }

    /// Draw the current screen
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();

        match self.current_screen {
            AppScreen::Home => {
                self.home.draw(frame, area);
            }
            AppScreen::Upload => {
                self.upload.draw(frame, area, self.setup_error.as_deref());
            }
            AppScreen::History => {
                self.history.draw(frame, area, &self.history_rows);
            }
        }
    }

    /// True while the Upload screen's path input has focus.
    pub fn is_editing(&self) -> bool {
        self.current_screen == AppScreen::Upload && self.upload.editing
    }

    /// Quit only from the Home screen; elsewhere q/Esc goes back first.
    pub fn should_quit(&self) -> bool {
        self.current_screen == AppScreen::Home
    }

    pub fn handle_back(&mut self) {
        self.current_screen = AppScreen::Home;
    }

    /// Cancel any in-flight pipeline before the terminal is restored.
    pub fn shutdown(&mut self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyCode) {
        if self.is_editing() {
            self.upload.handle_edit_key(key);
            return;
        }

        // Global navigation
        match key {
            KeyCode::Char('1') => {
                self.current_screen = AppScreen::Home;
                return;
            }
            KeyCode::Char('2') => {
                self.current_screen = AppScreen::Upload;
                return;
            }
            KeyCode::Char('3') => {
                self.current_screen = AppScreen::History;
                return;
            }
            KeyCode::Tab => {
                self.current_screen = match self.current_screen {
                    AppScreen::Home => AppScreen::Upload,
                    AppScreen::Upload => AppScreen::History,
                    AppScreen::History => AppScreen::Home,
                };
                return;
            }
            _ => {}
        }

        if self.current_screen == AppScreen::Upload {
            match key {
                KeyCode::Char('e') => {
                    if !matches!(self.upload.status, UploadStatus::Running) {
                        self.upload.editing = true;
                    }
                }
                KeyCode::Char('f') => {
                    self.upload.toggle_format();
                }
                KeyCode::Enter => {
                    self.start_pipeline();
                }
                KeyCode::Char('c') => {
                    if let Some(cancel) = &self.cancel {
                        cancel.cancel();
                    }
                }
                KeyCode::Char('s') => {
                    self.upload.save_document();
                }
                _ => {}
            }
        }
    }

    /// Kick off the pipeline on a spawned task so the draw loop keeps
    /// running while the transcription endpoint is polled.
    fn start_pipeline(&mut self) {
        if matches!(self.upload.status, UploadStatus::Running) {
            return;
        }

        let Some(orchestrator) = self.orchestrator.clone() else {
            return;
        };

        let path = self.upload.path_input.trim().to_string();
        if path.is_empty() {
            return;
        }

        let file_name = std::path::Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone());

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.upload.status = UploadStatus::Error(format!("Failed to read {path}: {e}"));
                return;
            }
        };

        let blob = match AudioBlob::new(file_name, bytes) {
            Ok(blob) => blob,
            Err(e) => {
                self.upload.status = UploadStatus::Error(e.to_string());
                return;
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        self.events_rx = Some(rx);
        self.cancel = Some(cancel.clone());
        self.upload.status = UploadStatus::Running;

        tokio::spawn(async move {
            let event = match orchestrator.process_upload(blob, &cancel).await {
                Ok(outcome) => PipelineEvent::Finished(Box::new(outcome)),
                Err(e) => PipelineEvent::Failed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }

    /// Drain pipeline events and refresh the history snapshot.
    pub async fn update(&mut self) {
        if let Some(rx) = &mut self.events_rx {
            while let Ok(event) = rx.try_recv() {
                match event {
                    PipelineEvent::Finished(outcome) => {
                        self.upload.finish(*outcome);
                        self.cancel = None;
                    }
                    PipelineEvent::Failed(message) => {
                        self.upload.status = UploadStatus::Error(message);
                        self.cancel = None;
                    }
                }
            }
        }

        if let Some(orchestrator) = &self.orchestrator {
            self.history_rows = orchestrator.history().await;
        }
    }
}
