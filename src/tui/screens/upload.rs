//! Upload screen - file picker, pipeline trigger, and download action

use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::document::{artifact_file_name, DownloadFormat, MomDocument};
use crate::session::UploadOutcome;

/// Pipeline state shown on the Upload screen.
pub enum UploadStatus {
    Idle,
    Running,
    Done {
        file_name: String,
        transcript: String,
        summary: Option<String>,
        summary_error: Option<String>,
        saved_to: Option<String>,
        save_error: Option<String>,
    },
    Error(String),
}

/// Upload screen state
pub struct UploadScreen {
    pub path_input: String,
    pub editing: bool,
    pub format: DownloadFormat,
    pub status: UploadStatus,
}

impl Default for UploadScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadScreen {
    pub fn new() -> Self {
        Self {
            path_input: String::new(),
            editing: false,
            format: DownloadFormat::Docx,
            status: UploadStatus::Idle,
        }
    }

    pub fn toggle_format(&mut self) {
        self.format = match self.format {
            DownloadFormat::Docx => DownloadFormat::Pdf,
            DownloadFormat::Pdf => DownloadFormat::Docx,
        };
    }

    /// Keys while the path input has focus.
    pub fn handle_edit_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                self.path_input.push(c);
            }
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.editing = false;
            }
            _ => {}
        }
    }

    /// Record a finished pipeline run.
    pub fn finish(&mut self, outcome: UploadOutcome) {
        self.status = UploadStatus::Done {
            file_name: outcome.file_name,
            transcript: outcome.transcript,
            summary: outcome.summary,
            summary_error: outcome.summary_error.map(|e| e.to_string()),
            saved_to: None,
            save_error: None,
        };
    }

    /// Render the MOM document for the completed run and write it into the
    /// current working directory.
    pub fn save_document(&mut self) {
        self.save_document_in(std::path::Path::new("."));
    }

    /// A failed render or write leaves the completed result on screen;
    /// only the save line reports the error.
    fn save_document_in(&mut self, dir: &std::path::Path) {
        let UploadStatus::Done {
            transcript,
            summary,
            saved_to,
            save_error,
            ..
        } = &mut self.status
        else {
            return;
        };

        let date = Local::now().date_naive();
        let document = MomDocument::new(
            transcript.clone(),
            summary.clone().unwrap_or_default(),
            date,
        );

        let path = dir.join(artifact_file_name(self.format, date));
        let result = document
            .render(self.format)
            .map_err(|e| e.to_string())
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                *saved_to = Some(path.display().to_string());
                *save_error = None;
            }
            Err(e) => *save_error = Some(format!("Failed to save document: {e}")),
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, setup_error: Option<&str>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Path input
                Constraint::Length(3), // Format
                Constraint::Min(5),    // Status / result
                Constraint::Length(3), // Help
            ])
            .split(area);

        // Path input
        let input_style = if self.editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let input_text = if self.editing {
            format!("{}█", self.path_input)
        } else if self.path_input.is_empty() {
            "Press [e] to enter an audio file path (wav, mp3, mp4)".to_string()
        } else {
            self.path_input.clone()
        };
        let input = Paragraph::new(input_text)
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).title(" Audio File "));
        frame.render_widget(input, chunks[0]);

        // Format selector
        let format = Paragraph::new(Line::from(vec![
            Span::raw("Download format: "),
            Span::styled(
                match self.format {
                    DownloadFormat::Docx => "Word Document (.docx)",
                    DownloadFormat::Pdf => "PDF (.pdf)",
                },
                Style::default().fg(Color::Cyan),
            ),
            Span::styled("  (press [f] to switch)", Style::default().fg(Color::DarkGray)),
        ]))
        .block(Block::default().borders(Borders::ALL).title(" Format "));
        frame.render_widget(format, chunks[1]);

        // Status / result
        let status_text = if let Some(error) = setup_error {
            vec![
                Line::from(Span::styled(
                    "Configuration error",
                    Style::default().fg(Color::Red).bold(),
                )),
                Line::from(""),
                Line::from(error.to_string()),
            ]
        } else {
            match &self.status {
                UploadStatus::Idle => vec![
                    Line::from("No upload in progress."),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Enter a file path and press Enter to transcribe and summarize.",
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
                UploadStatus::Running => vec![
                    Line::from(Span::styled(
                        "Processing audio file...",
                        Style::default().fg(Color::Yellow),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "The transcription model may need to warm up; this can take a while.",
                        Style::default().fg(Color::DarkGray),
                    )),
                    Line::from(Span::styled(
                        "Press [c] to cancel.",
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
                UploadStatus::Done {
                    file_name,
                    transcript,
                    summary,
                    summary_error,
                    saved_to,
                    save_error,
                } => {
                    let mut lines = vec![
                        Line::from(vec![
                            Span::styled("✓ ", Style::default().fg(Color::Green)),
                            Span::raw(file_name.clone()),
                        ]),
                        Line::from(""),
                        Line::from(Span::styled(
                            "Transcription:",
                            Style::default().fg(Color::White).bold(),
                        )),
                        Line::from(transcript.clone()),
                        Line::from(""),
                    ];

                    match (summary, summary_error) {
                        (Some(summary), _) => {
                            lines.push(Line::from(Span::styled(
                                "Summary:",
                                Style::default().fg(Color::White).bold(),
                            )));
                            lines.push(Line::from(summary.clone()));
                        }
                        (None, Some(error)) => {
                            lines.push(Line::from(Span::styled(
                                format!("Summarization failed: {error}"),
                                Style::default().fg(Color::Red),
                            )));
                        }
                        (None, None) => {}
                    }

                    lines.push(Line::from(""));
                    match (saved_to, save_error) {
                        (Some(path), _) => lines.push(Line::from(Span::styled(
                            format!("Saved to {path}"),
                            Style::default().fg(Color::Green),
                        ))),
                        (None, Some(error)) => lines.push(Line::from(Span::styled(
                            format!("{error} (press [s] to retry)"),
                            Style::default().fg(Color::Red),
                        ))),
                        (None, None) => lines.push(Line::from(Span::styled(
                            "Press [s] to save the MOM document.",
                            Style::default().fg(Color::DarkGray),
                        ))),
                    }

                    lines
                }
                UploadStatus::Error(message) => vec![
                    Line::from(Span::styled(
                        "Upload failed",
                        Style::default().fg(Color::Red).bold(),
                    )),
                    Line::from(""),
                    Line::from(message.clone()),
                ],
            }
        };

        let status = Paragraph::new(status_text).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(" Upload ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
        frame.render_widget(status, chunks[2]);

        // Help bar
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" [e] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Edit path  "),
            Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Process  "),
            Span::styled(" [f] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Format  "),
            Span::styled(" [s] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Save  "),
            Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Back"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[3]);
    }
}
