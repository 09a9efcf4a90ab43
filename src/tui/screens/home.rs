//! Home screen - static description of the tool and models

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Home screen state
pub struct HomeScreen {}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(5),    // Info
                Constraint::Length(3), // Help
            ])
            .split(area);

        // Title
        let title = Paragraph::new("Welcome to legallify")
            .style(Style::default().fg(Color::Green).bold())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(title, chunks[0]);

        // Info section
        let info_text = vec![
            Line::from(
                "legallify transcribes audio files with remote machine-learning models and",
            ),
            Line::from("generates summaries and Minutes-of-Meeting documents."),
            Line::from(""),
            Line::from("Upload your audio files in WAV, MP3, or MP4 format to get started."),
            Line::from(""),
            Line::from(Span::styled(
                "Model Descriptions:",
                Style::default().fg(Color::White).bold(),
            )),
            Line::from(vec![
                Span::raw("• Transcription: "),
                Span::styled(
                    "facebook/wav2vec2-base-960h",
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" converts audio into text"),
            ]),
            Line::from(vec![
                Span::raw("• Summarization: "),
                Span::styled(
                    "facebook/bart-large-cnn",
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" condenses text into a summary"),
            ]),
        ];

        let info_widget = Paragraph::new(info_text).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(" Home ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(info_widget, chunks[1]);

        // Help bar
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" [2] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Upload  "),
            Span::styled(" [3] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" History  "),
            Span::styled(" Tab ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Next screen  "),
            Span::styled(" [q] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }
}
