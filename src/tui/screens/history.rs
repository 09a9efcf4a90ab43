//! History screen - read-only list of past uploads

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::session::HistoryEntry;

/// History screen state
pub struct HistoryScreen {}

impl Default for HistoryScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryScreen {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, entries: &[HistoryEntry]) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // List
                Constraint::Length(3), // Help
            ])
            .split(area);

        if entries.is_empty() {
            let empty = Paragraph::new("No history available.")
                .style(Style::default().fg(Color::DarkGray))
                .block(
                    Block::default()
                        .title(" History ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Blue)),
                );
            frame.render_widget(empty, chunks[0]);
        } else {
            let items: Vec<ListItem> = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let transcription_status = if entry.transcribed {
                        Span::styled("Completed", Style::default().fg(Color::Green))
                    } else {
                        Span::styled("Pending", Style::default().fg(Color::Yellow))
                    };
                    let summary_status = if entry.summary.is_some() {
                        Span::styled("Completed", Style::default().fg(Color::Green))
                    } else {
                        Span::styled("Pending", Style::default().fg(Color::Yellow))
                    };

                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{}. ", i + 1),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(
                            entry.file_name.clone(),
                            Style::default().fg(Color::White),
                        ),
                        Span::raw("  transcription: "),
                        transcription_status,
                        Span::raw("  summary: "),
                        summary_status,
                    ]))
                })
                .collect();

            let list = List::new(items).block(
                Block::default()
                    .title(format!(" History ({}) ", entries.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            );
            frame.render_widget(list, chunks[0]);
        }

        // Help bar
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" [1] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Home  "),
            Span::styled(" [2] ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Upload  "),
            Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Back"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[1]);
    }
}
