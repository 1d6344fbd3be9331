// ABOUTME: Persistent error screen shown when the agent cannot start
// ABOUTME: Replaces the chat area; only quitting is possible from here

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;

pub fn render(f: &mut Frame, area: Rect, error: &str) {
    let area = centered_rect(80, 80, area);
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(error, Style::default().red())),
        Line::from(""),
        Line::from(Span::styled(
            "Set DOTCHAT_PRIVATE_KEY and OPENAI_API_KEY (or use a .env file), or run with --mock.",
            Style::default().dim(),
        )),
        Line::from(Span::styled("Ctrl+Q to quit", Style::default().dim())),
    ];

    let para = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().red())
            .title(" Missing required environment variables "),
    );
    f.render_widget(para, area);
}
