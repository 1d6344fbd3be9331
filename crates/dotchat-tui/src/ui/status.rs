// ABOUTME: Bottom status bar rendering
// ABOUTME: Shows model, responder, streaming state, notices and keybinds

use crate::app::App;
use dotchat_core::SessionState;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = vec![];

    // Model + responder
    spans.push(Span::styled(
        format!(" {} ({}) ", app.model_label(), app.responder.label()),
        Style::default().bold(),
    ));

    // Session state
    match app.session.state() {
        SessionState::AwaitingResponse => {
            spans.push(Span::styled(
                format!("{} ", app.throbber_char()),
                Style::default().yellow(),
            ));
        }
        SessionState::Idle => {
            spans.push(Span::styled("● ", Style::default().green()));
        }
    }

    // Message count
    spans.push(Span::styled(
        format!("│ {} msgs ", app.session.messages().len()),
        Style::default().dim(),
    ));

    // Notice or Ctrl+C hint
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(format!("│ {notice} "), Style::default().yellow()));
    } else if app.show_ctrl_c_hint() {
        spans.push(Span::styled(
            "│ Press Ctrl+C again to quit ",
            Style::default().yellow(),
        ));
    }

    // Keybinds
    spans.push(Span::styled(
        "│ Enter: send │ Esc: stop │ Ctrl+O: model │ Ctrl+Q: quit ",
        Style::default().dim(),
    ));

    let line = Line::from(spans);
    let para = Paragraph::new(line).style(Style::default().on_dark_gray());
    f.render_widget(para, area);
}
