// ABOUTME: Model selector overlay rendering
// ABOUTME: Centered modal listing the model catalog

use super::centered_rect;
use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem};
use ratatui::Frame;

pub fn render(f: &mut Frame, app: &App) {
    // Center overlay: 60% width, 50% height
    let area = centered_rect(60, 50, f.area());

    // Clear background
    f.render_widget(Clear, area);

    let current = app.models.selected_index();
    let items: Vec<ListItem> = app
        .models
        .models()
        .iter()
        .enumerate()
        .map(|(i, model)| {
            let mark = if i == current { "✓" } else { " " };
            let mut spans = vec![Span::raw(format!(" {mark} {}", model.name))];
            if let Some(description) = &model.description {
                spans.push(Span::styled(
                    format!("  {description}"),
                    Style::default().dim(),
                ));
            }

            let style = if i == app.picker_index {
                Style::default().reversed()
            } else {
                Style::default()
            };

            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let title = if app.responder.is_live() {
        " Select Model "
    } else {
        " Select Model (mock) "
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().cyan())
            .title(title),
    );

    f.render_widget(list, area);
}
