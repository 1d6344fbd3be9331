// ABOUTME: Chat history rendering
// ABOUTME: Name/time headers, prose, highlighted code blocks, and the live streaming buffer

use crate::app::App;
use chrono::Local;
use dotchat_core::markdown::{segments, Segment};
use dotchat_core::{Message, Role};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const INDENT: &str = "  ";

/// Accent colour per grammar for code block bodies
fn grammar_color(language: &str) -> Color {
    match language {
        "rust" => Color::Rgb(222, 165, 132),
        "python" => Color::Rgb(255, 212, 59),
        "javascript" | "jsx" => Color::Rgb(240, 219, 79),
        "typescript" | "tsx" => Color::Rgb(49, 120, 198),
        "shell" => Color::Green,
        "json" | "toml" | "yaml" => Color::Cyan,
        "html" | "css" => Color::Magenta,
        _ => Color::Gray,
    }
}

fn header<'a>(name: &'a str, time: String, role: Role, is_error: bool) -> Line<'a> {
    let marker = match role {
        Role::User => Span::styled("❯ ", Style::default().bold()),
        Role::Assistant if is_error => Span::styled("✗ ", Style::default().red()),
        Role::Assistant => Span::styled("⏺ ", Style::default().white()),
    };
    Line::from(vec![
        marker,
        Span::styled(name, Style::default().bold()),
        Span::styled(format!(" {time}"), Style::default().dim()),
    ])
}

/// Lines for message content: prose as-is, fenced blocks with a language/filename bar
fn content_lines<'a>(content: &'a str, base: Style, lines: &mut Vec<Line<'a>>) {
    for segment in segments(content) {
        match segment {
            Segment::Prose(text) => {
                for line in text.lines() {
                    lines.push(Line::from(Span::styled(format!("{INDENT}{line}"), base)));
                }
            }
            Segment::Code(block) => {
                let label = match &block.filename {
                    Some(name) => format!(" {} · {} ", block.language, name),
                    None => format!(" {} ", block.language),
                };
                lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(label, Style::default().black().on_gray()),
                ]));
                let code_style = Style::default()
                    .fg(grammar_color(&block.language))
                    .bg(Color::Rgb(30, 30, 30));
                for line in block.code.lines() {
                    lines.push(Line::from(vec![
                        Span::raw(INDENT),
                        Span::styled(format!("│ {line}"), code_style),
                    ]));
                }
            }
        }
    }
}

fn message_lines<'a>(msg: &'a Message, lines: &mut Vec<Line<'a>>) {
    let time = msg
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    let is_error = msg.is_error();
    lines.push(header(&msg.name, time, msg.role, is_error));

    let base = if is_error {
        Style::default().red()
    } else {
        Style::default()
    };
    content_lines(&msg.content, base, lines);
    lines.push(Line::from(""));
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = vec![];
    let session = &app.session;

    for msg in session.messages() {
        message_lines(msg, &mut lines);
    }

    // Response in progress
    if session.is_typing() || session.is_streaming() {
        let now = Local::now().format("%H:%M").to_string();
        lines.push(header(&session.assistant().name, now, Role::Assistant, false));

        if session.shows_typing_placeholder() {
            lines.push(Line::from(Span::styled(
                format!("{INDENT}{} typing…", app.throbber_char()),
                Style::default().dim().italic(),
            )));
        } else {
            content_lines(session.buffer(), Style::default(), &mut lines);
            lines.push(Line::from(Span::styled(
                format!("{INDENT}{}", app.throbber_char()),
                Style::default().dim(),
            )));
        }
    }

    // Empty state
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ask about balances, transfers or proxies. Start typing to chat...",
            Style::default().dim(),
        )));
    }

    // Auto-scroll to bottom: scroll_offset=0 means "show newest", higher values scroll up
    let total_lines = lines.len() as u16;
    let visible_lines = area.height;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let actual_scroll = max_scroll.saturating_sub(app.scroll_offset as u16);

    let para = Paragraph::new(lines).scroll((actual_scroll, 0));
    f.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::{app, draw};

    #[test]
    fn test_empty_state() {
        let screen = draw(&app(), 90, 12);
        assert!(screen.contains("Start typing to chat"));
    }

    #[test]
    fn test_messages_show_names_and_code_labels() {
        let mut app = app();
        let stream = app.session.submit("show me").unwrap();
        app.session
            .complete(stream, "Sure:\n```py hello.py\nprint('hi')\n```");

        let screen = draw(&app, 80, 16);
        assert!(screen.contains("You"));
        assert!(screen.contains("Agent Kit"));
        assert!(screen.contains("python · hello.py"));
        assert!(screen.contains("│ print('hi')"));
    }

    #[test]
    fn test_typing_placeholder_before_first_fragment() {
        let mut app = app();
        app.session.submit("hi").unwrap();
        let screen = draw(&app, 80, 12);
        assert!(screen.contains("typing…"));
    }

    #[test]
    fn test_live_buffer_replaces_placeholder() {
        let mut app = app();
        let stream = app.session.submit("hi").unwrap();
        app.session.push_fragment(stream, "Partial answ");
        let screen = draw(&app, 80, 12);
        assert!(screen.contains("Partial answ"));
        assert!(!screen.contains("typing…"));
    }

    #[test]
    fn test_error_message_rendered() {
        let mut app = app();
        let stream = app.session.submit("hi").unwrap();
        app.session.fail(stream, "LLM request failed");
        let screen = draw(&app, 80, 12);
        assert!(screen.contains("✗ Agent Kit"));
        assert!(screen.contains("Error: LLM request failed"));
    }

    #[test]
    fn test_grammar_colors_fall_back() {
        assert_eq!(grammar_color("shell"), Color::Green);
        assert_eq!(grammar_color("text"), Color::Gray);
    }
}
