// ABOUTME: Interactive chat loop
// ABOUTME: Owns the terminal, feeds keys to App and drains response events

use crate::app::App;
use crate::types::{Action, Responder};
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotchat_core::StreamEvent;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// RAII guard for terminal cleanup
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the chat until the user quits. `events` is the receiving end of the
/// channel whose sender was handed to [`App::new`].
pub async fn run(mut app: App, mut events: mpsc::UnboundedReceiver<StreamEvent>) -> Result<()> {
    let _guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        Some(Action::Quit) => break,
                        Some(Action::Respond { stream, text }) => app.start_response(stream, text),
                        None => {}
                    }
                }
            }
        }

        // Response events (non-blocking)
        while let Ok(event) = events.try_recv() {
            app.handle_stream_event(event);
        }

        app.tick();
    }

    app.stop();
    if let Responder::Live(agent) = &app.responder {
        agent.disconnect().await;
    }
    tracing::info!("Chat closed");
    Ok(())
}
