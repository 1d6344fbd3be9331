// ABOUTME: Central application state and event handling
// ABOUTME: Single struct holds all state, mutations happen in handle_* methods

use crate::types::{Action, Mode, Responder};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dotchat_core::session::StreamId;
use dotchat_core::{ChatSession, ModelSelection, StreamEvent, StreamTask, SubmitRejected};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

/// Central application state
pub struct App {
    // Mode
    pub mode: Mode,

    // Chat state
    pub session: ChatSession,
    pub scroll_offset: usize,

    // Input state
    pub input: TextArea<'static>,

    // Model selector
    pub models: ModelSelection,
    pub picker_index: usize,

    // Response production
    pub responder: Responder,
    active: Option<StreamTask>,
    events: mpsc::UnboundedSender<StreamEvent>,

    /// Set when the agent could not be brought up. Not recoverable.
    pub fatal: Option<String>,
    /// One-line transient message for the status bar
    pub notice: Option<String>,

    // Quit handling
    pub last_ctrl_c: Option<Instant>,

    // Throbber animation frame
    pub throbber_frame: usize,
}

impl App {
    pub fn new(
        session: ChatSession,
        responder: Responder,
        models: ModelSelection,
        events: mpsc::UnboundedSender<StreamEvent>,
    ) -> Self {
        let picker_index = models.selected_index();
        Self {
            mode: Mode::Chat,
            session,
            scroll_offset: 0,
            input: TextArea::default(),
            models,
            picker_index,
            responder,
            active: None,
            events,
            fatal: None,
            notice: None,
            last_ctrl_c: None,
            throbber_frame: 0,
        }
    }

    /// Show a persistent error screen instead of the chat
    pub fn with_fatal(mut self, error: impl Into<String>) -> Self {
        self.fatal = Some(error.into());
        self
    }

    /// Advance throbber animation
    pub fn tick(&mut self) {
        self.throbber_frame = (self.throbber_frame + 1) % 8;
    }

    /// Get current throbber character
    pub fn throbber_char(&self) -> char {
        const THROBBER: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];
        THROBBER[self.throbber_frame]
    }

    /// Model id shown in the status bar: what the agent sends when live
    pub fn model_label(&self) -> String {
        match &self.responder {
            Responder::Live(agent) => agent.model_id(),
            Responder::Mock(_) => self.models.selected().id.clone(),
        }
    }

    pub fn has_active_task(&self) -> bool {
        self.active.is_some()
    }

    /// Handle a key event, returning an action if needed
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Global keys
        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::Quit);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(last) = self.last_ctrl_c {
                    if last.elapsed() < Duration::from_millis(500) {
                        return Some(Action::Quit);
                    }
                }
                self.last_ctrl_c = Some(Instant::now());
                return None;
            }
            _ => {}
        }

        if self.fatal.is_some() {
            return None;
        }

        match self.mode {
            Mode::Picker => self.handle_picker_key(key),
            Mode::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Chat;
            }
            KeyCode::Enter => {
                if self.models.select(self.picker_index) {
                    let id = self.models.selected().id.clone();
                    if let Responder::Live(agent) = &self.responder {
                        agent.select_model(id);
                    }
                }
                self.mode = Mode::Chat;
            }
            KeyCode::Up => {
                self.picker_index = self.picker_index.saturating_sub(1);
            }
            KeyCode::Down => {
                let max = self.models.models().len().saturating_sub(1);
                self.picker_index = (self.picker_index + 1).min(max);
            }
            _ => {}
        }
        None
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.picker_index = self.models.selected_index();
                self.mode = Mode::Picker;
            }

            // Stop the response in progress
            KeyCode::Esc => {
                self.stop();
            }

            // Scroll
            KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }

            // Newline (Shift+Enter, or Alt+Enter where the terminal hides Shift)
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.input.insert_newline();
            }

            // Send message
            KeyCode::Enter => return self.submit(),

            // Pass to textarea
            _ => {
                self.input.input(key);
            }
        }
        None
    }

    fn submit(&mut self) -> Option<Action> {
        let text = self.input.lines().join("\n");
        match self.session.submit(&text) {
            Ok(stream) => {
                self.input = TextArea::default();
                self.notice = None;
                if self.session.take_scroll_request() {
                    self.scroll_offset = 0;
                }
                Some(Action::Respond { stream, text })
            }
            Err(SubmitRejected::Busy) => {
                self.notice = Some("Response in progress, press Esc to stop".to_string());
                None
            }
            Err(SubmitRejected::Empty) => None,
        }
    }

    /// Start producing the response for an accepted submission
    pub fn start_response(&mut self, stream: StreamId, text: String) {
        let tx = self.events.clone();
        let task = match &self.responder {
            Responder::Mock(streamer) => streamer.start(stream, tx),
            Responder::Live(agent) => {
                let agent = agent.clone();
                StreamTask::spawn_future(stream, async move { agent.dispatch(&text).await }, tx)
            }
        };
        tracing::debug!(%stream, responder = self.responder.label(), "Response started");
        self.active = Some(task);
    }

    /// Cancel the running task and keep what was revealed so far
    pub fn stop(&mut self) {
        if let Some(task) = self.active.take() {
            task.cancel();
        }
        if self.session.stop().is_some() {
            tracing::debug!("Response stopped by user");
        }
    }

    /// Apply an event from the response task
    pub fn handle_stream_event(&mut self, event: StreamEvent) {
        let stream = event.stream();
        if !self.session.apply(event) {
            return;
        }
        if self.session.active_stream() != Some(stream) {
            // finalized
            self.active = None;
        }
    }

    /// Check if Ctrl+C hint should be shown
    pub fn show_ctrl_c_hint(&self) -> bool {
        self.last_ctrl_c
            .map(|t| t.elapsed() < Duration::from_millis(500))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotchat_core::config::{FragmentMode, LlmConfig};
    use dotchat_core::{MockStreamer, Participant, SessionState};

    fn app() -> (App, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = ChatSession::new(Participant::new("You", ""), Participant::new("Bot", ""));
        let streamer = MockStreamer::new("Hello there", FragmentMode::Chars, Duration::from_millis(50));
        let app = App::new(
            session,
            Responder::Mock(streamer),
            ModelSelection::new(None),
            tx,
        );
        (app, rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_app_new() {
        let (app, _rx) = app();
        assert_eq!(app.mode, Mode::Chat);
        assert_eq!(app.model_label(), "gpt-4");
        assert!(app.fatal.is_none());
    }

    #[test]
    fn test_throbber_cycles() {
        let (mut app, _rx) = app();
        let first = app.throbber_char();
        for _ in 0..8 {
            app.tick();
        }
        assert_eq!(app.throbber_char(), first);
    }

    #[test]
    fn test_enter_submits() {
        let (mut app, _rx) = app();
        type_text(&mut app, "hi");
        let action = app.handle_key(key(KeyCode::Enter));

        match action {
            Some(Action::Respond { text, .. }) => assert_eq!(text, "hi"),
            other => panic!("expected Respond, got {other:?}"),
        }
        assert!(app.input.is_empty());
        assert_eq!(app.session.messages().len(), 1);
        assert_eq!(app.session.state(), SessionState::AwaitingResponse);
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let (mut app, _rx) = app();
        type_text(&mut app, "   ");
        assert!(app.handle_key(key(KeyCode::Enter)).is_none());
        assert!(app.session.messages().is_empty());
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let (mut app, _rx) = app();
        type_text(&mut app, "a");
        let action = app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        assert!(action.is_none());
        type_text(&mut app, "b");
        assert_eq!(app.input.lines(), ["a", "b"]);

        match app.handle_key(key(KeyCode::Enter)) {
            Some(Action::Respond { text, .. }) => assert_eq!(text, "a\nb"),
            other => panic!("expected Respond, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_while_busy_sets_notice() {
        let (mut app, _rx) = app();
        type_text(&mut app, "one");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "two");
        assert!(app.handle_key(key(KeyCode::Enter)).is_none());
        assert!(app.notice.is_some());
        assert_eq!(app.input.lines(), ["two"]);
    }

    #[test]
    fn test_ctrl_o_opens_picker_and_enter_selects() {
        let (mut app, _rx) = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        assert_eq!(app.mode, Mode::Picker);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Chat);
        assert_eq!(app.models.selected().id, "claude-2");
        assert_eq!(app.model_label(), "claude-2");
    }

    #[test]
    fn test_picker_esc_keeps_selection() {
        let (mut app, _rx) = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Chat);
        assert_eq!(app.models.selected().id, "gpt-4");
    }

    #[test]
    fn test_picker_index_clamped() {
        let (mut app, _rx) = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.picker_index, 0);
        for _ in 0..20 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.picker_index, app.models.models().len() - 1);
    }

    #[test]
    fn test_ctrl_q_quits() {
        let (mut app, _rx) = app();
        let action = app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_fatal_ignores_input_but_allows_quit() {
        let (app, _rx) = app();
        let mut app = app.with_fatal("Missing required environment variable: OPENAI_API_KEY");
        type_text(&mut app, "hi");
        assert!(app.handle_key(key(KeyCode::Enter)).is_none());
        assert!(app.session.messages().is_empty());
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_response_completes() {
        let (mut app, mut rx) = app();
        type_text(&mut app, "hi");
        let Some(Action::Respond { stream, text }) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected Respond");
        };
        app.start_response(stream, text);
        assert!(app.has_active_task());

        while let Some(event) = rx.recv().await {
            app.handle_stream_event(event);
            if !app.has_active_task() {
                break;
            }
        }
        assert_eq!(app.session.messages()[1].content, "Hello there");
        assert_eq!(app.session.state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_esc_stops_mid_stream() {
        let (mut app, mut rx) = app();
        type_text(&mut app, "hi");
        let Some(Action::Respond { stream, text }) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected Respond");
        };
        app.start_response(stream, text);

        for _ in 0..5 {
            let event = rx.recv().await.unwrap();
            app.handle_stream_event(event);
        }
        assert_eq!(app.session.buffer(), "Hello");

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.has_active_task());
        assert_eq!(app.session.messages()[1].content, "Hello");

        // a second Esc is a no-op
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.session.messages().len(), 2);

        tokio::time::sleep(Duration::from_secs(1)).await;
        while let Ok(event) = rx.try_recv() {
            app.handle_stream_event(event);
        }
        assert_eq!(app.session.messages().len(), 2);
    }

    #[test]
    fn test_live_model_label_uses_agent() {
        use dotchat_core::{AgentService, DevnetKit, OpenAiChat};
        use std::sync::Arc;

        let llm = LlmConfig::default();
        let model = OpenAiChat::from_config(&llm, "sk-test").unwrap();
        let kit = DevnetKit::new(vec!["westend".to_string()], "//Alice");
        let agent = Arc::new(AgentService::new(Arc::new(model), Arc::new(kit), &llm));

        let (tx, _rx) = mpsc::unbounded_channel();
        let session = ChatSession::new(Participant::new("You", ""), Participant::new("Bot", ""));
        let mut app = App::new(
            session,
            Responder::Live(agent.clone()),
            ModelSelection::new(None),
            tx,
        );
        assert_eq!(app.responder.label(), "devnet");

        app.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(agent.model_id(), "gpt-3.5-turbo");
        assert_eq!(app.model_label(), "gpt-3.5-turbo");
    }
}
