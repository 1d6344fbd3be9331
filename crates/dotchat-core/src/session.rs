// ABOUTME: Chat session state machine: Idle <-> AwaitingResponse
// ABOUTME: Owns the message list and the streaming buffer; stale stream events are ignored

use crate::config::ProfileConfig;
use crate::error::SubmitRejected;
use crate::stream::StreamEvent;
use crate::types::{Message, Participant};
use std::fmt;

/// Prefix of assistant messages produced from a failed dispatch
pub const ERROR_PREFIX: &str = "Error: ";

/// Identifies the response being produced for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// One conversation as shown by a single view
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<Message>,
    buffer: String,
    is_typing: bool,
    is_streaming: bool,
    state: SessionState,
    active_stream: Option<StreamId>,
    next_stream: u64,
    scroll_pending: bool,
    user: Participant,
    assistant: Participant,
}

impl ChatSession {
    pub fn new(user: Participant, assistant: Participant) -> Self {
        Self {
            messages: Vec::new(),
            buffer: String::new(),
            is_typing: false,
            is_streaming: false,
            state: SessionState::Idle,
            active_stream: None,
            next_stream: 0,
            scroll_pending: false,
            user,
            assistant,
        }
    }

    pub fn from_profile(profile: &ProfileConfig) -> Self {
        let (user, assistant) = Participant::pair_from(profile);
        Self::new(user, assistant)
    }

    /// Start with an existing history. Does not request a scroll.
    pub fn with_history(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn user(&self) -> &Participant {
        &self.user
    }

    pub fn assistant(&self) -> &Participant {
        &self.assistant
    }

    /// Accept a user message and start awaiting a response.
    pub fn submit(&mut self, text: &str) -> Result<StreamId, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.state == SessionState::AwaitingResponse {
            return Err(SubmitRejected::Busy);
        }

        self.messages.push(Message::user(text, &self.user));
        self.scroll_pending = true;
        self.state = SessionState::AwaitingResponse;
        self.is_typing = true;
        self.is_streaming = true;
        self.buffer.clear();

        self.next_stream += 1;
        let stream = StreamId(self.next_stream);
        self.active_stream = Some(stream);
        tracing::debug!(%stream, "Submission accepted");
        Ok(stream)
    }

    /// Append a fragment if `stream` is the active one. Returns whether it was applied.
    pub fn push_fragment(&mut self, stream: StreamId, text: &str) -> bool {
        if self.active_stream != Some(stream) {
            tracing::trace!(%stream, "Dropping fragment from inactive stream");
            return false;
        }
        self.buffer.push_str(text);
        true
    }

    /// Finalize the active stream with its full text.
    pub fn complete(&mut self, stream: StreamId, text: &str) -> Option<&Message> {
        if self.active_stream != Some(stream) {
            return None;
        }
        Some(self.finalize(text.to_string()))
    }

    /// Finalize the active stream with an error message.
    pub fn fail(&mut self, stream: StreamId, error: &str) -> Option<&Message> {
        if self.active_stream != Some(stream) {
            return None;
        }
        tracing::warn!(%stream, %error, "Response failed");
        Some(self.finalize(format!("{ERROR_PREFIX}{error}")))
    }

    /// User-initiated stop: keep whatever was revealed so far.
    /// A second call, or a call while idle, does nothing.
    pub fn stop(&mut self) -> Option<&Message> {
        if self.state != SessionState::AwaitingResponse {
            return None;
        }
        let partial = std::mem::take(&mut self.buffer);
        tracing::debug!(chars = partial.chars().count(), "Response stopped");
        Some(self.finalize(partial))
    }

    /// Route a stream event to `push_fragment`, `complete`, or `fail`.
    /// Returns whether the session changed.
    pub fn apply(&mut self, event: StreamEvent) -> bool {
        match event {
            StreamEvent::Fragment { stream, text } => self.push_fragment(stream, &text),
            StreamEvent::Done { stream, full } => self.complete(stream, &full).is_some(),
            StreamEvent::Failed { stream, error } => self.fail(stream, &error).is_some(),
        }
    }

    fn finalize(&mut self, content: String) -> &Message {
        self.messages
            .push(Message::assistant(content, &self.assistant));
        self.buffer.clear();
        self.active_stream = None;
        self.is_typing = false;
        self.is_streaming = false;
        self.state = SessionState::Idle;
        // push above guarantees a last element
        let last = self.messages.len() - 1;
        &self.messages[last]
    }

    /// True once after each accepted submission
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active_stream(&self) -> Option<StreamId> {
        self.active_stream
    }

    /// Nothing revealed yet: show a typing placeholder instead of the buffer
    pub fn shows_typing_placeholder(&self) -> bool {
        self.is_typing && self.buffer.is_empty()
    }
}
