// ABOUTME: Core types for dotchat-tui
// ABOUTME: Screen mode, the response source behind the chat, and key actions

use dotchat_core::session::StreamId;
use dotchat_core::{AgentService, MockStreamer};
use std::sync::Arc;

/// Application mode / screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal chat view
    Chat,
    /// Model selector overlay
    Picker,
}

/// Where assistant responses come from
pub enum Responder {
    /// Canned response revealed fragment by fragment
    Mock(MockStreamer),
    /// Real dispatch through the agent
    Live(Arc<AgentService>),
}

impl Responder {
    pub fn label(&self) -> &'static str {
        match self {
            Responder::Mock(_) => "mock",
            Responder::Live(agent) => agent.kit_name(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Responder::Live(_))
    }
}

/// Actions that need async handling (returned from handle_key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// A submission was accepted; start producing its response
    Respond { stream: StreamId, text: String },
}
