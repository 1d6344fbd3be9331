// ABOUTME: ChatModel trait for tool-calling language models
// ABOUTME: Request/response shapes shared by every model client

mod openai;

pub use openai::OpenAiChat;

use crate::error::LlmError;
use crate::tools::{ToolCall, ToolDefinition};
use async_trait::async_trait;

/// One round-trip to the model: system prompt, a single user turn, bound tools.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub user: String,
    pub tools: Vec<ToolDefinition>,
}

/// What the model answered with. Tool calls take precedence over text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tools(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}
