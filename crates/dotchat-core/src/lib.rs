// ABOUTME: Core library for dotchat - session, streaming, tools, chain kits, agent dispatch
// ABOUTME: Shared by the dotchat terminal UI and its one-shot CLI commands

pub mod agent;
pub mod chain;
pub mod config;
pub mod error;
pub mod llm;
pub mod markdown;
pub mod mock;
pub mod models;
pub mod session;
pub mod stream;
pub mod tools;
pub mod types;

pub use agent::AgentService;
pub use chain::{ChainKit, DevnetKit, SidecarKit};
pub use config::{Config, Credentials};
pub use error::{DispatchError, InitError, LlmError, SubmitRejected, ToolError};
pub use llm::{ChatModel, ChatRequest, ChatResponse, OpenAiChat};
pub use models::{Model, ModelSelection};
pub use session::{ChatSession, SessionState, StreamId, ERROR_PREFIX};
pub use stream::{MockStreamer, StreamEvent, StreamTask};
pub use tools::{AgentTool, ToolCall, ToolContent, ToolKind};
pub use types::{CodeBlock, Message, MessageId, Participant, Role};
