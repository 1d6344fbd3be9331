// ABOUTME: Error types for dotchat-core.
// ABOUTME: InitError is fatal for the chat view, DispatchError is shown as an assistant message.

use thiserror::Error;

/// Failure to bring up the agent: missing configuration or a client that cannot be built.
/// Fatal for the chat view.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Missing required environment variable: {0}")]
    MissingCredential(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chain initialization failed: {0}")]
    Chain(String),
}

/// Failure talking to the language model.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode LLM response: {0}")]
    Decode(String),

    #[error("LLM response contained no choices")]
    EmptyChoices,
}

/// Failure resolving or running an on-chain tool.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: &'static str, reason: String },

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Insufficient funds: balance {available}, requested {requested}")]
    InsufficientFunds { available: String, requested: String },

    #[error("{0} is not supported by this chain kit")]
    Unsupported(&'static str),

    #[error("Chain request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode tool output: {0}")]
    Decode(String),
}

/// Failure of a single message dispatch. Recoverable: the session stays usable.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Why a submission was not accepted by the session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,

    #[error("a response is still in progress")]
    Busy,
}
