// ABOUTME: OpenAI-compatible chat completions client with function tools
// ABOUTME: POSTs {base_url}/chat/completions and maps tool_calls back to ToolCall

use super::{ChatModel, ChatRequest, ChatResponse};
use crate::config::LlmConfig;
use crate::error::{InitError, LlmError};
use crate::tools::{ToolCall, ToolDefinition};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [WireMessage<'a>; 2],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireTool<'a> {
    r#type: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    /// Absent or `null` on plain-text replies
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded arguments object
    #[serde(default)]
    arguments: String,
}

/// Chat completions client
pub struct OpenAiChat {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiChat {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InitError> {
        let mut endpoint = Url::parse(base_url)
            .map_err(|e| InitError::Config(format!("invalid llm.base_url '{base_url}': {e}")))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| InitError::Config(format!("llm.base_url '{base_url}' cannot carry a path")))?
            .pop_if_empty()
            .extend(["chat", "completions"]);

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, InitError> {
        Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn decode_tool_call(call: WireToolCall) -> Result<ToolCall, LlmError> {
    let arguments = if call.function.arguments.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&call.function.arguments).map_err(|e| {
            LlmError::Decode(format!(
                "arguments for tool '{}' are not JSON: {e}",
                call.function.name
            ))
        })?
    };
    Ok(ToolCall::new(call.id, call.function.name, arguments))
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let body = CompletionRequest {
            model: &request.model,
            temperature: request.temperature,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            tools: request
                .tools
                .iter()
                .map(|function| WireTool {
                    r#type: "function",
                    function,
                })
                .collect(),
        };

        tracing::debug!(model = %request.model, tools = request.tools.len(), "Sending chat completion");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Chat completion rejected");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Decode(e.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyChoices)?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(decode_tool_call)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(tool_calls = tool_calls.len(), "Chat completion received");
        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls,
        })
    }
}
