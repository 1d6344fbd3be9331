// ABOUTME: Message dispatch adapter between the chat view and the agent kit
// ABOUTME: One LLM round-trip with bound tools, then sequential tool invocation

use crate::chain::{self, ChainKit};
use crate::config::{Config, Credentials, LlmConfig};
use crate::error::{DispatchError, InitError};
use crate::llm::{ChatModel, ChatRequest, OpenAiChat};
use crate::tools::{AgentTool, ToolCall, ToolKind};
use std::sync::{Arc, RwLock};
use tokio::sync::OnceCell;

pub const SYSTEM_PROMPT: &str = r#"I am a Web Chat bot powered by PolkadotAgentKit. I can assist you with:
- Transferring tokens between chains using XCM (e.g., "transfer 1 token to westend_asset_hub to 5CSox4ZSN4SGLKUG9NYPtfVK9sByXLtxP4hmoF4UgkM4jgDJ")
- Checking WND balance on Westend (e.g., "check balance")
- Checking proxies (e.g., "check proxies on westend" or "check proxies")

When transferring tokens, please provide:
1. The amount of tokens to transfer (e.g., 1)
2. The name of the destination chain (e.g., westend, westend_asset_hub)
3. The address to receive the tokens (e.g., 5CSox4ZSN4SGLKUG9NYPtfVK9sByXLtxP4hmoF4UgkM4jgDJ)

Suggested syntax: "transfer [amount] token to [chain name] to [address]"

When checking proxies, you can specify the chain (e.g., "check proxies on westend") or
not specify a chain (the first chain will be used by default)

Please provide instructions, and I will assist you!"#;

/// Returned when the model answers with neither text nor tool calls
pub const NO_LLM_RESPONSE: &str = "No response from LLM.";

/// Text shown in place of a tool the kit cannot run
pub fn unavailable_tool(name: &str) -> String {
    format!("Tool '{name}' is not available.")
}

/// Owns the model client and the chain kit. Built once and shared as `Arc<AgentService>`.
pub struct AgentService {
    model: Arc<dyn ChatModel>,
    kit: Arc<dyn ChainKit>,
    model_id: RwLock<String>,
    temperature: f32,
    tools: OnceCell<Vec<ToolKind>>,
}

impl AgentService {
    pub fn new(model: Arc<dyn ChatModel>, kit: Arc<dyn ChainKit>, llm: &LlmConfig) -> Self {
        Self {
            model,
            kit,
            model_id: RwLock::new(llm.model.clone()),
            temperature: llm.temperature,
            tools: OnceCell::new(),
        }
    }

    /// OpenAI client plus the chain kit selected in the config
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self, InitError> {
        let model = OpenAiChat::from_config(&config.llm, &credentials.api_key)?;
        let kit = chain::create_kit(&config.chain, credentials)?;
        Ok(Self::new(Arc::new(model), kit, &config.llm))
    }

    /// Model id sent with every request
    pub fn model_id(&self) -> String {
        match self.model_id.read() {
            Ok(id) => id.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn select_model(&self, id: impl Into<String>) {
        let id = id.into();
        tracing::info!(model = %id, "Model selected");
        match self.model_id.write() {
            Ok(mut guard) => *guard = id,
            Err(poisoned) => *poisoned.into_inner() = id,
        }
    }

    pub fn kit_name(&self) -> &'static str {
        self.kit.name()
    }

    /// Initialize the chain kit once; later calls return the cached tool catalog.
    pub async fn initialize(&self) -> Result<Vec<ToolKind>, InitError> {
        let tools = self
            .tools
            .get_or_try_init(|| async move {
                let tools = self.kit.initialize().await?;
                tracing::info!(kit = self.kit.name(), tools = tools.len(), "Agent initialized");
                Ok::<_, InitError>(tools)
            })
            .await?;
        Ok(tools.clone())
    }

    /// Send one user message and return the assistant's reply text.
    pub async fn dispatch(&self, message: &str) -> Result<String, DispatchError> {
        let tools = self.initialize().await?;

        let request = ChatRequest {
            model: self.model_id(),
            temperature: self.temperature,
            system: SYSTEM_PROMPT.to_string(),
            user: message.to_string(),
            tools: tools.iter().map(|kind| kind.definition()).collect(),
        };
        let response = self.model.complete(request).await?;

        if response.tool_calls.is_empty() {
            return Ok(response
                .content
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| NO_LLM_RESPONSE.to_string()));
        }

        let mut outputs = Vec::with_capacity(response.tool_calls.len());
        for call in &response.tool_calls {
            if let Some(output) = self.run_tool(call, &tools).await? {
                outputs.push(output);
            }
        }
        Ok(outputs.join("\n"))
    }

    /// Run one tool call. `None` when the tool returned no content.
    async fn run_tool(
        &self,
        call: &ToolCall,
        available: &[ToolKind],
    ) -> Result<Option<String>, DispatchError> {
        let Some(kind) = ToolKind::from_wire_name(&call.name).filter(|k| available.contains(k))
        else {
            tracing::warn!(tool = %call.name, call_id = %call.id, "Model requested an unavailable tool");
            return Ok(Some(unavailable_tool(&call.name)));
        };

        let tool = AgentTool::parse(kind, &call.arguments)?;
        tracing::info!(tool = kind.wire_name(), call_id = %call.id, "Invoking tool");
        let content = chain::invoke(self.kit.as_ref(), &tool).await?;
        if content.is_empty() {
            tracing::debug!(tool = kind.wire_name(), call_id = %call.id, "Tool returned no content");
            return Ok(None);
        }
        Ok(Some(content.display_text()?))
    }

    /// Disconnect the chain kit if it was ever initialized
    pub async fn disconnect(&self) {
        if self.tools.initialized() {
            self.kit.disconnect().await;
        }
    }
}
