// ABOUTME: Typed catalog of the on-chain tools the model may call
// ABOUTME: Wire-name normalization, JSON schemas, argument parsing, and tool content decoding

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Shown when a tool's content carries neither `message` nor `content`
pub const NO_TOOL_MESSAGE: &str = "No message from tool.";

/// Every tool the agent knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    TransferToken,
    GetNativeBalance,
    CheckProxies,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [
        ToolKind::TransferToken,
        ToolKind::GetNativeBalance,
        ToolKind::CheckProxies,
    ];

    /// Name used in the LLM's tool-calling convention (snake_case)
    pub fn wire_name(self) -> &'static str {
        match self {
            ToolKind::TransferToken => "transfer_token",
            ToolKind::GetNativeBalance => "get_native_balance",
            ToolKind::CheckProxies => "check_proxies",
        }
    }

    /// Key in the agent kit's tool registry (camelCase)
    pub fn registry_key(self) -> &'static str {
        match self {
            ToolKind::TransferToken => "transferToken",
            ToolKind::GetNativeBalance => "getNativeBalance",
            ToolKind::CheckProxies => "checkProxies",
        }
    }

    /// Resolve a model-supplied tool name. Accepts either convention.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        let key = snake_to_camel(name.trim());
        Self::ALL.into_iter().find(|kind| kind.registry_key() == key)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::TransferToken => {
                "Transfer native tokens from the agent's account to an address on a destination chain using XCM."
            }
            ToolKind::GetNativeBalance => {
                "Get the native token balance of the agent's account on a chain."
            }
            ToolKind::CheckProxies => {
                "List the proxy accounts registered for the agent's account on a chain."
            }
        }
    }

    /// JSON schema of the arguments object
    pub fn parameters(self) -> Value {
        match self {
            ToolKind::TransferToken => json!({
                "type": "object",
                "properties": {
                    "amount": {
                        "type": "string",
                        "description": "Amount of tokens to transfer, in whole tokens (e.g. \"1\" or \"0.5\")"
                    },
                    "to_chain": {
                        "type": "string",
                        "description": "Destination chain name (e.g. westend, westend_asset_hub)"
                    },
                    "address": {
                        "type": "string",
                        "description": "SS58 address that receives the tokens"
                    }
                },
                "required": ["amount", "to_chain", "address"]
            }),
            ToolKind::GetNativeBalance | ToolKind::CheckProxies => json!({
                "type": "object",
                "properties": {
                    "chain": {
                        "type": "string",
                        "description": "Chain name; the first configured chain is used when omitted"
                    }
                }
            }),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.wire_name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// `check_proxies` -> `checkProxies`. Only an underscore followed by a
/// lowercase ASCII letter is folded; anything else is kept as-is.
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// A tool offered to the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool call requested by the model, as it was spelled on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A fully parsed tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentTool {
    TransferToken {
        amount: String,
        to_chain: String,
        address: String,
    },
    GetNativeBalance {
        chain: Option<String>,
    },
    CheckProxies {
        chain: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

#[derive(Deserialize)]
struct TransferArgs {
    amount: NumberOrString,
    #[serde(alias = "toChain", alias = "chain")]
    to_chain: String,
    #[serde(alias = "to", alias = "recipient")]
    address: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ChainArgs {
    chain: Option<String>,
}

impl AgentTool {
    pub fn kind(&self) -> ToolKind {
        match self {
            AgentTool::TransferToken { .. } => ToolKind::TransferToken,
            AgentTool::GetNativeBalance { .. } => ToolKind::GetNativeBalance,
            AgentTool::CheckProxies { .. } => ToolKind::CheckProxies,
        }
    }

    /// Parse the model's arguments for `kind`. A null or missing object counts as `{}`.
    pub fn parse(kind: ToolKind, arguments: &Value) -> Result<Self, ToolError> {
        let arguments = match arguments {
            Value::Null => json!({}),
            other => other.clone(),
        };
        let invalid = |e: serde_json::Error| ToolError::InvalidArguments {
            tool: kind.wire_name(),
            reason: e.to_string(),
        };

        match kind {
            ToolKind::TransferToken => {
                let args: TransferArgs = serde_json::from_value(arguments).map_err(invalid)?;
                let amount = match args.amount {
                    NumberOrString::Number(n) => n.to_string(),
                    NumberOrString::String(s) => s.trim().to_string(),
                };
                Ok(AgentTool::TransferToken {
                    amount,
                    to_chain: args.to_chain.trim().to_string(),
                    address: args.address.trim().to_string(),
                })
            }
            ToolKind::GetNativeBalance => {
                let args: ChainArgs = serde_json::from_value(arguments).map_err(invalid)?;
                Ok(AgentTool::GetNativeBalance {
                    chain: non_blank(args.chain),
                })
            }
            ToolKind::CheckProxies => {
                let args: ChainArgs = serde_json::from_value(arguments).map_err(invalid)?;
                Ok(AgentTool::CheckProxies {
                    chain: non_blank(args.chain),
                })
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// What a tool invocation hands back: JSON text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolContent {
    pub content: String,
}

impl ToolContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Content of the form `{"message": text}`
    pub fn message(text: impl Into<String>) -> Self {
        Self::new(json!({ "message": text.into() }).to_string())
    }

    /// True when the tool produced nothing; such results add no line to the reply
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Human-readable text: the `message` field, else `content`, else a fixed fallback.
    /// Empty strings, `null`, `false` and `0` count as missing.
    /// Empty content is treated as `{}`; anything that is not JSON is a decode error.
    pub fn display_text(&self) -> Result<String, ToolError> {
        let raw = if self.content.trim().is_empty() {
            "{}"
        } else {
            self.content.as_str()
        };
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ToolError::Decode(e.to_string()))?;

        let text = ["message", "content"]
            .iter()
            .find_map(|key| value.get(*key).and_then(field_text));
        Ok(text.unwrap_or_else(|| NO_TOOL_MESSAGE.to_string()))
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null | Value::String(_) | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
