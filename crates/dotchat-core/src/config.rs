// ABOUTME: Configuration loading and management for dotchat
// ABOUTME: TOML config file with sensible defaults plus environment-only credentials

use crate::error::InitError;
use crate::stream::DEFAULT_TICK;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the signing credential for the chain kit.
pub const PRIVATE_KEY_VAR: &str = "DOTCHAT_PRIVATE_KEY";
/// Fallback name for the signing credential.
pub const PRIVATE_KEY_FALLBACK_VAR: &str = "PRIVATE_KEY";
/// Environment variable holding the LLM API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language model settings
    pub llm: LlmConfig,
    /// Chain kit settings
    pub chain: ChainConfig,
    /// Mocked streaming reveal settings
    pub stream: StreamConfig,
    /// Display identities for the two chat participants
    pub profile: ProfileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model id sent with each completion request
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

/// Which chain kit implementation backs the tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    /// In-process ledger, no network
    #[default]
    Devnet,
    /// Substrate API Sidecar over HTTP (read-only)
    Sidecar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub kind: ChainKind,
    /// Sidecar base URL (sidecar kind only)
    pub sidecar_url: String,
    /// Account address queried by the sidecar kit
    pub account: Option<String>,
    /// Known chains; the first one is used when a tool call names none
    pub chains: Vec<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            kind: ChainKind::default(),
            sidecar_url: "http://127.0.0.1:8080".to_string(),
            account: None,
            chains: vec!["westend".to_string(), "westend_asset_hub".to_string()],
        }
    }
}

/// How the canned response is split into fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentMode {
    /// One character per tick
    #[default]
    Chars,
    /// One word (with its trailing whitespace) per tick
    Words,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Delay between fragments in milliseconds
    pub tick_ms: u64,
    pub fragment: FragmentMode,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK.as_millis() as u64,
            fragment: FragmentMode::default(),
        }
    }
}

impl StreamConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub user_name: String,
    pub user_avatar: String,
    pub assistant_name: String,
    pub assistant_avatar: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_name: "You".to_string(),
            user_avatar: "https://github.com/identicons/user.png".to_string(),
            assistant_name: "Agent Kit".to_string(),
            assistant_avatar: "https://github.com/openai.png".to_string(),
        }
    }
}

impl Config {
    /// Get the XDG config directory for dotchat (~/.config/dotchat)
    pub fn config_dir() -> PathBuf {
        // Respect XDG_CONFIG_HOME if set, otherwise use ~/.config
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|p| p.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("."))
            })
            .join("dotchat")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load config from XDG config directory
    pub fn load() -> Result<Self, InitError> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // No config found, use defaults
            Ok(Self::default())
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, InitError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            InitError::Config(format!("Failed to read config from {}: {e}", path.display()))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            InitError::Config(format!("Failed to parse config from {}: {e}", path.display()))
        })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), InitError> {
        if self.chain.chains.is_empty() {
            return Err(InitError::Config("chain.chains must list at least one chain".into()));
        }
        if self.stream.tick_ms == 0 {
            return Err(InitError::Config("stream.tick_ms must be greater than zero".into()));
        }
        if self.chain.kind == ChainKind::Sidecar && self.chain.account.is_none() {
            return Err(InitError::Config(
                "chain.account is required when chain.kind = \"sidecar\"".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default config file content
    pub fn default_toml() -> String {
        r#"# dotchat configuration

[llm]
model = "gpt-4"
base_url = "https://api.openai.com/v1"
temperature = 0.7
timeout_secs = 120

[chain]
# "devnet" keeps an in-process ledger; "sidecar" queries a Substrate API Sidecar
kind = "devnet"
sidecar_url = "http://127.0.0.1:8080"
# account = "5CSox4ZSN4SGLKUG9NYPtfVK9sByXLtxP4hmoF4UgkM4jgDJ"
chains = ["westend", "westend_asset_hub"]

[stream]
tick_ms = 50
fragment = "chars"

[profile]
user_name = "You"
assistant_name = "Agent Kit"
"#
        .to_string()
    }
}

/// The two secrets the agent needs. Only ever read from the environment.
#[derive(Clone)]
pub struct Credentials {
    /// Signing credential handed to the chain kit
    pub signing_key: String,
    /// API key for the language model
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("signing_key", &"[REDACTED]")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, InitError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    /// Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InitError> {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let signing_key = present(PRIVATE_KEY_VAR)
            .or_else(|| present(PRIVATE_KEY_FALLBACK_VAR))
            .ok_or(InitError::MissingCredential(PRIVATE_KEY_VAR))?;
        let api_key = present(API_KEY_VAR).ok_or(InitError::MissingCredential(API_KEY_VAR))?;

        Ok(Self {
            signing_key,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.chain.kind, ChainKind::Devnet);
        assert_eq!(config.chain.chains[0], "westend");
        assert_eq!(config.stream.tick_ms, 50);
        assert_eq!(config.stream.tick(), DEFAULT_TICK);
        assert_eq!(config.stream.fragment, FragmentMode::Chars);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[llm]
model = "gpt-4o-mini"

[stream]
tick_ms = 100
fragment = "words"
"#,
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.stream.tick_ms, 100);
        assert_eq!(config.stream.fragment, FragmentMode::Words);
        assert_eq!(config.profile.assistant_name, "Agent Kit");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sidecar_requires_account() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[chain]\nkind = \"sidecar\"\n").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("chain.account"));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[stream]\ntick_ms = 0\n").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[llm\nmodel = ").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, InitError::Config(_)));
    }

    #[test]
    fn test_credentials_present() {
        let creds = Credentials::from_lookup(lookup(&[
            (PRIVATE_KEY_VAR, "0xabc"),
            (API_KEY_VAR, "sk-test"),
        ]))
        .unwrap();
        assert_eq!(creds.signing_key, "0xabc");
        assert_eq!(creds.api_key, "sk-test");
    }

    #[test]
    fn test_credentials_fallback_name() {
        let creds = Credentials::from_lookup(lookup(&[
            (PRIVATE_KEY_FALLBACK_VAR, "//Alice"),
            (API_KEY_VAR, "sk-test"),
        ]))
        .unwrap();
        assert_eq!(creds.signing_key, "//Alice");
    }

    #[test]
    fn test_credentials_missing_api_key() {
        let err = Credentials::from_lookup(lookup(&[(PRIVATE_KEY_VAR, "0xabc")])).unwrap_err();
        assert!(matches!(err, InitError::MissingCredential(API_KEY_VAR)));
    }

    #[test]
    fn test_credentials_blank_counts_as_missing() {
        let err = Credentials::from_lookup(lookup(&[
            (PRIVATE_KEY_VAR, "   "),
            (API_KEY_VAR, "sk-test"),
        ]))
        .unwrap_err();
        assert!(matches!(err, InitError::MissingCredential(PRIVATE_KEY_VAR)));
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials {
            signing_key: "secret-key".to_string(),
            api_key: "sk-secret".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
