// ABOUTME: ChainKit trait defining how dotchat reaches the blockchain agent kit
// ABOUTME: Implementations: DevnetKit (in-process ledger), SidecarKit (Substrate API Sidecar, read-only)

mod devnet;
mod sidecar;
pub mod units;

pub use devnet::{dev_account, DevnetKit, Proxy};
pub use sidecar::SidecarKit;
pub use units::Token;

use crate::config::{ChainConfig, ChainKind, Credentials};
use crate::error::{InitError, ToolError};
use crate::tools::{AgentTool, ToolContent, ToolKind};
use async_trait::async_trait;
use std::sync::Arc;

/// The on-chain side of the agent. Each operation returns tool content
/// (JSON text) the same way the agent kit's tools do.
#[async_trait]
pub trait ChainKit: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Connect and report which tools this kit can run
    async fn initialize(&self) -> Result<Vec<ToolKind>, InitError>;

    /// Native balance of the kit's account on `chain` (first known chain when `None`)
    async fn native_balance(&self, chain: Option<&str>) -> Result<ToolContent, ToolError>;

    /// Send `amount` whole tokens to `address` on `to_chain`
    async fn transfer(
        &self,
        amount: &str,
        to_chain: &str,
        address: &str,
    ) -> Result<ToolContent, ToolError>;

    /// Proxies registered for the kit's account on `chain`
    async fn proxies(&self, chain: Option<&str>) -> Result<ToolContent, ToolError>;

    /// Release connections. Must be safe to call more than once.
    async fn disconnect(&self) {}
}

/// Run a parsed tool against a kit
pub async fn invoke(kit: &dyn ChainKit, tool: &AgentTool) -> Result<ToolContent, ToolError> {
    match tool {
        AgentTool::TransferToken {
            amount,
            to_chain,
            address,
        } => kit.transfer(amount, to_chain, address).await,
        AgentTool::GetNativeBalance { chain } => kit.native_balance(chain.as_deref()).await,
        AgentTool::CheckProxies { chain } => kit.proxies(chain.as_deref()).await,
    }
}

/// Build the kit selected by `[chain] kind`
pub fn create_kit(
    config: &ChainConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn ChainKit>, InitError> {
    match config.kind {
        ChainKind::Devnet => {
            tracing::info!(chains = ?config.chains, "Using DevnetKit (in-process ledger)");
            let mut kit = DevnetKit::new(config.chains.clone(), &credentials.signing_key);
            if let Some(account) = &config.account {
                kit = kit.with_account(account.clone());
            }
            Ok(Arc::new(kit))
        }
        ChainKind::Sidecar => {
            let account = config.account.clone().ok_or_else(|| {
                InitError::Config("chain.account is required for the sidecar kit".into())
            })?;
            let chain = config
                .chains
                .first()
                .cloned()
                .ok_or_else(|| InitError::Config("chain.chains is empty".into()))?;
            tracing::info!(url = %config.sidecar_url, %chain, "Using SidecarKit");
            Ok(Arc::new(SidecarKit::new(
                &config.sidecar_url,
                chain,
                account,
                Token::westend(),
            )?))
        }
    }
}
