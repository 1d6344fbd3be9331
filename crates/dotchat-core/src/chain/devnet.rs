// ABOUTME: In-process development chain kit with a small balance and proxy ledger
// ABOUTME: Lets the agent run every tool offline; signer comes from a //Name dev key

use super::units::Token;
use super::ChainKit;
use crate::error::{InitError, ToolError};
use crate::tools::{ToolContent, ToolKind};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Well-known development accounts
const DEV_ACCOUNTS: &[(&str, &str)] = &[
    ("alice", "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
    ("bob", "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty"),
    ("charlie", "5FLSigC9HGRKVhB9FiEo4Y3koPsNmBmLJbpXg2mp1hXcS59Y"),
    ("dave", "5DAAnrj7VHTznn2AWBemMuyBwZWs6FNFjdyVXUeYum3PTXFy"),
    ("eve", "5HGjWAeFDfFCWPsjFQdVV2Msvz2XtMktvgocEZcCj68kUMaw"),
    ("ferdie", "5CiPPseXPECbkjWCa6MnjNokrgYjMqmKndv2rSnekmSK2DjL"),
];

const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Balance every signer starts with on every chain: 100 tokens at 12 decimals
const STARTING_BALANCE: u128 = 100_000_000_000_000;

/// Address of a development account by name (case-insensitive)
pub fn dev_account(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    DEV_ACCOUNTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, address)| *address)
}

fn looks_like_address(address: &str) -> bool {
    (46..=48).contains(&address.len()) && address.chars().all(|c| BASE58.contains(c))
}

/// A proxy registered for an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub delegate: String,
    pub proxy_type: String,
    pub delay: u32,
}

#[derive(Default)]
struct Ledger {
    balances: HashMap<(String, String), u128>,
    proxies: HashMap<(String, String), Vec<Proxy>>,
}

/// Chain kit backed by an in-memory ledger
pub struct DevnetKit {
    chains: Vec<String>,
    account: String,
    token: Token,
    ledger: Mutex<Ledger>,
    connected: AtomicBool,
}

impl DevnetKit {
    /// `signing_key` of the form `//Name` selects that development account;
    /// anything else acts as Alice.
    pub fn new(chains: Vec<String>, signing_key: &str) -> Self {
        let account = signing_key
            .strip_prefix("//")
            .and_then(dev_account)
            .or_else(|| dev_account("alice"))
            .unwrap_or_default()
            .to_string();

        Self {
            chains,
            account,
            token: Token::westend(),
            ledger: Mutex::new(Ledger::default()),
            connected: AtomicBool::new(false),
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// Seed a balance in planck
    pub fn with_balance(mut self, chain: &str, account: &str, planck: u128) -> Self {
        self.ledger
            .get_mut()
            .balances
            .insert((chain.to_string(), account.to_string()), planck);
        self
    }

    /// Register a proxy for the kit's own account
    pub fn with_proxy(mut self, chain: &str, proxy: Proxy) -> Self {
        let key = (chain.to_string(), self.account.clone());
        self.ledger.get_mut().proxies.entry(key).or_default().push(proxy);
        self
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Current balance in planck
    pub async fn balance_of(&self, chain: &str, account: &str) -> u128 {
        let ledger = self.ledger.lock().await;
        ledger
            .balances
            .get(&(chain.to_string(), account.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn resolve_chain<'a>(&'a self, chain: Option<&'a str>) -> Result<&'a str, ToolError> {
        match chain {
            Some(name) => self
                .chains
                .iter()
                .find(|c| c.eq_ignore_ascii_case(name))
                .map(String::as_str)
                .ok_or_else(|| ToolError::UnknownChain(name.to_string())),
            None => self
                .chains
                .first()
                .map(String::as_str)
                .ok_or_else(|| ToolError::UnknownChain("<none configured>".to_string())),
        }
    }
}

#[async_trait]
impl ChainKit for DevnetKit {
    fn name(&self) -> &'static str {
        "devnet"
    }

    async fn initialize(&self) -> Result<Vec<ToolKind>, InitError> {
        if self.chains.is_empty() {
            return Err(InitError::Chain("devnet kit has no chains".into()));
        }
        if !looks_like_address(&self.account) {
            return Err(InitError::Chain(format!(
                "'{}' is not a valid account address",
                self.account
            )));
        }

        let mut ledger = self.ledger.lock().await;
        for chain in &self.chains {
            ledger
                .balances
                .entry((chain.clone(), self.account.clone()))
                .or_insert(STARTING_BALANCE);
        }
        drop(ledger);

        self.connected.store(true, Ordering::SeqCst);
        tracing::info!(account = %self.account, chains = self.chains.len(), "Devnet kit initialized");
        Ok(ToolKind::ALL.to_vec())
    }

    async fn native_balance(&self, chain: Option<&str>) -> Result<ToolContent, ToolError> {
        let chain = self.resolve_chain(chain)?;
        let planck = self.balance_of(chain, &self.account).await;
        let formatted = self.token.format(planck);
        tracing::debug!(%chain, planck = %planck, "Balance queried");

        Ok(ToolContent::new(
            json!({
                "message": format!("Balance on {chain}: {formatted}"),
                "data": {
                    "chain": chain,
                    "account": self.account,
                    "free": planck.to_string(),
                    "symbol": self.token.symbol,
                }
            })
            .to_string(),
        ))
    }

    async fn transfer(
        &self,
        amount: &str,
        to_chain: &str,
        address: &str,
    ) -> Result<ToolContent, ToolError> {
        let source = self.resolve_chain(None)?;
        let destination = self.resolve_chain(Some(to_chain))?;
        if !looks_like_address(address) {
            return Err(ToolError::InvalidArguments {
                tool: "transfer_token",
                reason: format!("'{address}' is not a valid SS58 address"),
            });
        }
        let planck = self.token.parse(amount)?;

        let mut ledger = self.ledger.lock().await;
        let from_key = (source.to_string(), self.account.clone());
        let available = ledger.balances.get(&from_key).copied().unwrap_or(0);
        if available < planck {
            return Err(ToolError::InsufficientFunds {
                available: self.token.format(available),
                requested: self.token.format(planck),
            });
        }
        ledger.balances.insert(from_key, available - planck);
        *ledger
            .balances
            .entry((destination.to_string(), address.to_string()))
            .or_insert(0) += planck;
        drop(ledger);

        let formatted = self.token.format(planck);
        let route = if source == destination {
            format!("on {destination}")
        } else {
            format!("from {source} to {destination} via XCM")
        };
        tracing::info!(%source, %destination, %address, planck = %planck, "Transfer executed");

        Ok(ToolContent::new(
            json!({
                "message": format!("Transferred {formatted} to {address} {route}"),
                "data": {
                    "from": self.account,
                    "to": address,
                    "source_chain": source,
                    "destination_chain": destination,
                    "amount": planck.to_string(),
                }
            })
            .to_string(),
        ))
    }

    async fn proxies(&self, chain: Option<&str>) -> Result<ToolContent, ToolError> {
        let chain = self.resolve_chain(chain)?;
        let ledger = self.ledger.lock().await;
        let proxies = ledger
            .proxies
            .get(&(chain.to_string(), self.account.clone()))
            .cloned()
            .unwrap_or_default();
        drop(ledger);

        let message = if proxies.is_empty() {
            format!("No proxies found for {} on {chain}.", self.account)
        } else {
            let list = proxies
                .iter()
                .map(|p| format!("{} ({}, delay {})", p.delegate, p.proxy_type, p.delay))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Proxies for {} on {chain}: {list}", self.account)
        };

        Ok(ToolContent::message(message))
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            tracing::info!("Devnet kit disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "5CSox4ZSN4SGLKUG9NYPtfVK9sByXLtxP4hmoF4UgkM4jgDJ";

    fn chains() -> Vec<String> {
        vec!["westend".to_string(), "westend_asset_hub".to_string()]
    }

    async fn kit() -> DevnetKit {
        let kit = DevnetKit::new(chains(), "//Alice");
        kit.initialize().await.unwrap();
        kit
    }

    #[test]
    fn test_dev_account_lookup() {
        assert_eq!(
            dev_account("Bob"),
            Some("5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty")
        );
        assert!(dev_account("mallory").is_none());
    }

    #[test]
    fn test_signer_from_dev_key() {
        let kit = DevnetKit::new(chains(), "//Charlie");
        assert_eq!(kit.account(), dev_account("charlie").unwrap());
    }

    #[test]
    fn test_opaque_key_acts_as_alice() {
        let kit = DevnetKit::new(chains(), "0xdeadbeef");
        assert_eq!(kit.account(), dev_account("alice").unwrap());
    }

    #[tokio::test]
    async fn test_initialize_reports_all_tools() {
        let kit = DevnetKit::new(chains(), "//Alice");
        let tools = kit.initialize().await.unwrap();
        assert_eq!(tools, ToolKind::ALL.to_vec());
        assert!(kit.is_connected());
    }

    #[tokio::test]
    async fn test_initialize_rejects_bad_account() {
        let kit = DevnetKit::new(chains(), "//Alice").with_account("not-an-address");
        assert!(kit.initialize().await.is_err());
    }

    #[tokio::test]
    async fn test_balance_defaults_to_first_chain() {
        let kit = kit().await;
        let text = kit.native_balance(None).await.unwrap().display_text().unwrap();
        assert_eq!(text, "Balance on westend: 100 WND");
    }

    #[tokio::test]
    async fn test_seeded_balance_survives_initialize() {
        let account = dev_account("alice").unwrap();
        let kit = DevnetKit::new(chains(), "//Alice").with_balance(
            "westend",
            account,
            12_500_000_000_000,
        );
        kit.initialize().await.unwrap();
        let text = kit
            .native_balance(Some("Westend"))
            .await
            .unwrap()
            .display_text()
            .unwrap();
        assert_eq!(text, "Balance on westend: 12.5 WND");
    }

    #[tokio::test]
    async fn test_unknown_chain() {
        let kit = kit().await;
        let err = kit.native_balance(Some("kusama")).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownChain(c) if c == "kusama"));
    }

    #[tokio::test]
    async fn test_transfer_moves_funds() {
        let kit = kit().await;
        let content = kit
            .transfer("1", "westend_asset_hub", RECIPIENT)
            .await
            .unwrap();
        let text = content.display_text().unwrap();
        assert!(text.contains("Transferred 1 WND"));
        assert!(text.contains("via XCM"));

        assert_eq!(
            kit.balance_of("westend", kit.account()).await,
            99_000_000_000_000
        );
        assert_eq!(
            kit.balance_of("westend_asset_hub", RECIPIENT).await,
            1_000_000_000_000
        );
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds() {
        let kit = kit().await;
        let err = kit.transfer("1000", "westend", RECIPIENT).await.unwrap_err();
        assert!(matches!(err, ToolError::InsufficientFunds { .. }));
        assert_eq!(
            kit.balance_of("westend", kit.account()).await,
            STARTING_BALANCE
        );
    }

    #[tokio::test]
    async fn test_transfer_rejects_bad_address() {
        let kit = kit().await;
        let err = kit.transfer("1", "westend", "0xnope").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn test_proxies_empty_and_listed() {
        let kit = kit().await;
        let text = kit.proxies(None).await.unwrap().display_text().unwrap();
        assert!(text.starts_with("No proxies found"));

        let kit = DevnetKit::new(chains(), "//Alice").with_proxy(
            "westend_asset_hub",
            Proxy {
                delegate: RECIPIENT.to_string(),
                proxy_type: "Any".to_string(),
                delay: 0,
            },
        );
        kit.initialize().await.unwrap();
        let text = kit
            .proxies(Some("westend_asset_hub"))
            .await
            .unwrap()
            .display_text()
            .unwrap();
        assert!(text.contains(RECIPIENT));
        assert!(text.contains("Any"));
    }

    #[tokio::test]
    async fn test_disconnect_twice() {
        let kit = kit().await;
        kit.disconnect().await;
        kit.disconnect().await;
        assert!(!kit.is_connected());
    }
}
