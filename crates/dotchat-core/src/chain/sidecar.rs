// ABOUTME: Read-only chain kit backed by a Substrate API Sidecar instance
// ABOUTME: Balance and proxy queries over HTTP; transfers are rejected

use super::units::Token;
use super::ChainKit;
use crate::error::{InitError, ToolError};
use crate::tools::{ToolContent, ToolKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// GET /node/version
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeVersion {
    #[serde(default)]
    client_impl_name: String,
    #[serde(default)]
    chain: String,
}

/// GET /accounts/{address}/balance-info
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceInfo {
    #[serde(default)]
    token_symbol: Option<String>,
    free: String,
}

/// GET /pallets/proxy/storage/Proxies
#[derive(Deserialize)]
struct ProxyStorage {
    value: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyDefinition {
    delegate: String,
    proxy_type: String,
    #[serde(default)]
    delay: serde_json::Value,
}

/// Chain kit for a single chain served by Sidecar
pub struct SidecarKit {
    client: Client,
    base_url: Url,
    chain: String,
    account: String,
    token: Token,
}

impl SidecarKit {
    pub fn new(
        base_url: &str,
        chain: impl Into<String>,
        account: impl Into<String>,
        token: Token,
    ) -> Result<Self, InitError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| InitError::Config(format!("invalid sidecar url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(InitError::Config(format!(
                "sidecar url '{base_url}' cannot carry a path"
            )));
        }
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url,
            chain: chain.into(),
            account: account.into(),
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sidecar serves exactly one chain
    fn check_chain(&self, chain: Option<&str>) -> Result<(), ToolError> {
        match chain {
            Some(name) if !name.eq_ignore_ascii_case(&self.chain) => {
                Err(ToolError::UnknownChain(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ToolError> {
        tracing::debug!(%url, "Sidecar request");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ToolError::Decode(e.to_string()))
    }
}

fn delay_text(delay: &serde_json::Value) -> String {
    match delay {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "0".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ChainKit for SidecarKit {
    fn name(&self) -> &'static str {
        "sidecar"
    }

    async fn initialize(&self) -> Result<Vec<ToolKind>, InitError> {
        let url = self.endpoint(&["node", "version"]);
        let version: NodeVersion = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::info!(
            node = %version.client_impl_name,
            chain = %version.chain,
            account = %self.account,
            "Connected to sidecar"
        );
        Ok(vec![ToolKind::GetNativeBalance, ToolKind::CheckProxies])
    }

    async fn native_balance(&self, chain: Option<&str>) -> Result<ToolContent, ToolError> {
        self.check_chain(chain)?;
        let info: BalanceInfo = self
            .get(self.endpoint(&["accounts", self.account.as_str(), "balance-info"]))
            .await?;

        let planck: u128 = info
            .free
            .parse()
            .map_err(|_| ToolError::Decode(format!("free balance '{}' is not a number", info.free)))?;
        let mut token = self.token.clone();
        if let Some(symbol) = info.token_symbol {
            token.symbol = symbol;
        }
        let formatted = token.format(planck);

        Ok(ToolContent::new(
            json!({
                "message": format!("Balance on {}: {formatted}", self.chain),
                "data": {
                    "chain": self.chain,
                    "account": self.account,
                    "free": info.free,
                    "symbol": token.symbol,
                }
            })
            .to_string(),
        ))
    }

    async fn transfer(
        &self,
        _amount: &str,
        _to_chain: &str,
        _address: &str,
    ) -> Result<ToolContent, ToolError> {
        Err(ToolError::Unsupported("transfer_token"))
    }

    async fn proxies(&self, chain: Option<&str>) -> Result<ToolContent, ToolError> {
        self.check_chain(chain)?;
        let mut url = self.endpoint(&["pallets", "proxy", "storage", "Proxies"]);
        url.query_pairs_mut().append_pair("keys[]", &self.account);
        let storage: ProxyStorage = self.get(url).await?;

        // value is [[definitions...], deposit]
        let definitions = storage
            .value
            .get(0)
            .cloned()
            .unwrap_or(serde_json::Value::Array(Vec::new()));
        let proxies: Vec<ProxyDefinition> =
            serde_json::from_value(definitions).map_err(|e| ToolError::Decode(e.to_string()))?;

        let message = if proxies.is_empty() {
            format!("No proxies found for {} on {}.", self.account, self.chain)
        } else {
            let list = proxies
                .iter()
                .map(|p| format!("{} ({}, delay {})", p.delegate, p.proxy_type, delay_text(&p.delay)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Proxies for {} on {}: {list}", self.account, self.chain)
        };
        Ok(ToolContent::message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCOUNT: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const DELEGATE: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

    fn kit(server: &MockServer) -> SidecarKit {
        SidecarKit::new(&server.uri(), "westend", ACCOUNT, Token::westend()).unwrap()
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(SidecarKit::new("not a url", "westend", ACCOUNT, Token::westend()).is_err());
    }

    #[tokio::test]
    async fn test_initialize_reports_read_only_tools() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/node/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "clientVersion": "1.0.0",
                "clientImplName": "parity-polkadot",
                "chain": "Westend"
            })))
            .mount(&server)
            .await;

        let tools = kit(&server).initialize().await.unwrap();
        assert_eq!(tools, vec![ToolKind::GetNativeBalance, ToolKind::CheckProxies]);
    }

    #[tokio::test]
    async fn test_initialize_fails_when_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/node/version"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(kit(&server).initialize().await.is_err());
    }

    #[tokio::test]
    async fn test_native_balance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/accounts/{ACCOUNT}/balance-info")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nonce": "3",
                "tokenSymbol": "WND",
                "free": "12500000000000",
                "reserved": "0"
            })))
            .mount(&server)
            .await;

        let text = kit(&server)
            .native_balance(None)
            .await
            .unwrap()
            .display_text()
            .unwrap();
        assert_eq!(text, "Balance on westend: 12.5 WND");
    }

    #[tokio::test]
    async fn test_other_chain_is_unknown() {
        let server = MockServer::start().await;
        let err = kit(&server)
            .native_balance(Some("kusama"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownChain(_)));
    }

    #[tokio::test]
    async fn test_proxies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pallets/proxy/storage/Proxies"))
            .and(query_param("keys[]", ACCOUNT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pallet": "proxy",
                "storageItem": "proxies",
                "value": [
                    [{"delegate": DELEGATE, "proxyType": "Staking", "delay": "0"}],
                    "20000000000"
                ]
            })))
            .mount(&server)
            .await;

        let text = kit(&server)
            .proxies(Some("Westend"))
            .await
            .unwrap()
            .display_text()
            .unwrap();
        assert!(text.contains(DELEGATE));
        assert!(text.contains("Staking, delay 0"));
    }

    #[tokio::test]
    async fn test_no_proxies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pallets/proxy/storage/Proxies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [[], "0"]
            })))
            .mount(&server)
            .await;

        let text = kit(&server)
            .proxies(None)
            .await
            .unwrap()
            .display_text()
            .unwrap();
        assert!(text.starts_with("No proxies found"));
    }

    #[tokio::test]
    async fn test_transfer_unsupported() {
        let server = MockServer::start().await;
        let err = kit(&server)
            .transfer("1", "westend", DELEGATE)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Unsupported("transfer_token")));
    }
}
