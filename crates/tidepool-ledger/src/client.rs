// crates/tidepool-ledger/src/client.rs
//
// Lightweight eth_call client that POSTs JSON-RPC to the ledger endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use tidepool_core::{ContributionLedger, PoolError};

use crate::abi;

/// Upper bound on a single ledger read.
const RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the pool ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of the chain node.
    pub rpc_url: String,
    /// Address of the pool contract.
    pub contract_address: String,
}

/// JSON-RPC request envelope for `eth_call`.
#[derive(Debug, Clone, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u32,
    method: &'static str,
    params: Value,
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<Value>,
}

/// Read-only client over the pool contract.
///
/// Holds its full configuration; no ambient settings are consulted. Each
/// trait call issues exactly one `eth_call` and decodes the result, so
/// callers control how often a fact is fetched.
pub struct PoolLedgerClient {
    client: reqwest::Client,
    config: LedgerConfig,
}

impl PoolLedgerClient {
    pub fn new(config: LedgerConfig) -> Result<Self, PoolError> {
        if config.rpc_url.is_empty() {
            return Err(PoolError::Ledger("ledger RPC URL is not set".to_string()));
        }
        if config.contract_address.is_empty() {
            return Err(PoolError::Ledger(
                "pool contract address is not set".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .map_err(|e| PoolError::Ledger(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Issue one `eth_call` against the pool contract with the given data
    /// field and return the raw hex result.
    async fn eth_call(&self, data: String) -> Result<String, PoolError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_call",
            params: json!([
                { "to": self.config.contract_address, "data": data },
                "latest"
            ]),
        };

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PoolError::Ledger(e.to_string()))?;

        let rpc_response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| PoolError::Ledger(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            return Err(PoolError::Ledger(format!("eth_call failed: {}", error)));
        }
        rpc_response
            .result
            .ok_or_else(|| PoolError::Ledger("eth_call returned no result".to_string()))
    }
}

#[async_trait]
impl ContributionLedger for PoolLedgerClient {
    async fn contribution_count(&self, address: &str) -> Result<u64, PoolError> {
        let data = abi::encode_address_call(abi::CONTRIBUTOR_INFO_SELECTOR, address)?;
        let result = self.eth_call(data).await?;
        // contributorInfo returns (address, filesListCount).
        let count = abi::decode_word_u64(&result, 1)?;
        debug!(address, count, "fetched contributor file count");
        Ok(count)
    }

    async fn is_content_unique(
        &self,
        identity_ref: &str,
        handle: &str,
    ) -> Result<bool, PoolError> {
        let digest = abi::content_digest(identity_ref, handle);
        let data = abi::encode_bytes32_call(abi::CONTENT_REGISTERED_SELECTOR, &digest);
        let result = self.eth_call(data).await?;
        let registered = abi::decode_word_bool(&result, 0)?;
        debug!(handle, registered, "checked content registration");
        Ok(!registered)
    }
}

/// Stand-in used when the ledger is not configured for a run.
///
/// Every read fails, which the scoring layer converts into its
/// conservative defaults — the run proceeds as if the contributor were
/// first-time and content uniqueness were unknown.
pub struct UnconfiguredLedger;

#[async_trait]
impl ContributionLedger for UnconfiguredLedger {
    async fn contribution_count(&self, _address: &str) -> Result<u64, PoolError> {
        Err(PoolError::Ledger("ledger is not configured".to_string()))
    }

    async fn is_content_unique(
        &self,
        _identity_ref: &str,
        _handle: &str,
    ) -> Result<bool, PoolError> {
        Err(PoolError::Ledger("ledger is not configured".to_string()))
    }
}
