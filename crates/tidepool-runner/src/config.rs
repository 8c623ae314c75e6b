// crates/tidepool-runner/src/config.rs
//
// Runtime configuration for a proof run. Read once from the environment at
// startup and materialized into an explicit value that is handed to each
// component constructor; nothing downstream reads ambient state.

use std::env;

use tidepool_core::PoolError;
use tidepool_identity::DEFAULT_USERINFO_ENDPOINT;

/// Configuration for one proof run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory of candidate data files.
    pub input_dir: String,
    /// Directory the proof record is written to.
    pub output_dir: String,
    /// Userinfo endpoint of the identity provider.
    pub identity_endpoint: String,
    /// Bearer credential for the identity provider. Empty means no
    /// identity verification for this run.
    pub identity_credential: String,
    /// JSON-RPC endpoint of the ledger node. Empty disables ledger reads.
    pub rpc_url: String,
    /// Address of the pool contract.
    pub contract_address: String,
    /// Contributor address for the prior-contribution count.
    pub owner_address: Option<String>,
    /// Whether the submission arrived through the trusted upload channel.
    pub trusted_channel: bool,
    /// Identifier of the target data pool.
    pub pool_id: u64,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl RunnerConfig {
    /// Load the configuration from environment variables, with defaults
    /// matching the container contract (`/input`, `/output`).
    pub fn from_env() -> Result<Self, PoolError> {
        let owner_address = env::var("OWNER_ADDRESS").ok().filter(|s| !s.is_empty());
        let pool_id = match env::var("POOL_ID") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| PoolError::Config(format!("POOL_ID is not an integer: {}", e)))?,
            Err(_) => 0,
        };

        Ok(Self {
            input_dir: env_or("INPUT_DIR", "/input"),
            output_dir: env_or("OUTPUT_DIR", "/output"),
            identity_endpoint: env_or("IDENTITY_ENDPOINT", DEFAULT_USERINFO_ENDPOINT),
            identity_credential: env_or("IDENTITY_TOKEN", ""),
            rpc_url: env_or("LEDGER_RPC_URL", ""),
            contract_address: env_or("POOL_CONTRACT_ADDRESS", ""),
            owner_address,
            trusted_channel: env_or("UPLOAD_CHANNEL", "manual") == "trusted",
            pool_id,
        })
    }
}
