// crates/tidepool-core/src/traits.rs

use async_trait::async_trait;

use crate::error::PoolError;
use crate::identity::IdentityRecord;

/// Trait for resolving a bearer credential to a verified identity.
///
/// Implemented by tidepool-identity (HTTP userinfo backend).
///
/// The two failure shapes are deliberately distinct so callers can weight
/// them differently:
/// - `Ok(None)`: the provider answered and there is no verified identity
///   (missing credential, rejected token, incomplete response body).
/// - `Err(_)`: the check itself failed (transport error, timeout).
///
/// The orchestrator invokes this once per run, never once per file.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the configured credential to an identity record, or absent.
    async fn resolve(&self) -> Result<Option<IdentityRecord>, PoolError>;
}

/// Trait for read-only queries against the contribution ledger.
///
/// Implemented by tidepool-ledger (`eth_call` JSON-RPC backend).
///
/// Both operations return `Err` on failure; the scoring layer owns the
/// conservative-default policy (failure to count prior contributions is
/// treated as "first-time contributor", a failed uniqueness check maps to
/// partial credit, never full credit or rejection).
#[async_trait]
pub trait ContributionLedger: Send + Sync {
    /// Number of files the given address has already contributed.
    async fn contribution_count(&self, address: &str) -> Result<u64, PoolError>;

    /// Whether the (identity reference, handle) pair is new to the pool.
    /// `Ok(false)` means a matching contribution is already registered.
    async fn is_content_unique(
        &self,
        identity_ref: &str,
        handle: &str,
    ) -> Result<bool, PoolError>;
}
