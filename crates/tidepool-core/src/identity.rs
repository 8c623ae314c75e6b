// crates/tidepool-core/src/identity.rs

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A verified identity resolved from the external identity provider.
///
/// Fetched at most once per run; shared read-only across every file the run
/// processes. Absence of a record means "no verified identity for this run",
/// which is a first-class outcome rather than a fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Stable identity id assigned by the provider.
    pub id: String,
    /// Email address on the provider account.
    pub email: String,
    /// Display name on the provider account.
    pub name: String,
    /// Whether the provider has verified the email address.
    pub email_verified: bool,
}

impl IdentityRecord {
    /// SHA-256 hex digest of the stable id.
    ///
    /// Written to proof metadata so the ledger can correlate contributions
    /// from the same account without exposing the raw provider id.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hex::encode(hasher.finalize())
    }
}
