// crates/tidepool-identity/src/provider.rs
//
// HTTP userinfo client. One outbound GET per run at most, bounded by a
// client-level timeout so the run cannot hang on the provider.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use tidepool_core::{IdentityProvider, IdentityRecord, PoolError};

/// Default userinfo endpoint of the identity provider.
pub const DEFAULT_USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Upper bound on the userinfo call.
const USERINFO_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity provider backed by an OAuth-style userinfo endpoint.
///
/// Constructed with its full configuration; it never reads ambient state.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    endpoint: String,
    credential: String,
}

impl HttpIdentityProvider {
    pub fn new(
        endpoint: impl Into<String>,
        credential: impl Into<String>,
    ) -> Result<Self, PoolError> {
        let client = reqwest::Client::builder()
            .timeout(USERINFO_TIMEOUT)
            .build()
            .map_err(|e| PoolError::Identity(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credential: credential.into(),
        })
    }
}

/// Map a userinfo response body to an identity record.
///
/// Every field matters for attribution, so absence of any of the id, email,
/// display name, or email-verified flag yields absent rather than a partial
/// record.
fn parse_userinfo(body: &Value) -> Option<IdentityRecord> {
    let obj = body.as_object()?;
    Some(IdentityRecord {
        id: obj.get("id")?.as_str()?.to_string(),
        email: obj.get("email")?.as_str()?.to_string(),
        name: obj.get("name")?.as_str()?.to_string(),
        email_verified: obj.get("verified_email")?.as_bool()?,
    })
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve(&self) -> Result<Option<IdentityRecord>, PoolError> {
        if self.credential.is_empty() {
            debug!("no identity credential configured, skipping userinfo call");
            return Ok(None);
        }
        // Test credentials are never sent to the real provider.
        if self.credential.starts_with("test_") {
            warn!("refusing to resolve a test credential");
            return Ok(None);
        }

        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.credential)
            .send()
            .await
            .map_err(|e| PoolError::Identity(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "identity provider rejected the credential");
            return Ok(None);
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("identity provider returned a malformed body: {}", e);
                return Ok(None);
            }
        };

        match parse_userinfo(&body) {
            Some(record) => {
                debug!("resolved verified identity {}", record.digest());
                Ok(Some(record))
            }
            None => {
                warn!("identity provider response is missing required fields");
                Ok(None)
            }
        }
    }
}
