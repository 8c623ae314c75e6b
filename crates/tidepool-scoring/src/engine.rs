// crates/tidepool-scoring/src/engine.rs
//
// The scoring engine: one validated payload in, one FileScore out.
//
// Ledger facts are fetched here, each exactly once per score computation,
// and the fetched value feeds both the sub-score and the published raw
// metric so the two cannot disagree. Conservative defaults on ledger
// failure are applied here, not in the ledger client, so the policy stays
// in one place.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use tidepool_core::{ContributionLedger, ErrorCode, IdentityRecord, InputPayload, ScoreBreakdown};
use tidepool_schema::SchemaMatch;

use crate::checks::{
    passed_fraction, CONSISTENCY_CHECKS, COVERAGE_CHECKS, INTEGRITY_CHECKS,
    PROFILE_COMPLETENESS_CHECKS,
};
use crate::dimensions::{
    self, DUPLICATE_CONTENT_CREDIT, REPEAT_CONTRIBUTOR_CREDIT, UNKNOWN_CONTENT_CREDIT,
};

/// Label written to proof metadata for the identity verification method.
const VERIFICATION_METHOD: &str = "oauth_userinfo";

/// Scoring policy knobs, passed in explicitly at construction.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    /// Contributor address used for the prior-contribution count. When
    /// unset, the user-uniqueness check conservatively assumes a
    /// first-time contributor.
    pub owner_address: Option<String>,
    /// Whether the submission arrived through the trusted upload channel.
    pub trusted_channel: bool,
}

impl ScoringConfig {
    fn upload_channel_label(&self) -> &'static str {
        if self.trusted_channel {
            "trusted_channel"
        } else {
            "manual"
        }
    }
}

/// Everything the scoring engine produces for one file.
#[derive(Debug, Clone)]
pub struct FileScore {
    /// Final aggregate after any identity penalty.
    pub score: f64,
    /// The four clamped sub-scores.
    pub breakdown: ScoreBreakdown,
    /// Whether the missing-identity penalty was applied.
    pub penalized: bool,
    /// Public attributes for the proof record.
    pub attributes: BTreeMap<String, Value>,
    /// Ledger-bound metadata for the proof record.
    pub metadata: BTreeMap<String, Value>,
}

/// Scores one validated payload against identity and ledger facts.
pub struct ScoringEngine {
    ledger: Arc<dyn ContributionLedger>,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(ledger: Arc<dyn ContributionLedger>, config: ScoringConfig) -> Self {
        Self { ledger, config }
    }

    /// Compute the full score for one payload.
    ///
    /// `identity` is the run-level identity record; `schema` is the
    /// classification the orchestrator already performed. The payload is
    /// assumed to have passed structural validation — a mismatch never
    /// reaches the engine.
    pub async fn score(
        &self,
        payload: &InputPayload,
        schema: &SchemaMatch,
        identity: Option<&IdentityRecord>,
    ) -> FileScore {
        let consistency = passed_fraction(payload, CONSISTENCY_CHECKS);
        let coverage = passed_fraction(payload, COVERAGE_CHECKS);
        let completeness = passed_fraction(payload, PROFILE_COMPLETENESS_CHECKS);
        let integrity = passed_fraction(payload, INTEGRITY_CHECKS);

        // Each ledger fact is fetched once and reused for both the score
        // and the published metric.
        let user_uniqueness = self.user_uniqueness().await;
        let content_uniqueness = self.content_uniqueness(payload).await;

        let identity_resolved = identity.is_some();
        let breakdown = dimensions::breakdown(
            schema.matches,
            consistency,
            coverage,
            identity_resolved,
            integrity,
            user_uniqueness,
            content_uniqueness,
            self.config.trusted_channel,
        );

        let aggregate = breakdown.total();
        let (score, penalized) = if identity_resolved {
            (aggregate, false)
        } else {
            let penalized_score = dimensions::apply_identity_penalty(aggregate);
            warn!(
                aggregate,
                penalized_score, "no verified identity, applying score penalty"
            );
            (penalized_score, true)
        };

        let mut attributes = BTreeMap::new();
        attributes.insert("schema_name".to_string(), json!(schema.schema_name));
        attributes.insert("submitter_ref".to_string(), json!(payload.identity_ref()));
        attributes.insert("submitter_handle".to_string(), json!(payload.handle()));
        attributes.insert("identity_verified".to_string(), json!(identity_resolved));
        attributes.insert(
            "trusted_channel".to_string(),
            json!(self.config.trusted_channel),
        );
        attributes.insert("data_consistency".to_string(), json!(consistency));
        attributes.insert("data_coverage".to_string(), json!(coverage));
        attributes.insert("post_count".to_string(), json!(payload.post_count()));
        attributes.insert("profile_completeness".to_string(), json!(completeness));
        attributes.insert("user_uniqueness".to_string(), json!(user_uniqueness));
        attributes.insert("content_uniqueness".to_string(), json!(content_uniqueness));

        let mut metadata = BTreeMap::new();
        metadata.insert("schema_name".to_string(), json!(schema.schema_name));
        metadata.insert(
            "verification_method".to_string(),
            json!(VERIFICATION_METHOD),
        );
        metadata.insert(
            "upload_channel".to_string(),
            json!(self.config.upload_channel_label()),
        );
        metadata.insert(
            "penalty_applied".to_string(),
            if penalized {
                json!(ErrorCode::NoVerifiedIdentity.as_str())
            } else {
                Value::Null
            },
        );
        if let Some(record) = identity {
            metadata.insert("contributor_digest".to_string(), json!(record.digest()));
        }

        FileScore {
            score,
            breakdown,
            penalized,
            attributes,
            metadata,
        }
    }

    /// User-uniqueness credit from the prior-contribution count.
    ///
    /// Ledger unavailability and an unset owner address both default to
    /// full credit ("assume first-time contributor") — a documented trust
    /// gap, never a hard failure.
    async fn user_uniqueness(&self) -> f64 {
        let Some(address) = self.config.owner_address.as_deref() else {
            debug!("owner address not configured, assuming first-time contributor");
            return 1.0;
        };
        match self.ledger.contribution_count(address).await {
            Ok(0) => 1.0,
            Ok(count) => {
                debug!(count, "address has prior contributions");
                REPEAT_CONTRIBUTOR_CREDIT
            }
            Err(e) => {
                warn!("contribution count unavailable, assuming first-time contributor: {}", e);
                1.0
            }
        }
    }

    /// Content-uniqueness credit for the (identity reference, handle) pair.
    ///
    /// A payload without both parts earns nothing; a failed check earns
    /// majority credit — "unknown" must never map to full credit.
    async fn content_uniqueness(&self, payload: &InputPayload) -> f64 {
        let (Some(identity_ref), Some(handle)) = (payload.identity_ref(), payload.handle())
        else {
            return 0.0;
        };
        match self.ledger.is_content_unique(identity_ref, handle).await {
            Ok(true) => 1.0,
            Ok(false) => DUPLICATE_CONTENT_CREDIT,
            Err(e) => {
                warn!("content uniqueness check failed: {}", e);
                UNKNOWN_CONTENT_CREDIT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tidepool_core::{PoolError, AUTHENTICITY_MAX, OWNERSHIP_MAX, QUALITY_MAX, UNIQUENESS_MAX};
    use tidepool_schema::classify;

    /// Ledger stand-in: `None` simulates a failed read.
    struct FakeLedger {
        count: Option<u64>,
        unique: Option<bool>,
    }

    #[async_trait]
    impl ContributionLedger for FakeLedger {
        async fn contribution_count(&self, _address: &str) -> Result<u64, PoolError> {
            self.count
                .ok_or_else(|| PoolError::Ledger("rpc down".to_string()))
        }

        async fn is_content_unique(
            &self,
            _identity_ref: &str,
            _handle: &str,
        ) -> Result<bool, PoolError> {
            self.unique
                .ok_or_else(|| PoolError::Ledger("rpc down".to_string()))
        }
    }

    fn engine(count: Option<u64>, unique: Option<bool>, trusted: bool) -> ScoringEngine {
        ScoringEngine::new(
            Arc::new(FakeLedger { count, unique }),
            ScoringConfig {
                owner_address: Some("0x0000000000000000000000000000000000001234".to_string()),
                trusted_channel: trusted,
            },
        )
    }

    fn identity() -> IdentityRecord {
        IdentityRecord {
            id: "108236452".to_string(),
            email: "user@example.com".to_string(),
            name: "A User".to_string(),
            email_verified: true,
        }
    }

    fn full_payload() -> InputPayload {
        InputPayload::from_value(json!({
            "userId": "8421",
            "username": "reefkeeper",
            "timestamp": 1714400000,
            "profile": {
                "fullName": "Reef Keeper",
                "biography": "tide charts",
                "website": "https://example.com",
                "isPrivate": false,
                "isVerified": true,
                "followersCount": 120,
                "followingCount": 80,
                "postsCount": 12
            },
            "posts": [{ "id": "p1" }],
            "metadata": {
                "source": "export",
                "collectionDate": "2024-04-29",
                "dataType": "profile"
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fully_populated_payload_reaches_maximum() {
        let engine = engine(Some(0), Some(true), true);
        let payload = full_payload();
        let schema = classify(&payload);
        let id = identity();

        let result = engine.score(&payload, &schema, Some(&id)).await;
        assert!((result.score - 100.0).abs() < 1e-9);
        assert!(!result.penalized);
        assert_eq!(result.attributes["identity_verified"], json!(true));
        assert_eq!(result.metadata["penalty_applied"], Value::Null);
        assert_eq!(
            result.metadata["contributor_digest"],
            json!(id.digest())
        );
    }

    #[tokio::test]
    async fn test_absent_identity_keeps_ten_percent() {
        let engine = engine(Some(0), Some(true), true);
        let payload = full_payload();
        let schema = classify(&payload);

        let result = engine.score(&payload, &schema, None).await;
        let unpenalized = result.breakdown.total();
        assert!(result.penalized);
        assert!((result.score - unpenalized * 0.10).abs() < 1e-9);
        assert_eq!(
            result.metadata["penalty_applied"],
            json!("NO_VERIFIED_IDENTITY")
        );
        assert!(result.metadata.get("contributor_digest").is_none());
    }

    #[tokio::test]
    async fn test_repeat_contributor_halves_user_uniqueness() {
        let engine = engine(Some(3), Some(true), false);
        let payload = full_payload();
        let schema = classify(&payload);

        let result = engine.score(&payload, &schema, Some(&identity())).await;
        assert_eq!(
            result.attributes["user_uniqueness"],
            json!(REPEAT_CONTRIBUTOR_CREDIT)
        );
        // 0.5 * 10 + 1.0 * 10 = 15.
        assert!((result.breakdown.uniqueness - 15.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_ledger_failure_assumes_first_time_contributor() {
        let engine = engine(None, Some(true), false);
        let payload = full_payload();
        let schema = classify(&payload);

        let result = engine.score(&payload, &schema, Some(&identity())).await;
        assert_eq!(result.attributes["user_uniqueness"], json!(1.0));
        assert!((result.breakdown.uniqueness - UNIQUENESS_MAX).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_duplicate_and_unknown_content_credits() {
        let payload = full_payload();
        let schema = classify(&payload);
        let id = identity();

        let duplicate = engine(Some(0), Some(false), false)
            .score(&payload, &schema, Some(&id))
            .await;
        assert_eq!(
            duplicate.attributes["content_uniqueness"],
            json!(DUPLICATE_CONTENT_CREDIT)
        );

        let unknown = engine(Some(0), None, false)
            .score(&payload, &schema, Some(&id))
            .await;
        assert_eq!(
            unknown.attributes["content_uniqueness"],
            json!(UNKNOWN_CONTENT_CREDIT)
        );
        // Unknown earns more than a known duplicate, less than unique.
        assert!(UNKNOWN_CONTENT_CREDIT > DUPLICATE_CONTENT_CREDIT);
        assert!(UNKNOWN_CONTENT_CREDIT < 1.0);
    }

    #[tokio::test]
    async fn test_unset_owner_address_defaults_to_full_credit() {
        let engine = ScoringEngine::new(
            Arc::new(FakeLedger { count: Some(9), unique: Some(true) }),
            ScoringConfig { owner_address: None, trusted_channel: false },
        );
        let payload = full_payload();
        let schema = classify(&payload);
        let result = engine.score(&payload, &schema, Some(&identity())).await;
        assert_eq!(result.attributes["user_uniqueness"], json!(1.0));
    }

    #[tokio::test]
    async fn test_payload_without_handle_earns_no_content_credit() {
        let engine = engine(Some(0), Some(true), false);
        let payload = InputPayload::from_value(json!({
            "userId": "8421",
            "timestamp": 1714400000,
            "profile": {}
        }))
        .unwrap();
        let schema = classify(&payload);
        let result = engine.score(&payload, &schema, Some(&identity())).await;
        assert_eq!(result.attributes["content_uniqueness"], json!(0.0));
    }

    #[tokio::test]
    async fn test_sub_scores_stay_bounded_for_empty_payload() {
        let engine = engine(Some(0), Some(true), true);
        let payload = InputPayload::from_value(json!({})).unwrap();
        let schema = classify(&payload);
        let result = engine.score(&payload, &schema, None).await;

        let b = result.breakdown;
        assert!(b.quality >= 0.0 && b.quality <= QUALITY_MAX);
        assert!(b.authenticity >= 0.0 && b.authenticity <= AUTHENTICITY_MAX);
        assert!(b.uniqueness >= 0.0 && b.uniqueness <= UNIQUENESS_MAX);
        assert!(b.ownership >= 0.0 && b.ownership <= OWNERSHIP_MAX);
        assert!(result.score >= 0.0);
    }

    #[tokio::test]
    async fn test_minimal_payload_degrades_consistency_and_coverage() {
        let engine = engine(Some(0), Some(true), false);
        let payload = InputPayload::from_value(json!({
            "userId": "8421",
            "username": "reefkeeper",
            "timestamp": 1714400000,
            "profile": {}
        }))
        .unwrap();
        let schema = classify(&payload);
        assert!(schema.matches);

        let result = engine.score(&payload, &schema, Some(&identity())).await;
        // Missing counts fail consistency; timestamp and handle pass.
        assert_eq!(result.attributes["data_consistency"], json!(2.0 / 5.0));
        assert_eq!(result.attributes["data_coverage"], json!(0.0));
        // quality = 15 + 0.4 * 10 + 0 = 19.
        assert!((result.breakdown.quality - 19.0).abs() < 1e-9);
    }
}
