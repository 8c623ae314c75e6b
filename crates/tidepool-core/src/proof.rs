// crates/tidepool-core/src/proof.rs
//
// The proof of contribution record: the pipeline's sole output.
//
// One record exists per run. The orchestrator creates it, the scoring engine
// fills in scores/attributes/metadata per processed file, and the completed
// record is immutable once returned to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum quality sub-score.
pub const QUALITY_MAX: f64 = 35.0;
/// Maximum authenticity sub-score.
pub const AUTHENTICITY_MAX: f64 = 30.0;
/// Maximum uniqueness sub-score.
pub const UNIQUENESS_MAX: f64 = 20.0;
/// Maximum ownership sub-score.
pub const OWNERSHIP_MAX: f64 = 15.0;

/// Fraction of the aggregate subtracted when no verified identity was
/// resolved for the run. The final score keeps 10% of the unpenalized total.
pub const IDENTITY_PENALTY: f64 = 0.90;

/// Machine-readable error codes recorded on the proof record, in the order
/// they occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Payload failed structural schema validation. Fatal for the file.
    #[serde(rename = "INVALID_SCHEMA")]
    InvalidSchema,
    /// No verified identity could be resolved for the run. Applies the
    /// aggregate score penalty but does not invalidate the proof.
    #[serde(rename = "NO_VERIFIED_IDENTITY")]
    NoVerifiedIdentity,
    /// An identity was resolved but its email address is unverified.
    #[serde(rename = "UNVERIFIED_EMAIL")]
    UnverifiedEmail,
}

impl ErrorCode {
    /// The wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSchema => "INVALID_SCHEMA",
            ErrorCode::NoVerifiedIdentity => "NO_VERIFIED_IDENTITY",
            ErrorCode::UnverifiedEmail => "UNVERIFIED_EMAIL",
        }
    }

    /// Whether this code invalidates the proof. Schema mismatch is the only
    /// fatal condition; identity failures are score penalties by policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorCode::InvalidSchema)
    }
}

/// The four independently clamped sub-scores. Their maxima sum to 100, so
/// the unpenalized aggregate is naturally bounded by 100.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub quality: f64,
    pub authenticity: f64,
    pub uniqueness: f64,
    pub ownership: f64,
}

impl ScoreBreakdown {
    /// Sum of the four sub-scores (the unpenalized aggregate).
    pub fn total(&self) -> f64 {
        self.quality + self.authenticity + self.uniqueness + self.ownership
    }
}

/// The structured, auditable proof of contribution for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Identifier of the data pool this contribution targets.
    pub pool_id: u64,
    /// Final aggregate score after any penalty, in [0, 100].
    pub score: f64,
    /// True iff no fatal error was recorded.
    pub valid: bool,
    pub quality: f64,
    pub authenticity: f64,
    pub uniqueness: f64,
    pub ownership: f64,
    /// Public, auditor-facing attributes.
    pub attributes: BTreeMap<String, Value>,
    /// Smaller metadata set written to the ledger alongside the data.
    pub metadata: BTreeMap<String, Value>,
    /// Ordered error codes recorded during the run.
    pub errors: Vec<ErrorCode>,
}

impl ProofRecord {
    /// Create the empty record for a run.
    pub fn new(pool_id: u64) -> Self {
        Self {
            pool_id,
            score: 0.0,
            valid: false,
            quality: 0.0,
            authenticity: 0.0,
            uniqueness: 0.0,
            ownership: 0.0,
            attributes: BTreeMap::new(),
            metadata: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Record an error code, preserving order and skipping exact duplicates.
    pub fn push_error(&mut self, code: ErrorCode) {
        if !self.errors.contains(&code) {
            self.errors.push(code);
        }
    }

    /// Whether a given code has been recorded.
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.contains(&code)
    }

    /// Overwrite the per-dimension sub-scores from a breakdown.
    pub fn set_breakdown(&mut self, breakdown: &ScoreBreakdown) {
        self.quality = breakdown.quality;
        self.authenticity = breakdown.authenticity;
        self.uniqueness = breakdown.uniqueness;
        self.ownership = breakdown.ownership;
    }

    /// Finalize validity and mirror the error list into the public
    /// attributes. Called once when the run completes.
    pub fn finalize(&mut self) {
        if !self.errors.is_empty() {
            let codes: Vec<Value> = self
                .errors
                .iter()
                .map(|c| Value::String(c.as_str().to_string()))
                .collect();
            self.attributes
                .insert("errors".to_string(), Value::Array(codes));
        }
        self.valid = !self.errors.iter().any(|c| c.is_fatal());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total() {
        let b = ScoreBreakdown {
            quality: 35.0,
            authenticity: 30.0,
            uniqueness: 20.0,
            ownership: 15.0,
        };
        assert!((b.total() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_dimension_maxima_sum_to_one_hundred() {
        let total = QUALITY_MAX + AUTHENTICITY_MAX + UNIQUENESS_MAX + OWNERSHIP_MAX;
        assert!((total - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_schema_error_is_fatal() {
        let mut record = ProofRecord::new(7);
        record.push_error(ErrorCode::InvalidSchema);
        record.finalize();
        assert!(!record.valid);
        assert!(record.has_error(ErrorCode::InvalidSchema));
    }

    #[test]
    fn test_identity_errors_do_not_invalidate() {
        let mut record = ProofRecord::new(7);
        record.push_error(ErrorCode::NoVerifiedIdentity);
        record.push_error(ErrorCode::UnverifiedEmail);
        record.finalize();
        assert!(record.valid);
        assert_eq!(record.errors.len(), 2);
    }

    #[test]
    fn test_error_order_preserved_and_deduplicated() {
        let mut record = ProofRecord::new(0);
        record.push_error(ErrorCode::NoVerifiedIdentity);
        record.push_error(ErrorCode::InvalidSchema);
        record.push_error(ErrorCode::NoVerifiedIdentity);
        assert_eq!(
            record.errors,
            vec![ErrorCode::NoVerifiedIdentity, ErrorCode::InvalidSchema]
        );
    }

    #[test]
    fn test_finalize_mirrors_errors_into_attributes() {
        let mut record = ProofRecord::new(0);
        record.push_error(ErrorCode::InvalidSchema);
        record.finalize();
        let errors = record.attributes.get("errors").unwrap();
        assert_eq!(errors, &serde_json::json!(["INVALID_SCHEMA"]));

        let mut clean = ProofRecord::new(0);
        clean.finalize();
        assert!(clean.attributes.get("errors").is_none());
        assert!(clean.valid);
    }

    #[test]
    fn test_record_serializes_error_codes_as_strings() {
        let mut record = ProofRecord::new(3);
        record.push_error(ErrorCode::NoVerifiedIdentity);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["errors"][0], "NO_VERIFIED_IDENTITY");
        assert_eq!(json["pool_id"], 3);
    }
}
