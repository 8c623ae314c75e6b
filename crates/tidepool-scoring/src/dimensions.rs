// crates/tidepool-scoring/src/dimensions.rs
//
// The four dimension computations. Each takes already-computed fractions
// and facts, applies its fixed weights, and clamps to the dimension
// maximum before aggregation.

use tidepool_core::{
    ScoreBreakdown, AUTHENTICITY_MAX, IDENTITY_PENALTY, OWNERSHIP_MAX, QUALITY_MAX,
    UNIQUENESS_MAX,
};

/// Quality: weight of the schema-match bonus.
pub const SCHEMA_WEIGHT: f64 = 15.0;
/// Quality: weight of the consistency fraction.
pub const CONSISTENCY_WEIGHT: f64 = 10.0;
/// Quality: weight of the coverage fraction.
pub const COVERAGE_WEIGHT: f64 = 10.0;

/// Authenticity: bonus for a resolved identity.
pub const IDENTITY_AUTH_BONUS: f64 = 20.0;
/// Authenticity: weight of the file-integrity fraction.
pub const INTEGRITY_WEIGHT: f64 = 10.0;

/// Uniqueness: weight of the user-uniqueness half.
pub const USER_UNIQUENESS_WEIGHT: f64 = 10.0;
/// Uniqueness: weight of the content-uniqueness half.
pub const CONTENT_UNIQUENESS_WEIGHT: f64 = 10.0;

/// Ownership: bonus for a resolved identity.
pub const OWNERSHIP_IDENTITY_BONUS: f64 = 10.0;
/// Ownership: additional bonus for a trusted-channel upload (identity
/// required as well).
pub const TRUSTED_CHANNEL_BONUS: f64 = 5.0;

/// Credit for a repeat contributor (one or more prior contributions).
pub const REPEAT_CONTRIBUTOR_CREDIT: f64 = 0.5;
/// Credit when the ledger reports the content as already registered.
pub const DUPLICATE_CONTENT_CREDIT: f64 = 0.3;
/// Credit when the content-uniqueness check itself failed.
pub const UNKNOWN_CONTENT_CREDIT: f64 = 0.7;

/// Quality ∈ [0, 35]: schema bonus + weighted consistency + weighted coverage.
pub fn quality_score(schema_matches: bool, consistency: f64, coverage: f64) -> f64 {
    let schema_bonus = if schema_matches { SCHEMA_WEIGHT } else { 0.0 };
    (schema_bonus + consistency * CONSISTENCY_WEIGHT + coverage * COVERAGE_WEIGHT)
        .clamp(0.0, QUALITY_MAX)
}

/// Authenticity ∈ [0, 30]: identity bonus + weighted file integrity.
pub fn authenticity_score(identity_resolved: bool, integrity: f64) -> f64 {
    let identity_bonus = if identity_resolved { IDENTITY_AUTH_BONUS } else { 0.0 };
    (identity_bonus + integrity * INTEGRITY_WEIGHT).clamp(0.0, AUTHENTICITY_MAX)
}

/// Uniqueness ∈ [0, 20]: user half + content half, each clamped, then the
/// total clamped again.
pub fn uniqueness_score(user_uniqueness: f64, content_uniqueness: f64) -> f64 {
    let user = (user_uniqueness * USER_UNIQUENESS_WEIGHT).clamp(0.0, USER_UNIQUENESS_WEIGHT);
    let content =
        (content_uniqueness * CONTENT_UNIQUENESS_WEIGHT).clamp(0.0, CONTENT_UNIQUENESS_WEIGHT);
    (user + content).clamp(0.0, UNIQUENESS_MAX)
}

/// Ownership ∈ [0, 15]: identity bonus, plus the trusted-channel bonus only
/// when an identity was resolved as well.
pub fn ownership_score(identity_resolved: bool, trusted_channel: bool) -> f64 {
    let mut score = 0.0;
    if identity_resolved {
        score += OWNERSHIP_IDENTITY_BONUS;
        if trusted_channel {
            score += TRUSTED_CHANNEL_BONUS;
        }
    }
    score.clamp(0.0, OWNERSHIP_MAX)
}

/// Aggregate after the missing-identity penalty: the penalty multiplier is
/// subtracted from the aggregate, leaving 10% of the unpenalized total.
pub fn apply_identity_penalty(aggregate: f64) -> f64 {
    aggregate - aggregate * IDENTITY_PENALTY
}

/// Assemble the clamped breakdown from the raw per-dimension inputs.
pub fn breakdown(
    schema_matches: bool,
    consistency: f64,
    coverage: f64,
    identity_resolved: bool,
    integrity: f64,
    user_uniqueness: f64,
    content_uniqueness: f64,
    trusted_channel: bool,
) -> ScoreBreakdown {
    ScoreBreakdown {
        quality: quality_score(schema_matches, consistency, coverage),
        authenticity: authenticity_score(identity_resolved, integrity),
        uniqueness: uniqueness_score(user_uniqueness, content_uniqueness),
        ownership: ownership_score(identity_resolved, trusted_channel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_bounds() {
        assert_eq!(quality_score(false, 0.0, 0.0), 0.0);
        assert!((quality_score(true, 1.0, 1.0) - QUALITY_MAX).abs() < 1e-10);
        // Out-of-range fractions are clamped, not propagated.
        assert!(quality_score(true, 2.0, 2.0) <= QUALITY_MAX);
        assert!(quality_score(false, -1.0, -1.0) >= 0.0);
    }

    #[test]
    fn test_authenticity_bounds() {
        assert_eq!(authenticity_score(false, 0.0), 0.0);
        assert!((authenticity_score(true, 1.0) - AUTHENTICITY_MAX).abs() < 1e-10);
        assert!((authenticity_score(false, 1.0) - INTEGRITY_WEIGHT).abs() < 1e-10);
    }

    #[test]
    fn test_uniqueness_halves_are_independently_clamped() {
        assert!((uniqueness_score(1.0, 1.0) - UNIQUENESS_MAX).abs() < 1e-10);
        // An overweight user half cannot spill into the content half.
        assert!((uniqueness_score(3.0, 0.0) - USER_UNIQUENESS_WEIGHT).abs() < 1e-10);
        assert!(
            (uniqueness_score(REPEAT_CONTRIBUTOR_CREDIT, DUPLICATE_CONTENT_CREDIT) - 8.0).abs()
                < 1e-10
        );
    }

    #[test]
    fn test_ownership_requires_identity_for_any_credit() {
        assert_eq!(ownership_score(false, true), 0.0);
        assert!((ownership_score(true, false) - OWNERSHIP_IDENTITY_BONUS).abs() < 1e-10);
        assert!((ownership_score(true, true) - OWNERSHIP_MAX).abs() < 1e-10);
    }

    #[test]
    fn test_penalty_keeps_ten_percent() {
        let penalized = apply_identity_penalty(80.0);
        assert!((penalized - 8.0).abs() < 1e-10);
        assert_eq!(apply_identity_penalty(0.0), 0.0);
    }

    #[test]
    fn test_full_breakdown_sums_to_one_hundred() {
        let b = breakdown(true, 1.0, 1.0, true, 1.0, 1.0, 1.0, true);
        assert!((b.total() - 100.0).abs() < 1e-10);
    }
}
