// crates/tidepool-core/src/lib.rs
//
// tidepool-core: Core types and traits for the Tidepool proof of contribution.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the payload wrapper, the verified identity record, the proof
// record and score breakdown, the error type, and the trait interfaces to
// the external identity provider and contribution ledger.

pub mod error;
pub mod identity;
pub mod payload;
pub mod proof;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use tidepool_core::ProofRecord;`

pub use error::PoolError;
pub use identity::IdentityRecord;
pub use payload::InputPayload;
pub use proof::{
    ErrorCode, ProofRecord, ScoreBreakdown, AUTHENTICITY_MAX, IDENTITY_PENALTY, OWNERSHIP_MAX,
    QUALITY_MAX, UNIQUENESS_MAX,
};
pub use traits::{ContributionLedger, IdentityProvider};
