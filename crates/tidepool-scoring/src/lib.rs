// crates/tidepool-scoring/src/lib.rs
//
// tidepool-scoring: Turns one validated payload plus identity and ledger
// facts into four clamped sub-scores, an aggregate score, and the
// attribute/metadata maps published with the proof.

pub mod checks;
pub mod dimensions;
pub mod engine;

pub use engine::{FileScore, ScoringConfig, ScoringEngine};
