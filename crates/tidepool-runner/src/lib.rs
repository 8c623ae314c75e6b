// crates/tidepool-runner/src/lib.rs
//
// tidepool-runner: Orchestrates one proof-of-contribution run over a
// directory of candidate files and writes the resulting proof record.
//
// Exposed as a library so the end-to-end scenarios in tests/ can drive the
// orchestrator with fake providers.

pub mod config;
pub mod output;
pub mod pipeline;

pub use config::RunnerConfig;
pub use pipeline::ProofOrchestrator;
