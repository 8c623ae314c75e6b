// crates/tidepool-ledger/src/lib.rs
//
// tidepool-ledger: Read-only queries against the pool contract.
//
// Two facts are exposed: how many files an address has already contributed,
// and whether an (identity reference, handle) pair is already registered.
// No writes ever originate here.

pub mod abi;
pub mod client;

pub use client::{LedgerConfig, PoolLedgerClient, UnconfiguredLedger};
