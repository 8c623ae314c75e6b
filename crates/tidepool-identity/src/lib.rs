// crates/tidepool-identity/src/lib.rs
//
// tidepool-identity: Resolves a bearer credential to a verified identity
// record via the provider's userinfo endpoint.

pub mod provider;

pub use provider::{HttpIdentityProvider, DEFAULT_USERINFO_ENDPOINT};
