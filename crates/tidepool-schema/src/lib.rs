// crates/tidepool-schema/src/lib.rs
//
// tidepool-schema: Structural schema validation for submission payloads.
//
// The catalog describes each known schema as a declarative list of field
// rules; the validator classifies a payload against the catalog without
// ever failing — a malformed payload simply does not match.

pub mod catalog;
pub mod validator;

pub use catalog::{catalog, FieldKind, FieldRule, SchemaSpec, PROFILE_EXPORT_V1};
pub use validator::{classify, SchemaMatch};
