// crates/tidepool-core/src/payload.rs
//
// Parsed submission payload. A thin wrapper over a JSON object with
// path-based accessors: unknown fields are ignored, and missing fields
// degrade sub-scores downstream instead of failing the parse.

use serde_json::Value;

use crate::error::PoolError;

/// One parsed data submission.
///
/// The only hard invariant is that the payload deserializes as a JSON
/// object. Everything else — field presence, field types — is evaluated
/// field-by-field by the schema and scoring checklists.
#[derive(Debug, Clone)]
pub struct InputPayload {
    value: Value,
}

impl InputPayload {
    /// Parse a payload from raw bytes. Fails only if the bytes are not
    /// valid JSON or the top level is not an object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PoolError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed JSON value. Fails if it is not an object.
    pub fn from_value(value: Value) -> Result<Self, PoolError> {
        if !value.is_object() {
            return Err(PoolError::Schema(
                "payload top level is not a JSON object".to_string(),
            ));
        }
        Ok(Self { value })
    }

    /// Look up a nested field by path, e.g. `&["profile", "followersCount"]`.
    ///
    /// Returns `None` if any segment is missing or a non-object is traversed.
    /// A present-but-null field returns `Some(&Value::Null)`, which lets the
    /// checklists distinguish "absent" from "present but empty".
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.value;
        for segment in path {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    /// A nested field as a string, if present and a string.
    pub fn str_field(&self, path: &[&str]) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// A nested field as a number, if present and numeric.
    pub fn number_field(&self, path: &[&str]) -> Option<f64> {
        self.get(path)?.as_f64()
    }

    /// The submitter's identity reference (`userId`).
    pub fn identity_ref(&self) -> Option<&str> {
        self.str_field(&["userId"])
    }

    /// The submitter's handle (`username`).
    pub fn handle(&self) -> Option<&str> {
        self.str_field(&["username"])
    }

    /// The export timestamp, if present and numeric.
    pub fn timestamp(&self) -> Option<f64> {
        self.number_field(&["timestamp"])
    }

    /// The content item list, if present and an array.
    pub fn posts(&self) -> Option<&Vec<Value>> {
        self.get(&["posts"])?.as_array()
    }

    /// Number of content items (zero when the list is absent or malformed).
    pub fn post_count(&self) -> usize {
        self.posts().map(|p| p.len()).unwrap_or(0)
    }
}
