// crates/tidepool-schema/src/catalog.rs
//
// Declarative schema catalog. One fixed set of rules per named schema:
// required rules must be present with the expected type; optional rules
// are only type-checked when the field is present.

use serde_json::Value;

/// Expected JSON type for a field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Object,
    Array,
}

impl FieldKind {
    /// Whether a JSON value has this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
        }
    }
}

/// One structural expectation on a payload field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Path from the payload root, e.g. `&["metadata", "source"]`.
    pub path: &'static [&'static str],
    pub kind: FieldKind,
    /// Required rules fail when the field is absent; optional rules only
    /// fail when the field is present with the wrong type.
    pub required: bool,
}

/// A named schema: its wire name plus the rule list that defines it.
#[derive(Debug, Clone, Copy)]
pub struct SchemaSpec {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

/// The profile export schema. Top-level identity, handle, timestamp, and
/// profile block are required; the content list and metadata block are
/// optional containers, type-checked only when present. Field-level value
/// checks (count ranges, blank handles) belong to the scoring checklists,
/// not to structural validation.
pub const PROFILE_EXPORT_V1: SchemaSpec = SchemaSpec {
    name: "profile-export-v1",
    rules: &[
        FieldRule { path: &["userId"], kind: FieldKind::String, required: true },
        FieldRule { path: &["username"], kind: FieldKind::String, required: true },
        FieldRule { path: &["timestamp"], kind: FieldKind::Number, required: true },
        FieldRule { path: &["profile"], kind: FieldKind::Object, required: true },
        FieldRule { path: &["posts"], kind: FieldKind::Array, required: false },
        FieldRule { path: &["metadata"], kind: FieldKind::Object, required: false },
        FieldRule { path: &["metadata", "source"], kind: FieldKind::String, required: false },
        FieldRule { path: &["metadata", "dataType"], kind: FieldKind::String, required: false },
    ],
};

/// Every schema the pool accepts. Currently a single profile export shape.
pub fn catalog() -> &'static [SchemaSpec] {
    &[PROFILE_EXPORT_V1]
}
