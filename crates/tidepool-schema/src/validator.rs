// crates/tidepool-schema/src/validator.rs
//
// Classifies a payload against the schema catalog. Pure and infallible:
// the worst outcome for any input is `matches = false`.

use tidepool_core::InputPayload;

use crate::catalog::{catalog, FieldRule, SchemaSpec};

/// Result of classifying a payload: the best-matching schema's name and
/// whether the payload fully satisfies it.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaMatch {
    pub schema_name: String,
    pub matches: bool,
}

/// Classify a payload against every schema in the catalog.
///
/// The schema with the highest fraction of satisfied rules is reported as
/// the best match; `matches` is true only when every rule of that schema is
/// satisfied.
pub fn classify(payload: &InputPayload) -> SchemaMatch {
    let mut best: Option<(&SchemaSpec, f64, bool)> = None;

    for spec in catalog() {
        let satisfied = spec
            .rules
            .iter()
            .filter(|rule| rule_satisfied(payload, rule))
            .count();
        let fraction = satisfied as f64 / spec.rules.len().max(1) as f64;
        let full = satisfied == spec.rules.len();

        match best {
            Some((_, best_fraction, _)) if fraction <= best_fraction => {}
            _ => best = Some((spec, fraction, full)),
        }
    }

    // The catalog is never empty, but degrade gracefully anyway.
    match best {
        Some((spec, _, full)) => SchemaMatch {
            schema_name: spec.name.to_string(),
            matches: full,
        },
        None => SchemaMatch {
            schema_name: "unknown".to_string(),
            matches: false,
        },
    }
}

fn rule_satisfied(payload: &InputPayload, rule: &FieldRule) -> bool {
    match payload.get(rule.path) {
        Some(value) => rule.kind.matches(value),
        None => !rule.required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tidepool_core::InputPayload;

    fn payload(value: serde_json::Value) -> InputPayload {
        InputPayload::from_value(value).unwrap()
    }

    fn full_payload() -> InputPayload {
        payload(json!({
            "userId": "8421",
            "username": "coastal_drift",
            "timestamp": 1714400000,
            "profile": { "followersCount": 10 },
            "posts": [{ "id": "p1" }],
            "metadata": { "source": "export", "dataType": "profile" }
        }))
    }

    #[test]
    fn test_full_payload_matches() {
        let result = classify(&full_payload());
        assert_eq!(result.schema_name, "profile-export-v1");
        assert!(result.matches);
    }

    #[test]
    fn test_required_keys_alone_match() {
        let result = classify(&payload(json!({
            "userId": "8421",
            "username": "coastal_drift",
            "timestamp": 1714400000,
            "profile": {}
        })));
        assert!(result.matches);
    }

    #[test]
    fn test_missing_required_key_fails() {
        let result = classify(&payload(json!({
            "username": "coastal_drift",
            "timestamp": 1714400000,
            "profile": {}
        })));
        assert_eq!(result.schema_name, "profile-export-v1");
        assert!(!result.matches);
    }

    #[test]
    fn test_wrong_required_type_fails() {
        // timestamp as a string is a structural mismatch.
        let result = classify(&payload(json!({
            "userId": "8421",
            "username": "coastal_drift",
            "timestamp": "yesterday",
            "profile": {}
        })));
        assert!(!result.matches);
    }

    #[test]
    fn test_optional_field_wrong_type_fails() {
        let result = classify(&payload(json!({
            "userId": "8421",
            "username": "coastal_drift",
            "timestamp": 1714400000,
            "profile": {},
            "posts": "not a list"
        })));
        assert!(!result.matches);
    }

    #[test]
    fn test_empty_object_reports_best_schema_without_match() {
        let result = classify(&payload(json!({})));
        assert_eq!(result.schema_name, "profile-export-v1");
        assert!(!result.matches);
    }
}
