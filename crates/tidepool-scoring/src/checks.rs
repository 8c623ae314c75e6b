// crates/tidepool-scoring/src/checks.rs
//
// Declarative field checklists. Every fraction the scoring engine reports
// (consistency, coverage, integrity, completeness) is the passed fraction
// of one of these fixed lists, so the score and the published raw metrics
// can never drift apart.

use serde_json::Value;

use tidepool_core::InputPayload;

/// One (field path, validator) pair. The validator receives `None` when the
/// field is absent, letting each checklist decide how absence is treated.
#[derive(Clone, Copy)]
pub struct FieldCheck {
    pub name: &'static str,
    pub path: &'static [&'static str],
    pub check: fn(Option<&Value>) -> bool,
}

/// Fraction of a checklist that the payload passes, in [0, 1].
pub fn passed_fraction(payload: &InputPayload, checks: &[FieldCheck]) -> f64 {
    if checks.is_empty() {
        return 0.0;
    }
    let passed = checks
        .iter()
        .filter(|c| (c.check)(payload.get(c.path)))
        .count();
    passed as f64 / checks.len() as f64
}

fn present(value: Option<&Value>) -> bool {
    value.is_some()
}

fn present_non_null(value: Option<&Value>) -> bool {
    value.map_or(false, |v| !v.is_null())
}

fn non_negative_count(value: Option<&Value>) -> bool {
    value.and_then(Value::as_f64).map_or(false, |n| n >= 0.0)
}

fn positive_number(value: Option<&Value>) -> bool {
    value.and_then(Value::as_f64).map_or(false, |n| n > 0.0)
}

fn non_blank_string(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .map_or(false, |s| !s.trim().is_empty())
}

fn non_empty_array(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .map_or(false, |a| !a.is_empty())
}

/// Consistency: type/range sanity of the fields the score leans on.
/// Absent counts fail — a payload that omits its statistics is less
/// trustworthy than one that reports zeros.
pub const CONSISTENCY_CHECKS: &[FieldCheck] = &[
    FieldCheck {
        name: "followers_count_non_negative",
        path: &["profile", "followersCount"],
        check: non_negative_count,
    },
    FieldCheck {
        name: "following_count_non_negative",
        path: &["profile", "followingCount"],
        check: non_negative_count,
    },
    FieldCheck {
        name: "posts_count_non_negative",
        path: &["profile", "postsCount"],
        check: non_negative_count,
    },
    FieldCheck {
        name: "timestamp_positive",
        path: &["timestamp"],
        check: positive_number,
    },
    FieldCheck {
        name: "handle_non_blank",
        path: &["username"],
        check: non_blank_string,
    },
];

/// Coverage: how much of the optional surface the export actually carries.
pub const COVERAGE_CHECKS: &[FieldCheck] = &[
    FieldCheck { name: "full_name", path: &["profile", "fullName"], check: present },
    FieldCheck { name: "biography", path: &["profile", "biography"], check: present },
    FieldCheck { name: "website", path: &["profile", "website"], check: present },
    FieldCheck { name: "is_private", path: &["profile", "isPrivate"], check: present },
    FieldCheck { name: "is_verified", path: &["profile", "isVerified"], check: present },
    FieldCheck {
        name: "followers_count",
        path: &["profile", "followersCount"],
        check: present_non_null,
    },
    FieldCheck {
        name: "following_count",
        path: &["profile", "followingCount"],
        check: present_non_null,
    },
    FieldCheck {
        name: "posts_count",
        path: &["profile", "postsCount"],
        check: present_non_null,
    },
    FieldCheck { name: "has_posts", path: &["posts"], check: non_empty_array },
    FieldCheck { name: "meta_source", path: &["metadata", "source"], check: present },
    FieldCheck {
        name: "meta_collection_date",
        path: &["metadata", "collectionDate"],
        check: present,
    },
    FieldCheck { name: "meta_data_type", path: &["metadata", "dataType"], check: present },
];

/// Profile completeness: the filled fraction of the full profile block.
/// Published as a raw metric only; quality uses coverage instead.
pub const PROFILE_COMPLETENESS_CHECKS: &[FieldCheck] = &[
    FieldCheck { name: "full_name", path: &["profile", "fullName"], check: present_non_null },
    FieldCheck { name: "biography", path: &["profile", "biography"], check: present_non_null },
    FieldCheck { name: "website", path: &["profile", "website"], check: present_non_null },
    FieldCheck { name: "is_private", path: &["profile", "isPrivate"], check: present_non_null },
    FieldCheck { name: "is_verified", path: &["profile", "isVerified"], check: present_non_null },
    FieldCheck {
        name: "followers_count",
        path: &["profile", "followersCount"],
        check: present_non_null,
    },
    FieldCheck {
        name: "following_count",
        path: &["profile", "followingCount"],
        check: present_non_null,
    },
    FieldCheck {
        name: "posts_count",
        path: &["profile", "postsCount"],
        check: present_non_null,
    },
];

/// File integrity: the required top-level fields a genuine export carries.
pub const INTEGRITY_CHECKS: &[FieldCheck] = &[
    FieldCheck { name: "user_id", path: &["userId"], check: present },
    FieldCheck { name: "username", path: &["username"], check: present },
    FieldCheck { name: "timestamp", path: &["timestamp"], check: present },
    FieldCheck { name: "profile", path: &["profile"], check: present },
    FieldCheck { name: "metadata", path: &["metadata"], check: present },
];
