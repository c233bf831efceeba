// ── Entity normalizer ──
//
// Turns raw server records into `Course`. Records carry their identity as
// `_id` (preferred) or `id`; the canonical shape always uses `id`. A record
// without a usable identity never reaches a cache.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::CoreError;
use crate::model::Course;

/// Fields that fall back to `""` when absent or null.
const TEXT_DEFAULTS: [&str; 3] = ["title", "description", "subcategory"];

/// Enum fields where null or `""` means "not set".
const OPTIONAL_ENUMS: [&str; 2] = ["level", "category"];

/// Canonicalize one raw record.
pub fn normalize(raw: Value) -> Result<Course, CoreError> {
    let Value::Object(mut obj) = raw else {
        return Err(CoreError::validation(format!(
            "expected a course object, got {}",
            json_kind(&raw)
        )));
    };

    let id = take_identity(&mut obj)?;
    obj.insert("id".into(), Value::String(id));

    for key in TEXT_DEFAULTS {
        if obj.get(key).is_some_and(Value::is_null) {
            obj.remove(key);
        }
    }
    for key in OPTIONAL_ENUMS {
        if obj.get(key).is_some_and(is_blank) {
            obj.remove(key);
        }
    }
    if obj.get("coverImage").is_some_and(is_blank) {
        obj.remove("coverImage");
    }

    serde_json::from_value(Value::Object(obj))
        .map_err(|e| CoreError::validation(format!("malformed course record: {e}")))
}

/// Canonicalize a list payload. Fails as a whole if any element fails.
pub fn normalize_all(raw: Value) -> Result<Vec<Course>, CoreError> {
    let Value::Array(items) = raw else {
        return Err(CoreError::validation(format!(
            "expected a list of courses, got {}",
            json_kind(&raw)
        )));
    };
    trace!(count = items.len(), "normalizing course list");

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            normalize(item).map_err(|e| match e {
                CoreError::Validation { message } => {
                    CoreError::validation(format!("course #{idx}: {message}"))
                }
                other => other,
            })
        })
        .collect()
}

/// Pull `_id` (or `id`) out of the record as a non-empty string.
fn take_identity(obj: &mut Map<String, Value>) -> Result<String, CoreError> {
    let underscore = obj.remove("_id");
    let plain = obj.remove("id");

    let raw = match underscore {
        Some(v) if !is_blank(&v) => v,
        _ => plain.unwrap_or(Value::Null),
    };

    let id = match raw {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => return Err(CoreError::validation("course record has no identity")),
        other => {
            return Err(CoreError::validation(format!(
                "course identity must be a string, got {}",
                json_kind(&other)
            )));
        }
    };

    if id.is_empty() {
        return Err(CoreError::validation("course record has an empty identity"));
    }
    Ok(id)
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
