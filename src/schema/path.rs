//! Dot-delimited field path resolution.

use serde_json::Value;

/// Resolve a dot-delimited path (e.g. `"contact.mobile_no"`) within a
/// candidate record. Returns `None` if any segment is missing.
pub fn resolve<'a>(candidate: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = candidate;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Whether a resolved value counts as present.
///
/// Missing fields, nulls, blank strings, and empty arrays are all absent;
/// everything else is present.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Derive a human-readable label from the last path segment.
///
/// `"contact.mobile_no"` becomes `"Mobile no"`.
pub fn humanize(path: &str) -> String {
    let segment = path.rsplit('.').next().unwrap_or(path);
    let spaced = segment.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}
