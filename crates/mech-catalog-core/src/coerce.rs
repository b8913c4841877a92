//! Type-tolerant field access over schema-less unit documents.
//!
//! Source files are hand-authored and any field may be absent, null, or of an
//! unexpected JSON type. Every read in the normalizers goes through these
//! helpers so that a wrongly typed field degrades to a default instead of
//! failing the record.

use serde_json::{Map, Value};

pub type Document = Map<String, Value>;

/// First value among `keys` that is present and not null.
#[must_use]
pub fn first_present<'a>(doc: &'a Document, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| doc.get(*key).filter(|value| !value.is_null()))
}

/// Renders a JSON value as text. Strings are returned without quotes.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Truthiness as the source tooling understood it: null, false, zero, and
/// empty strings/arrays/objects are false.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// First present value among `keys`, stringified.
#[must_use]
pub fn string_field(doc: &Document, keys: &[&str]) -> Option<String> {
    first_present(doc, keys).map(value_to_string)
}

/// Like [`string_field`] but skips values that stringify to an empty string.
#[must_use]
pub fn non_empty_string(doc: &Document, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| doc.get(*key))
        .map(value_to_string)
        .find(|text| !text.is_empty())
}

/// String value of `key` when present and truthy, otherwise empty.
#[must_use]
pub fn truthy_string(doc: &Document, keys: &[&str]) -> String {
    match first_present(doc, keys) {
        Some(value) if is_truthy(value) => value_to_string(value),
        _ => String::new(),
    }
}

/// Boolean flag; any truthy value counts.
#[must_use]
pub fn flag(doc: &Document, key: &str) -> bool {
    doc.get(key).is_some_and(is_truthy)
}

/// Coerces a tonnage-like value to whole tons via float-then-truncate.
///
/// Numbers and numeric strings (`"55.0"`) are accepted. Booleans, non-finite
/// values, out-of-range values, and anything unparsable yield `None`.
#[must_use]
pub fn coerce_tons(value: Option<&Value>) -> Option<i64> {
    let raw = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    let truncated = raw.trunc();
    // i64::MAX is not exactly representable; stay strictly inside the range.
    if truncated.abs() >= 9.0e18 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let tons = truncated as i64;
    Some(tons)
}
