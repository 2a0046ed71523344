//! Extraction of plain strings and numbers out of schema.org value shapes.
//!
//! A vocabulary field can arrive as a bare scalar, a wrapper object
//! carrying `@value` or `textValue`, or an array of either. These
//! functions flatten all of those to an `Option` and never fail.

use horarium_core::constants::KEY_VALUE;
use serde_json::Value;

/// Turns a scalar JSON value into its text form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// ## Summary
/// Extracts a plain string from a vocabulary text field.
///
/// Accepts a bare string, an array (joins the extracted elements with
/// single spaces), or a wrapper object exposing `@value` or `textValue`.
/// Returns `None` when nothing textual can be pulled out.
#[must_use]
pub fn extract_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(extract_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        Value::Object(map) => map
            .get(KEY_VALUE)
            .or_else(|| map.get("textValue"))
            .and_then(scalar_text),
        _ => None,
    }
}

/// ## Summary
/// Extracts an integer from a vocabulary numeric field.
///
/// Same shape tolerance as [`extract_text`]; for an array, the first
/// element that yields a number wins.
#[must_use]
pub fn extract_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.iter().find_map(extract_number),
        Value::Object(map) => map
            .get(KEY_VALUE)
            .or_else(|| map.get("textValue"))
            .and_then(extract_number),
        _ => None,
    }
}

/// Extracts a non-empty string from a named field of an object node.
#[must_use]
pub fn field_text(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(extract_text)
        .filter(|s| !s.is_empty())
}

/// Extracts an integer from a named field of an object node.
#[must_use]
pub fn field_number(node: &Value, key: &str) -> Option<i64> {
    node.get(key).and_then(extract_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_from_bare_string() {
        assert_eq!(extract_text(&json!("Holy Mass")), Some("Holy Mass".into()));
    }

    #[test]
    fn text_from_value_wrapper() {
        assert_eq!(extract_text(&json!({"@value": "09:00"})), Some("09:00".into()));
        assert_eq!(extract_text(&json!({"textValue": "09:00"})), Some("09:00".into()));
        assert_eq!(extract_text(&json!({"@value": 9})), Some("9".into()));
    }

    #[test]
    fn text_from_array_joins_with_spaces() {
        let v = json!(["Holy", {"@value": "Mass"}]);
        assert_eq!(extract_text(&v), Some("Holy Mass".into()));
    }

    #[test]
    fn text_absent_for_non_textual_shapes() {
        assert_eq!(extract_text(&json!(null)), None);
        assert_eq!(extract_text(&json!({"name": "x"})), None);
        assert_eq!(extract_text(&json!([])), None);
    }

    #[test]
    fn number_from_scalar_and_wrapper() {
        assert_eq!(extract_number(&json!(3)), Some(3));
        assert_eq!(extract_number(&json!("2")), Some(2));
        assert_eq!(extract_number(&json!({"@value": "4"})), Some(4));
    }

    #[test]
    fn number_from_array_takes_first_success() {
        assert_eq!(extract_number(&json!([null, "x", 7, 9])), Some(7));
        assert_eq!(extract_number(&json!([null, {}])), None);
    }

    #[test]
    fn field_text_filters_empty_strings() {
        let node = json!({"startDate": "", "startTime": "09:00"});
        assert_eq!(field_text(&node, "startDate"), None);
        assert_eq!(field_text(&node, "startTime"), Some("09:00".into()));
        assert_eq!(field_text(&node, "missing"), None);
    }
}
