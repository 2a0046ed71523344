//! Classification of JSON-LD nodes before traversal.

use horarium_core::constants::{KEY_ID, KEY_TYPE, TYPE_EVENT, TYPE_SCHEDULE};
use serde_json::Value;

/// What a traversal should do with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A bare `@id` reference; never descended into.
    Reference,
    /// A concrete `Event` node.
    Event,
    /// Anything else (opaque object, array, scalar).
    Other,
}

/// Returns the node's `@type` discriminator, when it is a plain string.
#[must_use]
pub fn node_type(node: &Value) -> Option<&str> {
    node.get(KEY_TYPE).and_then(Value::as_str)
}

/// True iff the node is an object consisting solely of a string `@id`.
///
/// Such stubs identify data that lives elsewhere in the graph; treating
/// them as concrete nodes would reprocess shared references as new data.
#[must_use]
pub fn is_id_reference(node: &Value) -> bool {
    match node {
        Value::Object(map) => {
            map.len() == 1 && map.get(KEY_ID).is_some_and(Value::is_string)
        }
        _ => false,
    }
}

/// True iff the node is typed as a schema.org `Event`.
#[must_use]
pub fn is_event_node(node: &Value) -> bool {
    node_type(node) == Some(TYPE_EVENT)
}

/// True iff the node is typed as a schema.org `Schedule`.
#[must_use]
pub fn is_schedule_node(node: &Value) -> bool {
    node_type(node) == Some(TYPE_SCHEDULE)
}

/// Classifies a node for traversal purposes.
///
/// The reference check runs first: a stub stays a stub even when other
/// heuristics might match.
#[must_use]
pub fn classify(node: &Value) -> NodeKind {
    if is_id_reference(node) {
        NodeKind::Reference
    } else if is_event_node(node) {
        NodeKind::Event
    } else {
        NodeKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_reference_is_single_string_id() {
        assert!(is_id_reference(&json!({"@id": "https://x.test#church"})));
        assert!(!is_id_reference(&json!({"@id": "https://x.test", "name": "n"})));
        assert!(!is_id_reference(&json!({"@id": 3})));
        assert!(!is_id_reference(&json!("https://x.test")));
        assert!(!is_id_reference(&json!({})));
    }

    #[test]
    fn event_detection() {
        assert!(is_event_node(&json!({"@type": "Event", "name": "Mass"})));
        assert!(!is_event_node(&json!({"@type": "Schedule"})));
        assert!(!is_event_node(&json!(["Event"])));
    }

    #[test]
    fn classify_prefers_reference_over_other() {
        assert_eq!(classify(&json!({"@id": "x"})), NodeKind::Reference);
        assert_eq!(classify(&json!({"@type": "Event"})), NodeKind::Event);
        assert_eq!(classify(&json!({"@type": "Place"})), NodeKind::Other);
        assert_eq!(classify(&json!(42)), NodeKind::Other);
    }
}
