//! Defensive JSON parsing for callers that scrape JSON-LD out of pages.

use serde_json::Value;

/// Parses a JSON string, returning `None` (with an error log) on failure
/// instead of propagating the parse error.
#[must_use]
pub fn parse_json_safely(text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse JSON");
            None
        }
    }
}
