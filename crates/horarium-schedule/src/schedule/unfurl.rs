//! Recursive traversal of a JSON-LD graph, collecting recurrence rules
//! from every `Event` node that carries schedule data.

use serde_json::Value;

use super::convert::event_schedules_to_rules;
use super::rule::RecurrenceRule;
use super::schema::{NodeKind, classify, field_text};
use horarium_core::constants::KEY_ID;

/// Descriptive metadata copied from an event onto its occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScheduleData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// ISO-8601 duration of one occurrence, e.g. `PT1H`.
    pub duration: Option<String>,
}

impl ScheduleData {
    fn from_event(event: &Value) -> Self {
        Self {
            name: field_text(event, "name"),
            description: field_text(event, "description"),
            url: field_text(event, "url"),
            duration: field_text(event, "duration"),
        }
    }
}

/// A recurrence rule paired with the metadata of the event it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleWithData {
    pub rule: RecurrenceRule,
    pub data: ScheduleData,
}

/// ## Summary
/// Walks an arbitrary JSON value depth-first and collects a rule for
/// every schedule of every `Event` node, at any nesting depth.
///
/// Bare `@id` reference stubs are never descended into: they identify
/// data that lives elsewhere, and expanding them would reprocess shared
/// references as new data. Arrays are flattened in encounter order.
/// Conversion failures are absorbed (logged by the converter); the walk
/// always completes and returns whatever valid rules it found.
#[must_use]
#[tracing::instrument(skip(value))]
pub fn unfurl_events(value: &Value) -> Vec<RuleWithData> {
    let mut results = Vec::new();
    collect(value, &mut results);
    tracing::debug!(count = results.len(), "Unfurled recurrence rules");
    results
}

fn collect(value: &Value, results: &mut Vec<RuleWithData>) {
    match value {
        Value::Object(map) => {
            match classify(value) {
                NodeKind::Reference => {
                    tracing::trace!(
                        id = map.get(KEY_ID).and_then(|v| v.as_str()),
                        "Not descending into reference stub"
                    );
                    return;
                }
                NodeKind::Event => {
                    let data = ScheduleData::from_event(value);
                    for rule in event_schedules_to_rules(value) {
                        results.push(RuleWithData {
                            rule,
                            data: data.clone(),
                        });
                    }
                }
                NodeKind::Other => {}
            }

            // Keep descending regardless of node kind; events can hide
            // inside location, organizer, or unrelated custom fields.
            for child in map.values() {
                collect(child, results);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, results);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schedule(start_time: &str) -> Value {
        json!({
            "@type": "Schedule",
            "startDate": "2023-01-01",
            "startTime": start_time,
            "repeatFrequency": "P1W",
            "scheduleTimezone": "America/Toronto"
        })
    }

    #[test]
    fn finds_events_nested_at_depth() {
        let graph = json!({
            "@type": "Organization",
            "department": {
                "custom": [{
                    "@type": "Event",
                    "name": "Vespers",
                    "eventSchedule": [schedule("18:00")]
                }]
            }
        });

        let rules = unfurl_events(&graph);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].data.name.as_deref(), Some("Vespers"));
    }

    #[test]
    fn reference_stubs_are_not_expanded() {
        // The stub points at an event defined elsewhere; only the
        // concrete definition may produce rules.
        let graph = json!({
            "event": {"@id": "https://x.test#mass"},
            "elsewhere": {
                "@type": "Event",
                "@id": "https://x.test#mass",
                "name": "Mass",
                "eventSchedule": [schedule("09:00")]
            }
        });

        let rules = unfurl_events(&graph);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn all_events_of_an_array_are_honored() {
        let graph = json!({
            "event": [
                {
                    "@type": "Event",
                    "name": "First",
                    "eventSchedule": [schedule("09:00")]
                },
                {
                    "@type": "Event",
                    "name": "Second",
                    "eventSchedule": [schedule("11:00")]
                }
            ]
        });

        let rules = unfurl_events(&graph);
        let names: Vec<_> = rules.iter().map(|r| r.data.name.as_deref()).collect();
        assert_eq!(names, vec![Some("First"), Some("Second")]);
    }

    #[test]
    fn events_without_schedules_yield_nothing() {
        let graph = json!({
            "event": {"@type": "Event", "name": "Unscheduled"},
            "other": 42,
            "list": [null, "text"]
        });
        assert!(unfurl_events(&graph).is_empty());
    }

    #[test]
    fn metadata_is_copied_from_the_owning_event() {
        let graph = json!({
            "@type": "Event",
            "name": "Holy Mass",
            "description": {"@value": "Sunday service"},
            "url": "https://x.test",
            "duration": "PT45M",
            "eventSchedule": [schedule("09:00"), schedule("11:00")]
        });

        let rules = unfurl_events(&graph);
        assert_eq!(rules.len(), 2);
        for entry in &rules {
            assert_eq!(entry.data.name.as_deref(), Some("Holy Mass"));
            assert_eq!(entry.data.description.as_deref(), Some("Sunday service"));
            assert_eq!(entry.data.duration.as_deref(), Some("PT45M"));
        }
    }
}
