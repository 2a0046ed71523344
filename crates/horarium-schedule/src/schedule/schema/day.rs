//! Mapping between schema.org day-of-week designators and rule day codes.

use horarium_core::constants::{DAY_PUBLIC_HOLIDAYS, SCHEMA_ORG_PREFIX};
use horarium_core::types::DayCode;
use serde_json::Value;

use super::value::extract_text;

/// ## Summary
/// Maps one schema.org day designator to a rule day code.
///
/// Accepts both the short name (`"Monday"`) and the full URI form
/// (`"https://schema.org/Monday"`). `PublicHolidays` is deliberately
/// unmapped: it is not a weekday and cannot anchor a weekly occurrence.
#[must_use]
pub fn day_code_from_designator(designator: &str) -> Option<DayCode> {
    let short = designator
        .strip_prefix(SCHEMA_ORG_PREFIX)
        .unwrap_or(designator);

    Some(match short {
        "Monday" => DayCode::Monday,
        "Tuesday" => DayCode::Tuesday,
        "Wednesday" => DayCode::Wednesday,
        "Thursday" => DayCode::Thursday,
        "Friday" => DayCode::Friday,
        "Saturday" => DayCode::Saturday,
        "Sunday" => DayCode::Sunday,
        DAY_PUBLIC_HOLIDAYS => {
            tracing::trace!("PublicHolidays has no weekday mapping");
            return None;
        }
        _ => return None,
    })
}

/// Maps a rule day code back to its schema.org URI form.
#[must_use]
pub const fn designator_from_day_code(day: DayCode) -> &'static str {
    match day {
        DayCode::Monday => "https://schema.org/Monday",
        DayCode::Tuesday => "https://schema.org/Tuesday",
        DayCode::Wednesday => "https://schema.org/Wednesday",
        DayCode::Thursday => "https://schema.org/Thursday",
        DayCode::Friday => "https://schema.org/Friday",
        DayCode::Saturday => "https://schema.org/Saturday",
        DayCode::Sunday => "https://schema.org/Sunday",
    }
}

/// ## Summary
/// Maps a `byDay` field (single designator or array) to day codes.
///
/// Unknown or unmappable entries are dropped, not errors: an occurrence
/// list that omits one day of a multi-day pattern beats discarding the
/// whole rule.
#[must_use]
pub fn map_by_day(by_day: Option<&Value>) -> Vec<DayCode> {
    let Some(by_day) = by_day else {
        return Vec::new();
    };

    let entries: Vec<String> = match by_day {
        Value::Array(items) => items.iter().filter_map(extract_text).collect(),
        other => extract_text(other).into_iter().collect(),
    };

    entries
        .iter()
        .filter_map(|entry| {
            let mapped = day_code_from_designator(entry);
            if mapped.is_none() {
                tracing::debug!(designator = %entry, "Dropping unmappable byDay entry");
            }
            mapped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn designators_map_in_both_directions() {
        for day in DayCode::all() {
            let uri = designator_from_day_code(day);
            assert_eq!(day_code_from_designator(uri), Some(day));

            let short = uri.rsplit('/').next().unwrap();
            assert_eq!(day_code_from_designator(short), Some(day));
        }
    }

    #[test]
    fn public_holidays_is_unmapped() {
        assert_eq!(day_code_from_designator("PublicHolidays"), None);
        assert_eq!(
            day_code_from_designator("https://schema.org/PublicHolidays"),
            None
        );
    }

    #[test]
    fn by_day_accepts_single_and_array() {
        assert_eq!(
            map_by_day(Some(&json!("https://schema.org/Saturday"))),
            vec![DayCode::Saturday]
        );
        assert_eq!(
            map_by_day(Some(&json!(["Monday", "Friday"]))),
            vec![DayCode::Monday, DayCode::Friday]
        );
        assert_eq!(map_by_day(None), Vec::new());
    }

    #[test]
    fn by_day_drops_unknown_entries_silently() {
        let mapped = map_by_day(Some(&json!([
            "Monday",
            "PublicHolidays",
            "NotADay",
            "https://schema.org/Sunday"
        ])));
        assert_eq!(mapped, vec![DayCode::Monday, DayCode::Sunday]);
    }
}
