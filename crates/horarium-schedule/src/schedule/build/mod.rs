//! Reverse conversion: [`RecurrenceRule`] -> schema.org `Schedule` node,
//! for exporting edited data back into the vocabulary.

use serde::{Deserialize, Serialize};

use super::rule::RecurrenceRule;
use super::schema::IsoDuration;
use super::schema::day::designator_from_day_code;
use crate::error::ScheduleError;

/// A JSON-serializable schema.org `Schedule` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdSchedule {
    #[serde(rename = "@type")]
    pub schedule_type: String,

    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// ISO-8601 duration with exactly one unit populated, matching the
    /// rule's frequency.
    pub repeat_frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_day: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_month_day: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_month_week: Option<i32>,

    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    pub schedule_timezone: String,
}

/// ## Summary
/// Converts a recurrence rule into a schema.org `Schedule` node, the
/// structural inverse of the forward converter.
///
/// `by_month_week` is only emitted when a `by_day` constraint exists,
/// since a set position is meaningless without one.
#[must_use]
pub fn rule_to_schedule(rule: &RecurrenceRule) -> LdSchedule {
    let by_day: Vec<String> = rule
        .by_day
        .iter()
        .map(|day| designator_from_day_code(*day).to_string())
        .collect();

    LdSchedule {
        schedule_type: horarium_core::constants::TYPE_SCHEDULE.to_string(),

        start_date: rule.start.format("%Y-%m-%d").to_string(),
        end_date: rule.until.map(|until| until.format("%Y-%m-%d").to_string()),

        repeat_frequency: IsoDuration::from_frequency(rule.frequency, rule.interval).to_string(),
        repeat_count: rule.count,

        by_day: if by_day.is_empty() { None } else { Some(by_day) },
        by_month: rule.by_month,
        by_month_day: rule.by_month_day,
        by_month_week: if rule.by_day.is_empty() {
            None
        } else {
            rule.by_set_pos
        },

        start_time: rule.start.format("%H:%M:%S").to_string(),
        end_time: rule.until.map(|until| until.format("%H:%M:%S").to_string()),

        schedule_timezone: rule.timezone().name().to_string(),
    }
}

/// ## Summary
/// Converts the textual rule form into a `Schedule` node.
///
/// ## Errors
///
/// This is the one fatal path of the engine: an empty or unparseable
/// rule raises instead of yielding a degenerate schedule, because there
/// is no sensible default.
pub fn rule_text_to_schedule(text: &str) -> Result<LdSchedule, ScheduleError> {
    if text.trim().is_empty() {
        return Err(ScheduleError::ValidationError("no rule provided".into()));
    }

    let rule: RecurrenceRule = text.parse()?;
    Ok(rule_to_schedule(&rule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use horarium_core::types::{DayCode, Frequency};

    fn sample_rule() -> RecurrenceRule {
        RecurrenceRule {
            start: chrono_tz::America::Toronto
                .with_ymd_and_hms(2023, 1, 1, 9, 0, 0)
                .single()
                .unwrap(),
            until: None,
            frequency: Frequency::Weekly,
            interval: 1,
            by_day: vec![DayCode::Sunday],
            by_month: None,
            by_month_day: None,
            by_set_pos: None,
            count: None,
        }
    }

    #[test]
    fn maps_rule_fields_onto_the_vocabulary() {
        let schedule = rule_to_schedule(&sample_rule());
        assert_eq!(schedule.schedule_type, "Schedule");
        assert_eq!(schedule.start_date, "2023-01-01");
        assert_eq!(schedule.start_time, "09:00:00");
        assert_eq!(schedule.repeat_frequency, "P1W");
        assert_eq!(
            schedule.by_day,
            Some(vec!["https://schema.org/Sunday".to_string()])
        );
        assert_eq!(schedule.schedule_timezone, "America/Toronto");
        assert_eq!(schedule.end_date, None);
        assert_eq!(schedule.end_time, None);
    }

    #[test]
    fn until_splits_into_end_date_and_time() {
        let mut rule = sample_rule();
        rule.until = Some(
            chrono_tz::America::Toronto
                .with_ymd_and_hms(2023, 6, 30, 10, 0, 0)
                .single()
                .unwrap(),
        );
        let schedule = rule_to_schedule(&rule);
        assert_eq!(schedule.end_date.as_deref(), Some("2023-06-30"));
        assert_eq!(schedule.end_time.as_deref(), Some("10:00:00"));
    }

    #[test]
    fn set_position_requires_a_by_day_constraint() {
        let mut rule = sample_rule();
        rule.by_set_pos = Some(2);
        assert_eq!(rule_to_schedule(&rule).by_month_week, Some(2));

        rule.by_day.clear();
        assert_eq!(rule_to_schedule(&rule).by_month_week, None);
    }

    #[test]
    fn interval_shows_up_in_the_frequency_duration() {
        let mut rule = sample_rule();
        rule.interval = 2;
        assert_eq!(rule_to_schedule(&rule).repeat_frequency, "P2W");

        rule.frequency = Frequency::Monthly;
        rule.interval = 3;
        assert_eq!(rule_to_schedule(&rule).repeat_frequency, "P3M");
    }

    #[test]
    fn empty_rule_text_is_fatal() {
        assert!(rule_text_to_schedule("").is_err());
        assert!(rule_text_to_schedule("   \n ").is_err());
        assert!(rule_text_to_schedule("not a rule").is_err());
    }

    #[test]
    fn rule_text_converts_like_the_value_form() {
        let rule = sample_rule();
        let from_text = rule_text_to_schedule(&rule.to_string()).unwrap();
        assert_eq!(from_text, rule_to_schedule(&rule));
    }

    #[test]
    fn serializes_with_vocabulary_field_names() {
        let json = serde_json::to_value(rule_to_schedule(&sample_rule())).unwrap();
        assert_eq!(json["@type"], "Schedule");
        assert_eq!(json["startDate"], "2023-01-01");
        assert_eq!(json["repeatFrequency"], "P1W");
        assert_eq!(json["scheduleTimezone"], "America/Toronto");
        assert!(json.get("endDate").is_none());
    }
}
