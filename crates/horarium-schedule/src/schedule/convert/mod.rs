//! Forward conversion: schema.org `Schedule` node -> [`RecurrenceRule`].
//!
//! Every rejection is a value, not a panic: the converter returns
//! [`ScheduleInvalid`] naming the reason, callers log it and move on to
//! the next schedule.

pub mod timezone;

use chrono::{NaiveDate, NaiveTime};
use horarium_core::constants::DEFAULT_EVENT_DURATION;
use serde_json::Value;
use thiserror::Error;

use super::rule::RecurrenceRule;
use super::schema::{
    IsoDuration, field_number, field_text, is_id_reference, is_schedule_node, map_by_day,
};
use timezone::{resolve_zone, zone_datetime};

/// Why a schedule node produced no recurrence rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleInvalid {
    #[error("node is not a Schedule")]
    NotASchedule,

    #[error("node is a bare @id reference")]
    Reference,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid `{field}` value `{value}`")]
    InvalidField { field: &'static str, value: String },

    #[error("unsupported repeatFrequency `{0}`: no week, day, month, or year component")]
    UnsupportedFrequency(String),

    #[error("unknown scheduleTimezone `{0}`")]
    UnknownTimezone(String),

    #[error("local time {local} does not exist in `{zone}`")]
    NonexistentTime { zone: String, local: String },
}

fn invalid(field: &'static str, value: &str) -> ScheduleInvalid {
    ScheduleInvalid::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ScheduleInvalid> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid(field, value))
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ScheduleInvalid> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| invalid(field, value))
}

/// ## Summary
/// Converts one schema.org `Schedule` node into a [`RecurrenceRule`].
///
/// Required fields: `startDate`, `repeatFrequency`, `startTime`,
/// `scheduleTimezone`. The frequency/interval pair comes from the single
/// highest-priority nonzero unit of the `repeatFrequency` duration
/// (weeks, then days, months, years); remaining units are discarded.
/// When both `endDate` and `repeatCount` are present, the count wins so
/// that exactly one termination condition survives.
///
/// ## Errors
///
/// Returns a [`ScheduleInvalid`] naming the first rejection reason.
/// Never panics on malformed input.
pub fn schedule_to_rule(node: &Value) -> Result<RecurrenceRule, ScheduleInvalid> {
    if is_id_reference(node) {
        return Err(ScheduleInvalid::Reference);
    }
    if !is_schedule_node(node) {
        return Err(ScheduleInvalid::NotASchedule);
    }

    let start_date =
        field_text(node, "startDate").ok_or(ScheduleInvalid::MissingField("startDate"))?;
    let repeat_frequency = field_text(node, "repeatFrequency")
        .ok_or(ScheduleInvalid::MissingField("repeatFrequency"))?;
    let start_time =
        field_text(node, "startTime").ok_or(ScheduleInvalid::MissingField("startTime"))?;
    let schedule_timezone = field_text(node, "scheduleTimezone")
        .ok_or(ScheduleInvalid::MissingField("scheduleTimezone"))?;

    let frequency_duration = IsoDuration::parse(&repeat_frequency)
        .map_err(|_| invalid("repeatFrequency", &repeat_frequency))?;
    let (frequency, interval) = frequency_duration
        .frequency_unit()
        .ok_or_else(|| ScheduleInvalid::UnsupportedFrequency(repeat_frequency.clone()))?;

    let tz = resolve_zone(&schedule_timezone)
        .ok_or_else(|| ScheduleInvalid::UnknownTimezone(schedule_timezone.clone()))?;

    let start_date = parse_date("startDate", &start_date)?;
    let start_time = parse_time("startTime", &start_time)?;
    let start = zone_datetime(tz, start_date.and_time(start_time)).ok_or_else(|| {
        ScheduleInvalid::NonexistentTime {
            zone: schedule_timezone.clone(),
            local: start_date.and_time(start_time).to_string(),
        }
    })?;

    let mut until = match field_text(node, "endDate") {
        Some(end_date) => {
            let end_date = parse_date("endDate", &end_date)?;
            let end_time = match field_text(node, "endTime") {
                Some(end_time) => parse_time("endTime", &end_time)?,
                // No explicit endTime: end of the last occurrence, i.e.
                // startTime plus the schedule's duration (default 1 hour).
                None => {
                    let duration = field_text(node, "duration")
                        .unwrap_or_else(|| DEFAULT_EVENT_DURATION.to_string());
                    let duration =
                        IsoDuration::parse(&duration).map_err(|_| invalid("duration", &duration))?;
                    start_time.overflowing_add_signed(duration.time_of_day_delta()).0
                }
            };
            let local = end_date.and_time(end_time);
            Some(
                zone_datetime(tz, local).ok_or_else(|| ScheduleInvalid::NonexistentTime {
                    zone: schedule_timezone.clone(),
                    local: local.to_string(),
                })?,
            )
        }
        None => None,
    };

    let count = field_number(node, "repeatCount")
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0);

    // Exactly one termination condition may survive.
    if count.is_some() && until.is_some() {
        tracing::debug!("Schedule has both endDate and repeatCount; keeping repeatCount");
        until = None;
    }

    let by_month = match field_number(node, "byMonth") {
        Some(n) => Some(u8::try_from(n).map_err(|_| invalid("byMonth", &n.to_string()))?),
        None => None,
    };
    let by_month_day = match field_number(node, "byMonthDay") {
        Some(n) => Some(i8::try_from(n).map_err(|_| invalid("byMonthDay", &n.to_string()))?),
        None => None,
    };
    let by_set_pos = match field_number(node, "byMonthWeek") {
        Some(n) => Some(i32::try_from(n).map_err(|_| invalid("byMonthWeek", &n.to_string()))?),
        None => None,
    };

    Ok(RecurrenceRule {
        start,
        until,
        frequency,
        interval,
        by_day: map_by_day(node.get("byDay")),
        by_month,
        by_month_day,
        by_set_pos,
        count,
    })
}

/// ## Summary
/// Converts an event's `eventSchedule` field into recurrence rules.
///
/// A single schedule object is treated as a one-element list. Reference
/// stubs and invalid schedules are skipped with a log entry; valid
/// siblings still produce rules.
#[must_use]
pub fn event_schedules_to_rules(event: &Value) -> Vec<RecurrenceRule> {
    let Some(schedules) = event.get("eventSchedule") else {
        return Vec::new();
    };

    let schedules: Vec<&Value> = match schedules {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    let mut rules = Vec::new();
    for schedule in schedules {
        match schedule_to_rule(schedule) {
            Ok(rule) => rules.push(rule),
            Err(ScheduleInvalid::Reference) => {
                tracing::warn!(
                    id = schedule.get("@id").and_then(|v| v.as_str()),
                    "Skipping schedule reference"
                );
            }
            Err(reason) => {
                tracing::warn!(%reason, "Skipping invalid schedule");
            }
        }
    }
    rules
}
