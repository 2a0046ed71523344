//! Occurrence resolution: expanding recurrence rules into concrete
//! zoned date-times within a window, grouped by day of week.
//!
//! Expansion is delegated to the `rrule` crate through the rule's
//! textual form. The current instant is always an explicit parameter;
//! nothing here reads the ambient clock.

pub mod format;

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use horarium_core::config::ResolverConfig;
use horarium_core::constants::DEFAULT_EVENT_DURATION;
use horarium_core::types::DayCode;
use serde_json::Value;

use super::convert::timezone::zone_datetime_lenient;
use super::rule::RecurrenceRule;
use super::unfurl::{RuleWithData, unfurl_events};
use crate::error::ScheduleError;

/// Tunables for occurrence resolution.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Hard cap on occurrences expanded per rule.
    pub max_instances: u16,
    /// Length of the default resolution window, in days.
    pub window_days: u16,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_instances: 1000, // Limit to prevent runaway expansion
            window_days: 7,
        }
    }
}

impl From<&ResolverConfig> for ResolverOptions {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            max_instances: config.max_instances,
            window_days: config.window_days,
        }
    }
}

/// A resolution window, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// ## Summary
    /// The default window: `days` contiguous local days starting at the
    /// beginning of `now`'s day, ending one millisecond before the same
    /// local time `days` days later.
    #[must_use]
    pub fn days_starting(now: &DateTime<Tz>, days: u16) -> Self {
        let tz = now.timezone();
        let day = now.date_naive();

        let start = zone_datetime_lenient(tz, day.and_time(NaiveTime::MIN));
        let end_day = day + Days::new(u64::from(days));
        let end = zone_datetime_lenient(tz, end_day.and_time(NaiveTime::MIN))
            - Duration::milliseconds(1);

        Self::new(start.with_timezone(&Utc), end.with_timezone(&Utc))
    }

    /// The default seven-day window starting at the beginning of `now`'s
    /// local day.
    #[must_use]
    pub fn week_starting(now: &DateTime<Tz>) -> Self {
        Self::days_starting(now, 7)
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// One concrete firing of a recurrence rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    /// The firing instant, in the rule's own time zone.
    pub date_time: DateTime<Tz>,
    pub data: super::unfurl::ScheduleData,
}

/// Occurrences within the window, keyed by day-of-week index
/// (0 = Monday .. 6 = Sunday), ordered by local time of day within each
/// day.
pub type WeeklySchedule = BTreeMap<u8, Vec<Occurrence>>;

/// ## Summary
/// Expands one rule into its occurrences within the window.
///
/// The window filter is applied inclusively on both ends, regardless of
/// how the underlying iterator treats its bounds. Returned date-times
/// are in the rule's own zone.
///
/// ## Errors
///
/// Returns an error if the rule's textual form is rejected by the
/// expansion library.
pub fn expand_rule(
    rule: &RecurrenceRule,
    window: Window,
    max_instances: u16,
) -> Result<Vec<DateTime<Tz>>, ScheduleError> {
    let set = rule
        .to_string()
        .parse::<rrule::RRuleSet>()
        .map_err(|e| ScheduleError::ParseError(e.to_string()))?;

    // One-day margins around the window; the exact inclusive filter
    // below decides membership.
    let utc = rrule::Tz::Tz(chrono_tz::UTC);
    let after = (window.start - Duration::days(1)).with_timezone(&utc);
    let before = (window.end + Duration::days(1)).with_timezone(&utc);

    let result = set.after(after).before(before).all(max_instances);
    if result.limited {
        tracing::warn!(max_instances, "Occurrence expansion hit the instance limit");
    }

    let tz = rule.timezone();
    Ok(result
        .dates
        .into_iter()
        .filter(|dt| window.contains(dt.with_timezone(&Utc)))
        .map(|dt| dt.with_timezone(&tz))
        .collect())
}

/// ## Summary
/// Resolves (rule, metadata) pairs into a [`WeeklySchedule`].
///
/// Each occurrence is grouped under its own zone's local day of week and
/// carries the owning event's metadata, with the duration defaulted to
/// one hour when the event has none. Days are sorted by local time of
/// day; rules that fail to expand are skipped with a warning.
#[must_use]
#[tracing::instrument(skip(rules), fields(rule_count = rules.len()))]
pub fn resolve_weekly(
    rules: &[RuleWithData],
    window: Window,
    options: &ResolverOptions,
) -> WeeklySchedule {
    let mut weekly = WeeklySchedule::new();

    for RuleWithData { rule, data } in rules {
        let dates = match expand_rule(rule, window, options.max_instances) {
            Ok(dates) => dates,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping rule that failed to expand");
                continue;
            }
        };

        for date_time in dates {
            let day = DayCode::from(date_time.weekday()).week_index();
            let mut data = data.clone();
            data.duration
                .get_or_insert_with(|| DEFAULT_EVENT_DURATION.to_string());
            weekly
                .entry(day)
                .or_default()
                .push(Occurrence { date_time, data });
        }
    }

    for occurrences in weekly.values_mut() {
        // Stable: entries with the same time keep generation order.
        occurrences.sort_by_key(|occurrence| occurrence.date_time.time());
    }

    weekly
}

/// ## Summary
/// The full forward path: unfurl a JSON-LD graph and resolve the found
/// rules over the default window starting at `now`'s local day.
#[must_use]
pub fn weekly_schedule_for_graph(
    graph: &Value,
    now: &DateTime<Tz>,
    options: &ResolverOptions,
) -> WeeklySchedule {
    let rules = unfurl_events(graph);
    let window = Window::days_starting(now, options.window_days);
    resolve_weekly(&rules, window, options)
}
