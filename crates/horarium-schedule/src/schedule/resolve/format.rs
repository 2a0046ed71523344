//! Presentation helpers: locale-aware time formatting for occurrences.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use icu::datetime::NoCalendarFormatter;
use icu::datetime::fieldsets::T;
use icu::datetime::options::TimePrecision;
use icu::locale::Locale;
use icu::time::Time;

use super::WeeklySchedule;

/// A weekly schedule entry flattened for rendering.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LocalizedEntry {
    /// Time of day in the viewer's locale convention, e.g. `9:00 AM`
    /// or `17:00 EDT`.
    pub time: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub duration: Option<String>,
}

fn time_formatter(locale: &Locale) -> Option<NoCalendarFormatter<T>> {
    NoCalendarFormatter::try_new(
        locale.clone().into(),
        T::short().with_time_precision(TimePrecision::Minute),
    )
    .ok()
}

fn icu_time(date_time: &DateTime<Tz>) -> Option<Time> {
    Time::try_new(
        u8::try_from(date_time.hour()).ok()?,
        u8::try_from(date_time.minute()).ok()?,
        0,
        0,
    )
    .ok()
}

fn format_with(
    formatter: Option<&NoCalendarFormatter<T>>,
    date_time: &DateTime<Tz>,
    viewer_zone: Tz,
) -> String {
    let time = formatter.zip(icu_time(date_time)).map_or_else(
        || {
            tracing::warn!("No locale data for time formatting, using a fixed pattern");
            date_time.format("%-I:%M %p").to_string()
        },
        |(formatter, time)| formatter.format(&time).to_string(),
    );

    if date_time.timezone() == viewer_zone {
        time
    } else {
        format!("{time} {}", date_time.format("%Z"))
    }
}

/// ## Summary
/// Formats an occurrence's time of day in the viewer's locale
/// convention (12- or 24-hour clock as the locale dictates).
///
/// The zone abbreviation is appended only when the occurrence's zone
/// differs from the viewer's, matching how a local reader expects to see
/// their own times unlabeled.
#[must_use]
pub fn format_occurrence_time(
    date_time: &DateTime<Tz>,
    viewer_zone: Tz,
    locale: &Locale,
) -> String {
    format_with(time_formatter(locale).as_ref(), date_time, viewer_zone)
}

/// ## Summary
/// Renders a [`WeeklySchedule`] into per-day lists of formatted entries,
/// preserving day keys and within-day ordering.
#[must_use]
pub fn localize_weekly_schedule(
    weekly: &WeeklySchedule,
    viewer_zone: Tz,
    locale: &Locale,
) -> BTreeMap<u8, Vec<LocalizedEntry>> {
    let formatter = time_formatter(locale);

    weekly
        .iter()
        .map(|(day, occurrences)| {
            let entries = occurrences
                .iter()
                .map(|occurrence| LocalizedEntry {
                    time: format_with(formatter.as_ref(), &occurrence.date_time, viewer_zone),
                    name: occurrence.data.name.clone(),
                    description: occurrence.data.description.clone(),
                    url: occurrence.data.url.clone(),
                    duration: occurrence.data.duration.clone(),
                })
                .collect();
            (*day, entries)
        })
        .collect()
}
