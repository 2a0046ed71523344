//! IANA time-zone resolution for `scheduleTimezone` values.
//!
//! Uses ICU4X to canonicalize aliases (e.g. `Europe/Kiev` ->
//! `Europe/Kyiv`) before handing the identifier to `chrono-tz`.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::iana::IanaParserExtended;

/// Canonicalizes an IANA zone identifier, returning the input unchanged
/// when ICU does not recognize it.
fn canonicalize_zone(tzid: &str) -> String {
    let parser = IanaParserExtended::new();
    let parsed = parser.parse(tzid);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        tzid.to_string()
    } else {
        parsed.canonical.to_string()
    }
}

/// ## Summary
/// Resolves a `scheduleTimezone` value to a `chrono_tz::Tz`.
///
/// Tries the ICU-canonicalized name first, then the raw identifier, so
/// zones the two databases disagree about still resolve.
#[must_use]
pub fn resolve_zone(tzid: &str) -> Option<Tz> {
    let trimmed = tzid.trim();
    Tz::from_str(&canonicalize_zone(trimmed))
        .or_else(|_| Tz::from_str(trimmed))
        .ok()
}

/// ## Summary
/// Attaches a naive local date-time to a zone.
///
/// A DST fold resolves to the earlier instant (RFC 5545 semantics); a
/// DST gap yields `None` because the local time does not exist.
#[must_use]
pub fn zone_datetime(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, _later) => {
            tracing::debug!(%naive, zone = %tz, "Ambiguous local time, taking earlier instant");
            Some(earlier)
        }
        LocalResult::None => None,
    }
}

/// Like [`zone_datetime`], but shifts a nonexistent local time forward
/// one hour instead of failing. Used for window boundaries, where "start
/// of day" must always produce some instant.
#[must_use]
pub fn zone_datetime_lenient(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    zone_datetime(tz, naive)
        .unwrap_or_else(|| {
            let shifted = naive + chrono::Duration::hours(1);
            zone_datetime(tz, shifted).unwrap_or_else(|| tz.from_utc_datetime(&naive))
        })
}
