//! The canonical recurrence rule (RFC 5545 RRULE semantics) produced by
//! the forward converter and consumed by the resolver.
//!
//! The textual form is the de-facto recurrence-rule standard: a
//! `DTSTART` line carrying the anchor and zone, then the `RRULE:` rule
//! part. [`std::fmt::Display`] produces it and [`std::str::FromStr`]
//! accepts it, so rules survive a text round trip.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use horarium_core::types::{DayCode, Frequency};

use super::convert::timezone::resolve_zone;
use crate::error::ScheduleError;

/// A normalized recurrence rule anchored at a zoned date-time.
///
/// Exactly one of `until`, `count`, or neither (unbounded) governs
/// termination; the converters maintain that invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceRule {
    /// First occurrence, in the schedule's own time zone.
    pub start: DateTime<Tz>,
    /// Optional end bound (inclusive), mutually exclusive with `count`.
    pub until: Option<DateTime<Tz>>,
    pub frequency: Frequency,
    /// Positive repetition interval in units of `frequency`.
    pub interval: u32,
    /// Weekday constraints; empty means "on the anchor's weekday".
    pub by_day: Vec<DayCode>,
    pub by_month: Option<u8>,
    pub by_month_day: Option<i8>,
    /// Occurrence position within the interval, only meaningful together
    /// with a `by_day` constraint (e.g. "second Sunday of the month").
    pub by_set_pos: Option<i32>,
    /// Optional occurrence count bound, mutually exclusive with `until`.
    pub count: Option<u32>,
}

impl RecurrenceRule {
    /// The rule's time zone, taken from its anchor.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// The `RRULE` value part, without the `DTSTART` line.
    #[must_use]
    pub fn rule_part(&self) -> String {
        let mut parts = vec![format!("FREQ={}", self.frequency)];

        if self.interval != 1 {
            parts.push(format!("INTERVAL={}", self.interval));
        }

        if let Some(until) = self.until {
            // UNTIL is expressed in UTC per RFC 5545.
            parts.push(format!(
                "UNTIL={}",
                until.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ")
            ));
        }

        if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }

        if !self.by_day.is_empty() {
            let days: Vec<_> = self.by_day.iter().map(ToString::to_string).collect();
            parts.push(format!("BYDAY={}", days.join(",")));
        }

        if let Some(month) = self.by_month {
            parts.push(format!("BYMONTH={month}"));
        }

        if let Some(month_day) = self.by_month_day {
            parts.push(format!("BYMONTHDAY={month_day}"));
        }

        // BYSETPOS without another BY-part is invalid per RFC 5545;
        // emit it only alongside a BYDAY constraint.
        if let Some(set_pos) = self.by_set_pos
            && !self.by_day.is_empty()
        {
            parts.push(format!("BYSETPOS={set_pos}"));
        }

        parts.join(";")
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DTSTART;TZID={}:{}\nRRULE:{}",
            self.timezone().name(),
            self.start.format("%Y%m%dT%H%M%S"),
            self.rule_part()
        )
    }
}

/// Attaches a naive local date-time to a zone, taking the earlier
/// instant on a DST fold.
fn zone_local(tz: Tz, naive: NaiveDateTime, what: &str) -> Result<DateTime<Tz>, ScheduleError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ScheduleError::ParseError(format!("nonexistent {what}: {naive} in {tz}")))
}

fn parse_rule_datetime(value: &str) -> Result<(NaiveDateTime, bool), ScheduleError> {
    let is_utc = value.ends_with('Z');
    let trimmed = value.strip_suffix('Z').unwrap_or(value);
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y%m%dT%H%M%S")
        .map_err(|e| ScheduleError::ParseError(format!("invalid date-time `{value}`: {e}")))?;
    Ok((naive, is_utc))
}

impl FromStr for RecurrenceRule {
    type Err = ScheduleError;

    #[expect(clippy::too_many_lines)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dtstart: Option<(String, Option<String>)> = None;
        let mut rule_part: Option<String> = None;

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() {
                // blank separator
            } else if let Some(rest) = line.strip_prefix("DTSTART") {
                let (params, value) = rest.split_once(':').ok_or_else(|| {
                    ScheduleError::ParseError("DTSTART line has no value".into())
                })?;
                let tzid = params
                    .split(';')
                    .find_map(|p| p.strip_prefix("TZID="))
                    .map(str::to_string);
                dtstart = Some((value.to_string(), tzid));
            } else if let Some(rest) = line.strip_prefix("RRULE:") {
                rule_part = Some(rest.to_string());
            } else if line.contains('=') && rule_part.is_none() {
                // A bare rule part without the RRULE: prefix.
                rule_part = Some(line.to_string());
            } else {
                return Err(ScheduleError::ParseError(format!(
                    "unrecognized rule line: {line}"
                )));
            }
        }

        let (start_value, tzid) = dtstart
            .ok_or_else(|| ScheduleError::ParseError("missing DTSTART line".into()))?;
        let rule_part = rule_part
            .ok_or_else(|| ScheduleError::ParseError("missing RRULE part".into()))?;

        let (start_naive, start_utc) = parse_rule_datetime(&start_value)?;
        let tz = match tzid {
            Some(tzid) => resolve_zone(&tzid)
                .ok_or_else(|| ScheduleError::ParseError(format!("unknown TZID `{tzid}`")))?,
            // Floating date-times are treated as UTC, matching the `Z` form.
            None => chrono_tz::UTC,
        };
        let start = if start_utc && tz != chrono_tz::UTC {
            Utc.from_utc_datetime(&start_naive).with_timezone(&tz)
        } else {
            zone_local(tz, start_naive, "DTSTART")?
        };

        let mut frequency = None;
        let mut interval = 1_u32;
        let mut until = None;
        let mut count = None;
        let mut by_day = Vec::new();
        let mut by_month = None;
        let mut by_month_day = None;
        let mut by_set_pos = None;

        for part in rule_part.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                ScheduleError::ParseError(format!("malformed rule part `{part}`"))
            })?;

            match key.to_ascii_uppercase().as_str() {
                "FREQ" => {
                    frequency = Some(Frequency::parse(value).ok_or_else(|| {
                        ScheduleError::ParseError(format!("unsupported frequency `{value}`"))
                    })?);
                }
                "INTERVAL" => {
                    interval = value.parse().map_err(|_| {
                        ScheduleError::ParseError(format!("invalid INTERVAL `{value}`"))
                    })?;
                }
                "COUNT" => {
                    count = Some(value.parse().map_err(|_| {
                        ScheduleError::ParseError(format!("invalid COUNT `{value}`"))
                    })?);
                }
                "UNTIL" => {
                    let (naive, is_utc) = parse_rule_datetime(value)?;
                    until = Some(if is_utc {
                        Utc.from_utc_datetime(&naive).with_timezone(&tz)
                    } else {
                        zone_local(tz, naive, "UNTIL")?
                    });
                }
                "BYDAY" => {
                    for entry in value.split(',') {
                        // Ordinal prefixes (e.g. "2MO") carry set-position
                        // information we model separately; keep the weekday.
                        let weekday = entry
                            .trim_start_matches(|c: char| c == '+' || c == '-' || c.is_ascii_digit());
                        match DayCode::parse(weekday) {
                            Some(day) => by_day.push(day),
                            None => {
                                tracing::debug!(entry, "Dropping unrecognized BYDAY entry");
                            }
                        }
                    }
                }
                "BYMONTH" => {
                    by_month = value.split(',').next().and_then(|v| v.parse().ok());
                }
                "BYMONTHDAY" => {
                    by_month_day = value.split(',').next().and_then(|v| v.parse().ok());
                }
                "BYSETPOS" => {
                    by_set_pos = value.split(',').next().and_then(|v| v.parse().ok());
                }
                // Rule parts we do not model - ignore
                _ => {}
            }
        }

        let frequency = frequency
            .ok_or_else(|| ScheduleError::ParseError("rule part has no FREQ".into()))?;

        if count.is_some() && until.is_some() {
            tracing::debug!("Rule text carries both COUNT and UNTIL; keeping COUNT");
            until = None;
        }

        Ok(Self {
            start,
            until,
            frequency,
            interval,
            by_day,
            by_month,
            by_month_day,
            by_set_pos,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn toronto(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        chrono_tz::America::Toronto
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, min, 0)
                    .unwrap(),
            )
            .single()
            .unwrap()
    }

    fn weekly_rule() -> RecurrenceRule {
        RecurrenceRule {
            start: toronto(2023, 1, 1, 9, 0),
            until: None,
            frequency: Frequency::Weekly,
            interval: 1,
            by_day: vec![DayCode::Monday, DayCode::Friday],
            by_month: None,
            by_month_day: None,
            by_set_pos: None,
            count: None,
        }
    }

    #[test]
    fn display_emits_dtstart_and_rule() {
        assert_eq!(
            weekly_rule().to_string(),
            "DTSTART;TZID=America/Toronto:20230101T090000\nRRULE:FREQ=WEEKLY;BYDAY=MO,FR"
        );
    }

    #[test]
    fn interval_of_one_is_omitted() {
        let mut rule = weekly_rule();
        rule.interval = 2;
        assert!(rule.rule_part().contains("INTERVAL=2"));
        rule.interval = 1;
        assert!(!rule.rule_part().contains("INTERVAL"));
    }

    #[test]
    fn until_is_emitted_in_utc() {
        let mut rule = weekly_rule();
        rule.until = Some(toronto(2023, 6, 30, 10, 0));
        // 10:00 EDT == 14:00 UTC
        assert!(rule.rule_part().contains("UNTIL=20230630T140000Z"));
    }

    #[test]
    fn set_position_is_emitted_only_with_by_day() {
        let mut rule = weekly_rule();
        rule.by_set_pos = Some(2);
        assert!(rule.rule_part().contains("BYSETPOS=2"));

        rule.by_day.clear();
        assert!(!rule.rule_part().contains("BYSETPOS"));
    }

    #[test]
    fn text_round_trip_preserves_the_rule() {
        let mut rule = weekly_rule();
        rule.count = Some(12);
        rule.by_month = Some(6);

        let reparsed: RecurrenceRule = rule.to_string().parse().unwrap();
        assert_eq!(reparsed, rule);
    }

    #[test]
    fn parse_accepts_bare_rule_part_with_dtstart() {
        let rule: RecurrenceRule = "DTSTART;TZID=America/Toronto:20230101T090000\nFREQ=DAILY;COUNT=3"
            .parse()
            .unwrap();
        assert_eq!(rule.frequency, Frequency::Daily);
        assert_eq!(rule.count, Some(3));
    }

    #[test]
    fn parse_requires_dtstart_and_freq() {
        assert!("RRULE:FREQ=DAILY".parse::<RecurrenceRule>().is_err());
        assert!(
            "DTSTART;TZID=America/Toronto:20230101T090000\nRRULE:COUNT=2"
                .parse::<RecurrenceRule>()
                .is_err()
        );
        assert!("".parse::<RecurrenceRule>().is_err());
    }

    #[test]
    fn parse_drops_until_when_count_present() {
        let rule: RecurrenceRule =
            "DTSTART;TZID=America/Toronto:20230101T090000\nRRULE:FREQ=WEEKLY;COUNT=4;UNTIL=20240101T000000Z"
                .parse()
                .unwrap();
        assert_eq!(rule.count, Some(4));
        assert_eq!(rule.until, None);
    }

    #[test]
    fn parse_utc_dtstart_converts_into_tzid_zone() {
        let rule: RecurrenceRule = "DTSTART:20230101T140000Z\nRRULE:FREQ=WEEKLY"
            .parse()
            .unwrap();
        assert_eq!(rule.timezone(), chrono_tz::UTC);
        assert_eq!(rule.start.format("%H%M").to_string(), "1400");
    }
}
