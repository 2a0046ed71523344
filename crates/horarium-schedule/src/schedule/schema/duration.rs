//! ISO-8601 duration values (`P1W`, `P3D`, `PT1H30M`, ...).
//!
//! Covers the subset that schema.org `repeatFrequency` and `duration`
//! fields use: integer components, no fractional seconds.

use std::fmt;

use horarium_core::types::Frequency;
use thiserror::Error;

/// An ISO-8601 duration string that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid ISO-8601 duration: {0}")]
pub struct InvalidDuration(pub String);

/// An ISO-8601 duration broken into integer components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsoDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl IsoDuration {
    /// A duration with all components zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            years: 0,
            months: 0,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// ## Summary
    /// Parses an ISO-8601 duration string.
    ///
    /// ## Errors
    ///
    /// Returns [`InvalidDuration`] when the string is not of the form
    /// `P[nY][nM][nW][nD][T[nH][nM][nS]]` with at least one component.
    pub fn parse(s: &str) -> Result<Self, InvalidDuration> {
        let invalid = || InvalidDuration(s.to_string());
        let mut chars = s.trim().chars().peekable();

        if chars.next() != Some('P') {
            return Err(invalid());
        }

        let mut dur = Self::zero();
        let mut in_time = false;
        let mut components = 0_u32;
        let mut num: Option<u32> = None;

        for c in chars {
            if let Some(digit) = c.to_digit(10) {
                num = Some(
                    num.unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit))
                        .ok_or_else(invalid)?,
                );
                continue;
            }

            if c == 'T' {
                if in_time || num.is_some() {
                    return Err(invalid());
                }
                in_time = true;
                continue;
            }

            let value = num.take().ok_or_else(invalid)?;
            let slot = match (in_time, c) {
                (false, 'Y') => &mut dur.years,
                (false, 'M') => &mut dur.months,
                (false, 'W') => &mut dur.weeks,
                (false, 'D') => &mut dur.days,
                (true, 'H') => &mut dur.hours,
                (true, 'M') => &mut dur.minutes,
                (true, 'S') => &mut dur.seconds,
                _ => return Err(invalid()),
            };
            *slot = value;
            components += 1;
        }

        // A trailing number or a bare "P"/"PT" is malformed.
        if num.is_some() || components == 0 {
            return Err(invalid());
        }

        Ok(dur)
    }

    /// ## Summary
    /// Picks the recurrence frequency and interval this duration encodes.
    ///
    /// The single largest nonzero unit wins, checked in the fixed order
    /// weeks, days, months, years; any remaining components are
    /// discarded. Returns `None` when no such unit is nonzero (e.g. a
    /// pure time-of-day duration), which is an unsupported
    /// `repeatFrequency`.
    #[must_use]
    pub const fn frequency_unit(&self) -> Option<(Frequency, u32)> {
        if self.weeks > 0 {
            Some((Frequency::Weekly, self.weeks))
        } else if self.days > 0 {
            Some((Frequency::Daily, self.days))
        } else if self.months > 0 {
            Some((Frequency::Monthly, self.months))
        } else if self.years > 0 {
            Some((Frequency::Yearly, self.years))
        } else {
            None
        }
    }

    /// The inverse of [`IsoDuration::frequency_unit`]: a duration with
    /// exactly one unit populated.
    #[must_use]
    pub const fn from_frequency(frequency: Frequency, interval: u32) -> Self {
        let mut dur = Self::zero();
        match frequency {
            Frequency::Daily => dur.days = interval,
            Frequency::Weekly => dur.weeks = interval,
            Frequency::Monthly => dur.months = interval,
            Frequency::Yearly => dur.years = interval,
        }
        dur
    }

    /// The time-of-day portion as a `chrono` delta (hours, minutes,
    /// seconds). Date components do not shift a time of day and are
    /// ignored here.
    #[must_use]
    pub fn time_of_day_delta(&self) -> chrono::Duration {
        chrono::Duration::seconds(
            i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds),
        )
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from("P");

        if self.years > 0 {
            out.push_str(&format!("{}Y", self.years));
        }
        if self.months > 0 {
            out.push_str(&format!("{}M", self.months));
        }
        if self.weeks > 0 {
            out.push_str(&format!("{}W", self.weeks));
        }
        if self.days > 0 {
            out.push_str(&format!("{}D", self.days));
        }

        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            out.push('T');
            if self.hours > 0 {
                out.push_str(&format!("{}H", self.hours));
            }
            if self.minutes > 0 {
                out.push_str(&format!("{}M", self.minutes));
            }
            if self.seconds > 0 {
                out.push_str(&format!("{}S", self.seconds));
            }
        }

        if out == "P" {
            out.push_str("T0S");
        }

        f.write_str(&out)
    }
}

impl std::str::FromStr for IsoDuration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
