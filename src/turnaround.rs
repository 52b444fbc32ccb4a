//! Turnaround duration in working days, hours, minutes and seconds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DueDateError, Result};
use crate::policy::CalendarPolicy;

/// Requested time to fulfilment. A "day" is one working day as defined by
/// the policy, not 24 hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Turnaround {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Turnaround {
    pub fn new(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    pub fn days(days: u32) -> Self {
        Self { days, ..Self::default() }
    }

    pub fn hours(hours: u32) -> Self {
        Self { hours, ..Self::default() }
    }

    pub fn minutes(minutes: u32) -> Self {
        Self { minutes, ..Self::default() }
    }

    pub fn seconds(seconds: u32) -> Self {
        Self { seconds, ..Self::default() }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Total working seconds, converting days with the policy's day length
    pub fn total_seconds(&self, policy: &CalendarPolicy) -> i64 {
        self.days as i64 * policy.working_day_seconds()
            + self.hours as i64 * 3600
            + self.minutes as i64 * 60
            + self.seconds as i64
    }

    /// Parse the compact form, e.g. `1d4h30m` or `90s`
    pub fn parse(s: &str) -> Result<Self> {
        let input = s.trim();
        if input.is_empty() {
            return Err(DueDateError::InvalidTurnaround("empty turnaround".to_string()));
        }

        let mut result = Self::default();
        // Units must appear in d, h, m, s order, each at most once
        let mut next_unit = 0;
        let mut digits = String::new();

        for c in input.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }

            let unit = match c.to_ascii_lowercase() {
                'd' => 0,
                'h' => 1,
                'm' => 2,
                's' => 3,
                _ => {
                    return Err(DueDateError::InvalidTurnaround(format!(
                        "unknown unit '{}' in '{}'",
                        c, input
                    )))
                }
            };
            if digits.is_empty() {
                return Err(DueDateError::InvalidTurnaround(format!(
                    "unit '{}' has no value in '{}'",
                    c, input
                )));
            }
            if unit < next_unit {
                return Err(DueDateError::InvalidTurnaround(format!(
                    "units out of order or repeated in '{}'",
                    input
                )));
            }

            let value: u32 = digits.parse().map_err(|_| {
                DueDateError::InvalidTurnaround(format!("value '{}' is too large", digits))
            })?;
            match unit {
                0 => result.days = value,
                1 => result.hours = value,
                2 => result.minutes = value,
                _ => result.seconds = value,
            }
            next_unit = unit + 1;
            digits.clear();
        }

        if !digits.is_empty() {
            return Err(DueDateError::InvalidTurnaround(format!(
                "trailing value '{}' has no unit",
                digits
            )));
        }

        Ok(result)
    }
}

impl FromStr for Turnaround {
    type Err = DueDateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Turnaround {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0s");
        }
        for (value, unit) in [
            (self.days, 'd'),
            (self.hours, 'h'),
            (self.minutes, 'm'),
            (self.seconds, 's'),
        ] {
            if value > 0 {
                write!(f, "{}{}", value, unit)?;
            }
        }
        Ok(())
    }
}

/// Format a span of seconds for logging
pub fn format_seconds(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;

    if hours > 0 {
        format!("{}{}h {}m", sign, hours, mins)
    } else if mins > 0 {
        format!("{}{}m", sign, mins)
    } else {
        format!("{}{}s", sign, secs)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display output of a non-zero turnaround always parses back
        #[test]
        fn display_parses_back(d in 0u32..1000, h in 0u32..1000, m in 0u32..1000, s in 0u32..1000) {
            let t = Turnaround::new(d, h, m, s);
            prop_assert_eq!(Turnaround::parse(&t.to_string()).unwrap(), t);
        }

        /// Parsing never panics on arbitrary input
        #[test]
        fn parse_never_panics(s in ".*") {
            let _ = Turnaround::parse(&s);
        }

        /// Total seconds grows with every component
        #[test]
        fn total_seconds_monotone(d in 0u32..100, h in 0u32..100, extra in 1u32..100) {
            let policy = CalendarPolicy::default();
            let base = Turnaround::new(d, h, 0, 0);
            let more = Turnaround::new(d, h, extra, 0);
            prop_assert!(more.total_seconds(&policy) > base.total_seconds(&policy));
        }

        /// format_seconds never panics
        #[test]
        fn format_seconds_never_panics(secs in i64::MIN..i64::MAX) {
            let _ = format_seconds(secs);
        }
    }
}
