//! Calendar policy: working hours, working weekdays and fixed-date holidays
//!
//! Holidays are keyed by month and day only, so a table is accurate for the
//! single year it was written for. Rules like "third Monday of January" move
//! every year; callers that need another year supply their own table through
//! [`CalendarPolicy::with_holiday`].

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{DueDateError, Result};

pub const DEFAULT_START_HOUR: u32 = 9; // 9 AM
pub const DEFAULT_END_HOUR: u32 = 17; // 5 PM (17:00)

pub const DEFAULT_WORKING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// US federal holidays as observed in 2025
const US_FEDERAL_2025: [(u32, u32, &str); 10] = [
    (1, 1, "New Year's Day"),
    (1, 20, "Martin Luther King Jr. Day"),
    (2, 17, "Presidents' Day"),
    (5, 26, "Memorial Day"),
    (7, 4, "Independence Day"),
    (9, 1, "Labor Day"),
    (10, 13, "Columbus Day"),
    (11, 11, "Veterans Day"),
    (11, 27, "Thanksgiving Day"),
    (12, 25, "Christmas Day"),
];

const MAX_DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A year-independent calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > MAX_DAYS_IN_MONTH[month as usize - 1] {
            return Err(DueDateError::InvalidHoliday(format!("{:02}/{:02}", month, day)));
        }
        Ok(Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl FromStr for MonthDay {
    type Err = DueDateError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DueDateError::InvalidHoliday(s.to_string());
        let (month, day) = s.trim().split_once('/').ok_or_else(invalid)?;

        let parse_part = |part: &str| -> Result<u32> {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        Self::new(parse_part(month)?, parse_part(day)?).map_err(|_| invalid())
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

/// Immutable working-time rules shared by every calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarPolicy {
    start_hour: u32,
    end_hour: u32,
    working_days: Vec<Weekday>,
    holidays: BTreeMap<MonthDay, String>,
}

impl CalendarPolicy {
    pub fn new(
        start_hour: u32,
        end_hour: u32,
        working_days: &[Weekday],
        holidays: impl IntoIterator<Item = (MonthDay, String)>,
    ) -> Result<Self> {
        if end_hour > 24 {
            return Err(DueDateError::InvalidPolicy(format!(
                "end hour {} is past midnight",
                end_hour
            )));
        }
        if start_hour >= end_hour {
            return Err(DueDateError::InvalidPolicy(format!(
                "start hour {} must be before end hour {}",
                start_hour, end_hour
            )));
        }

        let mut days: Vec<Weekday> = Vec::with_capacity(working_days.len());
        for day in working_days {
            if !days.contains(day) {
                days.push(*day);
            }
        }
        if days.is_empty() {
            return Err(DueDateError::InvalidPolicy(
                "at least one working weekday is required".to_string(),
            ));
        }
        days.sort_by_key(|d| d.num_days_from_monday());

        Ok(Self {
            start_hour,
            end_hour,
            working_days: days,
            holidays: holidays.into_iter().collect(),
        })
    }

    /// 9-to-5, Monday to Friday, with the 2025 US federal holidays
    pub fn us_federal_2025() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            working_days: DEFAULT_WORKING_DAYS.to_vec(),
            holidays: US_FEDERAL_2025
                .iter()
                .map(|&(month, day, name)| (MonthDay { month, day }, name.to_string()))
                .collect(),
        }
    }

    pub fn with_holiday(mut self, date: MonthDay, name: impl Into<String>) -> Self {
        self.holidays.insert(date, name.into());
        self
    }

    pub fn without_holidays(mut self) -> Self {
        self.holidays.clear();
        self
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> impl Iterator<Item = (&MonthDay, &str)> {
        self.holidays.iter().map(|(date, name)| (date, name.as_str()))
    }

    /// Length of one working day in seconds, used to convert turnaround days
    pub fn working_day_seconds(&self) -> i64 {
        (self.end_hour - self.start_hour) as i64 * 3600
    }

    /// True if the weekday is a working weekday. Holidays are not considered.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.contains(&date.weekday())
    }

    /// True if the month/day of `date` is in the holiday table, for any year
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&MonthDay::from(date))
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&MonthDay::from(date)).map(String::as_str)
    }

    /// Working weekday that is not a holiday
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.is_working_day(date) && !self.is_holiday(date)
    }
}

impl Default for CalendarPolicy {
    fn default() -> Self {
        Self::us_federal_2025()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn no_holidays() -> Vec<(MonthDay, String)> {
        Vec::new()
    }

    // === MonthDay ===

    #[test]
    fn test_month_day_parse_and_display() {
        let md: MonthDay = "01/01".parse().unwrap();
        assert_eq!(md.month(), 1);
        assert_eq!(md.day(), 1);
        assert_eq!(md.to_string(), "01/01");

        // Single digits are accepted and displayed zero-padded
        let md: MonthDay = "7/4".parse().unwrap();
        assert_eq!(md.to_string(), "07/04");
    }

    #[test]
    fn test_month_day_leap_day_accepted() {
        let md: MonthDay = "02/29".parse().unwrap();
        assert_eq!(md.to_string(), "02/29");
    }

    #[test]
    fn test_month_day_rejects_garbage() {
        for bad in [
            "", "/", "13/01", "00/10", "02/30", "04/31", "1/1/2025", "ab/cd", "001/01", "+1/01",
        ] {
            assert!(bad.parse::<MonthDay>().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_month_day_error_names_input() {
        let err = "02/30".parse::<MonthDay>().unwrap_err();
        assert_eq!(err, DueDateError::InvalidHoliday("02/30".to_string()));
    }

    // === Policy construction ===

    #[test]
    fn test_default_policy_matches_us_table() {
        let policy = CalendarPolicy::default();
        assert_eq!(policy.start_hour(), 9);
        assert_eq!(policy.end_hour(), 17);
        assert_eq!(policy.working_day_seconds(), 8 * 3600);
        assert_eq!(policy.working_days(), &DEFAULT_WORKING_DAYS);

        let holidays: Vec<String> = policy.holidays().map(|(d, _)| d.to_string()).collect();
        assert_eq!(
            holidays,
            vec![
                "01/01", "01/20", "02/17", "05/26", "07/04", "09/01", "10/13", "11/11", "11/27",
                "12/25",
            ]
        );
    }

    #[test]
    fn test_new_rejects_inverted_hours() {
        assert!(CalendarPolicy::new(17, 9, &DEFAULT_WORKING_DAYS, no_holidays()).is_err());
        assert!(CalendarPolicy::new(9, 9, &DEFAULT_WORKING_DAYS, no_holidays()).is_err());
        assert!(CalendarPolicy::new(9, 25, &DEFAULT_WORKING_DAYS, no_holidays()).is_err());
        assert!(CalendarPolicy::new(0, 24, &DEFAULT_WORKING_DAYS, no_holidays()).is_ok());
    }

    #[test]
    fn test_new_rejects_no_working_days() {
        let result = CalendarPolicy::new(9, 17, &[], no_holidays());
        assert!(matches!(result, Err(DueDateError::InvalidPolicy(_))));
    }

    #[test]
    fn test_new_dedups_and_sorts_weekdays() {
        let days = [Weekday::Fri, Weekday::Mon, Weekday::Fri];
        let policy = CalendarPolicy::new(9, 17, &days, no_holidays()).unwrap();
        assert_eq!(policy.working_days(), &[Weekday::Mon, Weekday::Fri]);
    }

    // === Predicates ===

    #[test]
    fn test_is_working_day_weekdays() {
        let policy = CalendarPolicy::default();
        // 2025-12-29 is a Monday; the run crosses into January
        let monday = date(2025, 12, 29);
        for offset in 0..5 {
            let day = monday + chrono::Days::new(offset);
            assert!(policy.is_working_day(day), "{} should be a working day", day);
        }
        // New Year's Day is still a working weekday, only a holiday
        assert!(policy.is_working_day(date(2026, 1, 1)));
        assert!(!policy.is_business_day(date(2026, 1, 1)));
        assert!(!policy.is_working_day(date(2026, 1, 3))); // Saturday
        assert!(!policy.is_working_day(date(2026, 1, 4))); // Sunday
    }

    #[test]
    fn test_is_holiday_ignores_year() {
        let policy = CalendarPolicy::default();
        assert!(policy.is_holiday(date(2025, 12, 25)));
        assert!(policy.is_holiday(date(2026, 1, 1)));
        assert!(policy.is_holiday(date(1999, 7, 4)));
        assert!(!policy.is_holiday(date(2025, 12, 30)));
    }

    #[test]
    fn test_holiday_name_lookup() {
        let policy = CalendarPolicy::default();
        assert_eq!(policy.holiday_name(date(2026, 1, 1)), Some("New Year's Day"));
        assert_eq!(policy.holiday_name(date(2026, 1, 2)), None);
    }

    #[test]
    fn test_with_and_without_holidays() {
        let policy = CalendarPolicy::default()
            .without_holidays()
            .with_holiday("12/24".parse().unwrap(), "Christmas Eve");
        assert!(!policy.is_holiday(date(2025, 12, 25)));
        assert!(policy.is_holiday(date(2025, 12, 24)));
        assert!(!policy.is_business_day(date(2025, 12, 24)));
        assert!(policy.is_business_day(date(2025, 12, 25)));
    }
}
