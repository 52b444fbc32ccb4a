use anyhow::{bail, Context, Result};
use chrono::Weekday;
use std::collections::HashMap;
use std::env;

use crate::calculator::{DueDateCalculator, DEFAULT_MAX_SKIP_DAYS};
use crate::policy::{
    CalendarPolicy, MonthDay, DEFAULT_END_HOUR, DEFAULT_START_HOUR, DEFAULT_WORKING_DAYS,
};

#[derive(Debug, Clone)]
pub struct Config {
    // Working-hour window (24-hour clock)
    pub work_start_hour: u32,
    pub work_end_hour: u32,

    pub working_days: Vec<Weekday>,

    // Fixed-date holidays; None keeps the built-in 2025 US table
    pub holidays: Option<Vec<(MonthDay, String)>>,

    // Reject submit times outside working time instead of reproducing
    // the unchecked arithmetic
    pub strict: bool,

    // Upper bound on consecutive non-working days the calculator will skip
    pub max_skip_days: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env if present, ignore if missing
        Self::from_getter(|key| env::var(key).ok())
    }

    /// Parse config from a custom getter function (for testing)
    pub fn from_getter<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            work_start_hour: get("DUEDATE_WORK_START")
                .map(|s| s.trim().parse::<u32>())
                .transpose()
                .context("DUEDATE_WORK_START must be an hour between 0 and 23")?
                .unwrap_or(DEFAULT_START_HOUR),
            work_end_hour: get("DUEDATE_WORK_END")
                .map(|s| s.trim().parse::<u32>())
                .transpose()
                .context("DUEDATE_WORK_END must be an hour between 1 and 24")?
                .unwrap_or(DEFAULT_END_HOUR),

            working_days: match get("DUEDATE_WORKING_DAYS") {
                Some(list) => Self::parse_working_days(&list)?,
                None => DEFAULT_WORKING_DAYS.to_vec(),
            },

            holidays: get("DUEDATE_HOLIDAYS")
                .map(|list| Self::parse_holidays(&list))
                .transpose()?,

            strict: get("DUEDATE_STRICT")
                .map(|s| Self::parse_bool(&s))
                .transpose()
                .context("DUEDATE_STRICT must be true or false")?
                .unwrap_or(false),

            max_skip_days: get("DUEDATE_MAX_SKIP_DAYS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&days: &u32| days > 0)
                .unwrap_or(DEFAULT_MAX_SKIP_DAYS),
        })
    }

    /// Create config from a HashMap (convenience for testing)
    #[cfg(test)]
    pub fn from_map(map: &HashMap<&str, &str>) -> Result<Self> {
        Self::from_getter(|key| map.get(key).map(|v| v.to_string()))
    }

    /// Parse a comma-separated weekday list such as `Mon,Tue,Wed`
    fn parse_working_days(list: &str) -> Result<Vec<Weekday>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Weekday>()
                    .map_err(|_| anyhow::anyhow!("DUEDATE_WORKING_DAYS: unknown weekday '{}'", s))
            })
            .collect()
    }

    /// Parse a comma-separated holiday list of `MM/DD` or `MM/DD=Name` entries.
    /// An empty list means no holidays.
    fn parse_holidays(list: &str) -> Result<Vec<(MonthDay, String)>> {
        let mut seen: HashMap<MonthDay, String> = HashMap::new();
        let mut holidays = Vec::new();

        for entry in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (date, name) = match entry.split_once('=') {
                Some((date, name)) => (date, name.trim()),
                None => (entry, "holiday"),
            };
            let date: MonthDay = date
                .parse()
                .with_context(|| format!("DUEDATE_HOLIDAYS: bad entry '{}'", entry))?;
            if let Some(previous) = seen.insert(date, name.to_string()) {
                bail!(
                    "DUEDATE_HOLIDAYS: {} listed twice ('{}' and '{}')",
                    date,
                    previous,
                    name
                );
            }
            holidays.push((date, name.to_string()));
        }

        Ok(holidays)
    }

    fn parse_bool(s: &str) -> Result<bool> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => bail!("'{}' is not a boolean", other),
        }
    }

    /// Build the calendar policy described by this config
    pub fn policy(&self) -> Result<CalendarPolicy> {
        let policy = match &self.holidays {
            Some(holidays) => CalendarPolicy::new(
                self.work_start_hour,
                self.work_end_hour,
                &self.working_days,
                holidays.iter().cloned(),
            )?,
            None => {
                let defaults = CalendarPolicy::us_federal_2025();
                let holidays: Vec<(MonthDay, String)> = defaults
                    .holidays()
                    .map(|(date, name)| (*date, name.to_string()))
                    .collect();
                CalendarPolicy::new(
                    self.work_start_hour,
                    self.work_end_hour,
                    &self.working_days,
                    holidays,
                )?
            }
        };
        Ok(policy)
    }

    pub fn calculator(&self) -> Result<DueDateCalculator> {
        Ok(DueDateCalculator::new(self.policy()?).with_max_skip_days(self.max_skip_days))
    }

    /// Validate configuration values at startup.
    /// Returns Ok(()) if all validations pass, or Err with details of what failed.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.work_start_hour > 23 {
            errors.push(format!(
                "DUEDATE_WORK_START={} is not an hour of the day.",
                self.work_start_hour
            ));
        }
        if self.work_end_hour > 24 {
            errors.push(format!(
                "DUEDATE_WORK_END={} is past midnight.",
                self.work_end_hour
            ));
        }
        if self.work_start_hour >= self.work_end_hour {
            errors.push(format!(
                "DUEDATE_WORK_START={} must be before DUEDATE_WORK_END={}.",
                self.work_start_hour, self.work_end_hour
            ));
        }

        if self.working_days.is_empty() {
            errors.push("DUEDATE_WORKING_DAYS must name at least one weekday.".to_string());
        }

        if self.max_skip_days < 7 {
            errors.push(format!(
                "DUEDATE_MAX_SKIP_DAYS={} is shorter than a week.",
                self.max_skip_days
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )
        }
    }
}
