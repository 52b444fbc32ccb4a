//! Due date calculation over working time
//!
//! Walks forward from the submit time one working day at a time, consuming
//! each day's remaining capacity until the turnaround is exhausted.

use chrono::{Days, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use tracing::{debug, info};

use crate::error::{DueDateError, Result};
use crate::policy::CalendarPolicy;
use crate::turnaround::{format_seconds, Turnaround};

/// Non-working days the next-period search may skip before giving up
pub const DEFAULT_MAX_SKIP_DAYS: u32 = 366;

/// Seconds left between the given clock time and the end of the working day.
///
/// No clamping: a time at or after `end_hour` gives zero or a negative value,
/// a time before the working day starts gives more than a full day.
pub fn available_seconds_at(end_hour: u32, hour: u32, minute: u32, second: u32) -> i64 {
    let remaining_hours = end_hour as i64 - hour as i64;
    remaining_hours * 3600 - minute as i64 * 60 - second as i64
}

#[derive(Debug, Clone)]
pub struct DueDateCalculator {
    policy: CalendarPolicy,
    max_skip_days: u32,
}

impl DueDateCalculator {
    pub fn new(policy: CalendarPolicy) -> Self {
        Self {
            policy,
            max_skip_days: DEFAULT_MAX_SKIP_DAYS,
        }
    }

    pub fn with_max_skip_days(mut self, days: u32) -> Self {
        self.max_skip_days = days.max(1);
        self
    }

    pub fn policy(&self) -> &CalendarPolicy {
        &self.policy
    }

    pub fn max_skip_days(&self) -> u32 {
        self.max_skip_days
    }

    /// Remaining working seconds on the calendar day of `at`
    pub fn available_seconds(&self, at: NaiveDateTime) -> i64 {
        available_seconds_at(self.policy.end_hour(), at.hour(), at.minute(), at.second())
    }

    /// Start of the first business day strictly after the day of `at`
    pub fn next_working_period_start(&self, at: NaiveDateTime) -> Result<NaiveDateTime> {
        let start = NaiveTime::from_hms_opt(self.policy.start_hour(), 0, 0)
            .ok_or(DueDateError::OutOfRange)?;
        let mut date = at.date().succ_opt().ok_or(DueDateError::OutOfRange)?;
        let mut skipped = 0;

        while !self.policy.is_business_day(date) {
            if let Some(name) = self.policy.holiday_name(date) {
                debug!("Skipping {} ({})", date, name);
            }
            skipped += 1;
            if skipped > self.max_skip_days {
                return Err(DueDateError::NoWorkingDay {
                    days: self.max_skip_days,
                });
            }
            date = date.succ_opt().ok_or(DueDateError::OutOfRange)?;
        }

        Ok(date.and_time(start))
    }

    /// True if `at` falls on a business day within working hours
    pub fn is_within_working_time(&self, at: NaiveDateTime) -> bool {
        self.policy.is_business_day(at.date())
            && at.hour() >= self.policy.start_hour()
            && at.hour() < self.policy.end_hour()
    }

    /// Compute the due date for a submission.
    ///
    /// The submit time is taken as-is. One submitted outside working hours
    /// yields a negative first-day capacity, which adds to the remaining
    /// time before rolling to the next working day; one submitted on a
    /// weekend or holiday is counted as if that day were worked. Use
    /// [`calculate_checked`](Self::calculate_checked) to reject such input.
    pub fn calculate(
        &self,
        submitted: NaiveDateTime,
        turnaround: &Turnaround,
    ) -> Result<NaiveDateTime> {
        let mut remaining = turnaround.total_seconds(&self.policy);
        let mut due = submitted;

        // The first day holds at most 24h, every later day one working day,
        // so the walk covers at least this many calendar days
        let min_days = (remaining - 86_400).max(0) / self.policy.working_day_seconds();
        if submitted
            .date()
            .checked_add_days(Days::new(min_days as u64))
            .is_none()
        {
            return Err(DueDateError::OutOfRange);
        }

        debug!(
            "Calculating due date from {} for {} ({} working)",
            submitted,
            turnaround,
            format_seconds(remaining)
        );

        while remaining > 0 {
            let available = self.available_seconds(due);

            if remaining <= available {
                let delta = TimeDelta::try_seconds(remaining).ok_or(DueDateError::OutOfRange)?;
                due = due
                    .checked_add_signed(delta)
                    .ok_or(DueDateError::OutOfRange)?;
                break;
            }

            remaining -= available;
            due = self.next_working_period_start(due)?;
            debug!(
                "Consumed {} of working time, {} left, continuing at {}",
                format_seconds(available),
                format_seconds(remaining),
                due
            );
        }

        info!("Due date for {} + {}: {}", submitted, turnaround, due);
        Ok(due)
    }

    /// Like [`calculate`](Self::calculate), but rejects a submit time that is
    /// not within working hours of a business day
    pub fn calculate_checked(
        &self,
        submitted: NaiveDateTime,
        turnaround: &Turnaround,
    ) -> Result<NaiveDateTime> {
        if !self.is_within_working_time(submitted) {
            return Err(DueDateError::SubmitOutsideWorkingTime { submitted });
        }
        self.calculate(submitted, turnaround)
    }
}

impl Default for DueDateCalculator {
    fn default() -> Self {
        Self::new(CalendarPolicy::default())
    }
}



/// Kani formal verification proofs
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn available_seconds_within_working_day() {
        let hour: u32 = kani::any();
        kani::assume(hour >= 9 && hour < 17);
        let minute: u32 = kani::any();
        kani::assume(minute < 60);
        let second: u32 = kani::any();
        kani::assume(second < 60);

        let available = available_seconds_at(17, hour, minute, second);
        kani::assert(available > 0, "capacity inside working hours must be positive");
        kani::assert(available <= 8 * 3600, "capacity must not exceed one working day");
    }

    #[kani::proof]
    fn available_seconds_never_positive_after_close() {
        let hour: u32 = kani::any();
        kani::assume(hour >= 17 && hour < 24);
        let minute: u32 = kani::any();
        kani::assume(minute < 60);
        let second: u32 = kani::any();
        kani::assume(second < 60);

        kani::assert(
            available_seconds_at(17, hour, minute, second) <= 0,
            "capacity after close must not be positive",
        );
    }
}
