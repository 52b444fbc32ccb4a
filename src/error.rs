//! Error types for due-date calculation

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DueDateError {
    /// Working hours or weekdays cannot describe a usable calendar
    #[error("invalid calendar policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid holiday '{0}', expected MM/DD")]
    InvalidHoliday(String),

    #[error("invalid turnaround: {0}")]
    InvalidTurnaround(String),

    /// Only reported by the checked entry point
    #[error("submit time {submitted} is outside working time")]
    SubmitOutsideWorkingTime { submitted: NaiveDateTime },

    #[error("no working day found within {days} days")]
    NoWorkingDay { days: u32 },

    #[error("date arithmetic left the representable range")]
    OutOfRange,
}

pub type Result<T, E = DueDateError> = std::result::Result<T, E>;
