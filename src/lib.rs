//! duedate - working-time due date calculation
//!
//! Adds a turnaround expressed in working days, hours, minutes and seconds to
//! a submit time, counting only time inside the working-hour window of
//! working, non-holiday days.

pub mod calculator;
pub mod cli;
pub mod config;
pub mod error;
pub mod policy;
pub mod turnaround;

pub use calculator::DueDateCalculator;
pub use error::{DueDateError, Result};
pub use policy::{CalendarPolicy, MonthDay};
pub use turnaround::Turnaround;
