//! Command-line argument parsing for the due date calculator

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::turnaround::Turnaround;

/// Submit time used when none is given
pub const DEFAULT_SUBMIT: &str = "2025-12-30 14:12:00";
/// Turnaround used when none is given
pub const DEFAULT_TURNAROUND: Turnaround = Turnaround {
    days: 1,
    hours: 4,
    minutes: 30,
    seconds: 0,
};

const SUBMIT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Format used for the human-readable output line
pub const DISPLAY_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub submit: Option<NaiveDateTime>,
    pub turnaround: Option<Turnaround>,
    pub days: Option<u32>,
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
    pub strict: bool,
    pub json: bool,
    pub validate: bool,
    pub help: bool,
}

impl Args {
    /// Submit time, falling back to the reference submission
    pub fn submit_time(&self) -> Result<NaiveDateTime> {
        match self.submit {
            Some(submit) => Ok(submit),
            None => parse_submit(DEFAULT_SUBMIT),
        }
    }

    /// Turnaround from `--turnaround`, overridden per component by the
    /// `--days`/`--hours`/`--minutes`/`--seconds` flags
    pub fn resolved_turnaround(&self) -> Turnaround {
        let has_components = self.days.is_some()
            || self.hours.is_some()
            || self.minutes.is_some()
            || self.seconds.is_some();

        let mut turnaround = match self.turnaround {
            Some(t) => t,
            None if has_components => Turnaround::default(),
            None => DEFAULT_TURNAROUND,
        };

        if let Some(days) = self.days {
            turnaround.days = days;
        }
        if let Some(hours) = self.hours {
            turnaround.hours = hours;
        }
        if let Some(minutes) = self.minutes {
            turnaround.minutes = minutes;
        }
        if let Some(seconds) = self.seconds {
            turnaround.seconds = seconds;
        }
        turnaround
    }
}

pub fn parse_submit(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    SUBMIT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .with_context(|| format!("invalid submit time '{}', expected YYYY-MM-DD HH:MM:SS", s))
}

/// Parse command line arguments
pub fn parse_args() -> Result<Args> {
    let args: Vec<String> = std::env::args().collect();
    parse_args_from(&args)
}

/// Parse arguments, skipping the program name in `args[0]`
pub fn parse_args_from(args: &[String]) -> Result<Args> {
    let mut result = Args::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--strict" => result.strict = true,
            "--json" => result.json = true,
            "--validate" => result.validate = true,
            "--help" | "-h" => result.help = true,
            "--submit" | "--turnaround" | "--days" | "--hours" | "--minutes" | "--seconds" => {
                if i + 1 >= args.len() {
                    bail!("{} requires a value", flag);
                }
                i += 1;
                let value = args[i].as_str();
                match flag {
                    "--submit" => result.submit = Some(parse_submit(value)?),
                    "--turnaround" => {
                        result.turnaround = Some(
                            Turnaround::parse(value).with_context(|| format!("bad {}", flag))?,
                        )
                    }
                    _ => {
                        let n: u32 = value.parse().with_context(|| {
                            format!("{} expects a non-negative integer, got '{}'", flag, value)
                        })?;
                        match flag {
                            "--days" => result.days = Some(n),
                            "--hours" => result.hours = Some(n),
                            "--minutes" => result.minutes = Some(n),
                            _ => result.seconds = Some(n),
                        }
                    }
                }
            }
            other => bail!("unknown argument '{}'", other),
        }
        i += 1;
    }

    Ok(result)
}

pub fn print_help() {
    println!("duedate - Working-time due date calculator\n");
    println!("USAGE:");
    println!("    duedate [OPTIONS]\n");
    println!("OPTIONS:");
    println!(
        "    --submit TIME           Submit time, YYYY-MM-DD HH:MM:SS (default: {})",
        DEFAULT_SUBMIT
    );
    println!(
        "    --turnaround SPAN       Turnaround such as 1d4h30m (default: {})",
        DEFAULT_TURNAROUND
    );
    println!("    --days N                Working days of turnaround");
    println!("    --hours N               Hours of turnaround");
    println!("    --minutes N             Minutes of turnaround");
    println!("    --seconds N             Seconds of turnaround");
    println!("    --strict                Reject submit times outside working time");
    println!("    --json                  Print the result as JSON");
    println!("    --validate              Validate configuration and exit");
    println!("    --help, -h              Show this help message\n");
    println!("ENVIRONMENT:");
    println!("    DUEDATE_WORK_START, DUEDATE_WORK_END, DUEDATE_WORKING_DAYS,");
    println!("    DUEDATE_HOLIDAYS, DUEDATE_STRICT, DUEDATE_MAX_SKIP_DAYS");
}

/// Result of one calculation, as printed by the binary
#[derive(Debug, Serialize)]
pub struct DueDateReport {
    pub submitted: NaiveDateTime,
    pub turnaround: Turnaround,
    pub due: NaiveDateTime,
}

impl DueDateReport {
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return serde_json::to_string(self).context("Failed to serialize report");
        }
        Ok(format!("Due Date: {}", self.due.format(DISPLAY_FORMAT)))
    }
}
