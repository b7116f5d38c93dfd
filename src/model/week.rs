use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use regex::Regex;

/// `<4-digit ISO year>-<1 or 2 digit ISO week>`
static WEEK_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("week key pattern"));

/// Error type for week key parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeekKeyError {
    #[error("malformed week key '{0}' (expected YYYY-W)")]
    Malformed(String),
    #[error("week number {0} out of range 1-53")]
    OutOfRange(u32),
}

/// An ISO week (Monday start), identified on the wire as `"<year>-<week>"`.
/// Ordering is by (year, week).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Result<Self, WeekKeyError> {
        if !(1..=53).contains(&week) {
            return Err(WeekKeyError::OutOfRange(week));
        }
        Ok(WeekKey { year, week })
    }

    /// The ISO week containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        WeekKey {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The ISO week containing today (local time)
    pub fn current() -> Self {
        WeekKey::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// Monday of this week. `None` for week 53 of a year with 52 ISO weeks.
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }
}

impl FromStr for WeekKey {
    type Err = WeekKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = WEEK_KEY_RE
            .captures(s)
            .ok_or_else(|| WeekKeyError::Malformed(s.to_string()))?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| WeekKeyError::Malformed(s.to_string()))?;
        let week: u32 = caps[2]
            .parse()
            .map_err(|_| WeekKeyError::Malformed(s.to_string()))?;
        WeekKey::new(year, week)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.week)
    }
}
