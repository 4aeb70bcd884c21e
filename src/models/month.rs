//! Calendar month keys
//!
//! `YearMonth` is the bucket every monthly computation in the ledger groups by:
//! materialization windows, the variable-expense series and the annual view.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A (year, month) pair, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a month key, returning `None` for months outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing a date or datetime
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 = January
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based month index within the year, 0 = January
    pub fn index0(&self) -> usize {
        (self.month - 1) as usize
    }

    /// The following calendar month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month (28..=31)
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// 00:00:00 on the first day of the month
    pub fn first_instant(&self) -> NaiveDateTime {
        self.first_day().and_time(NaiveTime::MIN)
    }

    /// 23:59:59 on the last day of the month
    pub fn last_instant(&self) -> NaiveDateTime {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        self.last_day().and_time(end_of_day)
    }

    /// Check whether an instant falls inside the month window
    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        *instant >= self.first_instant() && *instant <= self.last_instant()
    }

    /// The given day of this month, clamped to the month's length
    ///
    /// An anchor on the 31st lands on the 30th in April and the 28th or 29th
    /// in February.
    pub fn clamped_day(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_else(|| self.first_day())
    }

    /// Iterate month by month from `self` through `end`, both inclusive
    ///
    /// Yields nothing if `end` precedes `self`.
    pub fn through(self, end: YearMonth) -> impl Iterator<Item = YearMonth> {
        std::iter::successors(Some(self), |ym| Some(ym.next())).take_while(move |ym| *ym <= end)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parse "YYYY-MM"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month in '{}'", s))?;
        YearMonth::new(year, month).ok_or_else(|| format!("Month out of range in '{}'", s))
    }
}
