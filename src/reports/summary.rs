//! Income and expense summaries for the overview
//!
//! Buckets income and expense by day of the current week, by month of the
//! current year, or by year over the most recent years in the ledger.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Money, Movement, MovementKind};

/// Years shown in the yearly summary at most
pub const MAX_SUMMARY_YEARS: usize = 6;

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Bucketing used by [`IncomeExpenseSummary::generate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode {
    /// Monday through Sunday of the week containing today
    Week,
    /// The twelve months of the current year
    #[default]
    Month,
    /// Each year present in the ledger
    Year,
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

impl FromStr for SummaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "year" | "y" => Ok(Self::Year),
            other => Err(format!("Unknown summary mode '{}' (use week, month or year)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryBucket {
    pub label: String,
    pub income: Money,
    pub expense: Money,
}

impl SummaryBucket {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            income: Money::zero(),
            expense: Money::zero(),
        }
    }

    fn add(&mut self, movement: &Movement) {
        match movement.kind {
            MovementKind::Income => self.income += movement.amount,
            MovementKind::Expense => self.expense += movement.amount,
        }
    }
}

/// Income and expense per bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeExpenseSummary {
    pub mode: SummaryMode,
    pub buckets: Vec<SummaryBucket>,
}

impl IncomeExpenseSummary {
    /// Summarize `movements` as seen on `today`
    ///
    /// Movements whose timestamp does not parse are left out.
    pub fn generate(movements: &[Movement], mode: SummaryMode, today: NaiveDate) -> Self {
        let dated = movements
            .iter()
            .filter_map(|m| m.instant().ok().map(|at| (at.date(), m)));

        let buckets = match mode {
            SummaryMode::Week => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                let mut buckets: Vec<SummaryBucket> =
                    WEEKDAY_NAMES.iter().map(|name| SummaryBucket::new(*name)).collect();
                for (day, movement) in dated {
                    let offset = (day - monday).num_days();
                    if (0..7).contains(&offset) {
                        buckets[offset as usize].add(movement);
                    }
                }
                buckets
            }
            SummaryMode::Month => {
                let mut buckets: Vec<SummaryBucket> =
                    MONTH_NAMES.iter().map(|name| SummaryBucket::new(*name)).collect();
                for (day, movement) in dated {
                    if day.year() == today.year() {
                        buckets[day.month0() as usize].add(movement);
                    }
                }
                buckets
            }
            SummaryMode::Year => {
                let mut by_year: BTreeMap<i32, SummaryBucket> = BTreeMap::new();
                for (day, movement) in dated {
                    by_year
                        .entry(day.year())
                        .or_insert_with(|| SummaryBucket::new(day.year().to_string()))
                        .add(movement);
                }
                let skip = by_year.len().saturating_sub(MAX_SUMMARY_YEARS);
                by_year.into_values().skip(skip).collect()
            }
        };

        Self { mode, buckets }
    }

    pub fn total_income(&self) -> Money {
        self.buckets.iter().map(|b| b.income).sum()
    }

    pub fn total_expense(&self) -> Money {
        self.buckets.iter().map(|b| b.expense).sum()
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Income and Expense by {}\n", self.mode));
        output.push_str(&"=".repeat(56));
        output.push('\n');
        output.push_str(&format!("{:<12} {:>20} {:>20}\n", "", "Income", "Expense"));
        output.push_str(&"-".repeat(56));
        output.push('\n');

        for bucket in &self.buckets {
            output.push_str(&format!(
                "{:<12} {:>20} {:>20}\n",
                bucket.label,
                bucket.income.format_with_symbol(currency_symbol),
                bucket.expense.format_with_symbol(currency_symbol)
            ));
        }

        output.push_str(&"-".repeat(56));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>20} {:>20}\n",
            "Total",
            self.total_income().format_with_symbol(currency_symbol),
            self.total_expense().format_with_symbol(currency_symbol)
        ));
        output
    }
}
