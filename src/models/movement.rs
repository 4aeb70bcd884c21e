//! Movement model
//!
//! A movement is a single income or expense entry in the ledger. Fixed
//! movements recur monthly; their timestamp is the recurrence anchor
//! (day-of-month and time-of-day template).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MovementId;
use super::money::Money;
use super::month::YearMonth;

/// Storage format for movement timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a movement recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// Recurs every month from its anchor date
    Fixed,
    /// One-off or irregular
    Variable,
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "Fixed"),
            Self::Variable => write!(f, "Variable"),
        }
    }
}

impl std::str::FromStr for Periodicity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" | "f" => Ok(Self::Fixed),
            "variable" | "v" => Ok(Self::Variable),
            other => Err(format!("Unknown periodicity '{}' (use fixed or variable)", other)),
        }
    }
}

/// Direction of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Expense,
    Income,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "e" => Ok(Self::Expense),
            "income" | "i" => Ok(Self::Income),
            other => Err(format!("Unknown kind '{}' (use expense or income)", other)),
        }
    }
}

/// A stored timestamp that could not be understood
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized timestamp '{raw}'")]
pub struct TimestampParseError {
    raw: String,
}

impl TimestampParseError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Parse a stored timestamp
///
/// The canonical form is `YYYY-MM-DD HH:MM:SS`; ISO-8601 variants
/// (`T` separator, minute precision, or a bare date at midnight) are accepted
/// for records written by other tools.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampParseError> {
    let trimmed = raw.trim();
    const FORMATS: [&str; 4] = [
        TIMESTAMP_FORMAT,
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| TimestampParseError::new(raw))
}

/// Format a timestamp in the storage format
pub fn format_timestamp(instant: &NaiveDateTime) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// A persisted ledger movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Unique identifier, assigned by the store
    pub id: MovementId,

    pub description: String,

    pub periodicity: Periodicity,

    pub kind: MovementKind,

    /// Always non-negative; the kind carries the direction
    pub amount: Money,

    /// Stored as text; see [`Movement::instant`]
    pub timestamp: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Movement {
    /// Build a stored movement from validated input
    pub fn from_new(new: NewMovement) -> Self {
        let now = Utc::now();
        Self {
            id: MovementId::new(),
            description: new.description,
            periodicity: new.periodicity,
            kind: new.kind,
            amount: new.amount,
            timestamp: format_timestamp(&new.timestamp),
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-check the input invariants after an in-place edit
    pub fn validate(&self) -> Result<(), MovementValidationError> {
        validate_fields(&self.description, self.amount)
    }

    /// The parsed timestamp of this record
    pub fn instant(&self) -> Result<NaiveDateTime, TimestampParseError> {
        parse_timestamp(&self.timestamp)
    }

    /// The calendar month this record falls in
    pub fn month(&self) -> Result<YearMonth, TimestampParseError> {
        self.instant().map(|dt| YearMonth::of(&dt))
    }

    pub fn is_fixed(&self) -> bool {
        self.periodicity == Periodicity::Fixed
    }

    pub fn is_expense(&self) -> bool {
        self.kind == MovementKind::Expense
    }

    /// Amount signed by direction: income positive, expense negative
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            MovementKind::Income => self.amount,
            MovementKind::Expense => -self.amount,
        }
    }

    /// Structural identity used to decide whether a fixed occurrence exists
    pub fn same_obligation(&self, description: &str, kind: MovementKind, amount: Money) -> bool {
        self.is_fixed() && self.description == description && self.kind == kind && self.amount == amount
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.timestamp, self.periodicity, self.kind, self.description, self.amount
        )
    }
}

/// Input for inserting a movement into the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub description: String,
    pub periodicity: Periodicity,
    pub kind: MovementKind,
    pub amount: Money,
    /// Seconds are kept for materialized occurrences; user input is minute precision
    pub timestamp: NaiveDateTime,
}

impl NewMovement {
    /// Validate the invariants every stored movement must satisfy
    pub fn validate(&self) -> Result<(), MovementValidationError> {
        validate_fields(&self.description, self.amount)
    }
}

fn validate_fields(description: &str, amount: Money) -> Result<(), MovementValidationError> {
    if description.trim().is_empty() {
        return Err(MovementValidationError::EmptyDescription);
    }
    if amount.is_negative() {
        return Err(MovementValidationError::NegativeAmount(amount));
    }
    Ok(())
}

/// Validation errors for movements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementValidationError {
    EmptyDescription,
    NegativeAmount(Money),
}

impl fmt::Display for MovementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::NegativeAmount(amount) => {
                write!(f, "Amount must not be negative (got {})", amount)
            }
        }
    }
}

impl std::error::Error for MovementValidationError {}
