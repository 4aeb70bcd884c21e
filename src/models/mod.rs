//! Core data models for the cashflow ledger
//!
//! Movements are the only persisted entity; the rest are value types the
//! forecasting pipeline passes around.

pub mod ids;
pub mod money;
pub mod month;
pub mod movement;

pub use ids::MovementId;
pub use money::{Money, MoneyParseError};
pub use month::YearMonth;
pub use movement::{
    format_timestamp, parse_timestamp, Movement, MovementKind, MovementValidationError,
    NewMovement, Periodicity, TimestampParseError, TIMESTAMP_FORMAT,
};
