//! Custom error types for the cashflow ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::TimestampParseError;

/// The main error type for cashflow operations
#[derive(Error, Debug)]
pub enum CashflowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Ledger store unreachable or a write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored or user-supplied timestamp could not be understood
    #[error("Parse error: {0}")]
    Parse(#[from] TimestampParseError),
}

impl CashflowError {
    /// Create a "not found" error for movements
    pub fn movement_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Movement",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<std::io::Error> for CashflowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CashflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for cashflow operations
pub type CashflowResult<T> = Result<T, CashflowError>;
