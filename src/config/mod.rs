//! Configuration module for the cashflow ledger
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::CashflowPaths;
pub use settings::Settings;
