//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod movement;
pub mod report;

pub use movement::{handle_movement_command, MovementCommands};
pub use report::{handle_report_command, ReportCommands};
