//! Display formatting for terminal output
//!
//! Renders movements, balances, forecasts and projections as plain-text
//! tables for the command line.

pub mod forecast;
pub mod movement;

pub use forecast::{format_fixed_projection, format_forecast};
pub use movement::{format_balance, format_movement_details, format_movement_list, format_movement_row};
