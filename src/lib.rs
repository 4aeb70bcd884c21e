//! Cashflow - personal cash-flow ledger with recurring obligations and
//! expense forecasting
//!
//! The ledger records income and expense movements. Fixed movements recur
//! monthly from their anchor date and are materialized into one occurrence
//! per elapsed month. Variable expenses feed a seasonal forecaster whose
//! output, together with the fixed-cost projection and the actuals, forms a
//! year-long monthly view with an uncertainty band.
//!
//! # Architecture
//!
//! - `config`: configuration and path management
//! - `error`: custom error types
//! - `models`: movements, money and calendar months
//! - `storage`: JSON file storage and the [`LedgerStore`] contract
//! - `audit`: audit logging of every ledger write
//! - `forecast`: Holt-Winters smoothing with fallback policies
//! - `services`: movement CRUD and materialization
//! - `reports`: series, projection, monthly view and summaries
//!
//! # Example
//!
//! ```rust,ignore
//! use cashflow::{compose_monthly_view, run_materialization, MemoryLedger};
//!
//! let ledger = MemoryLedger::new();
//! let now = chrono::Local::now().naive_local();
//! run_materialization(&ledger, now)?;
//! let view = compose_monthly_view(&ledger, 2024, now)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod forecast;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{CashflowError, CashflowResult};
pub use forecast::{forecast, ForecastMethod, ForecastResult};
pub use reports::{
    compose_monthly_view, compute_fixed_projection, compute_variable_series, MonthlySeries,
    MonthlyView,
};
pub use services::{run_materialization, MaterializationReport};
pub use storage::{LedgerStore, MemoryLedger, Storage};
