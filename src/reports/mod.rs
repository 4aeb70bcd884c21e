//! Reports over the ledger
//!
//! The variable-expense series, the fixed-cost projection and the monthly
//! view that combines them with the forecast, plus income/expense summaries.

pub mod fixed_projection;
pub mod monthly_view;
pub mod summary;
pub mod variable_series;

pub use fixed_projection::{compute_fixed_projection, FixedProjection};
pub use monthly_view::{compose_monthly_view, cutoff_for, MonthlyView};
pub use summary::{IncomeExpenseSummary, SummaryBucket, SummaryMode};
pub use variable_series::{compute_variable_series, MonthlySeries};
