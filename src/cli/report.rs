//! CLI commands for reports and forecasting

use chrono::{Datelike, NaiveDateTime};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_fixed_projection, format_forecast};
use crate::error::{CashflowError, CashflowResult};
use crate::forecast::forecast;
use crate::reports::{
    compose_monthly_view, compute_fixed_projection, compute_variable_series,
    IncomeExpenseSummary, SummaryMode,
};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Variable expenses summed by month
    Series,

    /// Fixed expenses projected across a year
    Projection {
        /// Year to project (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Forecast variable expenses from their monthly history
    Forecast {
        /// Months to forecast (defaults to the configured horizon)
        #[arg(long)]
        horizon: Option<usize>,
    },

    /// Actual and projected expense for each month of a year
    #[command(alias = "monthly")]
    View {
        /// Year to show (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Income and expense by week, month or year
    Summary {
        /// week, month or year
        #[arg(short, long, default_value = "month")]
        mode: String,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
    now: NaiveDateTime,
) -> CashflowResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Series => {
            let series = compute_variable_series(storage)?;
            print!("{}", series.format_terminal(symbol));
        }

        ReportCommands::Projection { year } => {
            let projection = compute_fixed_projection(storage, year.unwrap_or_else(|| now.year()))?;
            print!("{}", format_fixed_projection(&projection, symbol));
        }

        ReportCommands::Forecast { horizon } => {
            let horizon = horizon.unwrap_or(settings.forecast_horizon);
            if horizon == 0 {
                return Err(CashflowError::Validation(
                    "Horizon must be at least one month".into(),
                ));
            }

            let series = compute_variable_series(storage)?;
            let result = forecast(&series.values(), horizon);
            print!("{}", format_forecast(&series, &result, symbol));
        }

        ReportCommands::View { year } => {
            let view = compose_monthly_view(storage, year.unwrap_or_else(|| now.year()), now)?;
            print!("{}", view.format_terminal(symbol));
        }

        ReportCommands::Summary { mode } => {
            let mode: SummaryMode = mode.parse().map_err(CashflowError::Validation)?;
            let movements = storage.movements.get_all()?;
            let summary = IncomeExpenseSummary::generate(&movements, mode, now.date());
            print!("{}", summary.format_terminal(symbol));
        }
    }

    Ok(())
}
