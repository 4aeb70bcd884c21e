//! Annual monthly view: actuals, then projections with an uncertainty band
//!
//! Months before the cutoff show the ledger's actual expense totals. From the
//! cutoff onward each month is the variable-expense forecast plus the fixed
//! projection, with a band one RMSE wide on either side, floored at zero.

use chrono::{Datelike, NaiveDateTime};

use crate::error::CashflowResult;
use crate::forecast::{forecast, ForecastMethod, DEFAULT_HORIZON};
use crate::models::Money;
use crate::storage::LedgerStore;

use super::fixed_projection::compute_fixed_projection;
use super::variable_series::compute_variable_series;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One year of monthly expense, actual where known and projected after
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyView {
    pub year: i32,
    /// Index of the first projected month; 12 when every month is actual
    pub cutoff: usize,
    pub series: [f64; 12],
    pub band_lower: [Option<f64>; 12],
    pub band_upper: [Option<f64>; 12],
    pub rmse: f64,
    /// Absent when no month needed a forecast
    pub method: Option<ForecastMethod>,
}

impl MonthlyView {
    pub fn is_projected(&self, month_index: usize) -> bool {
        month_index >= self.cutoff
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Monthly Expense View: {}\n", self.year));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<6} {:>14} {:>14} {:>14}  {}\n",
            "Month", "Expense", "Low", "High", "Source"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        let money = |v: f64| format!("{:.2} {}", v, currency_symbol);
        for (i, name) in MONTH_NAMES.iter().enumerate() {
            let band = |b: Option<f64>| b.map(money).unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:<6} {:>14} {:>14} {:>14}  {}\n",
                name,
                money(self.series[i]),
                band(self.band_lower[i]),
                band(self.band_upper[i]),
                if self.is_projected(i) { "projected" } else { "actual" }
            ));
        }

        if let Some(method) = &self.method {
            output.push('\n');
            output.push_str(&format!("Forecast: {}, RMSE {:.2}\n", method, self.rmse));
        }
        output
    }
}

/// Index of the first projected month of `year` as seen from `now`
///
/// The current year is projected from the current month, past years are all
/// actual and future years are all projected.
pub fn cutoff_for(year: i32, now: NaiveDateTime) -> usize {
    match year.cmp(&now.year()) {
        std::cmp::Ordering::Equal => now.month0() as usize,
        std::cmp::Ordering::Less => 12,
        std::cmp::Ordering::Greater => 0,
    }
}

/// Build the monthly view of `year`
pub fn compose_monthly_view<S>(store: &S, year: i32, now: NaiveDateTime) -> CashflowResult<MonthlyView>
where
    S: LedgerStore + ?Sized,
{
    let cutoff = cutoff_for(year, now);
    let actuals = actual_expenses(store, year)?;

    let mut view = MonthlyView {
        year,
        cutoff,
        series: [0.0; 12],
        band_lower: [None; 12],
        band_upper: [None; 12],
        rmse: 0.0,
        method: None,
    };
    view.series[..cutoff].copy_from_slice(&actuals[..cutoff]);

    if cutoff < 12 {
        let history = compute_variable_series(store)?;
        let outlook = forecast(&history.values(), DEFAULT_HORIZON);
        let fixed = compute_fixed_projection(store, year)?.values();

        for i in cutoff..12 {
            let value = outlook.predicted[i - cutoff] + fixed[i];
            view.series[i] = value;
            view.band_lower[i] = Some((value - outlook.rmse).max(0.0));
            view.band_upper[i] = Some(value + outlook.rmse);
        }
        view.rmse = outlook.rmse;
        view.method = Some(outlook.method);
    }

    Ok(view)
}

/// Every Expense movement of `year`, Fixed and Variable, by month
fn actual_expenses<S>(store: &S, year: i32) -> CashflowResult<[f64; 12]>
where
    S: LedgerStore + ?Sized,
{
    let mut totals = [Money::zero(); 12];
    for movement in store.list_all_movements_for_year(year)? {
        if !movement.is_expense() {
            continue;
        }
        // Records that fail to parse were already dropped by the store query
        if let Ok(month) = movement.month() {
            totals[month.index0()] += movement.amount;
        }
    }
    Ok(totals.map(|m| m.as_f64()))
}
