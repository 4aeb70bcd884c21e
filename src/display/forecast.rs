//! Forecast and projection display formatting

use crate::forecast::ForecastResult;
use crate::reports::{FixedProjection, MonthlySeries};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format a variable-expense forecast, labelling steps by the months that
/// follow the last month of history
pub fn format_forecast(series: &MonthlySeries, result: &ForecastResult, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Variable Expense Forecast\n");
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!("Method:  {}\n", result.method));
    output.push_str(&format!("History: {} month(s)\n", series.len()));
    output.push_str(&format!("RMSE:    {:.2}\n\n", result.rmse));

    let mut month = series.last_month().map(|m| m.next());
    for (step, value) in result.predicted.iter().enumerate() {
        let label = match month {
            Some(m) => m.to_string(),
            None => format!("+{}", step + 1),
        };
        output.push_str(&format!("{:<10} {:>16.2} {}\n", label, value, currency_symbol));
        month = month.map(|m| m.next());
    }

    output
}

/// Format a fixed-cost projection by month
pub fn format_fixed_projection(projection: &FixedProjection, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Fixed Expense Projection: {}\n", projection.year));
    output.push_str(&"=".repeat(40));
    output.push('\n');

    for (name, total) in MONTH_NAMES.iter().zip(projection.months.iter()) {
        output.push_str(&format!(
            "{:<6} {:>20}\n",
            name,
            total.format_with_symbol(currency_symbol)
        ));
    }

    output.push_str(&"-".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "{:<6} {:>20}\n",
        "Total",
        projection.total().format_with_symbol(currency_symbol)
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::forecast;
    use crate::models::{Money, YearMonth};

    #[test]
    fn test_forecast_labels_follow_history() {
        let mut series = MonthlySeries::new();
        series.add(YearMonth::new(2024, 11).unwrap(), Money::from_cents(1000));
        series.add(YearMonth::new(2024, 12).unwrap(), Money::from_cents(3000));
        let result = forecast(&series.values(), 2);

        let output = format_forecast(&series, &result, "€");
        assert!(output.contains("2025-01"));
        assert!(output.contains("2025-02"));
        assert!(output.contains("20.00 €"));
        assert!(output.contains("mean of history"));
    }

    #[test]
    fn test_forecast_without_history() {
        let series = MonthlySeries::new();
        let result = forecast(&[], 1);
        assert!(format_forecast(&series, &result, "€").contains("+1"));
    }

    #[test]
    fn test_fixed_projection_total() {
        let projection = FixedProjection {
            year: 2024,
            months: [Money::from_cents(500); 12],
        };
        let output = format_fixed_projection(&projection, "€");
        assert!(output.contains("Fixed Expense Projection: 2024"));
        assert!(output.contains("60.00 €"));
    }
}
