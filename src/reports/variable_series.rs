//! Variable expense aggregation
//!
//! Groups Variable Expense movements by calendar month. The series is
//! sparse: months with no activity are absent, not zero.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::CashflowResult;
use crate::models::{Money, YearMonth};
use crate::storage::LedgerStore;

/// Monthly totals keyed by calendar month, in chronological order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySeries {
    totals: BTreeMap<YearMonth, Money>,
}

impl MonthlySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the total for `month`
    pub fn add(&mut self, month: YearMonth, amount: Money) {
        *self.totals.entry(month).or_default() += amount;
    }

    pub fn get(&self, month: YearMonth) -> Option<Money> {
        self.totals.get(&month).copied()
    }

    pub fn keys(&self) -> Vec<YearMonth> {
        self.totals.keys().copied().collect()
    }

    /// Totals in currency units, chronological
    pub fn values(&self) -> Vec<f64> {
        self.totals.values().map(Money::as_f64).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, Money)> + '_ {
        self.totals.iter().map(|(k, v)| (*k, *v))
    }

    /// Latest month with activity
    pub fn last_month(&self) -> Option<YearMonth> {
        self.totals.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();
        output.push_str("Variable Expenses by Month\n");
        output.push_str(&"=".repeat(40));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No variable expenses recorded.\n");
            return output;
        }

        for (month, total) in self.iter() {
            output.push_str(&format!(
                "{:<10} {:>20}\n",
                month.to_string(),
                total.format_with_symbol(currency_symbol)
            ));
        }
        output
    }
}

/// Sum every Variable Expense movement into its calendar month
pub fn compute_variable_series<S>(store: &S) -> CashflowResult<MonthlySeries>
where
    S: LedgerStore + ?Sized,
{
    let mut series = MonthlySeries::new();
    for movement in store.list_variable_expense_movements()? {
        match movement.month() {
            Ok(month) => series.add(month, movement.amount),
            Err(err) => warn!(movement = %movement.id, %err, "skipping variable expense"),
        }
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Movement, MovementKind, NewMovement, Periodicity};
    use crate::storage::MemoryLedger;
    use chrono::NaiveDate;

    fn movement(periodicity: Periodicity, kind: MovementKind, cents: i64, ymd: (i32, u32, u32)) -> NewMovement {
        NewMovement {
            description: "Item".to_string(),
            periodicity,
            kind,
            amount: Money::from_cents(cents),
            timestamp: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_groups_and_sorts_by_month() {
        let ledger = MemoryLedger::new();
        for (cents, ymd) in [
            (1000, (2024, 3, 5)),
            (2550, (2023, 12, 31)),
            (450, (2024, 3, 28)),
            (700, (2024, 1, 1)),
        ] {
            ledger
                .insert_movement(movement(Periodicity::Variable, MovementKind::Expense, cents, ymd))
                .unwrap();
        }

        let series = compute_variable_series(&ledger).unwrap();

        assert_eq!(series.keys(), vec![ym(2023, 12), ym(2024, 1), ym(2024, 3)]);
        assert_eq!(series.values(), vec![25.5, 7.0, 14.5]);
        assert_eq!(series.get(ym(2024, 2)), None);
        assert_eq!(series.last_month(), Some(ym(2024, 3)));
    }

    #[test]
    fn test_ignores_fixed_and_income() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(movement(Periodicity::Fixed, MovementKind::Expense, 80000, (2024, 1, 31)))
            .unwrap();
        ledger
            .insert_movement(movement(Periodicity::Variable, MovementKind::Income, 5000, (2024, 1, 10)))
            .unwrap();

        assert!(compute_variable_series(&ledger).unwrap().is_empty());
    }

    #[test]
    fn test_skips_unparseable_timestamps() {
        let mut broken = Movement::from_new(movement(
            Periodicity::Variable,
            MovementKind::Expense,
            999,
            (2024, 1, 1),
        ));
        broken.timestamp = "yesterday".to_string();
        let ledger = MemoryLedger::with_movements(vec![broken]);
        ledger
            .insert_movement(movement(Periodicity::Variable, MovementKind::Expense, 100, (2024, 2, 2)))
            .unwrap();

        let series = compute_variable_series(&ledger).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(ym(2024, 2)), Some(Money::from_cents(100)));
    }

    #[test]
    fn test_format_terminal() {
        let mut series = MonthlySeries::new();
        series.add(ym(2024, 5), Money::from_cents(12345));
        let output = series.format_terminal("€");
        assert!(output.contains("2024-05"));
        assert!(output.contains("123.45 €"));
    }
}
