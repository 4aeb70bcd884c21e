//! Fixed-cost projection for a calendar year
//!
//! Each Fixed Expense row adds its amount to every month from its start
//! month through December. Rows anchored in an earlier year count from
//! January. Fixed Income does not enter the projection.
//!
//! Every Fixed Expense row counts, materialized occurrences included, so a
//! long-running obligation contributes once per stored occurrence.

use chrono::Datelike;
use tracing::warn;

use crate::error::CashflowResult;
use crate::models::{Money, MovementKind};
use crate::storage::LedgerStore;

/// Projected fixed expense per month of one year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProjection {
    pub year: i32,
    pub months: [Money; 12],
}

impl FixedProjection {
    /// Monthly totals in currency units
    pub fn values(&self) -> [f64; 12] {
        self.months.map(|m| m.as_f64())
    }

    pub fn total(&self) -> Money {
        self.months.iter().copied().sum()
    }
}

/// Project fixed expenses across `year`
pub fn compute_fixed_projection<S>(store: &S, year: i32) -> CashflowResult<FixedProjection>
where
    S: LedgerStore + ?Sized,
{
    let mut months = [Money::zero(); 12];

    for movement in store.list_fixed_movements()? {
        if movement.kind != MovementKind::Expense {
            continue;
        }
        let anchor = match movement.instant() {
            Ok(anchor) => anchor,
            Err(err) => {
                warn!(movement = %movement.id, %err, "skipping fixed expense");
                continue;
            }
        };
        if anchor.year() > year {
            continue;
        }

        let start = if anchor.year() == year {
            anchor.month0() as usize
        } else {
            0
        };
        for total in &mut months[start..] {
            *total += movement.amount;
        }
    }

    Ok(FixedProjection { year, months })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewMovement, Periodicity};
    use crate::storage::MemoryLedger;
    use chrono::NaiveDate;

    fn fixed(kind: MovementKind, cents: i64, y: i32, m: u32, d: u32) -> NewMovement {
        NewMovement {
            description: "Obligation".to_string(),
            periodicity: Periodicity::Fixed,
            kind,
            amount: Money::from_cents(cents),
            timestamp: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_march_anchor_fills_ten_months() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed(MovementKind::Expense, 10000, 2024, 3, 15))
            .unwrap();

        let projection = compute_fixed_projection(&ledger, 2024).unwrap();

        let nonzero = projection.months.iter().filter(|m| !m.is_zero()).count();
        assert_eq!(nonzero, 10);
        assert!(projection.months[0].is_zero());
        assert!(projection.months[1].is_zero());
        assert_eq!(projection.months[2], Money::from_cents(10000));
        assert_eq!(projection.total(), Money::from_cents(100000));
    }

    #[test]
    fn test_earlier_anchor_counts_from_january() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed(MovementKind::Expense, 5000, 2022, 8, 1))
            .unwrap();

        let projection = compute_fixed_projection(&ledger, 2024).unwrap();
        assert_eq!(projection.values(), [50.0; 12]);
    }

    #[test]
    fn test_future_anchor_and_income_ignored() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed(MovementKind::Expense, 5000, 2025, 1, 1))
            .unwrap();
        ledger
            .insert_movement(fixed(MovementKind::Income, 250000, 2024, 1, 25))
            .unwrap();

        let projection = compute_fixed_projection(&ledger, 2024).unwrap();
        assert_eq!(projection.total(), Money::zero());
    }

    #[test]
    fn test_each_occurrence_adds_through_december() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed(MovementKind::Expense, 1000, 2024, 11, 5))
            .unwrap();
        ledger
            .insert_movement(fixed(MovementKind::Expense, 1000, 2024, 12, 5))
            .unwrap();

        let projection = compute_fixed_projection(&ledger, 2024).unwrap();
        assert_eq!(projection.months[10], Money::from_cents(1000));
        assert_eq!(projection.months[11], Money::from_cents(2000));
    }
}
