//! Fixed-movement materialization
//!
//! Every Fixed movement is an anchor for a monthly obligation. A pass walks
//! each anchor forward month by month up to the current month and inserts an
//! occurrence wherever the ledger has no Fixed movement with the same
//! description, kind and amount. The day of month is clamped to the month's
//! length, the anchor's time of day is kept.

use chrono::{Datelike, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::CashflowResult;
use crate::models::{MovementId, NewMovement, YearMonth};
use crate::storage::LedgerStore;

/// Outcome of one materialization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializationReport {
    /// Fixed movements examined as anchors
    pub scanned: usize,
    /// Anchors skipped because their timestamp could not be parsed
    pub skipped_unparseable: usize,
    /// Occurrences created, in insertion order
    pub inserted: Vec<MovementId>,
}

impl MaterializationReport {
    pub fn inserted_count(&self) -> usize {
        self.inserted.len()
    }
}

/// Fill in the missing monthly occurrences of every Fixed movement up to
/// the month containing `now`
///
/// Holds the store's materialization lock for the whole pass. A storage
/// failure stops the pass; occurrences already inserted stay inserted and a
/// later pass picks up where this one stopped.
pub fn run_materialization<S>(store: &S, now: NaiveDateTime) -> CashflowResult<MaterializationReport>
where
    S: LedgerStore + ?Sized,
{
    let _guard = store.lock_materialization()?;

    let anchors = store.list_fixed_movements()?;
    let current = YearMonth::of(&now);
    let mut report = MaterializationReport {
        scanned: anchors.len(),
        ..Default::default()
    };

    for anchor in &anchors {
        let start = match anchor.instant() {
            Ok(instant) => instant,
            Err(err) => {
                warn!(movement = %anchor.id, %err, "skipping fixed movement");
                report.skipped_unparseable += 1;
                continue;
            }
        };

        for month in YearMonth::of(&start).through(current) {
            if store.exists_fixed_in_month(&anchor.description, anchor.kind, anchor.amount, month)? {
                continue;
            }

            let timestamp = month.clamped_day(start.day()).and_time(start.time());
            let id = store.insert_movement(NewMovement {
                description: anchor.description.clone(),
                periodicity: anchor.periodicity,
                kind: anchor.kind,
                amount: anchor.amount,
                timestamp,
            })?;
            debug!(movement = %id, anchor = %anchor.id, %month, "materialized occurrence");
            report.inserted.push(id);
        }
    }

    if report.inserted_count() > 0 || report.skipped_unparseable > 0 {
        info!(
            inserted = report.inserted_count(),
            skipped = report.skipped_unparseable,
            "materialization pass complete"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::MutexGuard;

    use chrono::NaiveDate;

    use super::*;
    use crate::error::CashflowError;
    use crate::models::{Money, Movement, MovementKind, Periodicity};
    use crate::storage::MemoryLedger;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn fixed(description: &str, kind: MovementKind, cents: i64, timestamp: NaiveDateTime) -> NewMovement {
        NewMovement {
            description: description.to_string(),
            periodicity: Periodicity::Fixed,
            kind,
            amount: Money::from_cents(cents),
            timestamp,
        }
    }

    fn timestamps_of(ledger: &MemoryLedger, description: &str) -> Vec<String> {
        let mut stamps: Vec<String> = ledger
            .movements()
            .unwrap()
            .into_iter()
            .filter(|m| m.description == description)
            .map(|m| m.timestamp)
            .collect();
        stamps.sort();
        stamps
    }

    #[test]
    fn test_rent_fills_every_month_with_clamped_day() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed("Rent", MovementKind::Expense, 80000, at(2023, 1, 31, 10, 0, 0)))
            .unwrap();

        let report = run_materialization(&ledger, at(2023, 4, 15, 12, 0, 0)).unwrap();

        assert_eq!(report.scanned, 1);
        assert_eq!(report.inserted_count(), 3);
        assert_eq!(
            timestamps_of(&ledger, "Rent"),
            vec![
                "2023-01-31 10:00:00",
                "2023-02-28 10:00:00",
                "2023-03-31 10:00:00",
                "2023-04-30 10:00:00",
            ]
        );
    }

    #[test]
    fn test_leap_year_february() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed("Rent", MovementKind::Expense, 80000, at(2024, 1, 30, 8, 15, 42)))
            .unwrap();

        run_materialization(&ledger, at(2024, 2, 1, 0, 0, 0)).unwrap();

        assert_eq!(
            timestamps_of(&ledger, "Rent"),
            vec!["2024-01-30 08:15:42", "2024-02-29 08:15:42"]
        );
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed("Rent", MovementKind::Expense, 80000, at(2023, 1, 31, 10, 0, 0)))
            .unwrap();
        ledger
            .insert_movement(fixed("Salary", MovementKind::Income, 250000, at(2023, 2, 25, 9, 0, 0)))
            .unwrap();
        let now = at(2023, 6, 1, 0, 0, 0);

        let first = run_materialization(&ledger, now).unwrap();
        let count = ledger.movements().unwrap().len();
        let second = run_materialization(&ledger, now).unwrap();

        assert_eq!(first.inserted_count(), 5 + 4);
        assert_eq!(second.inserted_count(), 0);
        assert_eq!(ledger.movements().unwrap().len(), count);
    }

    #[test]
    fn test_identity_includes_kind_and_amount() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed("Gym", MovementKind::Expense, 3500, at(2024, 1, 5, 7, 0, 0)))
            .unwrap();
        // Price change in March: a different obligation for the same description
        ledger
            .insert_movement(fixed("Gym", MovementKind::Expense, 4000, at(2024, 3, 5, 7, 0, 0)))
            .unwrap();

        run_materialization(&ledger, at(2024, 3, 20, 0, 0, 0)).unwrap();

        let old_price = ledger
            .movements()
            .unwrap()
            .into_iter()
            .filter(|m| m.amount == Money::from_cents(3500))
            .count();
        let new_price = ledger
            .movements()
            .unwrap()
            .into_iter()
            .filter(|m| m.amount == Money::from_cents(4000))
            .count();
        assert_eq!(old_price, 3);
        assert_eq!(new_price, 1);
    }

    #[test]
    fn test_anchor_in_the_future_inserts_nothing() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(fixed("Insurance", MovementKind::Expense, 12000, at(2025, 9, 1, 0, 0, 0)))
            .unwrap();

        let report = run_materialization(&ledger, at(2025, 6, 1, 0, 0, 0)).unwrap();
        assert_eq!(report.inserted_count(), 0);
    }

    #[test]
    fn test_variable_movements_are_not_anchors() {
        let ledger = MemoryLedger::new();
        ledger
            .insert_movement(NewMovement {
                periodicity: Periodicity::Variable,
                ..fixed("Coffee", MovementKind::Expense, 250, at(2024, 1, 3, 8, 0, 0))
            })
            .unwrap();

        let report = run_materialization(&ledger, at(2024, 5, 1, 0, 0, 0)).unwrap();
        assert_eq!(report.scanned, 0);
        assert_eq!(report.inserted_count(), 0);
    }

    #[test]
    fn test_unparseable_anchor_is_skipped() {
        let mut broken = Movement::from_new(fixed("Broken", MovementKind::Expense, 100, at(2024, 1, 1, 0, 0, 0)));
        broken.timestamp = "31/01/2024".to_string();
        let ledger = MemoryLedger::with_movements(vec![broken]);
        ledger
            .insert_movement(fixed("Phone", MovementKind::Expense, 2000, at(2024, 1, 10, 9, 0, 0)))
            .unwrap();

        let report = run_materialization(&ledger, at(2024, 2, 15, 0, 0, 0)).unwrap();

        assert_eq!(report.skipped_unparseable, 1);
        assert_eq!(report.inserted_count(), 1);
        assert_eq!(timestamps_of(&ledger, "Broken").len(), 1);
    }

    /// Delegates to a memory ledger but fails inserts after a quota
    struct FailingStore {
        inner: MemoryLedger,
        inserts_left: Cell<usize>,
    }

    impl LedgerStore for FailingStore {
        fn list_fixed_movements(&self) -> CashflowResult<Vec<Movement>> {
            self.inner.list_fixed_movements()
        }

        fn list_variable_expense_movements(&self) -> CashflowResult<Vec<Movement>> {
            self.inner.list_variable_expense_movements()
        }

        fn list_all_movements_for_year(&self, year: i32) -> CashflowResult<Vec<Movement>> {
            self.inner.list_all_movements_for_year(year)
        }

        fn exists_fixed_in_month(
            &self,
            description: &str,
            kind: MovementKind,
            amount: Money,
            month: YearMonth,
        ) -> CashflowResult<bool> {
            self.inner.exists_fixed_in_month(description, kind, amount, month)
        }

        fn insert_movement(&self, movement: NewMovement) -> CashflowResult<MovementId> {
            match self.inserts_left.get() {
                0 => Err(CashflowError::Storage("disk full".into())),
                n => {
                    self.inserts_left.set(n - 1);
                    self.inner.insert_movement(movement)
                }
            }
        }

        fn lock_materialization(&self) -> CashflowResult<MutexGuard<'_, ()>> {
            self.inner.lock_materialization()
        }
    }

    #[test]
    fn test_storage_failure_aborts_and_keeps_earlier_inserts() {
        let inner = MemoryLedger::new();
        inner
            .insert_movement(fixed("Rent", MovementKind::Expense, 80000, at(2023, 1, 31, 10, 0, 0)))
            .unwrap();
        let store = FailingStore {
            inner,
            inserts_left: Cell::new(2),
        };
        let now = at(2023, 6, 1, 0, 0, 0);

        let err = run_materialization(&store, now).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.inner.movements().unwrap().len(), 3);

        store.inserts_left.set(usize::MAX);
        let report = run_materialization(&store, now).unwrap();
        assert_eq!(report.inserted_count(), 3);
        assert_eq!(timestamps_of(&store.inner, "Rent").len(), 6);
    }
}
