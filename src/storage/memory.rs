//! In-memory ledger store
//!
//! Holds movements in a vector behind a lock. Useful for embedding the engine
//! without touching disk and as the store in engine tests.

use std::sync::{Mutex, MutexGuard, RwLock};

use crate::error::{CashflowError, CashflowResult};
use crate::models::{Money, Movement, MovementId, MovementKind, NewMovement, YearMonth};

use super::ledger::{self, LedgerStore};

/// A [`LedgerStore`] that never persists
#[derive(Default)]
pub struct MemoryLedger {
    movements: RwLock<Vec<Movement>>,
    materialization: Mutex<()>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger with existing movements
    pub fn with_movements(movements: Vec<Movement>) -> Self {
        Self {
            movements: RwLock::new(movements),
            materialization: Mutex::new(()),
        }
    }

    /// Snapshot of everything stored, in insertion order
    pub fn movements(&self) -> CashflowResult<Vec<Movement>> {
        let data = self.movements.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    fn read<R>(&self, f: impl FnOnce(&[Movement]) -> R) -> CashflowResult<R> {
        let data = self.movements.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(f(&data))
    }
}

impl LedgerStore for MemoryLedger {
    fn list_fixed_movements(&self) -> CashflowResult<Vec<Movement>> {
        self.read(|all| ledger::fixed_in_anchor_order(all.iter()))
    }

    fn list_variable_expense_movements(&self) -> CashflowResult<Vec<Movement>> {
        self.read(|all| ledger::variable_expenses(all.iter()))
    }

    fn list_all_movements_for_year(&self, year: i32) -> CashflowResult<Vec<Movement>> {
        self.read(|all| ledger::in_year(all.iter(), year))
    }

    fn exists_fixed_in_month(
        &self,
        description: &str,
        kind: MovementKind,
        amount: Money,
        month: YearMonth,
    ) -> CashflowResult<bool> {
        self.read(|all| ledger::has_fixed_in_month(all.iter(), description, kind, amount, month))
    }

    fn insert_movement(&self, movement: NewMovement) -> CashflowResult<MovementId> {
        movement
            .validate()
            .map_err(|e| CashflowError::Validation(e.to_string()))?;

        let movement = Movement::from_new(movement);
        let id = movement.id;
        let mut data = self.movements.write().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.push(movement);
        Ok(id)
    }

    fn lock_materialization(&self) -> CashflowResult<MutexGuard<'_, ()>> {
        self.materialization.lock().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire materialization lock: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Periodicity;
    use chrono::NaiveDate;

    #[test]
    fn test_insert_and_query() {
        let ledger = MemoryLedger::new();
        let id = ledger
            .insert_movement(NewMovement {
                description: "Gym".to_string(),
                periodicity: Periodicity::Fixed,
                kind: MovementKind::Expense,
                amount: Money::from_cents(3500),
                timestamp: NaiveDate::from_ymd_opt(2024, 7, 5)
                    .unwrap()
                    .and_hms_opt(7, 0, 0)
                    .unwrap(),
            })
            .unwrap();

        let fixed = ledger.list_fixed_movements().unwrap();
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].id, id);
        assert!(ledger
            .exists_fixed_in_month(
                "Gym",
                MovementKind::Expense,
                Money::from_cents(3500),
                YearMonth::new(2024, 7).unwrap()
            )
            .unwrap());
    }

    #[test]
    fn test_lock_is_exclusive() {
        let ledger = MemoryLedger::new();
        let guard = ledger.lock_materialization().unwrap();
        assert!(ledger.materialization.try_lock().is_err());
        drop(guard);
        assert!(ledger.materialization.try_lock().is_ok());
    }
}
