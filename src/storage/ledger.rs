//! The ledger store contract the forecasting engine reads and writes through
//!
//! The engine never touches files directly; it is handed something that
//! implements [`LedgerStore`]. The JSON-backed [`Storage`](super::Storage) is
//! the production implementation and [`MemoryLedger`](super::MemoryLedger)
//! backs tests and embedding callers.

use std::sync::MutexGuard;

use tracing::warn;

use crate::error::CashflowResult;
use crate::models::{Money, Movement, MovementId, MovementKind, NewMovement, Periodicity, YearMonth};

/// Operations the engine consumes from a movement store
pub trait LedgerStore {
    /// Every Fixed movement, ordered by stored timestamp ascending
    fn list_fixed_movements(&self) -> CashflowResult<Vec<Movement>>;

    /// Every Variable movement of kind Expense
    fn list_variable_expense_movements(&self) -> CashflowResult<Vec<Movement>>;

    /// Every movement whose timestamp falls in `year`
    ///
    /// Records with unparseable timestamps are left out.
    fn list_all_movements_for_year(&self, year: i32) -> CashflowResult<Vec<Movement>>;

    /// Whether a Fixed movement with this description, kind and amount already
    /// has a timestamp inside `month`
    fn exists_fixed_in_month(
        &self,
        description: &str,
        kind: MovementKind,
        amount: Money,
        month: YearMonth,
    ) -> CashflowResult<bool>;

    /// Persist a new movement as a single atomic write
    fn insert_movement(&self, movement: NewMovement) -> CashflowResult<MovementId>;

    /// Serialize materialization passes
    ///
    /// The existence check and the insert that follows it are two calls; the
    /// guard must be held across the whole pass so concurrent callers cannot
    /// both see a month as empty.
    fn lock_materialization(&self) -> CashflowResult<MutexGuard<'_, ()>>;
}

/// Fixed movements in anchor order: stored timestamp, then creation instant
pub(crate) fn fixed_in_anchor_order<'a>(
    movements: impl Iterator<Item = &'a Movement>,
) -> Vec<Movement> {
    let mut fixed: Vec<Movement> = movements.filter(|m| m.is_fixed()).cloned().collect();
    fixed.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.created_at.cmp(&b.created_at))
    });
    fixed
}

pub(crate) fn variable_expenses<'a>(movements: impl Iterator<Item = &'a Movement>) -> Vec<Movement> {
    movements
        .filter(|m| m.periodicity == Periodicity::Variable && m.is_expense())
        .cloned()
        .collect()
}

pub(crate) fn in_year<'a>(movements: impl Iterator<Item = &'a Movement>, year: i32) -> Vec<Movement> {
    movements
        .filter(|m| match m.month() {
            Ok(month) => month.year() == year,
            Err(err) => {
                warn!(movement = %m.id, %err, "skipping movement with unparseable timestamp");
                false
            }
        })
        .cloned()
        .collect()
}

pub(crate) fn has_fixed_in_month<'a>(
    mut movements: impl Iterator<Item = &'a Movement>,
    description: &str,
    kind: MovementKind,
    amount: Money,
    month: YearMonth,
) -> bool {
    movements.any(|m| {
        m.same_obligation(description, kind, amount)
            && m.instant().map(|at| month.contains(&at)).unwrap_or(false)
    })
}
