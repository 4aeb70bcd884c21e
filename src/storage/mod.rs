//! Storage layer for the cashflow ledger
//!
//! Provides JSON file storage with atomic writes, the audit trail for every
//! write, and the [`LedgerStore`] implementation the forecasting engine runs
//! against.

pub mod file_io;
pub mod ledger;
pub mod memory;
pub mod movements;

pub use file_io::{read_json, write_json_atomic};
pub use ledger::LedgerStore;
pub use memory::MemoryLedger;
pub use movements::MovementRepository;

use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, Origin};
use crate::config::paths::CashflowPaths;
use crate::error::{CashflowError, CashflowResult};
use crate::models::{Money, Movement, MovementId, MovementKind, NewMovement, YearMonth};

/// Main storage coordinator
pub struct Storage {
    paths: CashflowPaths,
    pub movements: MovementRepository,
    audit: AuditLogger,
    materialization: Mutex<()>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: CashflowPaths) -> Result<Self, CashflowError> {
        paths.ensure_directories()?;

        Ok(Self {
            movements: MovementRepository::new(paths.movements_file()),
            audit: AuditLogger::new(paths.audit_log()),
            materialization: Mutex::new(()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &CashflowPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), CashflowError> {
        self.movements.load()
    }

    /// Validate, persist and audit a new movement
    ///
    /// The in-memory insert is rolled back if the file write fails, so a
    /// failed insert leaves nothing behind. Once the file write succeeds the
    /// insert is committed; an audit failure after that point is logged and
    /// does not fail the call.
    pub fn insert_with_origin(
        &self,
        new: NewMovement,
        origin: Origin,
    ) -> CashflowResult<Movement> {
        new.validate()
            .map_err(|e| CashflowError::Validation(e.to_string()))?;

        let movement = Movement::from_new(new);
        self.movements.upsert(movement.clone())?;
        if let Err(err) = self.movements.save() {
            self.movements.delete(movement.id)?;
            return Err(err);
        }

        self.record(&AuditEntry::create(origin, &movement));
        Ok(movement)
    }

    /// Persist an edited movement, returning the previous version
    pub fn replace_movement(&self, updated: Movement) -> CashflowResult<Movement> {
        let previous = self
            .movements
            .get(updated.id)?
            .ok_or_else(|| CashflowError::movement_not_found(updated.id.to_string()))?;

        self.movements.upsert(updated.clone())?;
        if let Err(err) = self.movements.save() {
            self.movements.upsert(previous)?;
            return Err(err);
        }

        let diff = crate::audit::describe_changes(&previous, &updated);
        self.record(&AuditEntry::update(&previous, &updated, diff));
        Ok(previous)
    }

    /// Delete a movement, returning what was removed
    pub fn remove_movement(&self, id: MovementId) -> CashflowResult<Movement> {
        let removed = self
            .movements
            .delete(id)?
            .ok_or_else(|| CashflowError::movement_not_found(id.to_string()))?;

        if let Err(err) = self.movements.save() {
            self.movements.upsert(removed)?;
            return Err(err);
        }

        self.record(&AuditEntry::delete(&removed));
        Ok(removed)
    }

    /// Append to the audit log after a committed write
    fn record(&self, entry: &AuditEntry) {
        if let Err(err) = self.audit.log(entry) {
            warn!(movement = %entry.movement_id, %err, "failed to write audit entry");
        }
    }
}

impl LedgerStore for Storage {
    fn list_fixed_movements(&self) -> CashflowResult<Vec<Movement>> {
        self.movements.with_all(|all| ledger::fixed_in_anchor_order(all))
    }

    fn list_variable_expense_movements(&self) -> CashflowResult<Vec<Movement>> {
        self.movements.with_all(|all| ledger::variable_expenses(all))
    }

    fn list_all_movements_for_year(&self, year: i32) -> CashflowResult<Vec<Movement>> {
        self.movements.with_all(|all| ledger::in_year(all, year))
    }

    fn exists_fixed_in_month(
        &self,
        description: &str,
        kind: MovementKind,
        amount: Money,
        month: YearMonth,
    ) -> CashflowResult<bool> {
        self.movements
            .with_all(|all| ledger::has_fixed_in_month(all, description, kind, amount, month))
    }

    /// Inserts through this trait are the materializer's and are audited as such
    fn insert_movement(&self, movement: NewMovement) -> CashflowResult<MovementId> {
        self.insert_with_origin(movement, Origin::Materializer)
            .map(|m| m.id)
    }

    fn lock_materialization(&self) -> CashflowResult<MutexGuard<'_, ()>> {
        self.materialization.lock().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire materialization lock: {}", e))
        })
    }
}
