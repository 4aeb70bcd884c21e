//! Movement service
//!
//! Ledger CRUD on top of the storage layer. Every mutation is validated,
//! persisted, audited and then followed by a materialization pass so the
//! ledger never lags behind its fixed obligations.

use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use tracing::debug;

use crate::audit::Origin;
use crate::error::{CashflowError, CashflowResult};
use crate::models::{
    format_timestamp, Money, Movement, MovementId, MovementKind, NewMovement, Periodicity,
};
use crate::storage::Storage;

use super::materializer::{run_materialization, MaterializationReport};

/// Service for movement management
pub struct MovementService<'a> {
    storage: &'a Storage,
}

/// Options for filtering movements
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    /// Only this kind; all kinds when unset
    pub kind: Option<MovementKind>,
    /// Case-insensitive description substring
    pub text: Option<String>,
    /// Earliest day, from 00:00:00
    pub from: Option<NaiveDate>,
    /// Latest day, through 23:59:59
    pub to: Option<NaiveDate>,
    /// Maximum number of movements to return
    pub limit: Option<usize>,
}

impl MovementFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn from(mut self, day: NaiveDate) -> Self {
        self.from = Some(day);
        self
    }

    pub fn to(mut self, day: NaiveDate) -> Self {
        self.to = Some(day);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, movement: &Movement) -> bool {
        if let Some(kind) = self.kind {
            if movement.kind != kind {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if !movement
                .description
                .to_lowercase()
                .contains(&text.to_lowercase())
            {
                return false;
            }
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        // A date bound cannot be checked against a timestamp that does not parse
        let day = match movement.instant() {
            Ok(instant) => instant.date(),
            Err(_) => return false,
        };
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// Input for creating a movement
#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    pub description: String,
    pub periodicity: Periodicity,
    pub kind: MovementKind,
    pub amount: Money,
    /// Defaults to the current minute
    pub timestamp: Option<NaiveDateTime>,
}

/// Field changes for an existing movement; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct MovementPatch {
    pub description: Option<String>,
    pub periodicity: Option<Periodicity>,
    pub kind: Option<MovementKind>,
    pub amount: Option<Money>,
    pub timestamp: Option<NaiveDateTime>,
}

impl MovementPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.periodicity.is_none()
            && self.kind.is_none()
            && self.amount.is_none()
            && self.timestamp.is_none()
    }
}

/// Ledger totals by direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    pub income: Money,
    pub expense: Money,
}

impl Balance {
    /// Income minus expense
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

impl<'a> MovementService<'a> {
    /// Create a new movement service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a movement entered by the user, then materialize
    pub fn create(&self, input: CreateMovementInput, now: NaiveDateTime) -> CashflowResult<Movement> {
        let timestamp = input.timestamp.unwrap_or_else(|| truncate_to_minute(now));
        let movement = self.storage.insert_with_origin(
            NewMovement {
                description: input.description.trim().to_string(),
                periodicity: input.periodicity,
                kind: input.kind,
                amount: input.amount,
                timestamp,
            },
            Origin::User,
        )?;

        self.materialize(now)?;
        Ok(movement)
    }

    /// Get a movement by ID
    pub fn get(&self, id: MovementId) -> CashflowResult<Option<Movement>> {
        self.storage.movements.get(id)
    }

    /// Find a movement by full ID, short ID or hex prefix
    pub fn find(&self, identifier: &str) -> CashflowResult<Option<Movement>> {
        self.storage.movements.find(identifier)
    }

    /// Find a movement or fail with `NotFound`
    pub fn require(&self, identifier: &str) -> CashflowResult<Movement> {
        self.find(identifier)?
            .ok_or_else(|| CashflowError::movement_not_found(identifier))
    }

    /// List movements matching `filter`, newest first
    pub fn list(&self, filter: &MovementFilter) -> CashflowResult<Vec<Movement>> {
        let mut movements: Vec<Movement> = self
            .storage
            .movements
            .get_all()?
            .into_iter()
            .filter(|m| filter.matches(m))
            .collect();

        if let Some(limit) = filter.limit {
            movements.truncate(limit);
        }
        Ok(movements)
    }

    /// Apply `patch` to a movement, then materialize
    pub fn update(
        &self,
        id: MovementId,
        patch: MovementPatch,
        now: NaiveDateTime,
    ) -> CashflowResult<Movement> {
        let mut movement = self
            .get(id)?
            .ok_or_else(|| CashflowError::movement_not_found(id.to_string()))?;

        if let Some(description) = patch.description {
            movement.description = description.trim().to_string();
        }
        if let Some(periodicity) = patch.periodicity {
            movement.periodicity = periodicity;
        }
        if let Some(kind) = patch.kind {
            movement.kind = kind;
        }
        if let Some(amount) = patch.amount {
            movement.amount = amount;
        }
        if let Some(timestamp) = patch.timestamp {
            movement.timestamp = format_timestamp(&timestamp);
        }

        movement.validate().map_err(|e| CashflowError::Validation(e.to_string()))?;
        movement.updated_at = Utc::now();

        self.storage.replace_movement(movement.clone())?;
        self.materialize(now)?;
        Ok(movement)
    }

    /// Delete a movement, then materialize
    ///
    /// Deleting a fixed occurrence in an elapsed month while its anchor
    /// remains brings the occurrence back on the next pass.
    pub fn delete(&self, id: MovementId, now: NaiveDateTime) -> CashflowResult<Movement> {
        let removed = self.storage.remove_movement(id)?;
        self.materialize(now)?;
        Ok(removed)
    }

    /// Σ income and Σ expense over the whole ledger
    pub fn balance(&self) -> CashflowResult<Balance> {
        let movements = self.storage.movements.get_all()?;
        Ok(movements
            .iter()
            .fold(Balance::default(), |mut acc, m| {
                match m.kind {
                    MovementKind::Income => acc.income += m.amount,
                    MovementKind::Expense => acc.expense += m.amount,
                }
                acc
            }))
    }

    /// Count all movements
    pub fn count(&self) -> CashflowResult<usize> {
        self.storage.movements.count()
    }

    fn materialize(&self, now: NaiveDateTime) -> CashflowResult<MaterializationReport> {
        let report = run_materialization(self.storage, now)?;
        debug!(inserted = report.inserted_count(), "post-mutation materialization");
        Ok(report)
    }
}

fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CashflowPaths;
    use crate::storage::LedgerStore;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn input(
        description: &str,
        periodicity: Periodicity,
        kind: MovementKind,
        cents: i64,
        timestamp: NaiveDateTime,
    ) -> CreateMovementInput {
        CreateMovementInput {
            description: description.to_string(),
            periodicity,
            kind,
            amount: Money::from_cents(cents),
            timestamp: Some(timestamp),
        }
    }

    #[test]
    fn test_create_materializes_fixed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);

        let rent = service
            .create(
                input("Rent", Periodicity::Fixed, MovementKind::Expense, 80000, at(2023, 1, 31, 10, 0)),
                at(2023, 3, 15, 9, 0),
            )
            .unwrap();

        assert_eq!(rent.timestamp, "2023-01-31 10:00:00");
        let mut stamps: Vec<String> = service
            .list(&MovementFilter::new().text("rent"))
            .unwrap()
            .into_iter()
            .map(|m| m.timestamp)
            .collect();
        stamps.sort();
        assert_eq!(
            stamps,
            vec!["2023-01-31 10:00:00", "2023-02-28 10:00:00", "2023-03-31 10:00:00"]
        );
    }

    #[test]
    fn test_create_defaults_timestamp_to_current_minute() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        let now = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(14, 27, 51)
            .unwrap();

        let coffee = service
            .create(
                CreateMovementInput {
                    timestamp: None,
                    ..input("Coffee", Periodicity::Variable, MovementKind::Expense, 250, now)
                },
                now,
            )
            .unwrap();

        assert_eq!(coffee.timestamp, "2024-06-03 14:27:00");
    }

    #[test]
    fn test_create_rejects_empty_description() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);

        let err = service
            .create(
                input("   ", Periodicity::Variable, MovementKind::Expense, 100, at(2024, 1, 1, 0, 0)),
                at(2024, 1, 1, 0, 0),
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        let now = at(2024, 3, 31, 23, 0);

        for (desc, kind, cents, ts) in [
            ("Groceries", MovementKind::Expense, 6000, at(2024, 3, 2, 18, 0)),
            ("Bonus", MovementKind::Income, 50000, at(2024, 3, 10, 9, 0)),
            ("Grocery run", MovementKind::Expense, 3000, at(2024, 3, 20, 23, 59)),
            ("Cinema", MovementKind::Expense, 1200, at(2024, 2, 14, 21, 0)),
        ] {
            service
                .create(input(desc, Periodicity::Variable, kind, cents, ts), now)
                .unwrap();
        }

        let all = service.list(&MovementFilter::new()).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].description, "Grocery run");

        let groceries = service.list(&MovementFilter::new().text("GROCER")).unwrap();
        assert_eq!(groceries.len(), 2);

        let income = service
            .list(&MovementFilter::new().kind(MovementKind::Income))
            .unwrap();
        assert_eq!(income.len(), 1);

        let window = service
            .list(
                &MovementFilter::new()
                    .from(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
                    .to(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()),
            )
            .unwrap();
        assert_eq!(window.len(), 3);

        let limited = service.list(&MovementFilter::new().limit(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_update_applies_patch_and_materializes() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        let now = at(2024, 4, 10, 12, 0);

        let phone = service
            .create(
                input("Phone", Periodicity::Variable, MovementKind::Expense, 2000, at(2024, 2, 10, 9, 0)),
                now,
            )
            .unwrap();
        assert_eq!(service.count().unwrap(), 1);

        let updated = service
            .update(
                phone.id,
                MovementPatch {
                    periodicity: Some(Periodicity::Fixed),
                    ..Default::default()
                },
                now,
            )
            .unwrap();

        assert!(updated.is_fixed());
        assert_eq!(service.count().unwrap(), 3);
        assert_eq!(storage.list_fixed_movements().unwrap().len(), 3);
    }

    #[test]
    fn test_update_rejects_empty_description() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        let now = at(2024, 1, 5, 0, 0);
        let movement = service
            .create(
                input("Lunch", Periodicity::Variable, MovementKind::Expense, 1500, now),
                now,
            )
            .unwrap();

        let err = service
            .update(
                movement.id,
                MovementPatch {
                    description: Some(" ".into()),
                    ..Default::default()
                },
                now,
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get(movement.id).unwrap().unwrap().description, "Lunch");
    }

    #[test]
    fn test_update_unknown_movement() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        let err = service
            .update(MovementId::new(), MovementPatch::default(), at(2024, 1, 1, 0, 0))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_elapsed_occurrence_is_restored() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        let now = at(2024, 3, 15, 0, 0);
        service
            .create(
                input("Gym", Periodicity::Fixed, MovementKind::Expense, 3500, at(2024, 1, 5, 7, 0)),
                now,
            )
            .unwrap();

        let february = service
            .list(&MovementFilter::new().from(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()).to(
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            ))
            .unwrap();
        assert_eq!(february.len(), 1);

        service.delete(february[0].id, now).unwrap();
        assert_eq!(service.count().unwrap(), 3);
        assert!(service.get(february[0].id).unwrap().is_none());
    }

    #[test]
    fn test_balance() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        let now = at(2024, 5, 20, 0, 0);

        service
            .create(input("Salary", Periodicity::Variable, MovementKind::Income, 250000, now), now)
            .unwrap();
        service
            .create(input("Groceries", Periodicity::Variable, MovementKind::Expense, 6050, now), now)
            .unwrap();

        let balance = service.balance().unwrap();
        assert_eq!(balance.income.cents(), 250000);
        assert_eq!(balance.expense.cents(), 6050);
        assert_eq!(balance.net().cents(), 243950);
    }

    #[test]
    fn test_require_reports_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MovementService::new(&storage);
        assert!(service.require("mov-deadbeef").unwrap_err().is_not_found());
    }
}
