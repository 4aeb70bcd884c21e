//! Movement repository for JSON storage
//!
//! Manages loading and saving movements to movements.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::CashflowError;
use crate::models::{Movement, MovementId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable movement data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MovementData {
    movements: Vec<Movement>,
}

/// Repository for movement persistence
pub struct MovementRepository {
    path: PathBuf,
    data: RwLock<HashMap<MovementId, Movement>>,
}

impl MovementRepository {
    /// Create a new movement repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load movements from disk, replacing anything held in memory
    pub fn load(&self) -> Result<(), CashflowError> {
        let file_data: MovementData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for movement in file_data.movements {
            data.insert(movement.id, movement);
        }

        Ok(())
    }

    /// Save movements to disk
    pub fn save(&self) -> Result<(), CashflowError> {
        let data = self.data.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut movements: Vec<_> = data.values().cloned().collect();
        movements.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then(a.created_at.cmp(&b.created_at))
        });

        write_json_atomic(&self.path, &MovementData { movements })
    }

    /// Run a read-only closure over every stored movement
    pub(crate) fn with_all<R>(
        &self,
        f: impl FnOnce(&mut dyn Iterator<Item = &Movement>) -> R,
    ) -> Result<R, CashflowError> {
        let data = self.data.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(f(&mut data.values()))
    }

    /// Get a movement by ID
    pub fn get(&self, id: MovementId) -> Result<Option<Movement>, CashflowError> {
        let data = self.data.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Find a movement by full or short ID
    pub fn find(&self, identifier: &str) -> Result<Option<Movement>, CashflowError> {
        let data = self.data.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut matches = data.values().filter(|m| m.id.matches(identifier));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(Some(found.clone())),
            (Some(_), Some(_)) => Err(CashflowError::Validation(format!(
                "Identifier '{}' matches more than one movement",
                identifier
            ))),
            _ => Ok(None),
        }
    }

    /// Get all movements, newest first
    pub fn get_all(&self) -> Result<Vec<Movement>, CashflowError> {
        let data = self.data.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut movements: Vec<_> = data.values().cloned().collect();
        movements.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(movements)
    }

    /// Insert or update a movement in memory
    pub fn upsert(&self, movement: Movement) -> Result<Option<Movement>, CashflowError> {
        let mut data = self.data.write().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.insert(movement.id, movement))
    }

    /// Delete a movement from memory, returning it if it existed
    pub fn delete(&self, id: MovementId) -> Result<Option<Movement>, CashflowError> {
        let mut data = self.data.write().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }

    /// Count movements
    pub fn count(&self) -> Result<usize, CashflowError> {
        let data = self.data.read().map_err(|e| {
            CashflowError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
