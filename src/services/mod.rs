//! Service layer for the cashflow ledger
//!
//! Business logic on top of the storage layer: user-facing movement CRUD and
//! the materialization pass that keeps fixed obligations filled in.

pub mod materializer;
pub mod movement;

pub use materializer::{run_materialization, MaterializationReport};
pub use movement::{
    Balance, CreateMovementInput, MovementFilter, MovementPatch, MovementService,
};
