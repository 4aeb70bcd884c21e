//! Audit logging for the ledger
//!
//! Records every create, update and delete of a movement, with before/after
//! snapshots, in an append-only JSONL file. Occurrences inserted by the
//! materializer are logged with [`Origin::Materializer`], which is the only
//! trace distinguishing them from user-entered movements.

mod diff;
mod entry;
mod logger;

pub use diff::describe_changes;
pub use entry::{AuditEntry, Operation, Origin};
pub use logger::AuditLogger;
