//! Audit entry data structures
//!
//! Defines the structure of audit log entries: which operation touched which
//! movement, and whether a person or the materializer caused it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Movement;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Who caused a ledger change
///
/// Materialized occurrences are ordinary movements in the ledger; the audit
/// log is the only place that remembers they were generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Materializer,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::User => write!(f, "user"),
            Origin::Materializer => write!(f, "materializer"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub origin: Origin,

    /// Short ID of the affected movement
    pub movement_id: String,

    /// Description of the movement at the time of the operation
    pub description: String,

    /// Movement before the operation (updates/deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Movement after the operation (creates/updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// Entry for a newly inserted movement
    pub fn create(origin: Origin, movement: &Movement) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            origin,
            movement_id: movement.id.short(),
            description: movement.description.clone(),
            before: None,
            after: serde_json::to_value(movement).ok(),
            diff_summary: None,
        }
    }

    /// Entry for an edited movement
    pub fn update(before: &Movement, after: &Movement, diff_summary: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            origin: Origin::User,
            movement_id: after.id.short(),
            description: after.description.clone(),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
        }
    }

    /// Entry for a deleted movement
    pub fn delete(movement: &Movement) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            origin: Origin::User,
            movement_id: movement.id.short(),
            description: movement.description.clone(),
            before: serde_json::to_value(movement).ok(),
            after: None,
            diff_summary: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} ({}) by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.movement_id,
            self.description,
            self.origin
        );

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
