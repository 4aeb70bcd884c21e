//! Change summaries for edited movements
//!
//! Only the user-editable fields are compared; bookkeeping instants change on
//! every edit and would drown out the interesting part.

use crate::models::Movement;

/// Describe what changed between two versions of a movement
///
/// Returns `None` when no editable field differs.
pub fn describe_changes(before: &Movement, after: &Movement) -> Option<String> {
    let mut changes = Vec::new();

    if before.description != after.description {
        changes.push(format!(
            "description: {} -> {}",
            quoted(&before.description),
            quoted(&after.description)
        ));
    }
    if before.periodicity != after.periodicity {
        changes.push(format!(
            "periodicity: {} -> {}",
            before.periodicity, after.periodicity
        ));
    }
    if before.kind != after.kind {
        changes.push(format!("kind: {} -> {}", before.kind, after.kind));
    }
    if before.amount != after.amount {
        changes.push(format!("amount: {} -> {}", before.amount, after.amount));
    }
    if before.timestamp != after.timestamp {
        changes.push(format!(
            "timestamp: {} -> {}",
            before.timestamp, after.timestamp
        ));
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn quoted(s: &str) -> String {
    if s.chars().count() > 50 {
        let head: String = s.chars().take(47).collect();
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, MovementKind, NewMovement, Periodicity};
    use chrono::NaiveDate;

    fn groceries() -> Movement {
        Movement::from_new(NewMovement {
            description: "Groceries".to_string(),
            periodicity: Periodicity::Variable,
            kind: MovementKind::Expense,
            amount: Money::from_cents(4550),
            timestamp: NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        })
    }

    #[test]
    fn test_amount_change() {
        let before = groceries();
        let mut after = before.clone();
        after.amount = Money::from_cents(5000);

        let diff = describe_changes(&before, &after).unwrap();
        assert_eq!(diff, "amount: 45.50 -> 50.00");
    }

    #[test]
    fn test_multiple_changes() {
        let before = groceries();
        let mut after = before.clone();
        after.description = "Supermarket".to_string();
        after.periodicity = Periodicity::Fixed;

        let diff = describe_changes(&before, &after).unwrap();
        assert!(diff.contains("description: \"Groceries\" -> \"Supermarket\""));
        assert!(diff.contains("periodicity: Variable -> Fixed"));
        assert!(!diff.contains("amount"));
    }

    #[test]
    fn test_bookkeeping_fields_ignored() {
        let before = groceries();
        let mut after = before.clone();
        after.updated_at = after.updated_at + chrono::Duration::seconds(30);

        assert!(describe_changes(&before, &after).is_none());
    }

    #[test]
    fn test_long_description_truncated() {
        let before = groceries();
        let mut after = before.clone();
        after.description = "x".repeat(80);

        let diff = describe_changes(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }
}
