//! Movement display formatting

use crate::models::{Movement, MovementKind, Periodicity};
use crate::services::Balance;

/// Display a movement's timestamp in `date_format`, or as stored if it does
/// not parse
fn display_timestamp(movement: &Movement, date_format: &str) -> String {
    movement
        .instant()
        .map(|at| at.format(date_format).to_string())
        .unwrap_or_else(|_| movement.timestamp.clone())
}

fn periodicity_tag(periodicity: Periodicity) -> &'static str {
    match periodicity {
        Periodicity::Fixed => "F",
        Periodicity::Variable => "V",
    }
}

/// Format a single movement as a list row
pub fn format_movement_row(movement: &Movement, date_format: &str, currency_symbol: &str) -> String {
    let signed = match movement.kind {
        MovementKind::Income => format!("+{}", movement.amount.format_with_symbol(currency_symbol)),
        MovementKind::Expense => format!("-{}", movement.amount.format_with_symbol(currency_symbol)),
    };

    format!(
        "{:<12} {:<16} {} {:<30} {:>16}",
        movement.id.short(),
        display_timestamp(movement, date_format),
        periodicity_tag(movement.periodicity),
        truncate(&movement.description, 30),
        signed
    )
}

/// Format movements as a table, in the order given
pub fn format_movement_list(movements: &[Movement], date_format: &str, currency_symbol: &str) -> String {
    if movements.is_empty() {
        return "No movements found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<16} {} {:<30} {:>16}\n",
        "ID", "When", "P", "Description", "Amount"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for movement in movements {
        output.push_str(&format_movement_row(movement, date_format, currency_symbol));
        output.push('\n');
    }

    output.push_str(&format!("\n{} movement(s)\n", movements.len()));
    output
}

/// Format movement details for display
pub fn format_movement_details(movement: &Movement, date_format: &str, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Movement:    {}\n", movement.id.short()));
    output.push_str(&format!("Full ID:     {}\n", movement.id.as_uuid()));
    output.push_str(&format!("Description: {}\n", movement.description));
    output.push_str(&format!("When:        {}\n", display_timestamp(movement, date_format)));
    output.push_str(&format!("Periodicity: {}\n", movement.periodicity));
    output.push_str(&format!("Kind:        {}\n", movement.kind));
    output.push_str(&format!(
        "Amount:      {}\n",
        movement.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "Created:     {}\n",
        movement.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "Updated:     {}\n",
        movement.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

/// Format the ledger balance
pub fn format_balance(balance: &Balance, currency_symbol: &str) -> String {
    format!(
        "Income:  {:>16}\nExpense: {:>16}\nBalance: {:>16}\n",
        balance.income.format_with_symbol(currency_symbol),
        balance.expense.format_with_symbol(currency_symbol),
        balance.net().format_with_symbol(currency_symbol)
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
