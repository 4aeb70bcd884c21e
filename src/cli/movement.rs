//! Movement CLI commands
//!
//! Add, list, show, edit and delete ledger movements, print the balance
//! and browse the audit history.

use chrono::{NaiveDate, NaiveDateTime};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_balance, format_movement_details, format_movement_list};
use crate::error::{CashflowError, CashflowResult};
use crate::models::{parse_timestamp, Money, MovementKind, Periodicity};
use crate::services::{CreateMovementInput, MovementFilter, MovementPatch, MovementService};
use crate::storage::Storage;

/// Movement subcommands
#[derive(Subcommand, Debug)]
pub enum MovementCommands {
    /// Record a new movement
    Add {
        /// What the movement is for
        description: String,
        /// Amount (e.g. "45.50" or "45,50")
        amount: String,
        /// expense or income
        #[arg(short, long, default_value = "expense")]
        kind: String,
        /// Recurs every month from its date
        #[arg(short, long)]
        fixed: bool,
        /// When it happened (YYYY-MM-DD [HH:MM]), defaults to now
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List movements, newest first
    #[command(alias = "ls")]
    List {
        /// Only expense or income
        #[arg(short, long)]
        kind: Option<String>,
        /// Description contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// From this day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Through this day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of movements to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show movement details
    Show {
        /// Movement ID (full, short or prefix)
        id: String,
    },

    /// Edit a movement
    Edit {
        /// Movement ID (full, short or prefix)
        id: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New kind (expense or income)
        #[arg(short, long)]
        kind: Option<String>,
        /// New periodicity (fixed or variable)
        #[arg(short, long)]
        periodicity: Option<String>,
        /// New date (YYYY-MM-DD [HH:MM])
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a movement
    #[command(alias = "rm")]
    Delete {
        /// Movement ID (full, short or prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show total income, expense and balance
    Balance,

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a movement command
pub fn handle_movement_command(
    storage: &Storage,
    settings: &Settings,
    cmd: MovementCommands,
    now: NaiveDateTime,
) -> CashflowResult<()> {
    let service = MovementService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        MovementCommands::Add {
            description,
            amount,
            kind,
            fixed,
            date,
        } => {
            let input = CreateMovementInput {
                description,
                periodicity: if fixed {
                    Periodicity::Fixed
                } else {
                    Periodicity::Variable
                },
                kind: parse_kind(&kind)?,
                amount: parse_amount(&amount)?,
                timestamp: date.as_deref().map(parse_when).transpose()?,
            };

            let movement = service.create(input, now)?;

            println!("Recorded movement:");
            print!("{}", format_movement_details(&movement, date_format, symbol));
        }

        MovementCommands::List {
            kind,
            search,
            from,
            to,
            limit,
        } => {
            let mut filter = MovementFilter::new().limit(limit);
            if let Some(kind) = kind {
                filter = filter.kind(parse_kind(&kind)?);
            }
            if let Some(text) = search {
                filter = filter.text(text);
            }
            if let Some(from) = from {
                filter = filter.from(parse_day(&from)?);
            }
            if let Some(to) = to {
                filter = filter.to(parse_day(&to)?);
            }

            let movements = service.list(&filter)?;
            print!("{}", format_movement_list(&movements, date_format, symbol));
        }

        MovementCommands::Show { id } => {
            let movement = service.require(&id)?;
            print!("{}", format_movement_details(&movement, date_format, symbol));
        }

        MovementCommands::Edit {
            id,
            description,
            amount,
            kind,
            periodicity,
            date,
        } => {
            let movement = service.require(&id)?;

            let patch = MovementPatch {
                description,
                periodicity: periodicity.as_deref().map(parse_periodicity).transpose()?,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                timestamp: date.as_deref().map(parse_when).transpose()?,
            };

            if patch.is_empty() {
                println!("No changes specified. Use --help to see available options.");
                return Ok(());
            }

            let updated = service.update(movement.id, patch, now)?;
            println!("Updated movement:");
            print!("{}", format_movement_details(&updated, date_format, symbol));
        }

        MovementCommands::Delete { id, force } => {
            let movement = service.require(&id)?;

            if !force {
                println!("About to delete movement:");
                print!("{}", format_movement_details(&movement, date_format, symbol));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let removed = service.delete(movement.id, now)?;
            println!(
                "Deleted movement: {} ({} {})",
                removed.id, removed.timestamp, removed.description
            );
        }

        MovementCommands::Balance => {
            let balance = service.balance()?;
            print!("{}", format_balance(&balance, symbol));
        }

        MovementCommands::History { limit } => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No changes recorded.");
            }
            for entry in entries.iter().rev() {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}

fn parse_amount(s: &str) -> CashflowResult<Money> {
    let amount = Money::parse(s).map_err(|e| {
        CashflowError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '45.50'. Error: {}",
            s, e
        ))
    })?;
    if amount.is_negative() {
        return Err(CashflowError::Validation(format!(
            "Amount must not be negative: '{}'. Use --kind to record income or expense",
            s
        )));
    }
    Ok(amount)
}

fn parse_kind(s: &str) -> CashflowResult<MovementKind> {
    s.parse().map_err(CashflowError::Validation)
}

fn parse_periodicity(s: &str) -> CashflowResult<Periodicity> {
    s.parse().map_err(CashflowError::Validation)
}

fn parse_when(s: &str) -> CashflowResult<NaiveDateTime> {
    parse_timestamp(s).map_err(|_| {
        CashflowError::Validation(format!(
            "Invalid date: '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM",
            s
        ))
    })
}

fn parse_day(s: &str) -> CashflowResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        CashflowError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
    })
}
