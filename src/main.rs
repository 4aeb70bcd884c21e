use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashflow::cli::{handle_movement_command, handle_report_command, MovementCommands, ReportCommands};
use cashflow::config::{paths::CashflowPaths, settings::Settings};
use cashflow::services::run_materialization;
use cashflow::storage::Storage;

#[derive(Parser)]
#[command(
    name = "cashflow",
    version,
    about = "Personal cash-flow ledger with recurring obligations and expense forecasting",
    long_about = "Records income and expense movements, keeps fixed monthly obligations \
                  filled in for every elapsed month, and projects the year ahead by \
                  combining fixed costs with a seasonal forecast of variable spending."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Movement(MovementCommands),

    #[command(flatten)]
    Report(ReportCommands),

    /// Generate any missing monthly occurrences of fixed movements
    Materialize,

    /// Initialize the ledger directory and configuration
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = CashflowPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_level);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let now = Local::now().naive_local();
    let explicit_pass = matches!(cli.command, Some(Commands::Materialize));
    if settings.materialize_on_start && !explicit_pass {
        run_materialization(&storage, now)?;
    }

    match cli.command {
        Some(Commands::Movement(cmd)) => handle_movement_command(&storage, &settings, cmd, now)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd, now)?,
        Some(Commands::Materialize) => {
            let report = run_materialization(&storage, now)?;
            println!(
                "Scanned {} fixed movement(s), inserted {} occurrence(s).",
                report.scanned,
                report.inserted_count()
            );
            if report.skipped_unparseable > 0 {
                println!(
                    "Skipped {} movement(s) with unreadable timestamps.",
                    report.skipped_unparseable
                );
            }
        }
        Some(Commands::Init) => {
            println!("Initializing cashflow ledger at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            storage.movements.save()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Record a movement with 'cashflow add <description> <amount>'.");
            println!("Add --fixed for obligations that repeat every month.");
        }
        Some(Commands::Config) => {
            println!("Cashflow Configuration");
            println!("======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Movements file:  {}", paths.movements_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Initialized:     {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Date format:          {}", settings.date_format);
            println!("  Forecast horizon:     {}", settings.forecast_horizon);
            println!("  Log level:            {}", settings.log_level);
            println!("  Materialize on start: {}", settings.materialize_on_start);
        }
        None => {
            println!("cashflow - personal cash-flow ledger and forecast");
            println!();
            println!("Run 'cashflow --help' for usage information.");
        }
    }

    Ok(())
}
