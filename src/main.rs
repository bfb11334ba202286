use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spendscan::cli::{
    handle_budget_command, handle_detect_command, handle_export_command, handle_import_command,
    handle_insights_command, handle_recurring_command, handle_tag_command,
    handle_transaction_command,
};
use spendscan::config::{paths::DATA_DIR_ENV, Settings, SpendPaths};
use spendscan::storage::Storage;

#[derive(Parser)]
#[command(
    name = "spendscan",
    version,
    about = "Detect expenses in receipts and statements, and track them from the terminal",
    long_about = "SpendScan reads the text of receipts and bank statements, proposes \
                  candidate expense transactions for review, stores the ones you \
                  confirm, and flags expenses that repeat weekly or monthly."
)]
struct Cli {
    /// Log filter (e.g. "debug", "spendscan=trace"); RUST_LOG takes precedence
    #[arg(long, global = true, env = "SPENDSCAN_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect candidate transactions in a document without saving
    Detect(spendscan::cli::DetectArgs),

    /// Detect, review and store transactions from a document
    Import(spendscan::cli::ImportArgs),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(spendscan::cli::TransactionCommands),

    /// Tags for grouping transactions
    #[command(subcommand)]
    Tag(spendscan::cli::TagCommands),

    /// Recurring expense suggestions and confirmation
    #[command(subcommand)]
    Recurring(spendscan::cli::RecurringCommands),

    /// Monthly category budgets
    #[command(subcommand)]
    Budget(spendscan::cli::BudgetCommands),

    /// Monthly spending summary
    Insights(spendscan::cli::InsightsArgs),

    /// Export transactions to CSV
    Export(spendscan::cli::ExportArgs),

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(cli_filter: Option<&str>, settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(cli_filter.unwrap_or(&settings.log_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    // stderr keeps stdout clean for JSON and CSV output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Storage with every repository loaded; detection never needs it
fn open_storage(paths: &SpendPaths) -> Result<Storage> {
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    Ok(storage)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SpendPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(cli.log_level.as_deref(), &settings);

    let Some(command) = cli.command else {
        println!("SpendScan - expense detection from receipts and statements");
        println!();
        println!("Run 'spendscan --help' for usage information.");
        println!("Run 'spendscan detect <FILE>' to try the detector on a document.");
        return Ok(());
    };

    match command {
        Commands::Detect(args) => handle_detect_command(&settings, args)?,
        Commands::Import(args) => {
            handle_import_command(&open_storage(&paths)?, &settings, args)?
        }
        Commands::Transaction(cmd) => {
            handle_transaction_command(&open_storage(&paths)?, &settings, cmd)?
        }
        Commands::Tag(cmd) => handle_tag_command(&open_storage(&paths)?, cmd)?,
        Commands::Recurring(cmd) => handle_recurring_command(&open_storage(&paths)?, cmd)?,
        Commands::Budget(cmd) => handle_budget_command(&open_storage(&paths)?, cmd)?,
        Commands::Insights(args) => {
            handle_insights_command(&open_storage(&paths)?, &settings, args)?
        }
        Commands::Export(args) => handle_export_command(&open_storage(&paths)?, args)?,
        Commands::Init => {
            println!("Initializing SpendScan at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            open_storage(&paths)?.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Next: 'spendscan import <receipt.pdf>' to add your first expenses.");
        }
        Commands::Config => {
            println!("SpendScan Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!("Override with:    ${}", DATA_DIR_ENV);
            println!();
            println!("Settings:");
            println!("  Default currency: {}", settings.default_currency);
            println!("  Base currency:    {}", settings.base_currency);
            println!("  Log filter:       {}", settings.log_filter);
        }
    }

    Ok(())
}
