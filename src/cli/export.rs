//! CLI command handler for CSV export

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;

use super::parse_optional_date;
use crate::error::{SpendError, SpendResult};
use crate::export::{default_export_filename, export_transactions_csv, ExportFilter};
use crate::storage::Storage;

/// Arguments for `spendscan export`
#[derive(Args)]
pub struct ExportArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only this category
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Output file ("-" for stdout), defaults to transactions-<today>.csv
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the export command
pub fn handle_export_command(storage: &Storage, args: ExportArgs) -> SpendResult<()> {
    let filter = ExportFilter {
        from: parse_optional_date(args.from.as_deref())?,
        to: parse_optional_date(args.to.as_deref())?,
        category: args.category,
    };

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(default_export_filename(chrono::Local::now().date_naive()))
    });

    if output.as_os_str() == "-" {
        let stdout = std::io::stdout();
        export_transactions_csv(storage, stdout.lock(), &filter)?;
        return Ok(());
    }

    let file = File::create(&output).map_err(|e| {
        SpendError::Export(format!("Failed to create {}: {}", output.display(), e))
    })?;
    let rows = export_transactions_csv(storage, BufWriter::new(file), &filter)?;

    println!("Exported {} transaction(s) to {}", rows, output.display());
    Ok(())
}
