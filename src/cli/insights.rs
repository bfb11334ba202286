//! CLI command handler for the monthly insight summary

use clap::Args;

use super::print_json;
use crate::config::Settings;
use crate::display::format_insights;
use crate::error::SpendResult;
use crate::models::MonthPeriod;
use crate::services::InsightService;
use crate::storage::Storage;

/// Arguments for `spendscan insights`
#[derive(Args)]
pub struct InsightsArgs {
    /// Month (YYYY-MM), defaults to the current month
    #[arg(short, long)]
    pub month: Option<String>,

    /// Print the aggregated payload as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the insights command
pub fn handle_insights_command(
    storage: &Storage,
    settings: &Settings,
    args: InsightsArgs,
) -> SpendResult<()> {
    let period = match args.month {
        Some(m) => m.parse::<MonthPeriod>()?,
        None => MonthPeriod::current(),
    };

    let payload = InsightService::new(storage).aggregate(period, &settings.base_currency)?;

    if args.json {
        return print_json(&payload);
    }
    print!("{}", format_insights(&payload));
    Ok(())
}
