//! CLI command handler for document import
//!
//! Detects candidates in a document, shows the preview with duplicates
//! marked, and stores the new rows unless `--dry-run` is given.

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::display::format_import_preview;
use crate::error::SpendResult;
use crate::services::{ImportOptions, ImportService, ImportStatus, TagService};
use crate::storage::Storage;

/// Arguments for `spendscan import`
#[derive(Args)]
pub struct ImportArgs {
    /// Receipt or statement (.txt, .md, .csv, .pdf)
    pub file: PathBuf,

    /// Category assigned to every imported transaction
    #[arg(short, long)]
    pub category: Option<String>,

    /// Tag (name or ID) attached to every imported transaction; repeatable
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Show the preview without saving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Keep the blank row added when no amount was detected
    #[arg(long)]
    pub keep_placeholders: bool,
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> SpendResult<()> {
    let import_service = ImportService::new(storage).with_detector(settings.detector());
    let tags = TagService::new(storage).resolve(&args.tags)?;

    let preview = import_service.preview_file(&args.file)?;

    let new_count = preview.iter().filter(|e| e.status == ImportStatus::New).count();
    let dup_count = preview.len() - new_count;

    println!("Import preview for '{}'", args.file.display());
    println!("{}", "=".repeat(40));
    print!("{}", format_import_preview(&preview));
    println!();
    println!("  New:         {}", new_count);
    println!("  Duplicates:  {}", dup_count);

    if args.dry_run {
        println!();
        println!("Dry run; nothing was saved.");
        return Ok(());
    }

    let options = ImportOptions {
        category: args.category,
        tags,
        keep_placeholders: args.keep_placeholders,
    };
    let result = import_service.import(&preview, &options)?;

    println!();
    println!("Imported {} transaction(s).", result.imported);
    if result.duplicates_skipped > 0 {
        println!("Skipped {} duplicate(s).", result.duplicates_skipped);
    }
    if result.placeholders_skipped > 0 {
        println!("Skipped the blank row; use --keep-placeholders to store it.");
    }

    Ok(())
}
