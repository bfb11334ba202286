//! CLI command handler for running the detector on a document

use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use super::print_json;
use crate::config::Settings;
use crate::display::format_candidates;
use crate::error::{SpendError, SpendResult};
use crate::extraction;

/// Arguments for `spendscan detect`
#[derive(Args)]
pub struct DetectArgs {
    /// Receipt or statement (.txt, .md, .csv, .pdf), or "-" for stdin
    pub file: PathBuf,

    /// Print candidates as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the detect command; nothing is stored
pub fn handle_detect_command(settings: &Settings, args: DetectArgs) -> SpendResult<()> {
    let text = if args.file.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| SpendError::Io(format!("Failed to read stdin: {}", e)))?;
        buffer
    } else {
        extraction::extract_text(&args.file)?
    };

    let candidates = settings.detector().detect(&text);

    if args.json {
        return print_json(&candidates);
    }

    print!("{}", format_candidates(&candidates));
    if candidates.iter().any(|c| c.is_placeholder()) {
        println!();
        println!("No amounts detected; a blank row was added for manual entry.");
    }
    Ok(())
}
