//! Tag CLI commands
//!
//! Implements CLI commands for creating, renaming and deleting tags.
//! Attaching tags to transactions lives under `transaction tag`.

use clap::Subcommand;

use super::print_json;
use crate::display::format_tag_list;
use crate::error::SpendResult;
use crate::services::TagService;
use crate::storage::Storage;

/// Tag subcommands
#[derive(Subcommand)]
pub enum TagCommands {
    /// Create a tag
    Add {
        /// Tag name
        name: String,
    },

    /// List tags
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename a tag
    Rename {
        /// Current tag name or ID
        tag: String,
        /// New name
        name: String,
    },

    /// Delete a tag and remove it from every transaction
    Delete {
        /// Tag name or ID
        tag: String,
    },
}

/// Handle a tag command
pub fn handle_tag_command(storage: &Storage, cmd: TagCommands) -> SpendResult<()> {
    let service = TagService::new(storage);

    match cmd {
        TagCommands::Add { name } => {
            let tag = service.create(&name)?;
            println!("Created tag '{}' ({})", tag.name, tag.id);
        }

        TagCommands::List { json } => {
            let tags = service.list()?;
            if json {
                return print_json(&tags);
            }
            print!("{}", format_tag_list(&tags));
        }

        TagCommands::Rename { tag, name } => {
            let existing = service.require(&tag)?;
            let renamed = service.rename(existing.id, &name)?;
            println!("Renamed '{}' to '{}'", existing.name, renamed.name);
        }

        TagCommands::Delete { tag } => {
            let existing = service.require(&tag)?;
            service.delete(existing.id)?;
            println!("Deleted tag '{}'", existing.name);
        }
    }

    Ok(())
}
