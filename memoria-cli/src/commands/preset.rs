//! `memoria preset` — saved document snapshots.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;

use memoria_core::presets;

use super::common::open_store;

/// Subcommands for `memoria preset`.
#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// List saved presets.
    List {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,

        /// Operate on a specific profile.
        #[arg(long)]
        profile: Option<String>,
    },

    /// Replace the live document with a preset.
    Load {
        /// Preset name.
        name: String,

        /// Operate on a specific profile.
        #[arg(long)]
        profile: Option<String>,
    },

    /// Snapshot the live document as a preset.
    Create {
        /// Preset name.
        name: String,

        /// Operate on a specific profile.
        #[arg(long)]
        profile: Option<String>,
    },
}

pub fn run(command: PresetCommand) -> Result<()> {
    match command {
        PresetCommand::List { json, profile } => {
            let (_config, store) = open_store(profile.as_deref())?;
            let names = presets::list_presets(&store).context("failed to list presets")?;
            if json {
                let names: Vec<&str> = names.iter().map(|n| n.0.as_str()).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&names)
                        .context("failed to serialize preset list")?
                );
            } else if names.is_empty() {
                println!("No presets saved.");
            } else {
                for name in names {
                    println!("{name}");
                }
            }
            Ok(())
        }

        PresetCommand::Load { name, profile } => {
            let (_config, mut store) = open_store(profile.as_deref())?;
            if !presets::load_preset(&mut store, &name).context("failed to load preset")? {
                bail!("preset '{name}' not found or unusable");
            }
            println!(
                "{} preset '{name}' into profile '{}'",
                "loaded".green().bold(),
                store.profile(),
            );
            Ok(())
        }

        PresetCommand::Create { name, profile } => {
            let (_config, store) = open_store(profile.as_deref())?;
            presets::create_preset(&store, &name)
                .with_context(|| format!("failed to create preset '{name}'"))?;
            println!("{} preset '{name}'", "created".green().bold());
            Ok(())
        }
    }
}
