//! `memoria sync` — write decorated memory files to platform destinations.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use memoria_sync::{sync_all, sync_platform, SyncResult};

use super::common::{open_store, resolve_target};

/// Arguments for `memoria sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Sync only this platform (default: all).
    pub platform: Option<String>,

    /// Report what would be written without touching files.
    #[arg(long)]
    pub dry_run: bool,

    /// Directory to write destination files under.
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Operate on a specific profile.
    #[arg(long)]
    pub profile: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = open_store(self.profile.as_deref())?;
        let target = resolve_target(self.target, &config)?;

        let results: Vec<SyncResult> = match &self.platform {
            Some(name) => vec![
                sync_platform(&store, &target, name, self.dry_run).context("sync failed")?,
            ],
            None => sync_all(&store, &target, None, self.dry_run).context("sync failed")?,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&results)
                    .context("failed to serialize sync results")?
            );
        } else {
            for result in &results {
                let marker = if result.success {
                    "ok".green().bold()
                } else {
                    "failed".red().bold()
                };
                println!("{marker:>6}  {:<10} {}", result.platform, result.message);
            }
        }

        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            bail!("{failed} platform(s) failed to sync");
        }
        Ok(())
    }
}
