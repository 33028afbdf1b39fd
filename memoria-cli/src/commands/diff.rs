//! `memoria diff` — unified diff of what sync would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use memoria_sync::diff::diff_platforms;

use super::common::{open_store, resolve_target};

/// Arguments for `memoria diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Directory destination files live under.
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Operate on a specific profile.
    #[arg(long)]
    pub profile: Option<String>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = open_store(self.profile.as_deref())?;
        let target = resolve_target(self.target, &config)?;

        let diffs = diff_platforms(&store, &target).context("diff failed")?;
        if diffs.is_empty() {
            println!("All platform files are up to date.");
            return Ok(());
        }

        for diff in diffs {
            println!(
                "{} ({})",
                diff.path.display().to_string().bold(),
                diff.platform,
            );
            for line in diff.unified_diff.lines() {
                if line.starts_with('+') && !line.starts_with("+++") {
                    println!("{}", line.green());
                } else if line.starts_with('-') && !line.starts_with("---") {
                    println!("{}", line.red());
                } else if line.starts_with("@@") {
                    println!("{}", line.cyan());
                } else {
                    println!("{line}");
                }
            }
            println!();
        }
        Ok(())
    }
}
