//! `memoria platforms` — list registered destinations.

use anyhow::{Context, Result};
use clap::Args;

use memoria_render::PlatformKind;

/// Arguments for `memoria platforms`.
#[derive(Args, Debug)]
pub struct PlatformsArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl PlatformsArgs {
    pub fn run(self) -> Result<()> {
        if self.json {
            let names: Vec<&str> = PlatformKind::all().iter().map(|p| p.name()).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&names)
                    .context("failed to serialize platform list")?
            );
            return Ok(());
        }

        for platform in PlatformKind::all() {
            println!(
                "{:<10} {}",
                platform.name(),
                platform.output_path(std::path::Path::new(".")).display(),
            );
        }
        Ok(())
    }
}
