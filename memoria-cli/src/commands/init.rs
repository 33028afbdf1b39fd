//! `memoria init` — bootstrap storage for a profile.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use memoria_core::{config, TemplateStore};

/// Arguments for `memoria init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Profile to initialize (also becomes the configured default).
    #[arg(long)]
    pub profile: Option<String>,

    /// Directory platform files are synced to by default.
    #[arg(long)]
    pub sync_root: Option<PathBuf>,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let mut config = config::load().context("failed to load ~/.memoria/config.yaml")?;
        if let Some(profile) = &self.profile {
            config.profile = profile.clone();
        }
        if let Some(sync_root) = &self.sync_root {
            config.sync_root = Some(sync_root.clone());
        }

        let mut store = TemplateStore::open(&config.profile)
            .context("could not determine home directory")?;
        store
            .initialize()
            .with_context(|| format!("failed to initialize profile '{}'", config.profile))?;

        config::save(&config).context("failed to save ~/.memoria/config.yaml")?;

        println!(
            "{} profile '{}' at {}",
            "initialized".green().bold(),
            store.profile(),
            store.profile_dir().display(),
        );
        println!("  document: {}", store.memory_path().display());
        println!("  presets:  {}", store.presets_dir().display());
        if let Some(sync_root) = &config.sync_root {
            println!("  sync root: {}", sync_root.display());
        }
        Ok(())
    }
}
