//! Shared helpers for command implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};

use memoria_core::{config, config::Config, TemplateStore};

/// Load the install config and open an initialized store.
///
/// `profile` overrides the configured profile when given.
pub fn open_store(profile: Option<&str>) -> Result<(Config, TemplateStore)> {
    let config = config::load().context("failed to load ~/.memoria/config.yaml")?;
    let profile = profile.unwrap_or(&config.profile).to_string();
    let mut store =
        TemplateStore::open(&profile).context("could not determine home directory")?;
    store
        .initialize()
        .with_context(|| format!("failed to initialize profile '{profile}'"))?;
    Ok((config, store))
}

/// Resolve the sync target root: flag > configured `sync_root` > cwd.
pub fn resolve_target(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = &config.sync_root {
        return Ok(path.clone());
    }
    std::env::current_dir().context("could not determine current directory")
}
