//! `memoria serve` — JSON-lines tool server over stdio.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use memoria_server::{cache::DiskCache, runtime, ServerState};

use super::common::{open_store, resolve_target};

/// Arguments for `memoria serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Re-sync destinations when memory.md changes on disk.
    #[arg(long)]
    pub watch: bool,

    /// Directory destination files are written under.
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Operate on a specific profile.
    #[arg(long)]
    pub profile: Option<String>,
}

impl ServeArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = open_store(self.profile.as_deref())?;
        let target = resolve_target(self.target, &config)?;

        let mut state = ServerState::new(store, target);
        if let Some(cache_dir) = config.cache_dir {
            state = state.with_cache(Box::new(DiskCache::new(cache_dir)));
        }

        runtime::start_blocking(state, self.watch).context("server exited with an error")
    }
}
