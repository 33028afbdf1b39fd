//! `memoria show` — print the document or one section.

use anyhow::{bail, Context, Result};
use clap::Args;

use memoria_core::codec;

use super::common::open_store;

/// Arguments for `memoria show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Section title (case-insensitive); omit for the whole document.
    pub section: Option<String>,

    /// Operate on a specific profile.
    #[arg(long)]
    pub profile: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let (_config, store) = open_store(self.profile.as_deref())?;

        match &self.section {
            Some(name) => {
                let Some(section) = store.section(name) else {
                    bail!("section '{name}' not found");
                };
                if self.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(section)
                            .context("failed to serialize section")?
                    );
                } else {
                    print!("{}", codec::render_section(section));
                }
            }
            None => {
                if self.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(store.template())
                            .context("failed to serialize document")?
                    );
                } else {
                    print!("{}", codec::render_document(store.template()));
                }
            }
        }
        Ok(())
    }
}
