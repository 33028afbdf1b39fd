//! `memoria update` — edit a section or replace the whole document.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

/// Arguments for `memoria update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Section title to upsert (omit with --template).
    pub section: Option<String>,

    /// Section body, e.g. "## desc\n-~- key: value".
    #[arg(allow_hyphen_values = true)]
    pub content: Option<String>,

    /// Read the content from a file instead of the command line.
    #[arg(long, conflicts_with = "content")]
    pub file: Option<PathBuf>,

    /// Replace the entire document instead of one section.
    #[arg(long)]
    pub template: bool,

    /// Operate on a specific profile.
    #[arg(long)]
    pub profile: Option<String>,
}

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        let text = match (&self.content, &self.file) {
            (Some(content), None) => content.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            (None, None) => bail!("provide content inline or via --file"),
            (Some(_), Some(_)) => unreachable!("clap rejects this combination"),
        };

        let (_config, mut store) = super::common::open_store(self.profile.as_deref())?;

        if self.template {
            if self.section.is_some() {
                bail!("--template replaces the whole document; drop the section argument");
            }
            if !store
                .update_template(&text)
                .context("failed to persist document")?
            {
                bail!("document text has no sections; nothing was changed");
            }
            println!(
                "{} document replaced ({} sections)",
                "updated".green().bold(),
                store.template().sections.len(),
            );
            return Ok(());
        }

        let Some(section) = self.section else {
            bail!("a section title is required unless --template is given");
        };
        if !store
            .update_section(&section, &text)
            .context("failed to persist document")?
        {
            bail!("fragment has no description or items; nothing was changed");
        }
        println!("{} section '{section}'", "updated".green().bold());
        Ok(())
    }
}
