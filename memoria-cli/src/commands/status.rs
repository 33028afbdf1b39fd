//! `memoria status` — per-platform sync visibility.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use memoria_sync::{
    hash_store,
    status::{check, format_datetime_age},
    PlatformStatus, SyncSignal,
};

use super::common::{open_store, resolve_target};

/// Arguments for `memoria status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory destination files live under.
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Operate on a specific profile.
    #[arg(long)]
    pub profile: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = open_store(self.profile.as_deref())?;
        let target = resolve_target(self.target, &config)?;

        let statuses = check(&store, &target).context("status check failed")?;
        let (last_sync_at, last_sync_age) = load_last_sync(&store)?;

        if self.json {
            print_json(&statuses, last_sync_at, &last_sync_age)?;
            return Ok(());
        }

        print_table(&store.profile().to_string(), &statuses, &last_sync_age);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusJson {
    profile_last_sync_at: Option<String>,
    profile_last_sync_age: String,
    platforms: Vec<PlatformStatusJson>,
}

#[derive(Serialize)]
struct PlatformStatusJson {
    platform: String,
    path: String,
    status: String,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "platform")]
    platform: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "path")]
    path: String,
}

fn load_last_sync(
    store: &memoria_core::TemplateStore,
) -> Result<(Option<String>, String)> {
    let path = hash_store::state_path_at(store.home(), store.profile());
    if !path.exists() {
        return Ok((None, "never".to_string()));
    }
    let state = hash_store::load_at(store.home(), store.profile())
        .context("failed to load sync state")?;
    if state.files.is_empty() {
        return Ok((None, "never".to_string()));
    }
    Ok((
        Some(state.synced_at.to_rfc3339()),
        format_datetime_age(state.synced_at),
    ))
}

fn print_json(
    statuses: &[PlatformStatus],
    last_sync_at: Option<String>,
    last_sync_age: &str,
) -> Result<()> {
    let payload = StatusJson {
        profile_last_sync_at: last_sync_at,
        profile_last_sync_age: last_sync_age.to_string(),
        platforms: statuses
            .iter()
            .map(|status| PlatformStatusJson {
                platform: status.platform.clone(),
                path: status.path.display().to_string(),
                status: signal_key(&status.signal).to_string(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(profile: &str, statuses: &[PlatformStatus], last_sync_age: &str) {
    let needs_sync = statuses
        .iter()
        .filter(|s| s.signal != SyncSignal::Current)
        .count();

    println!(
        "Memoria v{} | profile '{}' | last sync {} | {} of {} need sync",
        env!("CARGO_PKG_VERSION"),
        profile,
        last_sync_age,
        needs_sync,
        statuses.len(),
    );
    println!(
        "Indicators: {} CURRENT  {} STALE  {} MISSING  {} NEVER SYNCED",
        signal_indicator(&SyncSignal::Current),
        signal_indicator(&SyncSignal::Stale),
        signal_indicator(&SyncSignal::Missing),
        signal_indicator(&SyncSignal::NeverSynced),
    );

    let rows: Vec<StatusTableRow> = statuses
        .iter()
        .map(|status| StatusTableRow {
            platform: status.platform.clone(),
            status: format!(
                "{} {}",
                signal_indicator(&status.signal),
                signal_label(&status.signal)
            ),
            path: status.path.display().to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if needs_sync > 0 {
        println!("Run 'memoria sync' to update out-of-date platforms.");
    }
}

fn signal_key(signal: &SyncSignal) -> &'static str {
    match signal {
        SyncSignal::NeverSynced => "never_synced",
        SyncSignal::Current => "current",
        SyncSignal::Stale => "stale",
        SyncSignal::Missing => "missing",
    }
}

fn signal_label(signal: &SyncSignal) -> &'static str {
    match signal {
        SyncSignal::NeverSynced => "NEVER SYNCED",
        SyncSignal::Current => "CURRENT",
        SyncSignal::Stale => "STALE",
        SyncSignal::Missing => "MISSING",
    }
}

fn signal_indicator(signal: &SyncSignal) -> String {
    match signal {
        SyncSignal::NeverSynced => "■".bright_black().bold().to_string(),
        SyncSignal::Current => "■".green().bold().to_string(),
        SyncSignal::Stale => "■".yellow().bold().to_string(),
        SyncSignal::Missing => "■".red().bold().to_string(),
    }
}
