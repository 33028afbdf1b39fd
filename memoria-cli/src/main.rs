//! Memoria — personal memory document CLI.
//!
//! # Usage
//!
//! ```text
//! memoria init [--profile <name>] [--sync-root <path>]
//! memoria show [section] [--json]
//! memoria update <section> [content] [--file <path>]
//! memoria update --template --file <path>
//! memoria preset list|load <name>|create <name>
//! memoria sync [platform] [--dry-run] [--target <path>] [--json]
//! memoria diff [--target <path>]
//! memoria status [--target <path>] [--json]
//! memoria platforms [--json]
//! memoria serve [--watch] [--target <path>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    diff::DiffArgs, init::InitArgs, platforms::PlatformsArgs, preset::PresetCommand,
    serve::ServeArgs, show::ShowArgs, status::StatusArgs, sync::SyncArgs, update::UpdateArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "memoria",
    version,
    about = "Manage a personal memory document across AI coding assistants",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize storage and bootstrap the default document.
    Init(InitArgs),

    /// Print the document or a single section.
    Show(ShowArgs),

    /// Update a section (or replace the whole document with --template).
    Update(UpdateArgs),

    /// Manage saved document presets.
    Preset {
        #[command(subcommand)]
        command: PresetCommand,
    },

    /// Write decorated memory files for every platform (or one).
    Sync(SyncArgs),

    /// Show unified diff of what sync would write.
    Diff(DiffArgs),

    /// Show per-platform sync status.
    Status(StatusArgs),

    /// List registered platforms.
    Platforms(PlatformsArgs),

    /// Run the JSON-lines tool server over stdio.
    Serve(ServeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Show(args) => args.run(),
        Commands::Update(args) => args.run(),
        Commands::Preset { command } => commands::preset::run(command),
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Platforms(args) => args.run(),
        Commands::Serve(args) => args.run(),
    }
}
