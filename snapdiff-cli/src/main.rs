//! snapdiff — master-data snapshot change notifier.
//!
//! # Usage
//!
//! ```text
//! snapdiff init [--force]
//! snapdiff version
//! snapdiff run [--client-version <V> --res-version <R>] [--skip-upload] [--skip-notify]
//! ```
//!
//! All commands take `--config <path>`; the default location is
//! `~/.snapdiff/config.yaml`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{init::InitArgs, run::RunArgs, version::VersionArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "snapdiff",
    version,
    about = "Detect master-data snapshot changes, render diff images, notify",
    long_about = None,
)]
struct Cli {
    /// Path to the configuration file (default: ~/.snapdiff/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter configuration file.
    Init(InitArgs),

    /// Resolve and print the current client/resource version pair.
    Version(VersionArgs),

    /// Run the full pipeline: update, commit, render, notify.
    Run(RunArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(cli.config),
        Commands::Version(args) => args.run(cli.config),
        Commands::Run(args) => args.run(cli.config),
    }
}
