// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;
mod config;

#[cfg(test)]
mod tests;

use clap::Parser;
use color_eyre::eyre::Result;
use commands::Command;
use config::{CliOverrides, TireLedgerConfig};
use std::path::PathBuf;
use tire_ledger_api::TireLedger;
use tire_ledger_domain::SeasonPolicy;
use tracing::info;

/// Tire Ledger - season tire inventory maintenance
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. Overrides the configured path.
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Configuration file to read instead of `tire-ledger.toml`
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    let overrides: CliOverrides = CliOverrides {
        config: args.config,
        database: args.database,
    };
    let config: TireLedgerConfig = TireLedgerConfig::load(&overrides)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let policy: SeasonPolicy = config.policy();
    let mut ledger: TireLedger = if let Some(path) = config.database_path() {
        info!("Using file-based database at: {}", path.display());
        TireLedger::open(path, policy)?
    } else {
        info!("Using in-memory database; nothing will be kept");
        TireLedger::open_in_memory(policy)?
    };

    let stdout = std::io::stdout();
    commands::run(&args.command, &mut ledger, &mut stdout.lock())
}
