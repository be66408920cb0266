// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Maintenance subcommands.

use clap::Subcommand;
use color_eyre::eyre::{Result, bail};
use std::io::Write;
use std::path::PathBuf;
use tire_ledger_api::{
    DistanceCorrection, FlatTables, LedgerReport, StatusSummary, TireLedger, season_calendar,
};
use tire_ledger_domain::format_date;
use tracing::{info, warn};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the schema if needed and seed the default tracks
    Init,
    /// Show the open stage and tire counts
    Status {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild every tire's distance from its ledger lines
    Recompute,
    /// Check the registry against the ledger; exits non-zero on drift
    Verify,
    /// Write the tires, ledger and measurements tables as CSV
    Export {
        /// Directory to write into; created if missing
        dir: PathBuf,
    },
    /// Replace the inventory with CSV tables from a directory
    Import {
        /// Directory holding tires.csv, ledger.csv and measurements.csv
        dir: PathBuf,
    },
    /// Print the season calendar
    Calendar,
}

/// Runs one subcommand, writing its report to `out`.
///
/// # Errors
///
/// Returns an error if the ledger rejects the operation, if output cannot be
/// written, or if `verify` finds an inconsistency.
pub fn run<W: Write>(command: &Command, ledger: &mut TireLedger, out: &mut W) -> Result<()> {
    match command {
        Command::Init => init(ledger, out),
        Command::Status { json } => status(ledger, *json, out),
        Command::Recompute => recompute(ledger, out),
        Command::Verify => verify(ledger, out),
        Command::Export { dir } => {
            let tables: FlatTables = ledger.export_tables()?;
            tables.write_dir(dir)?;
            info!(dir = %dir.display(), tires = tables.tires.len(), "Exported tables");
            writeln!(
                out,
                "Exported {} tires, {} ledger lines and {} measurements to {}",
                tables.tires.len(),
                tables.ledger.len(),
                tables.measurements.len(),
                dir.display()
            )?;
            Ok(())
        }
        Command::Import { dir } => {
            let tables: FlatTables = FlatTables::read_dir(dir)?;
            let state = ledger.import_tables(&tables)?;
            writeln!(
                out,
                "Imported {} tires, {} outings and {} measurements",
                state.tires.len(),
                state.outings.len(),
                state.measurements.len()
            )?;
            Ok(())
        }
        Command::Calendar => calendar(out),
    }
}

fn init<W: Write>(ledger: &mut TireLedger, out: &mut W) -> Result<()> {
    let added: Vec<String> = ledger.seed_default_tracks()?;
    if added.is_empty() {
        writeln!(out, "Database ready; default tracks already present")?;
    } else {
        writeln!(
            out,
            "Database ready; seeded {} tracks: {}",
            added.len(),
            added.join(", ")
        )?;
    }
    Ok(())
}

fn status<W: Write>(ledger: &mut TireLedger, json: bool, out: &mut W) -> Result<()> {
    let summary: StatusSummary = ledger.status_summary()?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Stage:        {}", summary.current_stage)?;
    for (status, count) in &summary.tires_by_status {
        writeln!(out, "Tires {status:<9} {count}")?;
    }
    writeln!(out, "Active sets:  {}", summary.active_sets)?;
    writeln!(out, "Outings:      {}", summary.outings)?;
    writeln!(out, "Drifting:     {}", summary.drifting_tires)?;
    Ok(())
}

fn recompute<W: Write>(ledger: &mut TireLedger, out: &mut W) -> Result<()> {
    let corrections: Vec<DistanceCorrection> = ledger.recompute_all()?;
    for c in &corrections {
        writeln!(
            out,
            "{}: {:.3} -> {:.3} km",
            c.tire_id, c.previous, c.recomputed
        )?;
    }
    writeln!(out, "Corrected {} tires", corrections.len())?;
    Ok(())
}

fn verify<W: Write>(ledger: &mut TireLedger, out: &mut W) -> Result<()> {
    let report: LedgerReport = ledger.verify_ledger()?;
    for line in report.drifting() {
        writeln!(
            out,
            "{}: registry {:.3} km, ledger {:.3} km",
            line.tire_id, line.registry_distance, line.ledger_distance
        )?;
    }
    for (outing_id, tire_id) in &report.mismatched_entries {
        writeln!(
            out,
            "outing {outing_id}: ledger line for {tire_id} does not match the outing distance"
        )?;
    }

    if report.is_consistent() {
        writeln!(out, "Ledger consistent for {} tires", report.lines.len())?;
        Ok(())
    } else {
        warn!(
            drifting = report.drifting().count(),
            mismatched = report.mismatched_entries.len(),
            "Ledger inconsistent"
        );
        bail!("ledger is inconsistent; run `tire-ledger recompute` to repair tire distances")
    }
}

fn calendar<W: Write>(out: &mut W) -> Result<()> {
    for entry in season_calendar() {
        writeln!(
            out,
            "{:>2}  {}  {:<14} {:<28} {}",
            entry.stage,
            format_date(entry.date),
            entry.venue,
            entry.track_name,
            entry.kind
        )?;
    }
    Ok(())
}
