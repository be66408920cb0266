// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wholesale replacement of the tire inventory.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tire_ledger::State;
use tire_ledger_domain::UsageEntry;
use tracing::info;

use super::{inventory, ledger};
use crate::diesel_schema::{measurements, outings, tire_sets, tire_usage_history, tires};
use crate::error::PersistenceError;

/// Replaces tires, sets, outings, ledger lines and measurements with the
/// contents of `state`. Tracks, cars, the open stage and stage records are
/// kept.
///
/// # Errors
///
/// Returns an error if any row violates a table constraint.
pub fn replace_inventory(conn: &mut SqliteConnection, state: &State) -> Result<(), PersistenceError> {
    diesel::delete(measurements::table).execute(conn)?;
    diesel::delete(tire_usage_history::table).execute(conn)?;
    diesel::delete(outings::table).execute(conn)?;
    diesel::delete(tire_sets::table).execute(conn)?;
    diesel::delete(tires::table).execute(conn)?;

    for tire in &state.tires {
        inventory::insert_tire(conn, tire)?;
    }
    for set in &state.sets {
        inventory::insert_set(conn, set)?;
    }
    for outing in &state.outings {
        let entries: Vec<UsageEntry> = state
            .ledger
            .iter()
            .filter(|e| Some(e.outing_id) == outing.outing_id)
            .cloned()
            .collect();
        ledger::insert_outing(conn, outing, &entries)?;
    }
    for measurement in &state.measurements {
        ledger::insert_measurement(conn, measurement)?;
    }

    info!(
        tires = state.tires.len(),
        sets = state.sets.len(),
        outings = state.outings.len(),
        ledger_lines = state.ledger.len(),
        measurements = state.measurements.len(),
        "Replaced inventory"
    );
    Ok(())
}
