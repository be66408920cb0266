// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read queries.

pub mod inventory;
pub mod ledger;
pub mod season;

use diesel::SqliteConnection;
use tire_ledger::State;
use tracing::debug;

use crate::data_models::SeasonRow;
use crate::error::PersistenceError;

/// Loads everything the rules need into one [`State`].
///
/// Call this inside the transaction that will commit the resulting
/// changes so that every check sees the data it is about to modify.
///
/// # Errors
///
/// Returns an error if a query fails or a stored row is invalid.
pub fn load_state(conn: &mut SqliteConnection) -> Result<State, PersistenceError> {
    let season: SeasonRow = season::load_season(conn)?;
    let state: State = State {
        current_stage: season.stage()?,
        last_outing_id: season.last_outing_id,
        tracks: inventory::load_tracks(conn)?,
        cars: inventory::load_cars(conn)?,
        tires: inventory::load_tires(conn)?,
        sets: inventory::load_sets(conn)?,
        outings: ledger::load_outings(conn)?,
        ledger: ledger::load_ledger(conn)?,
        measurements: ledger::load_measurements(conn)?,
        stage_records: season::load_stage_records(conn)?,
    };
    debug!(
        stage = state.current_stage,
        tires = state.tires.len(),
        outings = state.outings.len(),
        "Loaded state"
    );
    Ok(state)
}
