// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes.
//!
//! The rules in `tire-ledger` describe every mutation as an ordered list of
//! [`Change`]s; [`write_changes`] turns each one into a single statement
//! group. Callers run it inside the transaction that loaded the state.

pub mod import;
pub mod inventory;
pub mod ledger;
pub mod season;

use diesel::SqliteConnection;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tire_ledger::Change;
use tracing::debug;

use crate::error::PersistenceError;

/// Maps a unique-constraint failure on insert to `DuplicateKey`.
pub(crate) fn inserted(
    result: Result<usize, DieselError>,
    table: &'static str,
    id: &str,
) -> Result<(), PersistenceError> {
    match result {
        Ok(_) => Ok(()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(PersistenceError::DuplicateKey {
                table,
                id: id.to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Fails unless an update or delete touched exactly one row.
pub(crate) fn touched_one(
    affected: usize,
    table: &'static str,
    id: &str,
) -> Result<(), PersistenceError> {
    if affected == 1 {
        Ok(())
    } else {
        Err(PersistenceError::EntityNotFound {
            table,
            id: id.to_string(),
        })
    }
}

/// Writes every change in order.
///
/// # Errors
///
/// Returns an error on the first statement that fails; the caller's
/// transaction then rolls everything back.
pub fn write_changes(conn: &mut SqliteConnection, changes: &[Change]) -> Result<(), PersistenceError> {
    for change in changes {
        write_change(conn, change)?;
    }
    debug!(count = changes.len(), "Wrote changes");
    Ok(())
}

fn write_change(conn: &mut SqliteConnection, change: &Change) -> Result<(), PersistenceError> {
    match change {
        Change::InsertTrack(track) => inventory::insert_track(conn, track),
        Change::UpdateTrack(track) => inventory::update_track(conn, track),
        Change::InsertCar(car) => inventory::insert_car(conn, car),
        Change::UpdateCar(car) => inventory::update_car(conn, car),
        Change::InsertTire(tire) => inventory::insert_tire(conn, tire),
        Change::UpdateTire(tire) => inventory::update_tire(conn, tire),
        Change::InsertSet(set) => inventory::insert_set(conn, set),
        Change::UpdateSet(set) => inventory::update_set(conn, set),
        Change::InsertOuting { outing, entries } => ledger::insert_outing(conn, outing, entries),
        Change::UpdateOuting(outing) => ledger::update_outing(conn, outing),
        Change::DeleteOuting { outing_id } => ledger::delete_outing(conn, *outing_id),
        Change::UpdateLedgerEntry {
            outing_id,
            tire_id,
            distance_before,
            distance_after,
        } => ledger::update_entry(conn, *outing_id, tire_id, *distance_before, *distance_after),
        Change::InsertMeasurement(measurement) => ledger::insert_measurement(conn, measurement),
        Change::InsertStageRecord(record) => season::insert_stage_record(conn, record),
        Change::SetCurrentStage(stage) => season::set_current_stage(conn, *stage),
    }
}
