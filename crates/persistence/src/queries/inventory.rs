// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tire_ledger_domain::{Car, Tire, TireSet, Track};

use crate::data_models::{CarRow, TireRow, TireSetRow, TrackRow};
use crate::diesel_schema::{cars, tire_sets, tires, tracks};
use crate::error::PersistenceError;

/// All tracks ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_tracks(conn: &mut SqliteConnection) -> Result<Vec<Track>, PersistenceError> {
    let rows: Vec<TrackRow> = tracks::table
        .order(tracks::track_id.asc())
        .select(TrackRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Track::try_from).collect()
}

/// All cars ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_cars(conn: &mut SqliteConnection) -> Result<Vec<Car>, PersistenceError> {
    let rows: Vec<CarRow> = cars::table
        .order(cars::name.asc())
        .select(CarRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Car::try_from).collect()
}

/// All tires ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_tires(conn: &mut SqliteConnection) -> Result<Vec<Tire>, PersistenceError> {
    let rows: Vec<TireRow> = tires::table
        .order(tires::tire_id.asc())
        .select(TireRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Tire::try_from).collect()
}

/// Looks up one tire.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
/// Returns `Ok(None)` if the tire does not exist.
pub fn get_tire(conn: &mut SqliteConnection, tire_id: &str) -> Result<Option<Tire>, PersistenceError> {
    let row: Option<TireRow> = tires::table
        .find(tire_id)
        .select(TireRow::as_select())
        .first(conn)
        .optional()?;
    row.map(Tire::try_from).transpose()
}

/// All sets ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_sets(conn: &mut SqliteConnection) -> Result<Vec<TireSet>, PersistenceError> {
    let rows: Vec<TireSetRow> = tire_sets::table
        .order(tire_sets::set_id.asc())
        .select(TireSetRow::as_select())
        .load(conn)?;
    rows.into_iter().map(TireSet::try_from).collect()
}
