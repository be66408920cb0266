// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outings, ledger lines and measurements.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tire_ledger_domain::{Measurement, Outing, UsageEntry};

use crate::data_models::{MeasurementRow, OutingRow, UsageEntryRow};
use crate::diesel_schema::{measurements, outings, tire_usage_history};
use crate::error::PersistenceError;

/// All outings ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_outings(conn: &mut SqliteConnection) -> Result<Vec<Outing>, PersistenceError> {
    let rows: Vec<OutingRow> = outings::table
        .order(outings::outing_id.asc())
        .select(OutingRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Outing::try_from).collect()
}

/// Every ledger line in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_ledger(conn: &mut SqliteConnection) -> Result<Vec<UsageEntry>, PersistenceError> {
    let rows: Vec<UsageEntryRow> = tire_usage_history::table
        .order(tire_usage_history::entry_id.asc())
        .select(UsageEntryRow::as_select())
        .load(conn)?;
    rows.into_iter().map(UsageEntry::try_from).collect()
}

/// Ledger lines of one tire, oldest outing first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn history_for_tire(
    conn: &mut SqliteConnection,
    tire_id: &str,
) -> Result<Vec<UsageEntry>, PersistenceError> {
    let rows: Vec<UsageEntryRow> = tire_usage_history::table
        .inner_join(outings::table)
        .filter(tire_usage_history::tire_id.eq(tire_id))
        .order((outings::outing_date.asc(), outings::outing_id.asc()))
        .select(UsageEntryRow::as_select())
        .load(conn)?;
    rows.into_iter().map(UsageEntry::try_from).collect()
}

/// All measurements in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_measurements(conn: &mut SqliteConnection) -> Result<Vec<Measurement>, PersistenceError> {
    let rows: Vec<MeasurementRow> = measurements::table
        .order(measurements::measurement_id.asc())
        .select(MeasurementRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Measurement::try_from).collect()
}
