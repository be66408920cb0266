// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outings, ledger lines and measurements.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tire_ledger_domain::{Measurement, Outing, UsageEntry, format_date};
use tracing::{debug, info};

use super::{inserted, season, touched_one};
use crate::diesel_schema::{measurements, outings, tire_usage_history};
use crate::error::PersistenceError;

/// Inserts an outing under its pre-assigned id together with its ledger lines.
///
/// # Errors
///
/// Returns an error if the outing has no id or a statement fails.
pub fn insert_outing(
    conn: &mut SqliteConnection,
    outing: &Outing,
    entries: &[UsageEntry],
) -> Result<(), PersistenceError> {
    let outing_id: i64 = outing.outing_id.ok_or_else(|| {
        PersistenceError::ReconstructionError("outing has no id assigned".to_string())
    })?;

    let result = diesel::insert_into(outings::table)
        .values((
            outings::outing_id.eq(outing_id),
            outings::outing_date.eq(format_date(outing.date)),
            outings::track_id.eq(&outing.track_id),
            outings::set_id.eq(&outing.set_id),
            outings::session_type.eq(outing.session_type.as_str()),
            outings::track_condition.eq(outing.condition.as_str()),
            outings::laps.eq(outing.laps),
            outings::distance.eq(outing.distance),
            outings::notes.eq(&outing.notes),
        ))
        .execute(conn);
    inserted(result, "outings", &outing_id.to_string())?;

    for entry in entries {
        insert_entry(conn, entry)?;
    }
    season::raise_last_outing_id(conn, outing_id)?;

    info!(
        outing_id,
        set_id = %outing.set_id,
        distance = outing.distance,
        tire_count = entries.len(),
        "Recorded outing"
    );
    Ok(())
}

pub fn insert_entry(conn: &mut SqliteConnection, entry: &UsageEntry) -> Result<(), PersistenceError> {
    let result = diesel::insert_into(tire_usage_history::table)
        .values((
            tire_usage_history::tire_id.eq(&entry.tire_id),
            tire_usage_history::outing_id.eq(entry.outing_id),
            tire_usage_history::position.eq(entry.position.as_str()),
            tire_usage_history::distance_before.eq(entry.distance_before),
            tire_usage_history::distance_after.eq(entry.distance_after),
        ))
        .execute(conn);
    inserted(
        result,
        "tire_usage_history",
        &format!("{}/{}", entry.outing_id, entry.tire_id),
    )?;
    debug!(
        outing_id = entry.outing_id,
        tire_id = %entry.tire_id,
        position = entry.position.as_str(),
        "Inserted ledger line"
    );
    Ok(())
}

/// Rewrites the descriptive columns of an outing.
pub fn update_outing(conn: &mut SqliteConnection, outing: &Outing) -> Result<(), PersistenceError> {
    let outing_id: i64 = outing.outing_id.unwrap_or_default();
    let affected: usize = diesel::update(outings::table.find(outing_id))
        .set((
            outings::session_type.eq(outing.session_type.as_str()),
            outings::track_condition.eq(outing.condition.as_str()),
            outings::notes.eq(&outing.notes),
        ))
        .execute(conn)?;
    touched_one(affected, "outings", &outing_id.to_string())
}

/// Removes an outing and its ledger lines. Tire distances are left alone.
pub fn delete_outing(conn: &mut SqliteConnection, outing_id: i64) -> Result<(), PersistenceError> {
    let lines: usize = diesel::delete(
        tire_usage_history::table.filter(tire_usage_history::outing_id.eq(outing_id)),
    )
    .execute(conn)?;
    let affected: usize = diesel::delete(outings::table.find(outing_id)).execute(conn)?;
    touched_one(affected, "outings", &outing_id.to_string())?;
    info!(outing_id, lines, "Deleted outing");
    Ok(())
}

pub fn update_entry(
    conn: &mut SqliteConnection,
    outing_id: i64,
    tire_id: &str,
    distance_before: f64,
    distance_after: f64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(
        tire_usage_history::table
            .filter(tire_usage_history::outing_id.eq(outing_id))
            .filter(tire_usage_history::tire_id.eq(tire_id)),
    )
    .set((
        tire_usage_history::distance_before.eq(distance_before),
        tire_usage_history::distance_after.eq(distance_after),
    ))
    .execute(conn)?;
    touched_one(
        affected,
        "tire_usage_history",
        &format!("{outing_id}/{tire_id}"),
    )
}

pub fn insert_measurement(
    conn: &mut SqliteConnection,
    measurement: &Measurement,
) -> Result<(), PersistenceError> {
    diesel::insert_into(measurements::table)
        .values((
            measurements::tire_id.eq(&measurement.tire_id),
            measurements::measured_on.eq(format_date(measurement.date)),
            measurements::stage.eq(i32::from(measurement.stage)),
            measurements::depth_inner.eq(measurement.readings.inner),
            measurements::depth_centre_inner.eq(measurement.readings.centre_inner),
            measurements::depth_centre_outer.eq(measurement.readings.centre_outer),
            measurements::depth_outer.eq(measurement.readings.outer),
            measurements::average_depth.eq(measurement.average_depth),
            measurements::distance.eq(measurement.distance),
            measurements::depth_condition.eq(measurement.depth_condition.as_str()),
            measurements::distance_condition.eq(measurement.distance_condition.as_str()),
            measurements::action.eq(measurement.action.as_str()),
            measurements::notes.eq(&measurement.notes),
        ))
        .execute(conn)?;
    debug!(tire_id = %measurement.tire_id, action = measurement.action.as_str(), "Inserted measurement");
    Ok(())
}
