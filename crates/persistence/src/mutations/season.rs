// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tire_ledger_domain::{StageRecord, format_date};
use tracing::info;

use super::{inserted, touched_one};
use crate::diesel_schema::{season_state, stage_records};
use crate::error::PersistenceError;

pub fn set_current_stage(conn: &mut SqliteConnection, stage: u8) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(season_state::table.find(1))
        .set(season_state::current_stage.eq(i32::from(stage)))
        .execute(conn)?;
    touched_one(affected, "season_state", "1")?;
    info!(stage, "Opened stage");
    Ok(())
}

/// Keeps `last_outing_id` at the highest id ever assigned.
pub fn raise_last_outing_id(conn: &mut SqliteConnection, outing_id: i64) -> Result<(), PersistenceError> {
    diesel::update(
        season_state::table
            .find(1)
            .filter(season_state::last_outing_id.lt(outing_id)),
    )
    .set(season_state::last_outing_id.eq(outing_id))
    .execute(conn)?;
    Ok(())
}

pub fn insert_stage_record(
    conn: &mut SqliteConnection,
    record: &StageRecord,
) -> Result<(), PersistenceError> {
    let retained_json: String = serde_json::to_string(&record.retained)?;
    let result = diesel::insert_into(stage_records::table)
        .values((
            stage_records::stage.eq(i32::from(record.stage)),
            stage_records::start_date.eq(record.start_date.map(format_date)),
            stage_records::end_date.eq(record.end_date.map(format_date)),
            stage_records::tires_purchased.eq(i64::from(record.tires_purchased)),
            stage_records::retained_json.eq(retained_json),
            stage_records::discarded.eq(i64::from(record.discarded)),
            stage_records::status.eq(record.status.as_str()),
        ))
        .execute(conn);
    inserted(result, "stage_records", &record.stage.to_string())?;
    info!(
        stage = record.stage,
        discarded = record.discarded,
        retained = ?record.retained,
        "Closed stage"
    );
    Ok(())
}
