// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tire_ledger_domain::StageRecord;

use crate::data_models::{SeasonRow, StageRecordRow};
use crate::diesel_schema::{season_state, stage_records};
use crate::error::PersistenceError;

/// Reads the single season row seeded by the migrations.
///
/// # Errors
///
/// Returns `PersistenceError::InitializationError` if the row is missing.
pub fn load_season(conn: &mut SqliteConnection) -> Result<SeasonRow, PersistenceError> {
    season_state::table
        .find(1)
        .select(SeasonRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::InitializationError("season_state row is missing".to_string())
        })
}

/// Closed stages in order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_stage_records(conn: &mut SqliteConnection) -> Result<Vec<StageRecord>, PersistenceError> {
    let rows: Vec<StageRecordRow> = stage_records::table
        .order(stage_records::stage.asc())
        .select(StageRecordRow::as_select())
        .load(conn)?;
    rows.into_iter().map(StageRecord::try_from).collect()
}
