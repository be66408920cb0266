// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs for every table and their conversion into domain values.
//!
//! Dates are stored as `YYYY-MM-DD` text, enums by their `as_str` code and
//! booleans as `0`/`1` integers.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use tire_ledger_domain::{
    Car, DepthReadings, Measurement, Outing, StageRecord, Tire, TireSet, Track, UsageEntry,
    parse_date,
};

use crate::diesel_schema::{
    cars, measurements, outings, season_state, stage_records, tire_sets, tire_usage_history,
    tires, tracks,
};
use crate::error::PersistenceError;

fn stage_from(value: i32, column: &str) -> Result<u8, PersistenceError> {
    value.to_u8().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{column} {value} is not a stage number"))
    })
}

fn count_from(value: i64, column: &str) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{column} {value} is not a count"))
    })
}

fn optional_date(value: Option<&str>) -> Result<Option<time::Date>, PersistenceError> {
    Ok(value.map(parse_date).transpose()?)
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tracks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackRow {
    pub track_id: String,
    pub name: String,
    pub lap_length_km: f64,
    pub layout: String,
    pub direction: String,
    pub characteristics: String,
    pub wear_bias_fl: String,
    pub wear_bias_fr: String,
    pub wear_bias_rl: String,
    pub wear_bias_rr: String,
}

impl TryFrom<TrackRow> for Track {
    type Error = PersistenceError;

    fn try_from(row: TrackRow) -> Result<Self, Self::Error> {
        Ok(Self {
            track_id: row.track_id,
            name: row.name,
            lap_length_km: row.lap_length_km,
            layout: row.layout.parse()?,
            direction: row.direction.parse()?,
            characteristics: row.characteristics,
            wear_bias: [
                row.wear_bias_fl.parse()?,
                row.wear_bias_fr.parse()?,
                row.wear_bias_rl.parse()?,
                row.wear_bias_rr.parse()?,
            ],
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = cars)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CarRow {
    pub name: String,
    pub race_number: Option<i32>,
    pub driver: String,
    pub category: String,
    pub is_active: i32,
    pub registered_on: String,
}

impl TryFrom<CarRow> for Car {
    type Error = PersistenceError;

    fn try_from(row: CarRow) -> Result<Self, Self::Error> {
        let race_number: Option<u16> = row
            .race_number
            .map(|n| {
                n.to_u16().ok_or_else(|| {
                    PersistenceError::ReconstructionError(format!("race number {n} out of range"))
                })
            })
            .transpose()?;
        Ok(Self {
            registered_on: parse_date(&row.registered_on)?,
            name: row.name,
            race_number,
            driver: row.driver,
            category: row.category,
            active: row.is_active != 0,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tires)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TireRow {
    pub tire_id: String,
    pub category: String,
    pub car_name: Option<String>,
    pub barcode: Option<String>,
    pub registered_on: String,
    pub distance_limit: i64,
    pub accumulated_distance: f64,
    pub initial_depth: Option<f64>,
    pub registered_stage: i32,
    pub current_stage: i32,
    pub status: String,
    pub notes: String,
}

impl TryFrom<TireRow> for Tire {
    type Error = PersistenceError;

    fn try_from(row: TireRow) -> Result<Self, Self::Error> {
        Ok(Self {
            category: row.category.parse()?,
            registered_on: parse_date(&row.registered_on)?,
            registered_stage: stage_from(row.registered_stage, "registered_stage")?,
            current_stage: stage_from(row.current_stage, "current_stage")?,
            status: row.status.parse()?,
            tire_id: row.tire_id,
            car: row.car_name,
            barcode: row.barcode,
            distance_limit: row.distance_limit,
            accumulated_distance: row.accumulated_distance,
            initial_depth: row.initial_depth,
            notes: row.notes,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tire_sets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TireSetRow {
    pub set_id: String,
    pub name: String,
    pub category: String,
    pub car_name: Option<String>,
    pub track_id: Option<String>,
    pub assembled_on: String,
    pub status: String,
    pub tire_fl: Option<String>,
    pub tire_fr: Option<String>,
    pub tire_rl: Option<String>,
    pub tire_rr: Option<String>,
}

impl TryFrom<TireSetRow> for TireSet {
    type Error = PersistenceError;

    fn try_from(row: TireSetRow) -> Result<Self, Self::Error> {
        Ok(Self {
            category: row.category.parse()?,
            assembled_on: parse_date(&row.assembled_on)?,
            status: row.status.parse()?,
            set_id: row.set_id,
            name: row.name,
            car: row.car_name,
            track_id: row.track_id,
            slots: [row.tire_fl, row.tire_fr, row.tire_rl, row.tire_rr],
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = outings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OutingRow {
    pub outing_id: i64,
    pub outing_date: String,
    pub track_id: String,
    pub set_id: String,
    pub session_type: String,
    pub track_condition: String,
    pub laps: i64,
    pub distance: f64,
    pub notes: String,
}

impl TryFrom<OutingRow> for Outing {
    type Error = PersistenceError;

    fn try_from(row: OutingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            outing_id: Some(row.outing_id),
            date: parse_date(&row.outing_date)?,
            session_type: row.session_type.parse()?,
            condition: row.track_condition.parse()?,
            track_id: row.track_id,
            set_id: row.set_id,
            laps: row.laps,
            distance: row.distance,
            notes: row.notes,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tire_usage_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UsageEntryRow {
    pub entry_id: i64,
    pub tire_id: String,
    pub outing_id: i64,
    pub position: String,
    pub distance_before: f64,
    pub distance_after: f64,
}

impl TryFrom<UsageEntryRow> for UsageEntry {
    type Error = PersistenceError;

    fn try_from(row: UsageEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            entry_id: Some(row.entry_id),
            position: row.position.parse()?,
            tire_id: row.tire_id,
            outing_id: row.outing_id,
            distance_before: row.distance_before,
            distance_after: row.distance_after,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = measurements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MeasurementRow {
    pub measurement_id: i64,
    pub tire_id: String,
    pub measured_on: String,
    pub stage: i32,
    pub depth_inner: f64,
    pub depth_centre_inner: f64,
    pub depth_centre_outer: f64,
    pub depth_outer: f64,
    pub average_depth: f64,
    pub distance: f64,
    pub depth_condition: String,
    pub distance_condition: String,
    pub action: String,
    pub notes: String,
}

impl TryFrom<MeasurementRow> for Measurement {
    type Error = PersistenceError;

    fn try_from(row: MeasurementRow) -> Result<Self, Self::Error> {
        Ok(Self {
            measurement_id: Some(row.measurement_id),
            date: parse_date(&row.measured_on)?,
            stage: stage_from(row.stage, "stage")?,
            readings: DepthReadings {
                inner: row.depth_inner,
                centre_inner: row.depth_centre_inner,
                centre_outer: row.depth_centre_outer,
                outer: row.depth_outer,
            },
            depth_condition: row.depth_condition.parse()?,
            distance_condition: row.distance_condition.parse()?,
            action: row.action.parse()?,
            tire_id: row.tire_id,
            average_depth: row.average_depth,
            distance: row.distance,
            notes: row.notes,
        })
    }
}

/// The single `season_state` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = season_state)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SeasonRow {
    pub current_stage: i32,
    pub last_outing_id: i64,
}

impl SeasonRow {
    pub fn stage(&self) -> Result<u8, PersistenceError> {
        stage_from(self.current_stage, "current_stage")
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = stage_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StageRecordRow {
    pub stage: i32,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub tires_purchased: i64,
    pub retained_json: String,
    pub discarded: i64,
    pub status: String,
}

impl TryFrom<StageRecordRow> for StageRecord {
    type Error = PersistenceError;

    fn try_from(row: StageRecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            stage: stage_from(row.stage, "stage")?,
            start_date: optional_date(row.start_date.as_deref())?,
            end_date: optional_date(row.end_date.as_deref())?,
            tires_purchased: count_from(row.tires_purchased, "tires_purchased")?,
            retained: serde_json::from_str(&row.retained_json)?,
            discarded: count_from(row.discarded, "discarded")?,
            status: row.status.parse()?,
        })
    }
}
