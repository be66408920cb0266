// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Track, car, tire and set rows.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tire_ledger_domain::{Car, Tire, TireSet, Track, WheelPosition, format_date};
use tracing::debug;

use super::{inserted, touched_one};
use crate::diesel_schema::{cars, tire_sets, tires, tracks};
use crate::error::PersistenceError;

pub fn insert_track(conn: &mut SqliteConnection, track: &Track) -> Result<(), PersistenceError> {
    let result = diesel::insert_into(tracks::table)
        .values((
            tracks::track_id.eq(&track.track_id),
            tracks::name.eq(&track.name),
            tracks::lap_length_km.eq(track.lap_length_km),
            tracks::layout.eq(track.layout.as_str()),
            tracks::direction.eq(track.direction.as_str()),
            tracks::characteristics.eq(&track.characteristics),
            tracks::wear_bias_fl.eq(track.bias_for(WheelPosition::FrontLeft).as_str()),
            tracks::wear_bias_fr.eq(track.bias_for(WheelPosition::FrontRight).as_str()),
            tracks::wear_bias_rl.eq(track.bias_for(WheelPosition::RearLeft).as_str()),
            tracks::wear_bias_rr.eq(track.bias_for(WheelPosition::RearRight).as_str()),
        ))
        .execute(conn);
    inserted(result, "tracks", &track.track_id)?;
    debug!(track_id = %track.track_id, "Inserted track");
    Ok(())
}

pub fn update_track(conn: &mut SqliteConnection, track: &Track) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(tracks::table.find(&track.track_id))
        .set((
            tracks::name.eq(&track.name),
            tracks::lap_length_km.eq(track.lap_length_km),
            tracks::layout.eq(track.layout.as_str()),
            tracks::direction.eq(track.direction.as_str()),
            tracks::characteristics.eq(&track.characteristics),
            tracks::wear_bias_fl.eq(track.bias_for(WheelPosition::FrontLeft).as_str()),
            tracks::wear_bias_fr.eq(track.bias_for(WheelPosition::FrontRight).as_str()),
            tracks::wear_bias_rl.eq(track.bias_for(WheelPosition::RearLeft).as_str()),
            tracks::wear_bias_rr.eq(track.bias_for(WheelPosition::RearRight).as_str()),
        ))
        .execute(conn)?;
    touched_one(affected, "tracks", &track.track_id)
}

pub fn insert_car(conn: &mut SqliteConnection, car: &Car) -> Result<(), PersistenceError> {
    let result = diesel::insert_into(cars::table)
        .values((
            cars::name.eq(&car.name),
            cars::race_number.eq(car.race_number.map(i32::from)),
            cars::driver.eq(&car.driver),
            cars::category.eq(&car.category),
            cars::is_active.eq(i32::from(car.active)),
            cars::registered_on.eq(format_date(car.registered_on)),
        ))
        .execute(conn);
    inserted(result, "cars", &car.name)
}

pub fn update_car(conn: &mut SqliteConnection, car: &Car) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(cars::table.find(&car.name))
        .set((
            cars::race_number.eq(car.race_number.map(i32::from)),
            cars::driver.eq(&car.driver),
            cars::category.eq(&car.category),
            cars::is_active.eq(i32::from(car.active)),
        ))
        .execute(conn)?;
    touched_one(affected, "cars", &car.name)
}

pub fn insert_tire(conn: &mut SqliteConnection, tire: &Tire) -> Result<(), PersistenceError> {
    let result = diesel::insert_into(tires::table)
        .values((
            tires::tire_id.eq(&tire.tire_id),
            tires::category.eq(tire.category.as_str()),
            tires::car_name.eq(tire.car.as_deref()),
            tires::barcode.eq(tire.barcode.as_deref()),
            tires::registered_on.eq(format_date(tire.registered_on)),
            tires::distance_limit.eq(tire.distance_limit),
            tires::accumulated_distance.eq(tire.accumulated_distance),
            tires::initial_depth.eq(tire.initial_depth),
            tires::registered_stage.eq(i32::from(tire.registered_stage)),
            tires::current_stage.eq(i32::from(tire.current_stage)),
            tires::status.eq(tire.status.as_str()),
            tires::notes.eq(&tire.notes),
        ))
        .execute(conn);
    inserted(result, "tires", &tire.tire_id)
}

/// Rewrites every mutable column of a tire.
pub fn update_tire(conn: &mut SqliteConnection, tire: &Tire) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(tires::table.find(&tire.tire_id))
        .set((
            tires::category.eq(tire.category.as_str()),
            tires::car_name.eq(tire.car.as_deref()),
            tires::barcode.eq(tire.barcode.as_deref()),
            tires::distance_limit.eq(tire.distance_limit),
            tires::accumulated_distance.eq(tire.accumulated_distance),
            tires::initial_depth.eq(tire.initial_depth),
            tires::current_stage.eq(i32::from(tire.current_stage)),
            tires::status.eq(tire.status.as_str()),
            tires::notes.eq(&tire.notes),
        ))
        .execute(conn)?;
    touched_one(affected, "tires", &tire.tire_id)
}

pub fn insert_set(conn: &mut SqliteConnection, set: &TireSet) -> Result<(), PersistenceError> {
    let result = diesel::insert_into(tire_sets::table)
        .values((
            tire_sets::set_id.eq(&set.set_id),
            tire_sets::name.eq(&set.name),
            tire_sets::category.eq(set.category.as_str()),
            tire_sets::car_name.eq(set.car.as_deref()),
            tire_sets::track_id.eq(set.track_id.as_deref()),
            tire_sets::assembled_on.eq(format_date(set.assembled_on)),
            tire_sets::status.eq(set.status.as_str()),
            tire_sets::tire_fl.eq(set.tire_at(WheelPosition::FrontLeft)),
            tire_sets::tire_fr.eq(set.tire_at(WheelPosition::FrontRight)),
            tire_sets::tire_rl.eq(set.tire_at(WheelPosition::RearLeft)),
            tire_sets::tire_rr.eq(set.tire_at(WheelPosition::RearRight)),
        ))
        .execute(conn);
    inserted(result, "tire_sets", &set.set_id)?;
    debug!(set_id = %set.set_id, "Inserted set");
    Ok(())
}

/// Only the status of a set changes after assembly.
pub fn update_set(conn: &mut SqliteConnection, set: &TireSet) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(tire_sets::table.find(&set.set_id))
        .set(tire_sets::status.eq(set.status.as_str()))
        .execute(conn)?;
    touched_one(affected, "tire_sets", &set.set_id)
}
