// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Track, car and tire registries plus tread measurements.

use crate::apply::Transition;
use crate::error::CoreError;
use crate::state::{Change, Outcome};
use time::Date;
use tire_ledger_domain::{
    Car, DepthReadings, DomainError, Measurement, SeasonPolicy, Tire, TireStatus, Track,
    default_tracks, evaluate_measurement, validate_car, validate_tire, validate_track,
};

pub(crate) fn register_track(tx: &mut Transition, track: Track) -> Result<Outcome, CoreError> {
    validate_track(&track)?;
    if tx.state.track(&track.track_id).is_some() {
        return Err(CoreError::DuplicateKey {
            entity: "track",
            id: track.track_id,
        });
    }
    let track_id: String = track.track_id.clone();
    tx.push(Change::InsertTrack(track));
    Ok(Outcome::TrackRegistered { track_id })
}

/// Lap length is frozen once an outing has been recorded on the track.
pub(crate) fn update_track(tx: &mut Transition, track: Track) -> Result<Outcome, CoreError> {
    let Some(existing) = tx.state.track(&track.track_id) else {
        return Err(CoreError::NotFound {
            entity: "track",
            id: track.track_id,
        });
    };
    validate_track(&track)?;

    let length_changed: bool = (existing.lap_length_km - track.lap_length_km).abs() > f64::EPSILON;
    let referenced: bool = tx
        .state
        .outings
        .iter()
        .any(|o| o.track_id == track.track_id);
    if length_changed && referenced {
        return Err(CoreError::InvalidState {
            entity: "track",
            id: track.track_id,
            reason: "lap length cannot change once outings reference the track".to_string(),
        });
    }

    let track_id: String = track.track_id.clone();
    tx.push(Change::UpdateTrack(track));
    Ok(Outcome::TrackUpdated { track_id })
}

pub(crate) fn seed_default_tracks(tx: &mut Transition) -> Outcome {
    let mut added: Vec<String> = Vec::new();
    for track in default_tracks() {
        if tx.state.track(&track.track_id).is_none() {
            added.push(track.track_id.clone());
            tx.push(Change::InsertTrack(track));
        }
    }
    Outcome::TracksSeeded { added }
}

pub(crate) fn register_car(tx: &mut Transition, car: Car) -> Result<Outcome, CoreError> {
    validate_car(&car)?;
    if tx.state.car(&car.name).is_some() {
        return Err(CoreError::DuplicateKey {
            entity: "car",
            id: car.name,
        });
    }
    let name: String = car.name.clone();
    tx.push(Change::InsertCar(car));
    Ok(Outcome::CarRegistered { name })
}

pub(crate) fn set_car_active(tx: &mut Transition, name: &str, active: bool) -> Result<Outcome, CoreError> {
    let mut car: Car = tx.state.car(name).cloned().ok_or_else(|| CoreError::NotFound {
        entity: "car",
        id: name.to_string(),
    })?;
    car.active = active;
    tx.push(Change::UpdateCar(car));
    Ok(Outcome::CarUpdated {
        name: name.to_string(),
    })
}

/// Registers a tire outside the purchase flow.
///
/// The tire is tagged to the open stage and is not counted against a
/// stage that has already closed.
pub(crate) fn register_tire(tx: &mut Transition, mut tire: Tire) -> Result<Outcome, CoreError> {
    validate_tire(&tire)?;
    if tx.state.tire(&tire.tire_id).is_some() {
        return Err(CoreError::DuplicateKey {
            entity: "tire",
            id: tire.tire_id,
        });
    }
    if tire.status.is_assembled() {
        return Err(CoreError::InvalidState {
            entity: "tire",
            id: tire.tire_id,
            reason: "a new tire cannot already be mounted in a set".to_string(),
        });
    }
    if tire.accumulated_distance.abs() > f64::EPSILON {
        return Err(CoreError::InvalidState {
            entity: "tire",
            id: tire.tire_id,
            reason: "a new tire starts with no distance; distance comes from outings".to_string(),
        });
    }
    if let Some(car) = tire.car.as_deref()
        && tx.state.car(car).is_none()
    {
        return Err(CoreError::NotFound {
            entity: "car",
            id: car.to_string(),
        });
    }

    tire.registered_stage = tx.state.current_stage;
    tire.current_stage = tx.state.current_stage;
    let tire_id: String = tire.tire_id.clone();
    tx.push(Change::InsertTire(tire));
    Ok(Outcome::TireRegistered { tire_id })
}

fn require_tire(tx: &Transition, tire_id: &str) -> Result<Tire, CoreError> {
    tx.state.tire(tire_id).cloned().ok_or_else(|| CoreError::NotFound {
        entity: "tire",
        id: tire_id.to_string(),
    })
}

fn require_not_in_active_set(tx: &Transition, tire_id: &str) -> Result<(), CoreError> {
    if let Some(set) = tx.state.active_set_holding(tire_id) {
        return Err(CoreError::InvalidState {
            entity: "tire",
            id: tire_id.to_string(),
            reason: format!("mounted in active set '{}'", set.set_id),
        });
    }
    Ok(())
}

/// Operator status change.
///
/// `mounted` and `in_use` are only reached through set assembly and
/// outings, so they are refused here.
pub(crate) fn set_tire_status(
    tx: &mut Transition,
    tire_id: &str,
    status: TireStatus,
) -> Result<Outcome, CoreError> {
    let mut tire: Tire = require_tire(tx, tire_id)?;

    if tire.status == status && !status.is_terminal() {
        return Ok(Outcome::TireStatusChanged {
            tire_id: tire_id.to_string(),
        });
    }
    tire.status.validate_transition(tire_id, status)?;
    if status.is_assembled() {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidTireStatusTransition {
                tire_id: tire_id.to_string(),
                from: tire.status.as_str().to_string(),
                to: status.as_str().to_string(),
                reason: "tires are mounted by assembling a set".to_string(),
            },
        ));
    }
    require_not_in_active_set(tx, tire_id)?;

    tire.status = status;
    tx.push(Change::UpdateTire(tire));
    Ok(Outcome::TireStatusChanged {
        tire_id: tire_id.to_string(),
    })
}

pub(crate) fn discard_tire(tx: &mut Transition, tire_id: &str) -> Result<Outcome, CoreError> {
    let tire: Tire = require_tire(tx, tire_id)?;
    if tire.status.is_terminal() {
        return Err(CoreError::InvalidTransition {
            entity: "tire",
            id: tire_id.to_string(),
            from: tire.status.as_str().to_string(),
            to: TireStatus::Discarded.as_str().to_string(),
        });
    }
    require_not_in_active_set(tx, tire_id)?;
    set_tire_status(tx, tire_id, TireStatus::Discarded)
}

pub(crate) fn record_measurement(
    tx: &mut Transition,
    policy: &SeasonPolicy,
    tire_id: &str,
    date: Date,
    readings: DepthReadings,
    notes: &str,
) -> Result<Outcome, CoreError> {
    let tire: Tire = require_tire(tx, tire_id)?;
    if tire.status.is_terminal() {
        return Err(CoreError::InvalidState {
            entity: "tire",
            id: tire_id.to_string(),
            reason: "discarded tires are not measured".to_string(),
        });
    }

    let measurement: Measurement = evaluate_measurement(
        tire_id,
        date,
        tx.state.current_stage,
        readings,
        tire.accumulated_distance,
        tire.distance_limit,
        policy.limit_floor_km,
        notes,
    )?;
    tx.push(Change::InsertMeasurement(measurement.clone()));
    Ok(Outcome::MeasurementRecorded { measurement })
}
