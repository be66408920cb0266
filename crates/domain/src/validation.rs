// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::car::Car;
use crate::error::DomainError;
use crate::tire::Tire;
use crate::tire_set::SetSlots;
use crate::track::Track;
use crate::types::TireCategory;
use std::collections::HashSet;

fn validate_identifier(entity: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() || value.trim() != value {
        return Err(DomainError::InvalidIdentifier {
            entity,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates a track before registration or correction.
///
/// # Errors
///
/// Returns an error if the id or name is empty, or the lap length is not
/// a positive finite number.
pub fn validate_track(track: &Track) -> Result<(), DomainError> {
    validate_identifier("track", &track.track_id)?;
    if track.name.trim().is_empty() {
        return Err(DomainError::InvalidName { entity: "track" });
    }
    track.usable_lap_length()?;
    Ok(())
}

/// Validates a car before registration.
///
/// # Errors
///
/// Returns an error if the name is empty or padded with whitespace.
pub fn validate_car(car: &Car) -> Result<(), DomainError> {
    validate_identifier("car", &car.name)
}

/// Validates the shape of a tire before it enters the registry.
///
/// # Errors
///
/// Returns an error if the id is malformed, the limit is not positive,
/// the distance is negative, or the initial depth is out of range.
pub fn validate_tire(tire: &Tire) -> Result<(), DomainError> {
    validate_identifier("tire", &tire.tire_id)?;
    if tire.distance_limit <= 0 {
        return Err(DomainError::InvalidDistanceLimit {
            limit: tire.distance_limit,
        });
    }
    if !tire.accumulated_distance.is_finite() || tire.accumulated_distance < 0.0 {
        return Err(DomainError::InvalidDistance {
            tire_id: tire.tire_id.clone(),
            distance: tire.accumulated_distance,
        });
    }
    if let Some(depth) = tire.initial_depth
        && (!depth.is_finite() || !(0.0..=crate::measurement::MAX_DEPTH_MM).contains(&depth))
    {
        return Err(DomainError::InvalidDepthReading {
            reading: "initial_depth",
            value: depth,
        });
    }
    Ok(())
}

/// Validates the slot list of a set being assembled.
///
/// At least one slot must be filled, and no tire may appear twice.
///
/// # Errors
///
/// Returns `DomainError::EmptySet`, `DomainError::InvalidIdentifier` for a
/// blank id, or `DomainError::DuplicateTireInSet`.
pub fn validate_set_slots(slots: &SetSlots) -> Result<(), DomainError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for tire_id in slots.iter().flatten() {
        validate_identifier("tire", tire_id)?;
        if !seen.insert(tire_id.as_str()) {
            return Err(DomainError::DuplicateTireInSet {
                tire_id: tire_id.clone(),
            });
        }
    }
    if seen.is_empty() {
        return Err(DomainError::EmptySet);
    }
    Ok(())
}

/// Validates that a tire may join a set of the given category and car.
///
/// # Errors
///
/// Returns `DomainError::CategoryMismatch` or `DomainError::CarMismatch`.
pub fn validate_set_member(
    tire: &Tire,
    set_category: TireCategory,
    set_car: Option<&str>,
) -> Result<(), DomainError> {
    if tire.category != set_category {
        return Err(DomainError::CategoryMismatch {
            tire_id: tire.tire_id.clone(),
            tire_category: tire.category.as_str().to_string(),
            set_category: set_category.as_str().to_string(),
        });
    }
    if let (Some(set_car), Some(tire_car)) = (set_car, tire.car.as_deref())
        && set_car != tire_car
    {
        return Err(DomainError::CarMismatch {
            tire_id: tire.tire_id.clone(),
            tire_car: tire_car.to_string(),
            set_car: set_car.to_string(),
        });
    }
    Ok(())
}
