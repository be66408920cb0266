// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Set assembly and disassembly.
//!
//! A tire may sit in at most one active set. Assembly checks every member
//! against the other active sets before anything is written.

use crate::apply::Transition;
use crate::command::AssemblyInput;
use crate::error::CoreError;
use crate::state::{Change, Outcome};
use tire_ledger_domain::{
    Car, DomainError, IdGenerator, SET_PREFIX, SetStatus, Tire, TireSet, TireStatus,
    validate_set_member, validate_set_slots,
};

pub(crate) fn assemble<G: IdGenerator>(
    tx: &mut Transition,
    ids: &G,
    input: AssemblyInput,
) -> Result<Outcome, CoreError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::InvalidName { entity: "set" }.into());
    }
    validate_set_slots(&input.slots)?;

    if tx
        .state
        .sets
        .iter()
        .any(|s| s.is_active() && s.name == input.name)
    {
        return Err(DomainError::DuplicateName {
            entity: "set",
            name: input.name,
        }
        .into());
    }

    if let Some(car_name) = input.car.as_deref() {
        let car: &Car = tx.state.car(car_name).ok_or_else(|| CoreError::NotFound {
            entity: "car",
            id: car_name.to_string(),
        })?;
        if !car.active {
            return Err(CoreError::InvalidState {
                entity: "car",
                id: car_name.to_string(),
                reason: "car is inactive".to_string(),
            });
        }
    }
    if let Some(track_id) = input.track_id.as_deref()
        && tx.state.track(track_id).is_none()
    {
        return Err(CoreError::NotFound {
            entity: "track",
            id: track_id.to_string(),
        });
    }

    let mut members: Vec<Tire> = Vec::new();
    for tire_id in input.slots.iter().flatten() {
        let tire: &Tire = tx.state.tire(tire_id).ok_or_else(|| CoreError::NotFound {
            entity: "tire",
            id: tire_id.clone(),
        })?;
        if let Some(other) = tx.state.active_set_holding(tire_id) {
            return Err(CoreError::InvalidState {
                entity: "tire",
                id: tire_id.clone(),
                reason: format!("already mounted in active set '{}'", other.set_id),
            });
        }
        if tire.status != TireStatus::Available {
            return Err(CoreError::InvalidState {
                entity: "tire",
                id: tire_id.clone(),
                reason: format!("tire is {}, not available", tire.status),
            });
        }
        validate_set_member(tire, input.category, input.car.as_deref())?;
        members.push(tire.clone());
    }

    let existing: Vec<String> = tx.state.sets.iter().map(|s| s.set_id.clone()).collect();
    let set_id: String = ids.next_free(SET_PREFIX, &existing);

    tx.push(Change::InsertSet(TireSet {
        set_id: set_id.clone(),
        name: input.name,
        category: input.category,
        car: input.car,
        track_id: input.track_id,
        assembled_on: input.date,
        status: SetStatus::Active,
        slots: input.slots,
    }));
    for mut tire in members {
        tire.status.validate_transition(&tire.tire_id, TireStatus::Mounted)?;
        tire.status = TireStatus::Mounted;
        tx.push(Change::UpdateTire(tire));
    }

    Ok(Outcome::SetAssembled { set_id })
}

/// Releases every mounted member back to `available`.
///
/// Disassembling a set twice is refused.
pub(crate) fn disassemble(tx: &mut Transition, set_id: &str) -> Result<Outcome, CoreError> {
    let mut set: TireSet = tx.state.set(set_id).cloned().ok_or_else(|| CoreError::NotFound {
        entity: "set",
        id: set_id.to_string(),
    })?;
    if !set.is_active() {
        return Err(CoreError::InvalidTransition {
            entity: "set",
            id: set_id.to_string(),
            from: set.status.as_str().to_string(),
            to: SetStatus::Disassembled.as_str().to_string(),
        });
    }

    let released: Vec<String> = release_members(tx, &set);
    set.status = SetStatus::Disassembled;
    tx.push(Change::UpdateSet(set));

    Ok(Outcome::SetDisassembled {
        set_id: set_id.to_string(),
        released,
    })
}

/// Moves the set's mounted or in-use tires back to `available`.
pub(crate) fn release_members(tx: &mut Transition, set: &TireSet) -> Vec<String> {
    let mut released: Vec<String> = Vec::new();
    for (_, tire_id) in set.mounted() {
        if let Some(tire) = tx.state.tire(tire_id)
            && tire.status.is_assembled()
        {
            let mut tire: Tire = tire.clone();
            tire.status = TireStatus::Available;
            released.push(tire.tire_id.clone());
            tx.push(Change::UpdateTire(tire));
        }
    }
    released
}
