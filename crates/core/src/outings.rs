// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The usage ledger.
//!
//! Recording an outing appends one ledger line per mounted tire and adds
//! the outing distance to each of those tires. Deleting an outing removes
//! its lines but leaves tire distances alone; `recompute_all` replays the
//! remaining ledger to bring the registry back in line.

use crate::apply::Transition;
use crate::command::OutingInput;
use crate::error::CoreError;
use crate::state::{Change, DistanceCorrection, Outcome};
use std::collections::BTreeMap;
use tire_ledger_domain::{
    DomainError, Outing, SessionType, Tire, TireSet, TireStatus, Track, TrackCondition,
    UsageEntry, compute_distance,
};

fn require_track(tx: &Transition, track_id: &str) -> Result<Track, CoreError> {
    tx.state
        .track(track_id)
        .cloned()
        .ok_or_else(|| CoreError::NotFound {
            entity: "track",
            id: track_id.to_string(),
        })
}

fn require_set(tx: &Transition, set_id: &str) -> Result<TireSet, CoreError> {
    tx.state
        .set(set_id)
        .cloned()
        .ok_or_else(|| CoreError::NotFound {
            entity: "set",
            id: set_id.to_string(),
        })
}

fn require_outing(tx: &Transition, outing_id: i64) -> Result<Outing, CoreError> {
    tx.state
        .outing(outing_id)
        .cloned()
        .ok_or_else(|| CoreError::NotFound {
            entity: "outing",
            id: outing_id.to_string(),
        })
}

/// Writes the outing, its ledger lines and the tire distances.
fn write_outing(
    tx: &mut Transition,
    track: &Track,
    set: &TireSet,
    input: &OutingInput,
) -> Result<(i64, f64, Vec<UsageEntry>), CoreError> {
    let distance: f64 = compute_distance(track, input.laps)?;
    let outing_id: i64 = tx.state.last_outing_id + 1;

    let mut entries: Vec<UsageEntry> = Vec::new();
    let mut tires: Vec<Tire> = Vec::new();
    for (position, tire_id) in set.mounted() {
        let mut tire: Tire = tx
            .state
            .tire(tire_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "tire",
                id: tire_id.to_string(),
            })?;
        let distance_before: f64 = tire.accumulated_distance;
        let distance_after: f64 = distance_before + distance;
        entries.push(UsageEntry {
            entry_id: None,
            tire_id: tire_id.to_string(),
            outing_id,
            position,
            distance_before,
            distance_after,
        });

        tire.accumulated_distance = distance_after;
        if set.is_active() && tire.status == TireStatus::Mounted {
            tire.status.validate_transition(tire_id, TireStatus::InUse)?;
            tire.status = TireStatus::InUse;
        }
        tires.push(tire);
    }

    let outing: Outing = Outing {
        outing_id: Some(outing_id),
        date: input.date,
        track_id: input.track_id.clone(),
        set_id: input.set_id.clone(),
        session_type: input.session_type,
        condition: input.condition,
        laps: input.laps,
        distance,
        notes: input.notes.clone(),
    };
    tx.push(Change::InsertOuting {
        outing,
        entries: entries.clone(),
    });
    for tire in tires {
        tx.push(Change::UpdateTire(tire));
    }

    Ok((outing_id, distance, entries))
}

pub(crate) fn record(tx: &mut Transition, input: &OutingInput) -> Result<Outcome, CoreError> {
    let track: Track = require_track(tx, &input.track_id)?;
    if input.laps <= 0 {
        return Err(DomainError::InvalidLapCount { laps: input.laps }.into());
    }
    let set: TireSet = require_set(tx, &input.set_id)?;
    if !set.is_active() {
        return Err(CoreError::InvalidState {
            entity: "set",
            id: set.set_id,
            reason: "outings cannot be recorded against a disassembled set".to_string(),
        });
    }

    let (outing_id, distance, entries) = write_outing(tx, &track, &set, input)?;
    Ok(Outcome::OutingRecorded {
        outing_id,
        distance,
        entries,
    })
}

/// Edits notes, session type and condition; the accounting fields stay put.
pub(crate) fn update(
    tx: &mut Transition,
    outing_id: i64,
    notes: String,
    session_type: SessionType,
    condition: TrackCondition,
) -> Result<Outcome, CoreError> {
    let mut outing: Outing = require_outing(tx, outing_id)?;
    outing.notes = notes;
    outing.session_type = session_type;
    outing.condition = condition;
    tx.push(Change::UpdateOuting(outing));
    Ok(Outcome::OutingUpdated { outing_id })
}

/// Removes the outing and its ledger lines.
///
/// Tire distances are not reversed; the affected tires are reported as
/// stale until `recompute_all` runs.
pub(crate) fn delete(tx: &mut Transition, outing_id: i64) -> Result<Outcome, CoreError> {
    require_outing(tx, outing_id)?;
    let mut stale_tires: Vec<String> = tx
        .state
        .entries_for(outing_id)
        .map(|e| e.tire_id.clone())
        .collect();
    stale_tires.sort();
    tx.push(Change::DeleteOuting { outing_id });
    Ok(Outcome::OutingDeleted {
        outing_id,
        stale_tires,
    })
}

/// Deletes an outing and records a new one in its place, then replays the
/// ledger so every distance is consistent again.
///
/// A disassembled set is accepted only when it is the set the original
/// outing ran on; any other set must still be active.
pub(crate) fn replace(
    tx: &mut Transition,
    outing_id: i64,
    input: &OutingInput,
) -> Result<Outcome, CoreError> {
    let original: Outing = require_outing(tx, outing_id)?;
    let track: Track = require_track(tx, &input.track_id)?;
    if input.laps <= 0 {
        return Err(DomainError::InvalidLapCount { laps: input.laps }.into());
    }
    let set: TireSet = require_set(tx, &input.set_id)?;
    if !set.is_active() && set.set_id != original.set_id {
        return Err(CoreError::InvalidState {
            entity: "set",
            id: set.set_id,
            reason: "a replacement outing may only use a disassembled set the original outing ran on"
                .to_string(),
        });
    }

    tx.push(Change::DeleteOuting { outing_id });
    let (new_outing_id, _, _) = write_outing(tx, &track, &set, input)?;
    let corrections: Vec<DistanceCorrection> = replay(tx);

    Ok(Outcome::OutingReplaced {
        deleted_outing_id: outing_id,
        outing_id: new_outing_id,
        corrections,
    })
}

pub(crate) fn recompute_all(tx: &mut Transition) -> Outcome {
    let corrections: Vec<DistanceCorrection> = replay(tx);
    Outcome::Recomputed { corrections }
}

const fn differs(a: f64, b: f64) -> bool {
    a.to_bits() != b.to_bits()
}

/// Resets every tire to zero and replays the ledger ordered by
/// `(date, outing id)`, using each outing's stored distance as the delta.
///
/// Only values that actually change are written, so a second run is a no-op.
fn replay(tx: &mut Transition) -> Vec<DistanceCorrection> {
    let mut running: BTreeMap<String, f64> = tx
        .state
        .tires
        .iter()
        .map(|t| (t.tire_id.clone(), 0.0))
        .collect();

    let mut outings: Vec<Outing> = tx.state.outings.clone();
    outings.sort_by_key(|o| (o.date, o.outing_id));

    let mut changes: Vec<Change> = Vec::new();
    for outing in &outings {
        let Some(outing_id) = outing.outing_id else {
            continue;
        };
        let mut entries: Vec<&UsageEntry> = tx.state.entries_for(outing_id).collect();
        entries.sort_by_key(|e| e.position);
        for entry in entries {
            let distance_before: f64 = running.get(&entry.tire_id).copied().unwrap_or(0.0);
            let distance_after: f64 = distance_before + outing.distance;
            running.insert(entry.tire_id.clone(), distance_after);

            if differs(entry.distance_before, distance_before)
                || differs(entry.distance_after, distance_after)
            {
                changes.push(Change::UpdateLedgerEntry {
                    outing_id,
                    tire_id: entry.tire_id.clone(),
                    distance_before,
                    distance_after,
                });
            }
        }
    }

    let mut corrections: Vec<DistanceCorrection> = Vec::new();
    for tire in &tx.state.tires {
        let recomputed: f64 = running.get(&tire.tire_id).copied().unwrap_or(0.0);
        if differs(tire.accumulated_distance, recomputed) {
            corrections.push(DistanceCorrection {
                tire_id: tire.tire_id.clone(),
                previous: tire.accumulated_distance,
                recomputed,
            });
            let mut tire: Tire = tire.clone();
            tire.accumulated_distance = recomputed;
            changes.push(Change::UpdateTire(tire));
        }
    }

    for change in changes {
        tx.push(change);
    }
    corrections
}
