// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Change, Outcome, State, TransitionResult};
use crate::{outings, registry, sets, stages};
use tire_ledger_domain::{IdGenerator, SeasonPolicy};

/// Accumulates changes while keeping a working copy of the state current.
pub(crate) struct Transition {
    pub(crate) state: State,
    pub(crate) changes: Vec<Change>,
}

impl Transition {
    pub(crate) fn new(state: &State) -> Self {
        Self {
            state: state.clone(),
            changes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, change: Change) {
        self.state.apply_change(&change);
        self.changes.push(change);
    }

    fn finish(self, outcome: Outcome) -> TransitionResult {
        TransitionResult {
            new_state: self.state,
            changes: self.changes,
            outcome,
        }
    }
}

/// Applies a command to the state, producing the new state and the writes
/// needed to persist it.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `policy` - The season's quota table and limits
/// * `ids` - Naming strategy for generated tires and sets
/// * `command` - The command to apply
///
/// # Errors
///
/// Returns an error if the command violates a domain rule or targets an
/// entity that is missing or in the wrong state. No change is produced
/// on error.
pub fn apply<G: IdGenerator>(
    state: &State,
    policy: &SeasonPolicy,
    ids: &G,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    let mut tx: Transition = Transition::new(state);

    let outcome: Outcome = match command {
        Command::RegisterTrack(track) => registry::register_track(&mut tx, track)?,
        Command::UpdateTrack(track) => registry::update_track(&mut tx, track)?,
        Command::SeedDefaultTracks => registry::seed_default_tracks(&mut tx),
        Command::RegisterCar(car) => registry::register_car(&mut tx, car)?,
        Command::SetCarActive { name, active } => {
            registry::set_car_active(&mut tx, &name, active)?
        }
        Command::RegisterTire(tire) => registry::register_tire(&mut tx, tire)?,
        Command::SetTireStatus { tire_id, status } => {
            registry::set_tire_status(&mut tx, &tire_id, status)?
        }
        Command::DiscardTire { tire_id } => registry::discard_tire(&mut tx, &tire_id)?,
        Command::RecordMeasurement {
            tire_id,
            date,
            readings,
            notes,
        } => registry::record_measurement(&mut tx, policy, &tire_id, date, readings, &notes)?,
        Command::PurchaseTires(input) => stages::purchase(&mut tx, policy, ids, input)?,
        Command::AdvanceStage { selected, end_date } => {
            stages::advance(&mut tx, policy, &selected, end_date)?
        }
        Command::AssembleSet(input) => sets::assemble(&mut tx, ids, input)?,
        Command::DisassembleSet { set_id } => sets::disassemble(&mut tx, &set_id)?,
        Command::RecordOuting(input) => outings::record(&mut tx, &input)?,
        Command::UpdateOuting {
            outing_id,
            notes,
            session_type,
            condition,
        } => outings::update(&mut tx, outing_id, notes, session_type, condition)?,
        Command::DeleteOuting { outing_id } => outings::delete(&mut tx, outing_id)?,
        Command::ReplaceOuting { outing_id, input } => {
            outings::replace(&mut tx, outing_id, &input)?
        }
        Command::RecomputeAll => outings::recompute_all(&mut tx),
    };

    Ok(tx.finish(outcome))
}
