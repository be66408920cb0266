// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AssemblyInput, Command, CoreError, OutingInput, Outcome, PurchaseInput, State,
    TransitionResult, apply,
};
use time::Date;
use time::macros::date;
use tire_ledger_domain::{
    Car, SeasonPolicy, SequentialIds, SessionType, SetSlots, TireCategory, Track, TrackCondition,
};

pub const TEST_DATE: Date = date!(2026 - 03 - 07);

pub fn run(state: &State, command: Command) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        &SeasonPolicy::default(),
        &SequentialIds::default(),
        command,
    )
}

/// Applies a command that must succeed and returns the new state and outcome.
pub fn step(state: &State, command: Command) -> (State, Outcome) {
    let result: TransitionResult = run(state, command).unwrap();
    (result.new_state, result.outcome)
}

pub fn create_test_state() -> State {
    let state: State = State::new();
    let (state, _) = step(
        &state,
        Command::RegisterTrack(Track::new("INTER7", "Interlagos", 4.309)),
    );
    let (state, _) = step(
        &state,
        Command::RegisterCar(Car::new("Car A", Some(11), TEST_DATE)),
    );
    state
}

pub fn purchase_input(stage: u8, count: u32) -> PurchaseInput {
    PurchaseInput {
        stage,
        car: String::from("Car A"),
        count,
        category: TireCategory::Standard,
        prefix: None,
        start_number: None,
        distance_limit: 1000,
        initial_depth: Some(8.0),
        date: TEST_DATE,
    }
}

/// Purchases tires and returns their ids.
pub fn purchase(state: &State, count: u32) -> (State, Vec<String>) {
    let stage: u8 = state.current_stage;
    let (state, outcome) = step(state, Command::PurchaseTires(purchase_input(stage, count)));
    let Outcome::TiresPurchased { tire_ids } = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    (state, tire_ids)
}

pub fn slots_of(ids: &[String]) -> SetSlots {
    let mut slots: SetSlots = [None, None, None, None];
    for (slot, id) in slots.iter_mut().zip(ids) {
        *slot = Some(id.clone());
    }
    slots
}

pub fn assembly_input(name: &str, ids: &[String]) -> AssemblyInput {
    AssemblyInput {
        name: name.to_string(),
        category: TireCategory::Standard,
        car: Some(String::from("Car A")),
        track_id: None,
        slots: slots_of(ids),
        date: TEST_DATE,
    }
}

/// Assembles a set and returns its id.
pub fn assemble(state: &State, name: &str, ids: &[String]) -> (State, String) {
    let (state, outcome) = step(state, Command::AssembleSet(assembly_input(name, ids)));
    let Outcome::SetAssembled { set_id } = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    (state, set_id)
}

pub fn outing_input(set_id: &str, laps: i64, date: Date) -> OutingInput {
    OutingInput {
        date,
        track_id: String::from("INTER7"),
        set_id: set_id.to_string(),
        session_type: SessionType::Practice,
        condition: TrackCondition::Dry,
        laps,
        notes: String::new(),
    }
}

/// Records an outing and returns its id.
pub fn record(state: &State, set_id: &str, laps: i64, date: Date) -> (State, i64) {
    let (state, outcome) = step(state, Command::RecordOuting(outing_input(set_id, laps, date)));
    let Outcome::OutingRecorded { outing_id, .. } = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    (state, outing_id)
}

pub fn distance_of(state: &State, tire_id: &str) -> f64 {
    state.tire(tire_id).unwrap().accumulated_distance
}

pub fn ledger_sum(state: &State, tire_id: &str) -> f64 {
    state
        .ledger
        .iter()
        .filter(|e| e.tire_id == tire_id)
        .map(tire_ledger_domain::UsageEntry::delta)
        .sum()
}
