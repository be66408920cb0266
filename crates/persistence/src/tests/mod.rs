// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod command_tests;
mod initialization_tests;

use crate::Persistence;
use time::Date;
use time::macros::date;
use tire_ledger::{AssemblyInput, Command, OutingInput, Outcome, PurchaseInput, TransitionResult};
use tire_ledger_domain::{
    Car, SeasonPolicy, SequentialIds, SessionType, TireCategory, Track, TrackCondition,
};

pub const TEST_DATE: Date = date!(2026 - 03 - 07);

pub fn execute(persistence: &mut Persistence, command: Command) -> TransitionResult {
    persistence
        .execute(&SeasonPolicy::default(), &SequentialIds::default(), command)
        .unwrap()
}

/// In-memory store with Interlagos and one car registered.
pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    execute(
        &mut persistence,
        Command::RegisterTrack(Track::new("INTER7", "Interlagos", 4.309)),
    );
    execute(
        &mut persistence,
        Command::RegisterCar(Car::new("Car A", Some(11), TEST_DATE)),
    );
    persistence
}

pub fn purchase(persistence: &mut Persistence, count: u32) -> Vec<String> {
    let stage: u8 = persistence.current_stage().unwrap();
    let result: TransitionResult = execute(
        persistence,
        Command::PurchaseTires(PurchaseInput {
            stage,
            car: String::from("Car A"),
            count,
            category: TireCategory::Standard,
            prefix: None,
            start_number: None,
            distance_limit: 1000,
            initial_depth: Some(8.0),
            date: TEST_DATE,
        }),
    );
    let Outcome::TiresPurchased { tire_ids } = result.outcome else {
        panic!("unexpected outcome");
    };
    tire_ids
}

pub fn assemble(persistence: &mut Persistence, ids: &[String]) -> String {
    let mut slots: [Option<String>; 4] = [None, None, None, None];
    for (slot, id) in slots.iter_mut().zip(ids) {
        *slot = Some(id.clone());
    }
    let result: TransitionResult = execute(
        persistence,
        Command::AssembleSet(AssemblyInput {
            name: format!("set {}", ids.join(",")),
            category: TireCategory::Standard,
            car: Some(String::from("Car A")),
            track_id: Some(String::from("INTER7")),
            slots,
            date: TEST_DATE,
        }),
    );
    let Outcome::SetAssembled { set_id } = result.outcome else {
        panic!("unexpected outcome");
    };
    set_id
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

pub fn record(persistence: &mut Persistence, set_id: &str, laps: i64) -> i64 {
    let result: TransitionResult = execute(
        persistence,
        Command::RecordOuting(outing_input(set_id, laps, TEST_DATE)),
    );
    let Outcome::OutingRecorded { outing_id, .. } = result.outcome else {
        panic!("unexpected outcome");
    };
    outing_id
}
