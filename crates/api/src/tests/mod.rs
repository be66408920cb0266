// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod ledger_tests;

use crate::{AssemblyInput, OutingInput, OutingReceipt, PurchaseInput, TireLedger};
use time::Date;
use time::macros::date;
use tire_ledger_domain::{
    Car, SeasonPolicy, SessionType, SetSlots, TireCategory, Track, TrackCondition,
};

pub const TEST_DATE: Date = date!(2026 - 03 - 07);

/// Ledger with Interlagos and one car registered.
pub fn create_test_ledger() -> TireLedger {
    let mut ledger: TireLedger = TireLedger::open_in_memory(SeasonPolicy::default()).unwrap();
    register_fixtures(&mut ledger);
    ledger
}

pub fn register_fixtures(ledger: &mut TireLedger) {
    ledger
        .register_track(Track::new("INTER7", "Interlagos", 4.309))
        .unwrap();
    ledger
        .register_car(Car::new("Car A", Some(11), TEST_DATE))
        .unwrap();
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

pub fn purchase(ledger: &mut TireLedger, count: u32) -> Vec<String> {
    let stage: u8 = ledger.current_stage().unwrap();
    ledger.purchase(purchase_input(stage, count)).unwrap()
}

pub fn assembly_input(name: &str, ids: &[String]) -> AssemblyInput {
    let mut slots: SetSlots = [None, None, None, None];
    for (slot, id) in slots.iter_mut().zip(ids) {
        *slot = Some(id.clone());
    }
    AssemblyInput {
        name: name.to_string(),
        category: TireCategory::Standard,
        car: Some(String::from("Car A")),
        track_id: Some(String::from("INTER7")),
        slots,
        date: TEST_DATE,
    }
}

pub fn assemble(ledger: &mut TireLedger, name: &str, ids: &[String]) -> String {
    ledger.assemble(assembly_input(name, ids)).unwrap()
}

pub fn outing_input(set_id: &str, laps: i64) -> OutingInput {
    OutingInput {
        date: TEST_DATE,
        track_id: String::from("INTER7"),
        set_id: set_id.to_string(),
        session_type: SessionType::Practice,
        condition: TrackCondition::Dry,
        laps,
        notes: String::new(),
    }
}

pub fn record(ledger: &mut TireLedger, set_id: &str, laps: i64) -> OutingReceipt {
    ledger.record_outing(outing_input(set_id, laps)).unwrap()
}

pub fn distance_of(ledger: &mut TireLedger, tire_id: &str) -> f64 {
    ledger.get_tire(tire_id).unwrap().accumulated_distance
}
