// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::commands::{Command, run};
use pretty_assertions::assert_eq;
use std::path::Path;
use time::Date;
use time::macros::date;
use tire_ledger_api::{AssemblyInput, OutingInput, PurchaseInput, TireLedger};
use tire_ledger_domain::{
    Car, SeasonPolicy, SessionType, SetSlots, TireCategory, TireStatus, Track, TrackCondition,
};

const RACE_DAY: Date = date!(2026 - 03 - 08);

fn run_to_string(command: &Command, ledger: &mut TireLedger) -> String {
    let mut out: Vec<u8> = Vec::new();
    run(command, ledger, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// One set of four tires that has done ten laps of Interlagos.
fn driven_ledger() -> TireLedger {
    let mut ledger: TireLedger = TireLedger::open_in_memory(SeasonPolicy::default()).unwrap();
    ledger
        .register_track(Track::new("INTER7", "Interlagos", 4.309))
        .unwrap();
    ledger
        .register_car(Car::new("Car A", Some(11), RACE_DAY))
        .unwrap();
    let ids: Vec<String> = ledger
        .purchase(PurchaseInput {
            stage: 1,
            car: String::from("Car A"),
            count: 4,
            category: TireCategory::Standard,
            prefix: None,
            start_number: None,
            distance_limit: 1000,
            initial_depth: Some(8.0),
            date: RACE_DAY,
        })
        .unwrap();
    let mut slots: SetSlots = [None, None, None, None];
    for (slot, id) in slots.iter_mut().zip(&ids) {
        *slot = Some(id.clone());
    }
    let set_id: String = ledger
        .assemble(AssemblyInput {
            name: String::from("Qualifying"),
            category: TireCategory::Standard,
            car: Some(String::from("Car A")),
            track_id: Some(String::from("INTER7")),
            slots,
            date: RACE_DAY,
        })
        .unwrap();
    ledger
        .record_outing(OutingInput {
            date: RACE_DAY,
            track_id: String::from("INTER7"),
            set_id,
            session_type: SessionType::Qualifying,
            condition: TrackCondition::Dry,
            laps: 10,
            notes: String::new(),
        })
        .unwrap();
    ledger
}

#[test]
fn test_init_seeds_tracks_once() {
    let mut ledger: TireLedger = TireLedger::open_in_memory(SeasonPolicy::default()).unwrap();

    let first: String = run_to_string(&Command::Init, &mut ledger);
    let second: String = run_to_string(&Command::Init, &mut ledger);

    assert!(first.starts_with("Database ready; seeded"));
    assert!(first.contains("INTER7"));
    assert_eq!(second, "Database ready; default tracks already present\n");
}

#[test]
fn test_status_reports_counts() {
    let mut ledger: TireLedger = driven_ledger();

    let text: String = run_to_string(&Command::Status { json: false }, &mut ledger);

    assert!(text.contains("Stage:        1\n"));
    assert!(text.contains("Tires in_use    4\n"));
    assert!(text.contains("Active sets:  1\n"));
    assert!(text.contains("Outings:      1\n"));
    assert!(text.contains("Drifting:     0\n"));
}

#[test]
fn test_status_as_json() {
    let mut ledger: TireLedger = driven_ledger();

    let text: String = run_to_string(&Command::Status { json: true }, &mut ledger);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["current_stage"], 1);
    assert_eq!(value["tires_by_status"]["in_use"], 4);
    assert_eq!(value["outings"], 1);
}

#[test]
fn test_verify_fails_until_recompute_repairs_drift() {
    let mut ledger: TireLedger = driven_ledger();
    assert!(run_to_string(&Command::Verify, &mut ledger).starts_with("Ledger consistent"));

    ledger.delete_outing(1).unwrap();

    let mut out: Vec<u8> = Vec::new();
    let err = run(&Command::Verify, &mut ledger, &mut out).unwrap_err();
    assert!(err.to_string().contains("ledger is inconsistent"));
    let text: String = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("registry 43.090 km, ledger 0.000 km"));

    let repaired: String = run_to_string(&Command::Recompute, &mut ledger);
    assert!(repaired.contains("P1001: 43.090 -> 0.000 km"));
    assert!(repaired.ends_with("Corrected 4 tires\n"));
    assert_eq!(
        run_to_string(&Command::Verify, &mut ledger),
        "Ledger consistent for 4 tires\n"
    );
}

#[test]
fn test_export_then_import_into_a_fresh_database() {
    let mut source: TireLedger = driven_ledger();
    let dir = tempfile::tempdir().unwrap();
    let export_dir: &Path = dir.path();

    let exported: String = run_to_string(
        &Command::Export {
            dir: export_dir.join("tables"),
        },
        &mut source,
    );
    assert!(exported.starts_with("Exported 4 tires, 4 ledger lines and 0 measurements"));
    assert!(export_dir.join("tables").join("tires.csv").is_file());

    let mut target: TireLedger = TireLedger::open(
        export_dir.join("target.db"),
        SeasonPolicy::default(),
    )
    .unwrap();
    target
        .register_track(Track::new("INTER7", "Interlagos", 4.309))
        .unwrap();
    target
        .register_car(Car::new("Car A", Some(11), RACE_DAY))
        .unwrap();

    let imported: String = run_to_string(
        &Command::Import {
            dir: export_dir.join("tables"),
        },
        &mut target,
    );

    assert_eq!(imported, "Imported 4 tires, 1 outings and 0 measurements\n");
    assert_eq!(
        target.get_tire("P1001").unwrap().status,
        TireStatus::Available
    );
}

#[test]
fn test_calendar_lists_every_stage() {
    let mut ledger: TireLedger = TireLedger::open_in_memory(SeasonPolicy::default()).unwrap();

    let text: String = run_to_string(&Command::Calendar, &mut ledger);

    assert_eq!(text.lines().count(), 12);
    assert!(text.starts_with(" 1  2026-03-08  Curvelo"));
}
