// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    TEST_DATE, assemble, create_test_persistence, execute, outing_input, purchase, record,
};
use crate::{Persistence, PersistenceError};
use pretty_assertions::assert_eq;
use tire_ledger::{Command, CoreError, Outcome, State, TransitionResult, verify_ledger};
use tire_ledger_domain::{
    DepthReadings, RecommendedAction, SeasonPolicy, SequentialIds, SetStatus, StageStatus, Tire,
    TireStatus, UsageEntry, WheelPosition,
};

fn try_execute(
    persistence: &mut Persistence,
    command: Command,
) -> Result<TransitionResult, PersistenceError> {
    persistence.execute(&SeasonPolicy::default(), &SequentialIds::default(), command)
}

#[test]
fn test_purchase_is_persisted() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 4);

    let tire: Tire = persistence.get_tire(&ids[0]).unwrap().unwrap();
    assert_eq!(tire.tire_id, "P1001");
    assert_eq!(tire.barcode.as_deref(), Some("100001"));
    assert_eq!(tire.car.as_deref(), Some("Car A"));
    assert_eq!(tire.initial_depth, Some(8.0));
    assert_eq!(tire.status, TireStatus::Available);
    assert!(persistence.get_tire("NOPE").unwrap().is_none());
}

#[test]
fn test_loaded_state_matches_committed_state() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 4);
    let set_id: String = assemble(&mut persistence, &ids);

    let result: TransitionResult = execute(
        &mut persistence,
        Command::DisassembleSet {
            set_id: set_id.clone(),
        },
    );
    let loaded: State = persistence.load_state().unwrap();
    assert_eq!(loaded.tires, result.new_state.tires);
    assert_eq!(loaded.sets, result.new_state.sets);
    assert_eq!(loaded.set(&set_id).unwrap().status, SetStatus::Disassembled);
}

#[test]
fn test_outing_writes_four_ledger_lines() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 4);
    let set_id: String = assemble(&mut persistence, &ids);
    let outing_id: i64 = record(&mut persistence, &set_id, 10);

    let state: State = persistence.load_state().unwrap();
    assert_eq!(state.last_outing_id, outing_id);
    let entries: Vec<&UsageEntry> = state.entries_for(outing_id).collect();
    assert_eq!(entries.len(), 4);
    for entry in entries {
        assert!(entry.entry_id.is_some());
        assert!(entry.distance_before.abs() < f64::EPSILON);
        assert!((entry.distance_after - 43.09).abs() < 1e-9);
    }
    for id in &ids {
        let tire: Tire = persistence.get_tire(id).unwrap().unwrap();
        assert!((tire.accumulated_distance - 43.09).abs() < 1e-9);
        assert_eq!(tire.status, TireStatus::InUse);
    }

    let history: Vec<UsageEntry> = persistence.history_for_tire(&ids[0]).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].position, WheelPosition::FrontLeft);
}

#[test]
fn test_rejected_command_writes_nothing() {
    let mut persistence: Persistence = create_test_persistence();
    purchase(&mut persistence, 16);

    let result = try_execute(
        &mut persistence,
        Command::PurchaseTires(tire_ledger::PurchaseInput {
            stage: 1,
            car: String::from("Car A"),
            count: 1,
            category: tire_ledger_domain::TireCategory::Standard,
            prefix: None,
            start_number: None,
            distance_limit: 1000,
            initial_depth: None,
            date: TEST_DATE,
        }),
    );
    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(CoreError::QuotaExceeded { .. }))
    ));
    assert_eq!(persistence.load_state().unwrap().tires.len(), 16);
}

#[test]
fn test_tire_cannot_be_assembled_twice() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 5);
    assemble(&mut persistence, &ids[..4]);

    let mut slots: [Option<String>; 4] = [None, None, None, None];
    slots[0] = Some(ids[4].clone());
    slots[1] = Some(ids[0].clone());
    let result = try_execute(
        &mut persistence,
        Command::AssembleSet(tire_ledger::AssemblyInput {
            name: String::from("second"),
            category: tire_ledger_domain::TireCategory::Standard,
            car: None,
            track_id: None,
            slots,
            date: TEST_DATE,
        }),
    );
    assert!(matches!(
        result,
        Err(PersistenceError::Rejected(CoreError::InvalidState { .. }))
    ));
    let state: State = persistence.load_state().unwrap();
    assert_eq!(state.sets.len(), 1);
    assert_eq!(state.tire(&ids[4]).unwrap().status, TireStatus::Available);
}

#[test]
fn test_delete_then_recompute() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 4);
    let set_id: String = assemble(&mut persistence, &ids);
    let first: i64 = record(&mut persistence, &set_id, 10);
    record(&mut persistence, &set_id, 5);

    let result: TransitionResult =
        execute(&mut persistence, Command::DeleteOuting { outing_id: first });
    assert!(matches!(
        result.outcome,
        Outcome::OutingDeleted { ref stale_tires, .. } if stale_tires.len() == 4
    ));
    let state: State = persistence.load_state().unwrap();
    assert!(state.outing(first).is_none());
    assert_eq!(state.ledger.len(), 4);
    assert!(!verify_ledger(&state).is_consistent());

    execute(&mut persistence, Command::RecomputeAll);
    let state: State = persistence.load_state().unwrap();
    assert!(verify_ledger(&state).is_consistent());
    assert!((state.tire(&ids[0]).unwrap().accumulated_distance - 21.545).abs() < 1e-9);

    let again: TransitionResult = execute(&mut persistence, Command::RecomputeAll);
    assert!(again.changes.is_empty());
}

#[test]
fn test_outing_ids_survive_deletion() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 4);
    let set_id: String = assemble(&mut persistence, &ids);
    let first: i64 = record(&mut persistence, &set_id, 1);
    execute(&mut persistence, Command::DeleteOuting { outing_id: first });

    let second: i64 = record(&mut persistence, &set_id, 1);
    assert_eq!(second, first + 1);
}

#[test]
fn test_replace_outing_is_persisted() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 4);
    let set_id: String = assemble(&mut persistence, &ids);
    let outing_id: i64 = record(&mut persistence, &set_id, 10);

    execute(
        &mut persistence,
        Command::ReplaceOuting {
            outing_id,
            input: outing_input(&set_id, 20, TEST_DATE),
        },
    );
    let state: State = persistence.load_state().unwrap();
    assert_eq!(state.outings.len(), 1);
    assert!((state.tire(&ids[3]).unwrap().accumulated_distance - 86.18).abs() < 1e-9);
    assert!(verify_ledger(&state).is_consistent());
}

#[test]
fn test_advance_stage_is_persisted() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 16);
    let set_id: String = assemble(&mut persistence, &ids[..4]);
    record(&mut persistence, &set_id, 3);

    let selected: Vec<String> = ids[2..6].to_vec();
    execute(
        &mut persistence,
        Command::AdvanceStage {
            selected: selected.clone(),
            end_date: TEST_DATE,
        },
    );

    let state: State = persistence.load_state().unwrap();
    assert_eq!(state.current_stage, 2);
    assert_eq!(persistence.current_stage().unwrap(), 2);
    assert_eq!(state.stage_records.len(), 1);
    assert_eq!(state.stage_records[0].retained, selected);
    assert_eq!(state.stage_records[0].discarded, 12);
    assert_eq!(state.stage_records[0].status, StageStatus::Closed);
    assert_eq!(
        state
            .tires
            .iter()
            .filter(|t| t.status == TireStatus::Discarded)
            .count(),
        12
    );
    assert!(state.sets.iter().all(|s| !s.is_active()));

    assert_eq!(purchase(&mut persistence, 8).len(), 8);
}

#[test]
fn test_measurement_is_stored() {
    let mut persistence: Persistence = create_test_persistence();
    let ids: Vec<String> = purchase(&mut persistence, 1);
    execute(
        &mut persistence,
        Command::RecordMeasurement {
            tire_id: ids[0].clone(),
            date: TEST_DATE,
            readings: DepthReadings {
                inner: 1.8,
                centre_inner: 1.9,
                centre_outer: 1.7,
                outer: 1.6,
            },
            notes: String::from("post race"),
        },
    );
    let state: State = persistence.load_state().unwrap();
    assert_eq!(state.measurements.len(), 1);
    assert!(state.measurements[0].measurement_id.is_some());
    assert!((state.measurements[0].average_depth - 1.75).abs() < 1e-9);
    assert_eq!(state.measurements[0].action, RecommendedAction::Attention);
    assert_eq!(state.measurements[0].notes, "post race");
}

#[test]
fn test_seeded_tracks_round_trip() {
    let mut persistence: Persistence = create_test_persistence();
    let result: TransitionResult = execute(&mut persistence, Command::SeedDefaultTracks);
    let mut expected = result.new_state.tracks;
    expected.sort_by(|a, b| a.track_id.cmp(&b.track_id));
    let loaded: State = persistence.load_state().unwrap();
    assert_eq!(loaded.tracks, expected);
}
