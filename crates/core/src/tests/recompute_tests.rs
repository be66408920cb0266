// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    TEST_DATE, assemble, create_test_state, distance_of, outing_input, purchase, record, run,
    step,
};
use crate::{Command, CoreError, DistanceCorrection, Outcome, State, verify_ledger};
use pretty_assertions::assert_eq;
use time::macros::date;
use tire_ledger_domain::{TireStatus, UsageEntry};

fn recompute(state: &State) -> (State, Vec<DistanceCorrection>) {
    let (state, outcome) = step(state, Command::RecomputeAll);
    let Outcome::Recomputed { corrections } = outcome else {
        panic!("unexpected outcome");
    };
    (state, corrections)
}

#[test]
fn test_recompute_on_consistent_ledger_is_a_no_op() {
    let (state, ids) = purchase(&create_test_state(), 4);
    let (state, set_id) = assemble(&state, "A", &ids);
    let (state, _) = record(&state, &set_id, 10, TEST_DATE);

    let result = run(&state, Command::RecomputeAll).unwrap();
    assert!(result.changes.is_empty());
    assert_eq!(result.new_state, state);
}

#[test]
fn test_recompute_repairs_after_delete() {
    let (state, ids) = purchase(&create_test_state(), 4);
    let (state, set_id) = assemble(&state, "A", &ids);
    let (state, first) = record(&state, &set_id, 10, TEST_DATE);
    let (state, _) = record(&state, &set_id, 5, date!(2026 - 03 - 08));
    let (state, _) = step(&state, Command::DeleteOuting { outing_id: first });
    assert!(!verify_ledger(&state).is_consistent());

    let (state, corrections) = recompute(&state);
    assert_eq!(corrections.len(), 4);
    for id in &ids {
        assert!((distance_of(&state, id) - 21.545).abs() < 1e-9);
    }
    assert!(verify_ledger(&state).is_consistent());

    let (again, corrections) = recompute(&state);
    assert!(corrections.is_empty());
    assert_eq!(again, state);
}

#[test]
fn test_replay_follows_outing_dates() {
    let (state, ids) = purchase(&create_test_state(), 4);
    let (state, set_id) = assemble(&state, "A", &ids);
    let (state, later) = record(&state, &set_id, 10, date!(2026 - 03 - 10));
    let (state, earlier) = record(&state, &set_id, 5, date!(2026 - 03 - 08));

    let (state, corrections) = recompute(&state);
    assert!(corrections.is_empty());

    let first: &UsageEntry = state
        .entries_for(earlier)
        .find(|e| e.tire_id == ids[0])
        .unwrap();
    assert!(first.distance_before.abs() < f64::EPSILON);
    let second: &UsageEntry = state
        .entries_for(later)
        .find(|e| e.tire_id == ids[0])
        .unwrap();
    assert!((second.distance_before - first.distance_after).abs() < 1e-9);
    assert!(verify_ledger(&state).is_consistent());
}

#[test]
fn test_replace_outing_corrects_distance() {
    let (state, ids) = purchase(&create_test_state(), 4);
    let (state, set_id) = assemble(&state, "A", &ids);
    let (state, outing_id) = record(&state, &set_id, 10, TEST_DATE);

    let (state, outcome) = step(
        &state,
        Command::ReplaceOuting {
            outing_id,
            input: outing_input(&set_id, 20, TEST_DATE),
        },
    );
    let Outcome::OutingReplaced {
        deleted_outing_id,
        outing_id: new_id,
        ..
    } = outcome
    else {
        panic!("unexpected outcome");
    };
    assert_eq!(deleted_outing_id, 1);
    assert_eq!(new_id, 2);
    assert!(state.outing(1).is_none());
    for id in &ids {
        assert!((distance_of(&state, id) - 86.18).abs() < 1e-9);
    }
    assert!(verify_ledger(&state).is_consistent());
}

#[test]
fn test_replace_works_for_disassembled_set() {
    let (state, ids) = purchase(&create_test_state(), 4);
    let (state, set_id) = assemble(&state, "A", &ids);
    let (state, outing_id) = record(&state, &set_id, 10, TEST_DATE);
    let (state, _) = step(
        &state,
        Command::DisassembleSet {
            set_id: set_id.clone(),
        },
    );

    let (state, _) = step(
        &state,
        Command::ReplaceOuting {
            outing_id,
            input: outing_input(&set_id, 4, TEST_DATE),
        },
    );
    assert!((distance_of(&state, &ids[0]) - 17.236).abs() < 1e-9);
    assert!(verify_ledger(&state).is_consistent());
}

#[test]
fn test_replace_refuses_an_unrelated_disassembled_set() {
    let (state, ids) = purchase(&create_test_state(), 8);
    let (state, first_set) = assemble(&state, "A", &ids[..4]);
    let (state, outing_id) = record(&state, &first_set, 10, TEST_DATE);
    let (state, other_set) = assemble(&state, "B", &ids[4..]);
    let (state, _) = step(
        &state,
        Command::DisassembleSet {
            set_id: other_set.clone(),
        },
    );
    let (state, _) = step(
        &state,
        Command::DiscardTire {
            tire_id: ids[4].clone(),
        },
    );

    let later = date!(2026 - 05 - 01);
    let recorded = run(
        &state,
        Command::RecordOuting(outing_input(&other_set, 10, later)),
    );
    assert!(matches!(recorded, Err(CoreError::InvalidState { .. })));

    let replaced = run(
        &state,
        Command::ReplaceOuting {
            outing_id,
            input: outing_input(&other_set, 10, later),
        },
    );
    assert!(matches!(
        replaced,
        Err(CoreError::InvalidState { entity: "set", ref id, .. }) if *id == other_set
    ));

    assert!(state.outing(outing_id).is_some());
    let retired = state.tire(&ids[4]).unwrap();
    assert_eq!(retired.status, TireStatus::Discarded);
    assert!(retired.accumulated_distance.abs() < f64::EPSILON);
}

#[test]
fn test_failed_replace_keeps_original_outing() {
    let (state, ids) = purchase(&create_test_state(), 4);
    let (state, set_id) = assemble(&state, "A", &ids);
    let (state, outing_id) = record(&state, &set_id, 10, TEST_DATE);

    let result = run(
        &state,
        Command::ReplaceOuting {
            outing_id,
            input: outing_input(&set_id, 0, TEST_DATE),
        },
    );
    assert!(matches!(result, Err(CoreError::DomainViolation(_))));
    assert!(state.outing(outing_id).is_some());
}
