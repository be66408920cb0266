// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{TEST_DATE, assemble, create_test_state, purchase, record, run, step};
use crate::{
    Command, CoreError, Outcome, State, eligible_for_carry_over, open_stage_summary,
};
use pretty_assertions::assert_eq;
use time::Date;
use time::macros::date;
use tire_ledger_domain::{SetStatus, StageRecord, StageStatus, TireStatus, calendar_entry};

const END_DATE: Date = date!(2026 - 03 - 08);

fn advance(state: &State, selected: &[String]) -> Result<crate::TransitionResult, CoreError> {
    run(
        state,
        Command::AdvanceStage {
            selected: selected.to_vec(),
            end_date: END_DATE,
        },
    )
}

#[test]
fn test_selection_must_be_exactly_four_distinct() {
    let (state, ids) = purchase(&create_test_state(), 8);

    assert!(matches!(
        advance(&state, &ids[..3]),
        Err(CoreError::InvalidSelection { .. })
    ));
    assert!(matches!(
        advance(&state, &ids[..5]),
        Err(CoreError::InvalidSelection { .. })
    ));
    let repeated: Vec<String> = vec![
        ids[0].clone(),
        ids[1].clone(),
        ids[2].clone(),
        ids[0].clone(),
    ];
    assert!(matches!(
        advance(&state, &repeated),
        Err(CoreError::InvalidSelection { .. })
    ));
}

#[test]
fn test_selection_must_be_eligible() {
    let (state, ids) = purchase(&create_test_state(), 8);
    let (state, _) = assemble(&state, "Fresh", &ids[..4]);

    let mut selection: Vec<String> = ids[4..7].to_vec();
    selection.push(String::from("NOPE"));
    assert!(matches!(
        advance(&state, &selection),
        Err(CoreError::InvalidSelection { .. })
    ));

    // Mounted but never driven.
    let selection: Vec<String> = vec![
        ids[0].clone(),
        ids[4].clone(),
        ids[5].clone(),
        ids[6].clone(),
    ];
    assert!(matches!(
        advance(&state, &selection),
        Err(CoreError::InvalidSelection { .. })
    ));
    assert_eq!(eligible_for_carry_over(&state).len(), 4);
}

#[test]
fn test_advance_carries_four_and_discards_the_rest() {
    let (state, ids) = purchase(&create_test_state(), 16);
    let (state, set_id) = assemble(&state, "Race", &ids[..4]);
    let (state, _) = record(&state, &set_id, 10, TEST_DATE);

    let selected: Vec<String> = vec![
        ids[0].clone(),
        ids[1].clone(),
        ids[4].clone(),
        ids[5].clone(),
    ];
    let result = advance(&state, &selected).unwrap();
    let state: State = result.new_state;

    assert_eq!(state.current_stage, 2);
    assert_eq!(state.set(&set_id).unwrap().status, SetStatus::Disassembled);
    for tire in &state.tires {
        if selected.contains(&tire.tire_id) {
            assert_eq!(tire.status, TireStatus::Available);
            assert_eq!(tire.current_stage, 2);
            assert_eq!(tire.registered_stage, 1);
        } else {
            assert_eq!(tire.status, TireStatus::Discarded);
            assert_eq!(tire.current_stage, 1);
        }
    }
    assert!((state.tire(&ids[0]).unwrap().accumulated_distance - 43.09).abs() < 1e-9);

    let Outcome::StageAdvanced { record } = result.outcome else {
        panic!("unexpected outcome");
    };
    let expected: StageRecord = StageRecord {
        stage: 1,
        start_date: calendar_entry(1).map(|e| e.date),
        end_date: Some(END_DATE),
        tires_purchased: 16,
        retained: selected,
        discarded: 12,
        status: StageStatus::Closed,
    };
    assert_eq!(record, expected);
    assert_eq!(state.stage_records, vec![expected]);
}

#[test]
fn test_carried_tires_stay_eligible_next_stage() {
    let (state, ids) = purchase(&create_test_state(), 4);
    let (state, _) = step(
        &state,
        Command::AdvanceStage {
            selected: ids.clone(),
            end_date: END_DATE,
        },
    );
    let (state, fresh) = purchase(&state, 8);
    assert_eq!(eligible_for_carry_over(&state).len(), 12);

    let mut selection: Vec<String> = fresh[..2].to_vec();
    selection.extend_from_slice(&ids[..2]);
    let state: State = advance(&state, &selection).unwrap().new_state;
    assert_eq!(state.current_stage, 3);
    assert_eq!(state.tire(&ids[2]).unwrap().status, TireStatus::Discarded);
}

#[test]
fn test_final_stage_cannot_advance() {
    let (mut state, ids) = purchase(&create_test_state(), 4);
    state.current_stage = 12;
    assert!(matches!(
        advance(&state, &ids),
        Err(CoreError::TerminalStage { stage: 12 })
    ));
}

#[test]
fn test_open_stage_summary() {
    let (state, _) = purchase(&create_test_state(), 6);
    let summary: StageRecord = open_stage_summary(&state);
    assert_eq!(summary.stage, 1);
    assert_eq!(summary.tires_purchased, 6);
    assert_eq!(summary.status, StageStatus::Open);
    assert!(summary.end_date.is_none());
}
