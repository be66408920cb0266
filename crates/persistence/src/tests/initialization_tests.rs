// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_persistence, purchase};
use crate::Persistence;
use tire_ledger::State;

#[test]
fn test_in_memory_database_has_every_table() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let tables: Vec<String> = persistence.table_names().unwrap();
    assert_eq!(
        tables,
        vec![
            "cars",
            "measurements",
            "outings",
            "season_state",
            "stage_records",
            "tire_sets",
            "tire_usage_history",
            "tires",
            "tracks",
        ]
    );
    persistence.verify_foreign_key_enforcement().unwrap();
}

#[test]
fn test_fresh_database_opens_stage_one() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let state: State = persistence.load_state().unwrap();
    assert_eq!(state.current_stage, 1);
    assert_eq!(state.last_outing_id, 0);
    assert!(state.tires.is_empty());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = create_test_persistence();
    purchase(&mut first, 2);
    let mut second: Persistence = Persistence::new_in_memory().unwrap();
    assert!(second.load_state().unwrap().tires.is_empty());
    assert_eq!(first.load_state().unwrap().tires.len(), 2);
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        super::execute(
            &mut persistence,
            tire_ledger::Command::RegisterTrack(tire_ledger_domain::Track::new(
                "INTER7",
                "Interlagos",
                4.309,
            )),
        );
    }
    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let state: State = reopened.load_state().unwrap();
    assert_eq!(state.tracks.len(), 1);
    assert!((state.tracks[0].lap_length_km - 4.309).abs() < f64::EPSILON);
}
