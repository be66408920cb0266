// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    TEST_DATE, assemble, assembly_input, create_test_ledger, distance_of, outing_input,
    purchase, purchase_input, record, register_fixtures,
};
use crate::{ApiError, DeletionReport, OutingReceipt, ReplacementReport, StatusSummary, TireLedger};
use pretty_assertions::assert_eq;
use time::macros::date;
use tire_ledger_domain::{
    SeasonPolicy, SessionType, SetStatus, StageStatus, TireStatus, Track, TrackCondition,
    UsageEntry, WearLevel,
};

#[test]
fn test_interlagos_outing_charges_every_mounted_tire() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Practice", &ids);

    let receipt: OutingReceipt = record(&mut ledger, &set_id, 10);

    assert_eq!(receipt.outing_id, 1);
    assert!((receipt.distance - 43.09).abs() < 1e-9);
    assert_eq!(receipt.entries.len(), 4);
    for id in &ids {
        assert!((distance_of(&mut ledger, id) - 43.09).abs() < 1e-9);
        let history: Vec<UsageEntry> = ledger.history(id).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].distance_before.abs() < f64::EPSILON);
        assert!((history[0].distance_after - 43.09).abs() < 1e-9);
    }
}

#[test]
fn test_disassembly_releases_tires_and_keeps_distance() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Practice", &ids);
    record(&mut ledger, &set_id, 10);

    let mut released: Vec<String> = ledger.disassemble(&set_id).unwrap();
    released.sort();

    assert_eq!(released, ids);
    assert_eq!(ledger.get_set(&set_id).unwrap().status, SetStatus::Disassembled);
    for id in &ids {
        assert_eq!(ledger.get_tire(id).unwrap().status, TireStatus::Available);
        assert!((distance_of(&mut ledger, id) - 43.09).abs() < 1e-9);
    }

    let err: ApiError = ledger.disassemble(&set_id).unwrap_err();
    assert!(matches!(err, ApiError::InvalidTransition { ref entity, .. } if entity == "set"));
}

#[test]
fn test_seventeenth_tire_exceeds_first_stage_quota() {
    let mut ledger: TireLedger = create_test_ledger();
    assert_eq!(purchase(&mut ledger, 16).len(), 16);

    let err: ApiError = ledger.purchase(purchase_input(1, 1)).unwrap_err();

    assert_eq!(
        err,
        ApiError::QuotaExceeded {
            stage: 1,
            quota: 16,
            already: 16,
            requested: 1,
        }
    );
    assert_eq!(ledger.list_tires(None).unwrap().len(), 16);
}

#[test]
fn test_registry_lookups_report_not_found_and_duplicates() {
    let mut ledger: TireLedger = create_test_ledger();

    let err: ApiError = ledger.get_track("NOPE").unwrap_err();
    assert_eq!(
        err,
        ApiError::NotFound {
            entity: String::from("track"),
            id: String::from("NOPE"),
        }
    );

    let err: ApiError = ledger
        .register_track(Track::new("INTER7", "Interlagos again", 4.309))
        .unwrap_err();
    assert!(matches!(err, ApiError::DuplicateKey { ref id, .. } if id == "INTER7"));

    let err: ApiError = ledger.get_tire("P1999").unwrap_err();
    assert!(matches!(err, ApiError::NotFound { ref entity, .. } if entity == "tire"));
    assert!(ledger.history("P1999").is_err());
}

#[test]
fn test_zero_length_track_refused_at_registration() {
    let mut ledger: TireLedger = create_test_ledger();

    let err: ApiError = ledger
        .register_track(Track::new("FLAT", "Nowhere", 0.0))
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref entity, .. } if entity == "track"));
}

#[test]
fn test_tire_cannot_join_two_active_sets() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 5);
    assemble(&mut ledger, "First", &ids[..4]);

    let err: ApiError = ledger
        .assemble(assembly_input("Second", &ids[3..]))
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidState { ref entity, ref id, .. } if entity == "tire" && *id == ids[3]
    ));
    assert_eq!(ledger.get_tire(&ids[4]).unwrap().status, TireStatus::Available);
}

#[test]
fn test_outing_against_disassembled_set_is_invalid_state() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Practice", &ids);
    ledger.disassemble(&set_id).unwrap();

    let err: ApiError = ledger.record_outing(outing_input(&set_id, 3)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidState { ref entity, .. } if entity == "set"));

    let err: ApiError = ledger.record_outing(outing_input("S999", 3)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { ref entity, .. } if entity == "set"));
}

#[test]
fn test_zero_laps_is_a_validation_error() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Practice", &ids);

    let err: ApiError = ledger.record_outing(outing_input(&set_id, 0)).unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref entity, .. } if entity == "laps"));
    assert!(ledger.history(&ids[0]).unwrap().is_empty());
}

#[test]
fn test_deletion_is_flagged_until_recompute() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Practice", &ids);
    let first: OutingReceipt = record(&mut ledger, &set_id, 10);
    record(&mut ledger, &set_id, 5);

    let report: DeletionReport = ledger.delete_outing(first.outing_id).unwrap();

    let mut expected: Vec<String> = ids.clone();
    expected.sort();
    assert_eq!(
        report,
        DeletionReport {
            outing_id: first.outing_id,
            stale_tires: expected,
            requires_recompute: true,
        }
    );
    assert!((distance_of(&mut ledger, &ids[0]) - 64.635).abs() < 1e-9);
    assert!(!ledger.verify_ledger().unwrap().is_consistent());
    assert_eq!(ledger.status_summary().unwrap().drifting_tires, 4);

    let corrections = ledger.recompute_all().unwrap();
    assert_eq!(corrections.len(), 4);
    assert!((distance_of(&mut ledger, &ids[0]) - 21.545).abs() < 1e-9);
    assert!(ledger.verify_ledger().unwrap().is_consistent());
    assert!(ledger.recompute_all().unwrap().is_empty());
}

#[test]
fn test_replace_outing_rebuilds_distances() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Practice", &ids);
    let receipt: OutingReceipt = record(&mut ledger, &set_id, 10);

    let report: ReplacementReport = ledger
        .replace_outing(receipt.outing_id, outing_input(&set_id, 20))
        .unwrap();

    assert_eq!(report.deleted_outing_id, 1);
    assert_eq!(report.outing_id, 2);
    assert!((distance_of(&mut ledger, &ids[0]) - 86.18).abs() < 1e-9);
    assert!(ledger.verify_ledger().unwrap().is_consistent());
    assert_eq!(ledger.history(&ids[0]).unwrap().len(), 1);
}

#[test]
fn test_update_outing_changes_only_descriptive_fields() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Practice", &ids);
    let receipt: OutingReceipt = record(&mut ledger, &set_id, 10);

    ledger
        .update_outing(
            receipt.outing_id,
            "rain in sector 2",
            SessionType::Qualifying,
            TrackCondition::Mixed,
        )
        .unwrap();

    let outing = ledger
        .state()
        .unwrap()
        .outing(receipt.outing_id)
        .cloned()
        .unwrap();
    assert_eq!(outing.notes, "rain in sector 2");
    assert_eq!(outing.session_type, SessionType::Qualifying);
    assert_eq!(outing.laps, 10);
    assert!(ledger.verify_ledger().unwrap().is_consistent());
}

#[test]
fn test_discarded_tire_cannot_return() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 1);
    ledger.discard_tire(&ids[0]).unwrap();

    let err: ApiError = ledger
        .set_tire_status(&ids[0], TireStatus::Available)
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidTransition { ref from, ref to, .. } if from == "discarded" && to == "available"
    ));
    assert_eq!(
        ledger.list_tires(Some(TireStatus::Discarded)).unwrap().len(),
        1
    );
}

#[test]
fn test_wear_report_classifies_distance() {
    let mut ledger: TireLedger = create_test_ledger();
    ledger
        .register_track(Track::new("TEST5", "Test loop", 5.0))
        .unwrap();
    let ids: Vec<String> = purchase(&mut ledger, 4);
    let set_id: String = assemble(&mut ledger, "Long run", &ids);
    let mut input = outing_input(&set_id, 150);
    input.track_id = String::from("TEST5");
    ledger.record_outing(input).unwrap();

    let report = ledger.wear_report(&ids[0]).unwrap();

    assert!((report.percentage - 75.0).abs() < 1e-9);
    assert_eq!(report.level, WearLevel::Watch);
}

#[test]
fn test_advance_stage_keeps_four_tires() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 6);

    let err: ApiError = ledger
        .advance_stage(&ids[..3], date!(2026 - 03 - 08))
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref entity, .. } if entity == "selection"));
    assert_eq!(ledger.current_stage().unwrap(), 1);
    assert_eq!(ledger.eligible_for_carry_over().unwrap().len(), 6);

    let record = ledger
        .advance_stage(&ids[..4], date!(2026 - 03 - 08))
        .unwrap();

    assert_eq!(record.stage, 1);
    assert_eq!(record.tires_purchased, 6);
    assert_eq!(record.discarded, 2);
    assert_eq!(record.status, StageStatus::Closed);
    assert_eq!(ledger.current_stage().unwrap(), 2);
    for id in &ids[..4] {
        let tire = ledger.get_tire(id).unwrap();
        assert_eq!(tire.current_stage, 2);
        assert_eq!(tire.status, TireStatus::Available);
    }
    assert_eq!(ledger.get_tire(&ids[5]).unwrap().status, TireStatus::Discarded);

    let records = ledger.stage_records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].stage, 2);
    assert_eq!(records[1].status, StageStatus::Open);
}

#[test]
fn test_final_stage_is_terminal() {
    let policy: SeasonPolicy = SeasonPolicy {
        final_stage: 1,
        ..SeasonPolicy::default()
    };
    let mut ledger: TireLedger = TireLedger::open_in_memory(policy).unwrap();
    register_fixtures(&mut ledger);
    let ids: Vec<String> = purchase(&mut ledger, 4);

    let err: ApiError = ledger.advance_stage(&ids, TEST_DATE).unwrap_err();

    assert_eq!(err, ApiError::TerminalStage { stage: 1 });
}

#[test]
fn test_status_summary_counts_tires() {
    let mut ledger: TireLedger = create_test_ledger();
    let ids: Vec<String> = purchase(&mut ledger, 6);
    let set_id: String = assemble(&mut ledger, "Practice", &ids[..4]);
    record(&mut ledger, &set_id, 2);
    ledger.discard_tire(&ids[5]).unwrap();

    let summary: StatusSummary = ledger.status_summary().unwrap();

    assert_eq!(summary.current_stage, 1);
    assert_eq!(summary.tires_by_status["in_use"], 4);
    assert_eq!(summary.tires_by_status["available"], 1);
    assert_eq!(summary.tires_by_status["discarded"], 1);
    assert_eq!(summary.tires_by_status["mounted"], 0);
    assert_eq!(summary.active_sets, 1);
    assert_eq!(summary.outings, 1);
    assert_eq!(summary.drifting_tires, 0);
}

#[test]
fn test_seeded_tracks_are_listed() {
    let mut ledger: TireLedger = create_test_ledger();

    let added: Vec<String> = ledger.seed_default_tracks().unwrap();

    assert!(!added.is_empty());
    assert_eq!(ledger.list_tracks().unwrap().len(), added.len() + 1);
    assert!(ledger.seed_default_tracks().unwrap().is_empty());
}

#[test]
fn test_inactive_car_cannot_buy_tires() {
    let mut ledger: TireLedger = create_test_ledger();
    ledger.set_car_active("Car A", false).unwrap();

    assert!(!ledger.get_car("Car A").unwrap().active);
    let err: ApiError = ledger.purchase(purchase_input(1, 4)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidState { ref entity, .. } if entity == "car"));
}

#[test]
fn test_file_ledger_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("season.db");

    {
        let mut ledger: TireLedger = TireLedger::open(&path, SeasonPolicy::default()).unwrap();
        register_fixtures(&mut ledger);
        let ids: Vec<String> = purchase(&mut ledger, 4);
        let set_id: String = assemble(&mut ledger, "Practice", &ids);
        record(&mut ledger, &set_id, 10);
    }

    let mut reopened: TireLedger = TireLedger::open(&path, SeasonPolicy::default()).unwrap();
    assert_eq!(reopened.list_tires(None).unwrap().len(), 4);
    assert_eq!(reopened.status_summary().unwrap().outings, 1);
    assert!(reopened.verify_ledger().unwrap().is_consistent());
}
