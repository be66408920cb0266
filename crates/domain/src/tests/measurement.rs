// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Condition, DepthReadings, DomainError, Measurement, RecommendedAction, depth_condition,
    distance_condition, evaluate_measurement, recommend,
};
use pretty_assertions::assert_eq;
use time::macros::date;

const fn readings(depth: f64) -> DepthReadings {
    DepthReadings {
        inner: depth,
        centre_inner: depth,
        centre_outer: depth,
        outer: depth,
    }
}

#[test]
fn test_average_of_four_readings() {
    let r: DepthReadings = DepthReadings {
        inner: 6.0,
        centre_inner: 7.0,
        centre_outer: 7.0,
        outer: 8.0,
    };
    assert!((r.average() - 7.0).abs() < 1e-9);
}

#[test]
fn test_depth_thresholds() {
    assert_eq!(depth_condition(2.1), Condition::Ok);
    assert_eq!(depth_condition(2.0), Condition::Alert);
    assert_eq!(depth_condition(1.6), Condition::Alert);
    assert_eq!(depth_condition(1.5), Condition::Critical);
}

#[test]
fn test_distance_thresholds() {
    assert_eq!(distance_condition(799.0, 1000, 1000), Condition::Ok);
    assert_eq!(distance_condition(800.0, 1000, 1000), Condition::Alert);
    assert_eq!(distance_condition(999.9, 1000, 1000), Condition::Alert);
    assert_eq!(distance_condition(1000.0, 1000, 1000), Condition::Critical);
}

#[test]
fn test_recommendation_takes_the_worse_condition() {
    assert_eq!(
        recommend(Condition::Ok, Condition::Ok),
        RecommendedAction::Continue
    );
    assert_eq!(
        recommend(Condition::Alert, Condition::Ok),
        RecommendedAction::Attention
    );
    assert_eq!(
        recommend(Condition::Ok, Condition::Critical),
        RecommendedAction::Discard
    );
    assert_eq!(
        recommend(Condition::Critical, Condition::Alert),
        RecommendedAction::Discard
    );
}

#[test]
fn test_evaluate_measurement_fills_every_field() {
    let m: Measurement = evaluate_measurement(
        "P1001",
        date!(2026 - 03 - 08),
        1,
        readings(5.0),
        850.0,
        1000,
        1000,
        "after race",
    )
    .unwrap();

    assert!((m.average_depth - 5.0).abs() < 1e-9);
    assert_eq!(m.depth_condition, Condition::Ok);
    assert_eq!(m.distance_condition, Condition::Alert);
    assert_eq!(m.action, RecommendedAction::Attention);
    assert_eq!(m.notes, "after race");
    assert_eq!(m.measurement_id, None);
}

#[test]
fn test_out_of_range_reading_is_rejected() {
    let mut r: DepthReadings = readings(5.0);
    r.outer = 15.5;
    let result: Result<Measurement, DomainError> =
        evaluate_measurement("P1001", date!(2026 - 03 - 08), 1, r, 0.0, 1000, 1000, "");
    assert!(matches!(
        result,
        Err(DomainError::InvalidDepthReading {
            reading: "outer",
            ..
        })
    ));
}

#[test]
fn test_negative_reading_is_rejected() {
    let mut r: DepthReadings = readings(5.0);
    r.inner = -0.1;
    assert!(r.validate().is_err());
}
