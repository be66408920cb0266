// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tread depth measurements.
//!
//! Four readings are taken across the tread. Their average is judged
//! against the wear indicator thresholds and the tire's distance is judged
//! against its limit; the worse of the two decides the recommended action.

use crate::error::DomainError;
use crate::wear::effective_limit;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Deepest reading accepted, in millimetres.
pub const MAX_DEPTH_MM: f64 = 15.0;

/// Average depth above which the tread is fine.
pub const DEPTH_OK_MM: f64 = 2.0;

/// Average depth above which the tread is on alert rather than critical.
pub const DEPTH_ALERT_MM: f64 = 1.5;

/// Fraction of the limit below which the distance is fine.
pub const DISTANCE_OK_FRACTION: f64 = 0.8;

/// Severity of one measured aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Ok,
    Alert,
    Critical,
}

impl Condition {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Alert => "alert",
            Self::Critical => "critical",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "ok" => Ok(Self::Ok),
            "alert" => Ok(Self::Alert),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::UnknownValue {
                kind: "condition",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// What the crew should do with a measured tire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Continue,
    Attention,
    Discard,
}

impl RecommendedAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Attention => "attention",
            Self::Discard => "discard",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "continue" => Ok(Self::Continue),
            "attention" => Ok(Self::Attention),
            "discard" => Ok(Self::Discard),
            _ => Err(DomainError::UnknownValue {
                kind: "recommended action",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for RecommendedAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// The four readings across the tread, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthReadings {
    pub inner: f64,
    pub centre_inner: f64,
    pub centre_outer: f64,
    pub outer: f64,
}

impl DepthReadings {
    /// Validates every reading lies within `0..=MAX_DEPTH_MM`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDepthReading` naming the first bad reading.
    pub fn validate(&self) -> Result<(), DomainError> {
        let readings: [(&'static str, f64); 4] = [
            ("inner", self.inner),
            ("centre_inner", self.centre_inner),
            ("centre_outer", self.centre_outer),
            ("outer", self.outer),
        ];
        for (reading, value) in readings {
            if !value.is_finite() || !(0.0..=MAX_DEPTH_MM).contains(&value) {
                return Err(DomainError::InvalidDepthReading { reading, value });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn average(&self) -> f64 {
        (self.inner + self.centre_inner + self.centre_outer + self.outer) / 4.0
    }
}

/// A recorded tread depth check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub measurement_id: Option<i64>,
    pub tire_id: String,
    pub date: Date,
    pub stage: u8,
    pub readings: DepthReadings,
    pub average_depth: f64,
    /// Tire distance when the measurement was taken.
    pub distance: f64,
    pub depth_condition: Condition,
    pub distance_condition: Condition,
    pub action: RecommendedAction,
    pub notes: String,
}

/// Judges an average tread depth.
#[must_use]
pub const fn depth_condition(average_depth: f64) -> Condition {
    if average_depth > DEPTH_OK_MM {
        Condition::Ok
    } else if average_depth > DEPTH_ALERT_MM {
        Condition::Alert
    } else {
        Condition::Critical
    }
}

/// Judges a distance against a limit.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn distance_condition(distance: f64, limit: i64, floor: i64) -> Condition {
    let limit: f64 = effective_limit(limit, floor) as f64;
    if distance < DISTANCE_OK_FRACTION * limit {
        Condition::Ok
    } else if distance < limit {
        Condition::Alert
    } else {
        Condition::Critical
    }
}

/// Combines the depth and distance conditions into an action.
#[must_use]
pub const fn recommend(depth: Condition, distance: Condition) -> RecommendedAction {
    match (depth, distance) {
        (Condition::Ok, Condition::Ok) => RecommendedAction::Continue,
        (Condition::Critical, _) | (_, Condition::Critical) => RecommendedAction::Discard,
        _ => RecommendedAction::Attention,
    }
}

/// Builds a measurement from readings and the tire's current distance.
///
/// # Errors
///
/// Returns `DomainError::InvalidDepthReading` if a reading is out of range.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_measurement(
    tire_id: &str,
    date: Date,
    stage: u8,
    readings: DepthReadings,
    distance: f64,
    limit: i64,
    floor: i64,
    notes: &str,
) -> Result<Measurement, DomainError> {
    readings.validate()?;
    let average_depth: f64 = readings.average();
    let depth: Condition = depth_condition(average_depth);
    let by_distance: Condition = distance_condition(distance, limit, floor);

    Ok(Measurement {
        measurement_id: None,
        tire_id: tire_id.to_string(),
        date,
        stage,
        readings,
        average_depth,
        distance,
        depth_condition: depth,
        distance_condition: by_distance,
        action: recommend(depth, by_distance),
        notes: notes.to_string(),
    })
}
