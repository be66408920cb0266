// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outings and the per-tire usage ledger.

use crate::error::DomainError;
use crate::track::Track;
use crate::types::WheelPosition;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Kind of track session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Practice,
    Qualifying,
    Race,
    Warmup,
    Test,
}

impl SessionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Qualifying => "qualifying",
            Self::Race => "race",
            Self::Warmup => "warmup",
            Self::Test => "test",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "practice" => Ok(Self::Practice),
            "qualifying" => Ok(Self::Qualifying),
            "race" => Ok(Self::Race),
            "warmup" => Ok(Self::Warmup),
            "test" => Ok(Self::Test),
            _ => Err(DomainError::UnknownValue {
                kind: "session type",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SessionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Track surface condition during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackCondition {
    Dry,
    Wet,
    Mixed,
}

impl TrackCondition {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Wet => "wet",
            Self::Mixed => "mixed",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "dry" => Ok(Self::Dry),
            "wet" => Ok(Self::Wet),
            "mixed" => Ok(Self::Mixed),
            _ => Err(DomainError::UnknownValue {
                kind: "track condition",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for TrackCondition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A recorded track session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outing {
    /// Assigned by the store; `None` until persisted.
    pub outing_id: Option<i64>,
    pub date: Date,
    pub track_id: String,
    pub set_id: String,
    pub session_type: SessionType,
    pub condition: TrackCondition,
    pub laps: i64,
    /// Laps multiplied by the track's lap length, in kilometres.
    pub distance: f64,
    pub notes: String,
}

/// One ledger line: the distance a tire accrued in one outing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub entry_id: Option<i64>,
    pub tire_id: String,
    pub outing_id: i64,
    pub position: WheelPosition,
    pub distance_before: f64,
    pub distance_after: f64,
}

impl UsageEntry {
    #[must_use]
    pub const fn delta(&self) -> f64 {
        self.distance_after - self.distance_before
    }
}

/// Computes the distance driven in a session.
///
/// # Errors
///
/// Returns `DomainError::InvalidLapCount` if `laps` is not positive, or
/// `DomainError::InvalidLapLength` if the track cannot be used for distance.
#[allow(clippy::cast_precision_loss)]
pub fn compute_distance(track: &Track, laps: i64) -> Result<f64, DomainError> {
    if laps <= 0 {
        return Err(DomainError::InvalidLapCount { laps });
    }
    let lap_length: f64 = track.usable_lap_length()?;
    Ok(laps as f64 * lap_length)
}
