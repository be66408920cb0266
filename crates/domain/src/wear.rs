// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Distance based wear classification.
//!
//! The level is derived on every read from the tire's accumulated distance
//! and its limit; it is never stored.

use serde::{Deserialize, Serialize};

/// Percentage of the limit at or below which a tire is fine.
pub const OK_THRESHOLD_PERCENT: f64 = 70.0;

/// Percentage of the limit at or below which a tire should be watched.
pub const WATCH_THRESHOLD_PERCENT: f64 = 90.0;

/// Wear level of a tire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WearLevel {
    /// Up to 70% of the limit (green).
    Ok,
    /// Above 70% and up to 90% of the limit (yellow).
    Watch,
    /// Above 90% of the limit (red).
    Replace,
}

impl WearLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Watch => "watch",
            Self::Replace => "replace",
        }
    }

    /// Display colour conventionally associated with the level.
    #[must_use]
    pub const fn colour(&self) -> &'static str {
        match self {
            Self::Ok => "green",
            Self::Watch => "yellow",
            Self::Replace => "red",
        }
    }
}

impl std::fmt::Display for WearLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wear of one tire at the time it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WearReport {
    pub tire_id: String,
    pub distance: f64,
    /// The limit the percentage was computed against, after the floor was applied.
    pub effective_limit: i64,
    pub percentage: f64,
    pub level: WearLevel,
}

/// Returns the limit used for wear computations.
///
/// Non-positive limits are replaced by `floor`.
#[must_use]
pub const fn effective_limit(limit: i64, floor: i64) -> i64 {
    if limit <= 0 { floor } else { limit }
}

/// Computes the percentage of the limit consumed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn wear_percentage(distance: f64, limit: i64, floor: i64) -> f64 {
    let limit: f64 = effective_limit(limit, floor) as f64;
    100.0 * distance / limit
}

/// Classifies a percentage into a wear level.
#[must_use]
pub const fn level_for_percentage(percentage: f64) -> WearLevel {
    if percentage <= OK_THRESHOLD_PERCENT {
        WearLevel::Ok
    } else if percentage <= WATCH_THRESHOLD_PERCENT {
        WearLevel::Watch
    } else {
        WearLevel::Replace
    }
}

/// Classifies a tire's wear from its distance and limit.
#[must_use]
pub fn classify_wear(tire_id: &str, distance: f64, limit: i64, floor: i64) -> WearReport {
    let percentage: f64 = wear_percentage(distance, limit, floor);
    WearReport {
        tire_id: tire_id.to_string(),
        distance,
        effective_limit: effective_limit(limit, floor),
        percentage,
        level: level_for_percentage(percentage),
    }
}
