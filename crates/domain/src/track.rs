// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Circuits and their per-wheel wear expectations.

use crate::error::DomainError;
use crate::types::WheelPosition;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Expected wear severity for one wheel position at a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WearBias {
    Low,
    #[default]
    Medium,
    High,
}

impl WearBias {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::UnknownValue {
                kind: "wear bias",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for WearBias {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Direction a circuit is driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter_clockwise",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "clockwise" => Ok(Self::Clockwise),
            "counter_clockwise" => Ok(Self::CounterClockwise),
            _ => Err(DomainError::UnknownValue {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Circuit layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackLayout {
    #[default]
    Road,
    Oval,
    Mixed,
}

impl TrackLayout {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Road => "road",
            Self::Oval => "oval",
            Self::Mixed => "mixed",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "road" => Ok(Self::Road),
            "oval" => Ok(Self::Oval),
            "mixed" => Ok(Self::Mixed),
            _ => Err(DomainError::UnknownValue {
                kind: "track layout",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for TrackLayout {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A circuit with its lap length and expected wear per wheel position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: String,
    pub name: String,
    /// Lap length in kilometres.
    pub lap_length_km: f64,
    pub layout: TrackLayout,
    pub direction: Direction,
    pub characteristics: String,
    /// Wear bias indexed by `WheelPosition::index`.
    pub wear_bias: [WearBias; 4],
}

impl Track {
    /// Creates a track with medium wear on every position.
    #[must_use]
    pub fn new(track_id: &str, name: &str, lap_length_km: f64) -> Self {
        Self {
            track_id: track_id.to_string(),
            name: name.to_string(),
            lap_length_km,
            layout: TrackLayout::Road,
            direction: Direction::Clockwise,
            characteristics: String::new(),
            wear_bias: [WearBias::Medium; 4],
        }
    }

    /// Returns the expected wear bias for a wheel position.
    #[must_use]
    pub const fn bias_for(&self, position: WheelPosition) -> WearBias {
        self.wear_bias[position.index()]
    }

    /// Returns the lap length if it can be used for distance computation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLapLength` if the length is zero, negative, or not finite.
    pub fn usable_lap_length(&self) -> Result<f64, DomainError> {
        if self.lap_length_km.is_finite() && self.lap_length_km > 0.0 {
            Ok(self.lap_length_km)
        } else {
            Err(DomainError::InvalidLapLength {
                track_id: self.track_id.clone(),
                lap_length: self.lap_length_km,
            })
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn reference_track(
    track_id: &str,
    name: &str,
    lap_length_km: f64,
    layout: TrackLayout,
    direction: Direction,
    characteristics: &str,
    wear_bias: [WearBias; 4],
) -> Track {
    Track {
        track_id: track_id.to_string(),
        name: name.to_string(),
        lap_length_km,
        layout,
        direction,
        characteristics: characteristics.to_string(),
        wear_bias,
    }
}

/// The reference circuits registered by a fresh installation.
#[must_use]
pub fn default_tracks() -> Vec<Track> {
    use Direction::{Clockwise, CounterClockwise};
    use TrackLayout::{Oval, Road};
    use WearBias::{High, Low, Medium};

    vec![
        reference_track(
            "INTER7",
            "Interlagos",
            4.309,
            Road,
            CounterClockwise,
            "High speed, elevation changes",
            [Medium, High, Medium, High],
        ),
        reference_track(
            "GOIA8",
            "Goiânia",
            3.835,
            Road,
            Clockwise,
            "Long straights, slow corners",
            [Medium; 4],
        ),
        reference_track(
            "TARUM6",
            "Tarumã",
            3.012,
            Oval,
            Clockwise,
            "Fast oval, constant load",
            [Medium; 4],
        ),
        reference_track(
            "VELOPA8",
            "Velopark",
            3.180,
            Road,
            Clockwise,
            "Technical, heavy front load",
            [High, High, Medium, Medium],
        ),
        reference_track(
            "CASCA8",
            "Cascavel",
            3.458,
            Road,
            Clockwise,
            "Smooth surface",
            [Low, Low, Medium, Medium],
        ),
        reference_track(
            "CURIT8",
            "Curitiba",
            2.432,
            Road,
            Clockwise,
            "Abrasive surface",
            [High; 4],
        ),
        reference_track(
            "SANTA7",
            "Santa Cruz do Sul",
            3.567,
            Road,
            Clockwise,
            "Balanced",
            [Medium; 4],
        ),
        reference_track(
            "CAMPO6",
            "Campo Grande",
            3.433,
            Road,
            CounterClockwise,
            "Hot climate, left side load",
            [High, Medium, High, Medium],
        ),
        reference_track(
            "LONDRI6",
            "Londrina",
            3.295,
            Road,
            Clockwise,
            "Hard braking zones",
            [High, High, Medium, High],
        ),
        reference_track(
            "CARUARU6",
            "Caruaru",
            3.048,
            Road,
            Clockwise,
            "Abrasive, hot climate",
            [High; 4],
        ),
    ]
}
