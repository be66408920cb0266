// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{TireCategory, WheelPosition};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Status of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetStatus {
    Active,
    /// Kept for history; its slots no longer hold tires in service.
    Disassembled,
}

impl SetStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disassembled => "disassembled",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(Self::Active),
            "disassembled" => Ok(Self::Disassembled),
            _ => Err(DomainError::UnknownValue {
                kind: "set status",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SetStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for SetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tire ids held in each wheel position, indexed by `WheelPosition::index`.
pub type SetSlots = [Option<String>; 4];

/// A named assembly of up to four tires bound to one car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireSet {
    pub set_id: String,
    pub name: String,
    pub category: TireCategory,
    pub car: Option<String>,
    /// Track the set was prepared for, if any.
    pub track_id: Option<String>,
    pub assembled_on: Date,
    pub status: SetStatus,
    pub slots: SetSlots,
}

impl TireSet {
    /// Returns the tire in a position.
    #[must_use]
    pub fn tire_at(&self, position: WheelPosition) -> Option<&str> {
        self.slots[position.index()].as_deref()
    }

    /// Iterates over the occupied positions in slot order.
    pub fn mounted(&self) -> impl Iterator<Item = (WheelPosition, &str)> {
        WheelPosition::ALL
            .into_iter()
            .filter_map(|position| self.tire_at(position).map(|tire_id| (position, tire_id)))
    }

    /// Returns true if the tire occupies any slot.
    #[must_use]
    pub fn holds(&self, tire_id: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.as_deref() == Some(tire_id))
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, SetStatus::Active)
    }
}
