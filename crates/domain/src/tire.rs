// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tire identity and lifecycle status.
//!
//! A tire moves between `available`, `mounted` and `in_use` while it is
//! assembled into sets and driven. `discarded` is terminal: no operation
//! brings a discarded tire back into service.

use crate::error::DomainError;
use crate::types::TireCategory;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Lifecycle status of a single tire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TireStatus {
    /// In stock, not part of an active set.
    #[default]
    Available,
    /// Assembled into an active set, not yet driven.
    Mounted,
    /// Assembled into an active set that has recorded at least one outing.
    InUse,
    /// Retired permanently.
    Discarded,
}

impl TireStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and export.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Mounted => "mounted",
            Self::InUse => "in_use",
            Self::Discarded => "discarded",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "available" => Ok(Self::Available),
            "mounted" => Ok(Self::Mounted),
            "in_use" => Ok(Self::InUse),
            "discarded" => Ok(Self::Discarded),
            _ => Err(DomainError::UnknownValue {
                kind: "tire status",
                value: s.to_string(),
            }),
        }
    }

    /// Returns true if the tire can never change status again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Discarded)
    }

    /// Returns true while the tire sits in an active set.
    #[must_use]
    pub const fn is_assembled(&self) -> bool {
        matches!(self, Self::Mounted | Self::InUse)
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Available` → `Mounted` (assembly)
    /// - `Mounted` → `InUse` (first outing)
    /// - `Mounted` / `InUse` → `Available` (disassembly, stage carry-over)
    /// - any non-terminal status → `Discarded`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Available, Self::Mounted | Self::Discarded)
                | (
                    Self::Mounted,
                    Self::InUse | Self::Available | Self::Discarded
                )
                | (Self::InUse, Self::Available | Self::Discarded)
        )
    }

    /// Validates a transition for the named tire.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTireStatusTransition` if the transition
    /// is not allowed.
    pub fn validate_transition(&self, tire_id: &str, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidTireStatusTransition {
                tire_id: tire_id.to_string(),
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "discarded tires cannot return to service".to_string(),
            });
        }

        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTireStatusTransition {
                tire_id: tire_id.to_string(),
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "transition not permitted by tire lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for TireStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for TireStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single tire in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tire {
    pub tire_id: String,
    pub category: TireCategory,
    /// Car the tire was bought for, if any.
    pub car: Option<String>,
    pub barcode: Option<String>,
    pub registered_on: Date,
    /// Distance limit in kilometres.
    pub distance_limit: i64,
    /// Accumulated distance in kilometres.
    pub accumulated_distance: f64,
    /// Tread depth in millimetres when new.
    pub initial_depth: Option<f64>,
    /// Stage the tire was purchased in.
    pub registered_stage: u8,
    /// Stage the tire is currently tagged to.
    pub current_stage: u8,
    pub status: TireStatus,
    pub notes: String,
}

impl Tire {
    /// Creates an unused, available tire.
    #[must_use]
    pub fn new(
        tire_id: &str,
        category: TireCategory,
        registered_on: Date,
        distance_limit: i64,
        stage: u8,
    ) -> Self {
        Self {
            tire_id: tire_id.to_string(),
            category,
            car: None,
            barcode: None,
            registered_on,
            distance_limit,
            accumulated_distance: 0.0,
            initial_depth: None,
            registered_stage: stage,
            current_stage: stage,
            status: TireStatus::Available,
            notes: String::new(),
        }
    }
}
