// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Season policy, stage records and the race calendar.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;
use time::macros::date;

/// Number of tires carried from one stage into the next.
pub const RETAINED_PER_STAGE: usize = 4;

/// Regulatory limits for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPolicy {
    /// Last stage of the season; advancing past it is refused.
    pub final_stage: u8,
    /// Tires that may be purchased in stage 1.
    pub first_stage_quota: u32,
    /// Tires that may be purchased in every later stage.
    pub later_stage_quota: u32,
    /// Limit substituted for non-positive tire limits.
    pub limit_floor_km: i64,
}

impl Default for SeasonPolicy {
    fn default() -> Self {
        Self {
            final_stage: 12,
            first_stage_quota: 16,
            later_stage_quota: 8,
            limit_floor_km: 1000,
        }
    }
}

impl SeasonPolicy {
    /// Returns the purchase quota for a stage.
    #[must_use]
    pub const fn quota_for(&self, stage: u8) -> u32 {
        if stage <= 1 {
            self.first_stage_quota
        } else {
            self.later_stage_quota
        }
    }

    /// Validates a stage number lies within the season.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStageNumber` if the stage is 0 or past the final stage.
    pub const fn validate_stage(&self, stage: u8) -> Result<(), DomainError> {
        if stage == 0 || stage > self.final_stage {
            Err(DomainError::InvalidStageNumber {
                stage,
                final_stage: self.final_stage,
            })
        } else {
            Ok(())
        }
    }

    /// Returns true if no stage follows this one.
    #[must_use]
    pub const fn is_final(&self, stage: u8) -> bool {
        stage >= self.final_stage
    }
}

/// Whether a stage is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Open,
    Closed,
}

impl StageStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::UnknownValue {
                kind: "stage status",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for StageStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Summary of one stage.
///
/// A closed record always lists exactly four retained tires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: u8,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub tires_purchased: u32,
    pub retained: Vec<String>,
    pub discarded: u32,
    pub status: StageStatus,
}

/// Fixed metadata for one stage of the season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub stage: u8,
    pub date: Date,
    pub venue: &'static str,
    pub track_name: &'static str,
    pub kind: &'static str,
}

const fn entry(
    stage: u8,
    date: Date,
    venue: &'static str,
    track_name: &'static str,
    kind: &'static str,
) -> CalendarEntry {
    CalendarEntry {
        stage,
        date,
        venue,
        track_name,
        kind,
    }
}

/// The 2026 season calendar.
#[must_use]
pub fn season_calendar() -> Vec<CalendarEntry> {
    vec![
        entry(1, date!(2026 - 03 - 08), "Curvelo", "Circuito dos Cristais", "Season opener"),
        entry(2, date!(2026 - 03 - 29), "Cascavel", "Autódromo Zilmar Beux", "Regular"),
        entry(3, date!(2026 - 04 - 26), "Interlagos", "Interlagos", "Regular"),
        entry(4, date!(2026 - 05 - 17), "Goiânia", "Autódromo Ayrton Senna", "Regular"),
        entry(5, date!(2026 - 06 - 13), "Cuiabá", "Autódromo de Cuiabá", "Night race"),
        entry(6, date!(2026 - 07 - 26), "Velocitta", "Velocitta", "Regular"),
        entry(7, date!(2026 - 08 - 09), "Cascavel", "Autódromo Zilmar Beux", "Regular"),
        entry(8, date!(2026 - 09 - 06), "Chapecó", "Autódromo de Chapecó", "Chapecó debut"),
        entry(9, date!(2026 - 09 - 27), "Brasília", "Autódromo Nelson Piquet", "Million race"),
        entry(10, date!(2026 - 10 - 18), "Goiânia", "Autódromo Ayrton Senna", "3h Endurance"),
        entry(11, date!(2026 - 11 - 15), "Velopark", "Velopark", "Regular"),
        entry(12, date!(2026 - 12 - 13), "Interlagos", "Interlagos", "Super final"),
    ]
}

/// Looks up the calendar entry for a stage.
#[must_use]
pub fn calendar_entry(stage: u8) -> Option<CalendarEntry> {
    season_calendar().into_iter().find(|e| e.stage == stage)
}
