// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod car;
mod error;
mod ids;
mod measurement;
mod outing;
mod season;
mod tire;
mod tire_set;
mod track;
mod types;
mod validation;
mod wear;

#[cfg(test)]
mod tests;

pub use car::Car;
pub use error::DomainError;
pub use ids::{IdGenerator, SET_PREFIX, SequentialIds, default_tire_prefix};
pub use measurement::{
    Condition, DepthReadings, MAX_DEPTH_MM, Measurement, RecommendedAction, depth_condition,
    distance_condition, evaluate_measurement, recommend,
};
pub use outing::{Outing, SessionType, TrackCondition, UsageEntry, compute_distance};
pub use season::{
    CalendarEntry, RETAINED_PER_STAGE, SeasonPolicy, StageRecord, StageStatus, calendar_entry,
    season_calendar,
};
pub use tire::{Tire, TireStatus};
pub use tire_set::{SetSlots, SetStatus, TireSet};
pub use track::{Direction, Track, TrackLayout, WearBias, default_tracks};
pub use types::{TireCategory, WheelPosition, format_date, parse_date};
pub use validation::{
    validate_car, validate_set_member, validate_set_slots, validate_tire, validate_track,
};
pub use wear::{WearLevel, WearReport, classify_wear, effective_limit, wear_percentage};
