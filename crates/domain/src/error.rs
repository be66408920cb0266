// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// An identifier is empty or malformed.
    InvalidIdentifier {
        /// The kind of entity the identifier names.
        entity: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A display name is empty.
    InvalidName {
        /// The kind of entity being named.
        entity: &'static str,
    },
    /// A string does not name a known enum value.
    UnknownValue {
        /// The enum being parsed.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
    /// Lap length must be a finite, positive number of kilometres.
    InvalidLapLength {
        /// The track the length belongs to.
        track_id: String,
        /// The rejected length.
        lap_length: f64,
    },
    /// Lap count must be positive.
    InvalidLapCount {
        /// The rejected lap count.
        laps: i64,
    },
    /// Distance limit must be positive.
    InvalidDistanceLimit {
        /// The rejected limit.
        limit: i64,
    },
    /// Accumulated distance must be a non-negative number.
    InvalidDistance {
        /// The tire carrying the distance.
        tire_id: String,
        /// The rejected distance.
        distance: f64,
    },
    /// A tread depth reading is outside the measurable range.
    InvalidDepthReading {
        /// Which of the four readings was rejected.
        reading: &'static str,
        /// The rejected value in millimetres.
        value: f64,
    },
    /// A tire status change is not permitted by the lifecycle rules.
    InvalidTireStatusTransition {
        /// The tire being changed.
        tire_id: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the change was refused.
        reason: String,
    },
    /// Another live record already uses this name.
    DuplicateName {
        /// The kind of entity being named.
        entity: &'static str,
        /// The repeated name.
        name: String,
    },
    /// A set assembly listed no tires at all.
    EmptySet,
    /// The same tire was listed in more than one slot.
    DuplicateTireInSet {
        /// The repeated tire.
        tire_id: String,
    },
    /// A tire's category does not match the set it is being mounted in.
    CategoryMismatch {
        /// The tire.
        tire_id: String,
        /// The tire's category.
        tire_category: String,
        /// The set's category.
        set_category: String,
    },
    /// A tire bought for one car was assigned to a set for another car.
    CarMismatch {
        /// The tire.
        tire_id: String,
        /// The car the tire belongs to.
        tire_car: String,
        /// The car the set is bound to.
        set_car: String,
    },
    /// Stage number is outside the season.
    InvalidStageNumber {
        /// The rejected stage.
        stage: u8,
        /// The last stage of the season.
        final_stage: u8,
    },
    /// Purchase count must be positive.
    InvalidPurchaseCount {
        /// The rejected count.
        count: u32,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { entity, value } => {
                write!(f, "Invalid {entity} identifier: '{value}'")
            }
            Self::InvalidName { entity } => write!(f, "{entity} name cannot be empty"),
            Self::UnknownValue { kind, value } => write!(f, "Unknown {kind}: '{value}'"),
            Self::InvalidLapLength {
                track_id,
                lap_length,
            } => write!(
                f,
                "Track '{track_id}' has invalid lap length {lap_length} km (must be positive)"
            ),
            Self::InvalidLapCount { laps } => {
                write!(f, "Lap count must be positive, got {laps}")
            }
            Self::InvalidDistanceLimit { limit } => {
                write!(f, "Distance limit must be positive, got {limit}")
            }
            Self::InvalidDistance { tire_id, distance } => write!(
                f,
                "Tire '{tire_id}' has invalid accumulated distance {distance} km"
            ),
            Self::InvalidDepthReading { reading, value } => {
                write!(f, "Tread depth reading '{reading}' out of range: {value} mm")
            }
            Self::InvalidTireStatusTransition {
                tire_id,
                from,
                to,
                reason,
            } => write!(
                f,
                "Tire '{tire_id}' cannot move from {from} to {to}: {reason}"
            ),
            Self::DuplicateName { entity, name } => {
                write!(f, "An active {entity} named '{name}' already exists")
            }
            Self::EmptySet => write!(f, "A set needs at least one tire"),
            Self::DuplicateTireInSet { tire_id } => {
                write!(f, "Tire '{tire_id}' is listed in more than one position")
            }
            Self::CategoryMismatch {
                tire_id,
                tire_category,
                set_category,
            } => write!(
                f,
                "Tire '{tire_id}' is a {tire_category} tire and cannot join a {set_category} set"
            ),
            Self::CarMismatch {
                tire_id,
                tire_car,
                set_car,
            } => write!(
                f,
                "Tire '{tire_id}' belongs to car '{tire_car}', not '{set_car}'"
            ),
            Self::InvalidStageNumber { stage, final_stage } => write!(
                f,
                "Stage {stage} is outside the season (1..={final_stage})"
            ),
            Self::InvalidPurchaseCount { count } => {
                write!(f, "Purchase count must be positive, got {count}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
