// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Every failure reaching a caller names the kind of entity involved and the
//! identifier that caused it, so a presentation layer can display or log it
//! without inspecting lower-level error types.

use crate::tables::TableError;
use tire_ledger::CoreError;
use tire_ledger_domain::DomainError;
use tire_ledger_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or out-of-policy input.
    Validation {
        /// The kind of entity or field that was rejected.
        entity: String,
        /// The offending identifier or value.
        id: String,
        /// A human-readable description of the problem.
        message: String,
    },
    /// A referenced entity does not exist.
    NotFound {
        /// The kind of entity.
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },
    /// An entity with this identifier already exists.
    DuplicateKey {
        /// The kind of entity.
        entity: String,
        /// The identifier in use.
        id: String,
    },
    /// The entity's lifecycle state does not allow the operation.
    InvalidState {
        /// The kind of entity.
        entity: String,
        /// The entity's identifier.
        id: String,
        /// Why the operation was refused.
        reason: String,
    },
    /// The requested status change is not permitted.
    InvalidTransition {
        /// The kind of entity.
        entity: String,
        /// The entity's identifier.
        id: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// A purchase would exceed the stage quota.
    QuotaExceeded {
        /// The stage purchased in.
        stage: u8,
        /// The stage quota.
        quota: u32,
        /// Tires already purchased in the stage.
        already: u32,
        /// Tires requested.
        requested: u32,
    },
    /// The open stage is the last one of the season.
    TerminalStage {
        /// The final stage.
        stage: u8,
    },
    /// The store failed; nothing was committed.
    Persistence {
        /// A description of the store failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Short name of the error kind, for logs and exit messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::InvalidState { .. } => "invalid_state",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::TerminalStage { .. } => "terminal_stage",
            Self::Persistence { .. } => "persistence",
            Self::Internal { .. } => "internal",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation {
                entity,
                id,
                message,
            } => {
                if id.is_empty() {
                    write!(f, "Invalid {entity}: {message}")
                } else {
                    write!(f, "Invalid {entity} '{id}': {message}")
                }
            }
            Self::NotFound { entity, id } => write!(f, "{entity} '{id}' not found"),
            Self::DuplicateKey { entity, id } => write!(f, "{entity} '{id}' already exists"),
            Self::InvalidState { entity, id, reason } => {
                write!(f, "{entity} '{id}' cannot be changed: {reason}")
            }
            Self::InvalidTransition {
                entity,
                id,
                from,
                to,
            } => write!(f, "{entity} '{id}' cannot move from {from} to {to}"),
            Self::QuotaExceeded {
                stage,
                quota,
                already,
                requested,
            } => write!(
                f,
                "Stage {stage} allows {quota} tires; {already} bought, {requested} requested"
            ),
            Self::TerminalStage { stage } => {
                write!(f, "Stage {stage} is the last stage of the season")
            }
            Self::Persistence { message } => write!(f, "Storage error: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

fn validation(entity: &str, id: String, message: String) -> ApiError {
    ApiError::Validation {
        entity: entity.to_string(),
        id,
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This is an explicit mapping that converts internal domain errors
/// into stable API-facing errors.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidIdentifier { entity, value } => validation(entity, value, message),
        DomainError::InvalidName { entity } => validation(entity, String::new(), message),
        DomainError::UnknownValue { kind, value } => validation(kind, value, message),
        DomainError::InvalidLapLength { track_id, .. } => validation("track", track_id, message),
        DomainError::InvalidLapCount { laps } => validation("laps", laps.to_string(), message),
        DomainError::InvalidDistanceLimit { limit } => {
            validation("distance_limit", limit.to_string(), message)
        }
        DomainError::InvalidDistance { tire_id, .. } => validation("tire", tire_id, message),
        DomainError::InvalidDepthReading { reading, .. } => {
            validation("depth reading", reading.to_string(), message)
        }
        DomainError::InvalidTireStatusTransition {
            tire_id, from, to, ..
        } => ApiError::InvalidTransition {
            entity: String::from("tire"),
            id: tire_id,
            from,
            to,
        },
        DomainError::DuplicateName { entity, name } => validation(entity, name, message),
        DomainError::EmptySet => validation("set", String::new(), message),
        DomainError::DuplicateTireInSet { tire_id }
        | DomainError::CategoryMismatch { tire_id, .. }
        | DomainError::CarMismatch { tire_id, .. } => validation("tire", tire_id, message),
        DomainError::InvalidStageNumber { stage, .. } => {
            validation("stage", stage.to_string(), message)
        }
        DomainError::InvalidPurchaseCount { count } => {
            validation("purchase count", count.to_string(), message)
        }
        DomainError::DateParseError { date_string, .. } => {
            validation("date", date_string, message)
        }
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotFound { entity, id } => ApiError::NotFound {
            entity: entity.to_string(),
            id,
        },
        CoreError::DuplicateKey { entity, id } => ApiError::DuplicateKey {
            entity: entity.to_string(),
            id,
        },
        CoreError::InvalidState { entity, id, reason } => ApiError::InvalidState {
            entity: entity.to_string(),
            id,
            reason,
        },
        CoreError::InvalidTransition {
            entity,
            id,
            from,
            to,
        } => ApiError::InvalidTransition {
            entity: entity.to_string(),
            id,
            from,
            to,
        },
        CoreError::QuotaExceeded {
            stage,
            quota,
            already,
            requested,
        } => ApiError::QuotaExceeded {
            stage,
            quota,
            already,
            requested,
        },
        CoreError::TerminalStage { stage } => ApiError::TerminalStage { stage },
        CoreError::InvalidSelection { reason } => {
            validation("selection", String::new(), reason)
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Rule violations detected inside a transaction surface as the rule's own
/// error; store failures become [`ApiError::Persistence`].
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::EntityNotFound { table, id } => ApiError::NotFound {
            entity: table.to_string(),
            id,
        },
        PersistenceError::DuplicateKey { table, id } => ApiError::DuplicateKey {
            entity: table.to_string(),
            id,
        },
        PersistenceError::NotFound(message) => ApiError::NotFound {
            entity: String::from("record"),
            id: message,
        },
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::ReconstructionError(_)
        | PersistenceError::SerializationError(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled => ApiError::Persistence {
            message: err.to_string(),
        },
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<TableError> for ApiError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Read { table, .. } | TableError::MissingColumn { table, .. } => {
                validation("table", table.to_string(), err.to_string())
            }
            TableError::Write { .. } | TableError::Io { .. } => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}
