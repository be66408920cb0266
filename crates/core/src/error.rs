// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tire_ledger_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A referenced entity does not exist.
    NotFound {
        /// The kind of entity.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// An entity with this identifier already exists.
    DuplicateKey {
        /// The kind of entity.
        entity: &'static str,
        /// The identifier in use.
        id: String,
    },
    /// The entity's lifecycle state does not allow the operation.
    InvalidState {
        /// The kind of entity.
        entity: &'static str,
        /// The entity's identifier.
        id: String,
        /// Why the operation was refused.
        reason: String,
    },
    /// The requested status change is not permitted.
    InvalidTransition {
        /// The kind of entity.
        entity: &'static str,
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
    /// The season has no stage after this one.
    TerminalStage {
        /// The final stage.
        stage: u8,
    },
    /// The tires chosen to carry into the next stage are not acceptable.
    InvalidSelection {
        /// Why the selection was refused.
        reason: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} '{id}' not found"),
            Self::DuplicateKey { entity, id } => write!(f, "{entity} '{id}' already exists"),
            Self::InvalidState { entity, id, reason } => {
                write!(f, "{entity} '{id}' is in an invalid state: {reason}")
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
                "Stage {stage} quota of {quota} tires exceeded: {already} already purchased, {requested} requested"
            ),
            Self::TerminalStage { stage } => {
                write!(f, "Stage {stage} is the final stage of the season")
            }
            Self::InvalidSelection { reason } => write!(f, "Invalid tire selection: {reason}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
