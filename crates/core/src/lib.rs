// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tire lifecycle and usage accounting.
//!
//! Every mutation is a pure function of the current [`State`] and a
//! [`Command`]; [`apply`] returns the new state together with the ordered
//! list of [`Change`]s a store must commit atomically.

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

mod apply;
mod command;
mod error;
mod outings;
mod registry;
mod reports;
mod sets;
mod stages;
mod state;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use command::{AssemblyInput, Command, OutingInput, PurchaseInput};
pub use error::CoreError;
pub use reports::{
    DRIFT_TOLERANCE_KM, DriftLine, LedgerReport, status_counts, verify_ledger, wear_report,
};
pub use stages::{eligible_for_carry_over, open_stage_summary};
pub use state::{Change, DistanceCorrection, Outcome, State, TransitionResult};
