// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process API for the tire ledger.
//!
//! [`TireLedger`] is the only entry point a presentation layer needs: it
//! exposes every registry, ledger and stage operation, translates lower
//! layer failures into [`ApiError`], and moves the inventory in and out of
//! flat CSV tables.

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
#![allow(clippy::multiple_crate_versions)]

mod error;
mod ledger;
mod request_response;
mod tables;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use ledger::TireLedger;
pub use request_response::{DeletionReport, OutingReceipt, ReplacementReport, StatusSummary};
pub use tables::{
    FlatTables, LEDGER_FILE, LedgerRow, MEASUREMENTS_FILE, MeasurementRow, TIRES_FILE,
    TableError, TireRow,
};

pub use tire_ledger::{AssemblyInput, DistanceCorrection, LedgerReport, OutingInput, PurchaseInput};
pub use tire_ledger_domain::season_calendar;
