// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Results returned by the facade.

use serde::Serialize;
use std::collections::BTreeMap;
use tire_ledger::DistanceCorrection;
use tire_ledger_domain::UsageEntry;

/// A recorded outing and the ledger lines it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct OutingReceipt {
    /// The assigned outing identifier.
    pub outing_id: i64,
    /// Laps times lap length, in km.
    pub distance: f64,
    /// One line per mounted tire, in position order.
    pub entries: Vec<UsageEntry>,
}

/// What an outing deletion left behind.
///
/// Deletion never touches tire distances, so `stale_tires` drift from the
/// ledger until [`crate::TireLedger::recompute_all`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// The deleted outing.
    pub outing_id: i64,
    /// Tires whose registry distance no longer matches the ledger.
    pub stale_tires: Vec<String>,
    /// True when a recomputation is needed to restore consistency.
    pub requires_recompute: bool,
}

/// An outing replaced through delete, recreate and replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementReport {
    /// The outing that was removed.
    pub deleted_outing_id: i64,
    /// The identifier of the replacement outing.
    pub outing_id: i64,
    /// Tires whose distance changed during the replay.
    pub corrections: Vec<DistanceCorrection>,
}

/// Snapshot of the inventory for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// The open stage.
    pub current_stage: u8,
    /// Tire count per status code.
    pub tires_by_status: BTreeMap<String, usize>,
    /// Active sets.
    pub active_sets: usize,
    /// Recorded outings.
    pub outings: usize,
    /// Tires whose registry distance drifts from the ledger.
    pub drifting_tires: usize,
}
