// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only views derived from the state.

use crate::error::CoreError;
use crate::state::State;
use std::collections::BTreeMap;
use tire_ledger_domain::{SeasonPolicy, Tire, TireStatus, WearReport, classify_wear};

/// Registry and ledger may differ by this much before a tire counts as drifting.
pub const DRIFT_TOLERANCE_KM: f64 = 1e-6;

/// Registry distance of one tire compared with its ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftLine {
    pub tire_id: String,
    pub registry_distance: f64,
    /// Sum of the tire's ledger deltas.
    pub ledger_distance: f64,
    pub drifting: bool,
}

/// Result of checking every tire against the ledger.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerReport {
    pub lines: Vec<DriftLine>,
    /// `(outing id, tire id)` of ledger lines whose delta is not the outing distance.
    pub mismatched_entries: Vec<(i64, String)>,
}

impl LedgerReport {
    pub fn drifting(&self) -> impl Iterator<Item = &DriftLine> {
        self.lines.iter().filter(|l| l.drifting)
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.mismatched_entries.is_empty() && self.drifting().next().is_none()
    }
}

/// Compares every tire's registry distance with the sum of its ledger lines.
#[must_use]
pub fn verify_ledger(state: &State) -> LedgerReport {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in &state.ledger {
        *sums.entry(entry.tire_id.as_str()).or_insert(0.0) += entry.delta();
    }

    let lines: Vec<DriftLine> = state
        .tires
        .iter()
        .map(|tire| {
            let ledger_distance: f64 = sums.get(tire.tire_id.as_str()).copied().unwrap_or(0.0);
            DriftLine {
                tire_id: tire.tire_id.clone(),
                registry_distance: tire.accumulated_distance,
                ledger_distance,
                drifting: (tire.accumulated_distance - ledger_distance).abs() > DRIFT_TOLERANCE_KM,
            }
        })
        .collect();

    let mut mismatched_entries: Vec<(i64, String)> = Vec::new();
    for outing in &state.outings {
        let Some(outing_id) = outing.outing_id else {
            continue;
        };
        for entry in state.entries_for(outing_id) {
            if (entry.delta() - outing.distance).abs() > DRIFT_TOLERANCE_KM {
                mismatched_entries.push((outing_id, entry.tire_id.clone()));
            }
        }
    }

    LedgerReport {
        lines,
        mismatched_entries,
    }
}

/// Wear of one tire.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if the tire does not exist.
pub fn wear_report(
    state: &State,
    policy: &SeasonPolicy,
    tire_id: &str,
) -> Result<WearReport, CoreError> {
    let tire: &Tire = state.tire(tire_id).ok_or_else(|| CoreError::NotFound {
        entity: "tire",
        id: tire_id.to_string(),
    })?;
    Ok(classify_wear(
        &tire.tire_id,
        tire.accumulated_distance,
        tire.distance_limit,
        policy.limit_floor_km,
    ))
}

/// Number of tires in each status.
#[must_use]
pub fn status_counts(state: &State) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> = [
        TireStatus::Available,
        TireStatus::Mounted,
        TireStatus::InUse,
        TireStatus::Discarded,
    ]
    .into_iter()
    .map(|s| (s.as_str(), 0))
    .collect();
    for tire in &state.tires {
        *counts.entry(tire.status.as_str()).or_insert(0) += 1;
    }
    counts
}
