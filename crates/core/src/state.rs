// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tire_ledger_domain::{
    Car, Measurement, Outing, StageRecord, Tire, TireSet, Track, UsageEntry,
};

/// Everything the rules need to decide a command.
///
/// The persistence layer loads this inside the transaction that will
/// commit the resulting changes.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// The open stage.
    pub current_stage: u8,
    /// Highest outing id ever assigned; ids are never reused.
    pub last_outing_id: i64,
    pub tracks: Vec<Track>,
    pub cars: Vec<Car>,
    pub tires: Vec<Tire>,
    pub sets: Vec<TireSet>,
    pub outings: Vec<Outing>,
    pub ledger: Vec<UsageEntry>,
    pub measurements: Vec<Measurement>,
    pub stage_records: Vec<StageRecord>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Creates an empty season at stage 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current_stage: 1,
            last_outing_id: 0,
            tracks: Vec::new(),
            cars: Vec::new(),
            tires: Vec::new(),
            sets: Vec::new(),
            outings: Vec::new(),
            ledger: Vec::new(),
            measurements: Vec::new(),
            stage_records: Vec::new(),
        }
    }

    #[must_use]
    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }

    #[must_use]
    pub fn car(&self, name: &str) -> Option<&Car> {
        self.cars.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn tire(&self, tire_id: &str) -> Option<&Tire> {
        self.tires.iter().find(|t| t.tire_id == tire_id)
    }

    #[must_use]
    pub fn set(&self, set_id: &str) -> Option<&TireSet> {
        self.sets.iter().find(|s| s.set_id == set_id)
    }

    #[must_use]
    pub fn outing(&self, outing_id: i64) -> Option<&Outing> {
        self.outings
            .iter()
            .find(|o| o.outing_id == Some(outing_id))
    }

    /// Returns the active set holding a tire, if any.
    #[must_use]
    pub fn active_set_holding(&self, tire_id: &str) -> Option<&TireSet> {
        self.sets
            .iter()
            .find(|s| s.is_active() && s.holds(tire_id))
    }

    /// Ledger lines of one outing.
    pub fn entries_for(&self, outing_id: i64) -> impl Iterator<Item = &UsageEntry> {
        self.ledger.iter().filter(move |e| e.outing_id == outing_id)
    }

    /// Number of tires purchased (registered) in a stage.
    #[must_use]
    pub fn purchased_in_stage(&self, stage: u8) -> u32 {
        let count: usize = self
            .tires
            .iter()
            .filter(|t| t.registered_stage == stage)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Applies one change to this state.
    pub fn apply_change(&mut self, change: &Change) {
        match change {
            Change::InsertTrack(track) => self.tracks.push(track.clone()),
            Change::UpdateTrack(track) => {
                if let Some(existing) = self
                    .tracks
                    .iter_mut()
                    .find(|t| t.track_id == track.track_id)
                {
                    *existing = track.clone();
                }
            }
            Change::InsertCar(car) => self.cars.push(car.clone()),
            Change::UpdateCar(car) => {
                if let Some(existing) = self.cars.iter_mut().find(|c| c.name == car.name) {
                    *existing = car.clone();
                }
            }
            Change::InsertTire(tire) => self.tires.push(tire.clone()),
            Change::UpdateTire(tire) => {
                if let Some(existing) = self
                    .tires
                    .iter_mut()
                    .find(|t| t.tire_id == tire.tire_id)
                {
                    *existing = tire.clone();
                }
            }
            Change::InsertSet(set) => self.sets.push(set.clone()),
            Change::UpdateSet(set) => {
                if let Some(existing) = self.sets.iter_mut().find(|s| s.set_id == set.set_id) {
                    *existing = set.clone();
                }
            }
            Change::InsertOuting { outing, entries } => {
                if let Some(id) = outing.outing_id {
                    self.last_outing_id = self.last_outing_id.max(id);
                }
                self.outings.push(outing.clone());
                self.ledger.extend(entries.iter().cloned());
            }
            Change::UpdateOuting(outing) => {
                if let Some(existing) = self
                    .outings
                    .iter_mut()
                    .find(|o| o.outing_id == outing.outing_id)
                {
                    *existing = outing.clone();
                }
            }
            Change::DeleteOuting { outing_id } => {
                self.outings.retain(|o| o.outing_id != Some(*outing_id));
                self.ledger.retain(|e| e.outing_id != *outing_id);
            }
            Change::UpdateLedgerEntry {
                outing_id,
                tire_id,
                distance_before,
                distance_after,
            } => {
                if let Some(entry) = self
                    .ledger
                    .iter_mut()
                    .find(|e| e.outing_id == *outing_id && e.tire_id == *tire_id)
                {
                    entry.distance_before = *distance_before;
                    entry.distance_after = *distance_after;
                }
            }
            Change::InsertMeasurement(measurement) => {
                self.measurements.push(measurement.clone());
            }
            Change::InsertStageRecord(record) => self.stage_records.push(record.clone()),
            Change::SetCurrentStage(stage) => self.current_stage = *stage,
        }
    }
}

/// A single write the persistence layer must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    InsertTrack(Track),
    UpdateTrack(Track),
    InsertCar(Car),
    UpdateCar(Car),
    InsertTire(Tire),
    /// Replaces every mutable field of an existing tire.
    UpdateTire(Tire),
    InsertSet(TireSet),
    UpdateSet(TireSet),
    /// Inserts an outing with its id already assigned, plus its ledger lines.
    InsertOuting {
        outing: Outing,
        entries: Vec<UsageEntry>,
    },
    /// Rewrites the non-accounting fields of an outing.
    UpdateOuting(Outing),
    /// Removes an outing and its ledger lines.
    DeleteOuting {
        outing_id: i64,
    },
    UpdateLedgerEntry {
        outing_id: i64,
        tire_id: String,
        distance_before: f64,
        distance_after: f64,
    },
    InsertMeasurement(Measurement),
    InsertStageRecord(StageRecord),
    SetCurrentStage(u8),
}

/// Distance of one tire before and after a recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceCorrection {
    pub tire_id: String,
    pub previous: f64,
    pub recomputed: f64,
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    TrackRegistered { track_id: String },
    TrackUpdated { track_id: String },
    TracksSeeded { added: Vec<String> },
    CarRegistered { name: String },
    CarUpdated { name: String },
    TireRegistered { tire_id: String },
    TireStatusChanged { tire_id: String },
    TiresPurchased { tire_ids: Vec<String> },
    SetAssembled { set_id: String },
    SetDisassembled { set_id: String, released: Vec<String> },
    OutingRecorded {
        outing_id: i64,
        distance: f64,
        entries: Vec<UsageEntry>,
    },
    OutingUpdated { outing_id: i64 },
    /// The registry distances of `stale_tires` no longer match the ledger
    /// until a recomputation runs.
    OutingDeleted {
        outing_id: i64,
        stale_tires: Vec<String>,
    },
    OutingReplaced {
        deleted_outing_id: i64,
        outing_id: i64,
        corrections: Vec<DistanceCorrection>,
    },
    MeasurementRecorded { measurement: Measurement },
    StageAdvanced { record: StageRecord },
    Recomputed { corrections: Vec<DistanceCorrection> },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// Writes that turn the old persisted state into `new_state`, in order.
    pub changes: Vec<Change>,
    pub outcome: Outcome,
}
