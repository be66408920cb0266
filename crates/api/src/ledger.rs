// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The operator-facing facade.
//!
//! [`TireLedger`] owns the store, the season policy and the identifier
//! strategy. Each mutating method runs exactly one command in one
//! transaction; read methods load the committed state.

use crate::error::ApiError;
use crate::request_response::{DeletionReport, OutingReceipt, ReplacementReport, StatusSummary};
use std::path::Path;
use time::Date;
use tire_ledger::{
    AssemblyInput, Command, DistanceCorrection, LedgerReport, OutingInput, Outcome,
    PurchaseInput, State, TransitionResult, open_stage_summary, status_counts, verify_ledger,
    wear_report,
};
use tire_ledger_domain::{
    Car, DepthReadings, IdGenerator, Measurement, SeasonPolicy, SequentialIds, SessionType,
    StageRecord, Tire, TireSet, TireStatus, Track, TrackCondition, UsageEntry, WearReport,
};
use tire_ledger_persistence::Persistence;
use tracing::{debug, info};

/// Tire inventory backed by a persistent store.
pub struct TireLedger<G: IdGenerator = SequentialIds> {
    persistence: Persistence,
    policy: SeasonPolicy,
    ids: G,
}

impl TireLedger<SequentialIds> {
    /// Opens a ledger on a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn open_in_memory(policy: SeasonPolicy) -> Result<Self, ApiError> {
        let persistence: Persistence = Persistence::new_in_memory()?;
        Ok(Self::with_generator(persistence, policy, SequentialIds::default()))
    }

    /// Opens (creating if needed) a ledger stored in a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P, policy: SeasonPolicy) -> Result<Self, ApiError> {
        let persistence: Persistence = Persistence::new_with_file(path)?;
        Ok(Self::with_generator(persistence, policy, SequentialIds::default()))
    }
}

impl<G: IdGenerator> TireLedger<G> {
    /// Wraps an opened store with a custom identifier strategy.
    #[must_use]
    pub const fn with_generator(persistence: Persistence, policy: SeasonPolicy, ids: G) -> Self {
        Self {
            persistence,
            policy,
            ids,
        }
    }

    /// The season policy in force.
    #[must_use]
    pub const fn policy(&self) -> &SeasonPolicy {
        &self.policy
    }

    fn execute(&mut self, command: Command) -> Result<Outcome, ApiError> {
        let result: TransitionResult = self.persistence.execute(&self.policy, &self.ids, command)?;
        Ok(result.outcome)
    }

    /// Loads the committed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn state(&mut self) -> Result<State, ApiError> {
        Ok(self.persistence.load_state()?)
    }

    pub(crate) const fn persistence_mut(&mut self) -> &mut Persistence {
        &mut self.persistence
    }

    // ---- tracks ----

    /// Registers a track.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::DuplicateKey` if the identifier is taken and
    /// `ApiError::Validation` if the lap length is not positive.
    pub fn register_track(&mut self, track: Track) -> Result<String, ApiError> {
        match self.execute(Command::RegisterTrack(track))? {
            Outcome::TrackRegistered { track_id } => Ok(track_id),
            other => Err(unexpected("RegisterTrack", &other)),
        }
    }

    /// Administrative correction of a track.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidState` if outings reference the track and
    /// the lap length changes.
    pub fn update_track(&mut self, track: Track) -> Result<(), ApiError> {
        match self.execute(Command::UpdateTrack(track))? {
            Outcome::TrackUpdated { .. } => Ok(()),
            other => Err(unexpected("UpdateTrack", &other)),
        }
    }

    /// Registers the reference circuits that are missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn seed_default_tracks(&mut self) -> Result<Vec<String>, ApiError> {
        match self.execute(Command::SeedDefaultTracks)? {
            Outcome::TracksSeeded { added } => Ok(added),
            other => Err(unexpected("SeedDefaultTracks", &other)),
        }
    }

    /// Every registered track.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_tracks(&mut self) -> Result<Vec<Track>, ApiError> {
        Ok(self.state()?.tracks)
    }

    /// One track.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the track does not exist.
    pub fn get_track(&mut self, track_id: &str) -> Result<Track, ApiError> {
        self.state()?
            .track(track_id)
            .cloned()
            .ok_or_else(|| not_found("track", track_id))
    }

    // ---- cars ----

    /// Registers a car.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::DuplicateKey` if the name is taken.
    pub fn register_car(&mut self, car: Car) -> Result<String, ApiError> {
        match self.execute(Command::RegisterCar(car))? {
            Outcome::CarRegistered { name } => Ok(name),
            other => Err(unexpected("RegisterCar", &other)),
        }
    }

    /// Every registered car.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_cars(&mut self) -> Result<Vec<Car>, ApiError> {
        Ok(self.state()?.cars)
    }

    /// One car.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the car does not exist.
    pub fn get_car(&mut self, name: &str) -> Result<Car, ApiError> {
        self.state()?
            .car(name)
            .cloned()
            .ok_or_else(|| not_found("car", name))
    }

    /// Activates or retires a car.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the car does not exist.
    pub fn set_car_active(&mut self, name: &str, active: bool) -> Result<(), ApiError> {
        let command: Command = Command::SetCarActive {
            name: name.to_string(),
            active,
        };
        match self.execute(command)? {
            Outcome::CarUpdated { .. } => Ok(()),
            other => Err(unexpected("SetCarActive", &other)),
        }
    }

    // ---- tires ----

    /// Registers a single tire outside the purchase flow.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::DuplicateKey` if the identifier is taken.
    pub fn register_tire(&mut self, tire: Tire) -> Result<String, ApiError> {
        match self.execute(Command::RegisterTire(tire))? {
            Outcome::TireRegistered { tire_id } => Ok(tire_id),
            other => Err(unexpected("RegisterTire", &other)),
        }
    }

    /// Tires, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_tires(&mut self, status: Option<TireStatus>) -> Result<Vec<Tire>, ApiError> {
        let tires: Vec<Tire> = self.state()?.tires;
        Ok(match status {
            Some(wanted) => tires.into_iter().filter(|t| t.status == wanted).collect(),
            None => tires,
        })
    }

    /// One tire.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the tire does not exist.
    pub fn get_tire(&mut self, tire_id: &str) -> Result<Tire, ApiError> {
        self.persistence
            .get_tire(tire_id)?
            .ok_or_else(|| not_found("tire", tire_id))
    }

    /// Moves a tire to another status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidTransition` for moves the lifecycle
    /// forbids, such as leaving `discarded`.
    pub fn set_tire_status(&mut self, tire_id: &str, status: TireStatus) -> Result<(), ApiError> {
        let command: Command = Command::SetTireStatus {
            tire_id: tire_id.to_string(),
            status,
        };
        match self.execute(command)? {
            Outcome::TireStatusChanged { .. } => Ok(()),
            other => Err(unexpected("SetTireStatus", &other)),
        }
    }

    /// Retires a tire for good.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidState` if the tire sits in an active set.
    pub fn discard_tire(&mut self, tire_id: &str) -> Result<(), ApiError> {
        let command: Command = Command::DiscardTire {
            tire_id: tire_id.to_string(),
        };
        match self.execute(command)? {
            Outcome::TireStatusChanged { .. } => Ok(()),
            other => Err(unexpected("DiscardTire", &other)),
        }
    }

    /// Buys tires in the open stage and returns their generated codes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::QuotaExceeded` if the stage quota would be passed.
    pub fn purchase(&mut self, input: PurchaseInput) -> Result<Vec<String>, ApiError> {
        match self.execute(Command::PurchaseTires(input))? {
            Outcome::TiresPurchased { tire_ids } => {
                info!(count = tire_ids.len(), "Purchased tires");
                Ok(tire_ids)
            }
            other => Err(unexpected("PurchaseTires", &other)),
        }
    }

    /// Distance, limit and wear level of one tire.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the tire does not exist.
    pub fn wear_report(&mut self, tire_id: &str) -> Result<WearReport, ApiError> {
        let state: State = self.state()?;
        Ok(wear_report(&state, &self.policy, tire_id)?)
    }

    /// Ledger lines of one tire in outing order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the tire does not exist.
    pub fn history(&mut self, tire_id: &str) -> Result<Vec<UsageEntry>, ApiError> {
        self.get_tire(tire_id)?;
        Ok(self.persistence.history_for_tire(tire_id)?)
    }

    // ---- sets ----

    /// Assembles a set and mounts its tires.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidState` if a tire is not available or sits in
    /// another active set, and `ApiError::Validation` for malformed slots.
    pub fn assemble(&mut self, input: AssemblyInput) -> Result<String, ApiError> {
        match self.execute(Command::AssembleSet(input))? {
            Outcome::SetAssembled { set_id } => Ok(set_id),
            other => Err(unexpected("AssembleSet", &other)),
        }
    }

    /// Disassembles a set and returns the released tires.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidTransition` if the set is already
    /// disassembled.
    pub fn disassemble(&mut self, set_id: &str) -> Result<Vec<String>, ApiError> {
        let command: Command = Command::DisassembleSet {
            set_id: set_id.to_string(),
        };
        match self.execute(command)? {
            Outcome::SetDisassembled { released, .. } => Ok(released),
            other => Err(unexpected("DisassembleSet", &other)),
        }
    }

    /// Every set, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_sets(&mut self) -> Result<Vec<TireSet>, ApiError> {
        Ok(self.state()?.sets)
    }

    /// One set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the set does not exist.
    pub fn get_set(&mut self, set_id: &str) -> Result<TireSet, ApiError> {
        self.state()?
            .set(set_id)
            .cloned()
            .ok_or_else(|| not_found("set", set_id))
    }

    // ---- outings ----

    /// Records an outing against an active set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown track or set,
    /// `ApiError::Validation` for a non-positive lap count and
    /// `ApiError::InvalidState` for a disassembled set.
    pub fn record_outing(&mut self, input: OutingInput) -> Result<OutingReceipt, ApiError> {
        match self.execute(Command::RecordOuting(input))? {
            Outcome::OutingRecorded {
                outing_id,
                distance,
                entries,
            } => Ok(OutingReceipt {
                outing_id,
                distance,
                entries,
            }),
            other => Err(unexpected("RecordOuting", &other)),
        }
    }

    /// Edits notes, session type and condition of an outing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the outing does not exist.
    pub fn update_outing(
        &mut self,
        outing_id: i64,
        notes: &str,
        session_type: SessionType,
        condition: TrackCondition,
    ) -> Result<(), ApiError> {
        let command: Command = Command::UpdateOuting {
            outing_id,
            notes: notes.to_string(),
            session_type,
            condition,
        };
        match self.execute(command)? {
            Outcome::OutingUpdated { .. } => Ok(()),
            other => Err(unexpected("UpdateOuting", &other)),
        }
    }

    /// Deletes an outing and its ledger lines.
    ///
    /// Tire distances are left as they are; the report lists the tires that
    /// need [`Self::recompute_all`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the outing does not exist.
    pub fn delete_outing(&mut self, outing_id: i64) -> Result<DeletionReport, ApiError> {
        match self.execute(Command::DeleteOuting { outing_id })? {
            Outcome::OutingDeleted {
                outing_id,
                stale_tires,
            } => Ok(DeletionReport {
                outing_id,
                requires_recompute: !stale_tires.is_empty(),
                stale_tires,
            }),
            other => Err(unexpected("DeleteOuting", &other)),
        }
    }

    /// Changes the accounting fields of an outing by deleting it, recording
    /// the replacement and replaying the ledger, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::record_outing`], except that the
    /// original outing's own set may be disassembled, and
    /// `ApiError::NotFound` if the outing does not exist.
    pub fn replace_outing(
        &mut self,
        outing_id: i64,
        input: OutingInput,
    ) -> Result<ReplacementReport, ApiError> {
        match self.execute(Command::ReplaceOuting { outing_id, input })? {
            Outcome::OutingReplaced {
                deleted_outing_id,
                outing_id,
                corrections,
            } => Ok(ReplacementReport {
                deleted_outing_id,
                outing_id,
                corrections,
            }),
            other => Err(unexpected("ReplaceOuting", &other)),
        }
    }

    // ---- measurements and stages ----

    /// Records a tread depth measurement.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for readings outside 0 to 15 mm and
    /// `ApiError::InvalidState` for a discarded tire.
    pub fn record_measurement(
        &mut self,
        tire_id: &str,
        date: Date,
        readings: DepthReadings,
        notes: &str,
    ) -> Result<Measurement, ApiError> {
        let command: Command = Command::RecordMeasurement {
            tire_id: tire_id.to_string(),
            date,
            readings,
            notes: notes.to_string(),
        };
        match self.execute(command)? {
            Outcome::MeasurementRecorded { measurement } => Ok(measurement),
            other => Err(unexpected("RecordMeasurement", &other)),
        }
    }

    /// The open stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn current_stage(&mut self) -> Result<u8, ApiError> {
        Ok(self.persistence.current_stage()?)
    }

    /// Tires that may be carried into the next stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn eligible_for_carry_over(&mut self) -> Result<Vec<Tire>, ApiError> {
        let state: State = self.state()?;
        Ok(tire_ledger::eligible_for_carry_over(&state)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Closes the open stage, keeping exactly four tires.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::TerminalStage` in the last stage and
    /// `ApiError::Validation` unless four distinct eligible tires are given.
    pub fn advance_stage(
        &mut self,
        selected: &[String],
        end_date: Date,
    ) -> Result<StageRecord, ApiError> {
        let command: Command = Command::AdvanceStage {
            selected: selected.to_vec(),
            end_date,
        };
        match self.execute(command)? {
            Outcome::StageAdvanced { record } => {
                info!(
                    stage = record.stage,
                    discarded = record.discarded,
                    "Closed stage"
                );
                Ok(record)
            }
            other => Err(unexpected("AdvanceStage", &other)),
        }
    }

    /// Closed stage records followed by the summary of the open stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn stage_records(&mut self) -> Result<Vec<StageRecord>, ApiError> {
        let state: State = self.state()?;
        let mut records: Vec<StageRecord> = state.stage_records.clone();
        records.push(open_stage_summary(&state));
        Ok(records)
    }

    // ---- repair and reports ----

    /// Rebuilds every tire distance from the ledger.
    ///
    /// Running it twice in a row changes nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails; nothing is written in that case.
    pub fn recompute_all(&mut self) -> Result<Vec<DistanceCorrection>, ApiError> {
        match self.execute(Command::RecomputeAll)? {
            Outcome::Recomputed { corrections } => {
                debug!(corrected = corrections.len(), "Recomputed tire distances");
                Ok(corrections)
            }
            other => Err(unexpected("RecomputeAll", &other)),
        }
    }

    /// Compares every tire's distance with its ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn verify_ledger(&mut self) -> Result<LedgerReport, ApiError> {
        let state: State = self.state()?;
        Ok(verify_ledger(&state))
    }

    /// Stage, tire counts and drift in one view.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn status_summary(&mut self) -> Result<StatusSummary, ApiError> {
        let state: State = self.state()?;
        let report: LedgerReport = verify_ledger(&state);
        Ok(StatusSummary {
            current_stage: state.current_stage,
            tires_by_status: status_counts(&state)
                .into_iter()
                .map(|(status, count)| (status.to_string(), count))
                .collect(),
            active_sets: state.sets.iter().filter(|s| s.is_active()).count(),
            outings: state.outings.len(),
            drifting_tires: report.drifting().count(),
        })
    }
}

fn not_found(entity: &str, id: &str) -> ApiError {
    ApiError::NotFound {
        entity: entity.to_string(),
        id: id.to_string(),
    }
}

fn unexpected(command: &str, outcome: &Outcome) -> ApiError {
    ApiError::Internal {
        message: format!("{command} produced an unexpected outcome: {outcome:?}"),
    }
}
