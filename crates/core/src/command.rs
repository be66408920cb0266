// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use tire_ledger_domain::{
    Car, DepthReadings, SessionType, SetSlots, Tire, TireCategory, TireStatus, Track,
    TrackCondition,
};

/// The accounting fields of an outing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutingInput {
    pub date: Date,
    pub track_id: String,
    pub set_id: String,
    pub session_type: SessionType,
    pub condition: TrackCondition,
    pub laps: i64,
    pub notes: String,
}

/// A purchase of new tires in the open stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseInput {
    pub stage: u8,
    pub car: String,
    pub count: u32,
    pub category: TireCategory,
    /// Defaults to `P<stage>`.
    pub prefix: Option<String>,
    /// Defaults to one past the number already purchased in the stage.
    pub start_number: Option<u32>,
    pub distance_limit: i64,
    pub initial_depth: Option<f64>,
    pub date: Date,
}

/// A set assembly request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyInput {
    pub name: String,
    pub category: TireCategory,
    pub car: Option<String>,
    pub track_id: Option<String>,
    pub slots: SetSlots,
    pub date: Date,
}

/// A command represents operator intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RegisterTrack(Track),
    /// Administrative correction of a track.
    UpdateTrack(Track),
    /// Registers the reference circuits that are not yet present.
    SeedDefaultTracks,
    RegisterCar(Car),
    SetCarActive {
        name: String,
        active: bool,
    },
    /// Administrative registration outside the purchase flow.
    RegisterTire(Tire),
    SetTireStatus {
        tire_id: String,
        status: TireStatus,
    },
    DiscardTire {
        tire_id: String,
    },
    PurchaseTires(PurchaseInput),
    AssembleSet(AssemblyInput),
    DisassembleSet {
        set_id: String,
    },
    RecordOuting(OutingInput),
    /// Edits the non-accounting fields of an outing in place.
    UpdateOuting {
        outing_id: i64,
        notes: String,
        session_type: SessionType,
        condition: TrackCondition,
    },
    /// Removes an outing and its ledger lines without touching tire distances.
    DeleteOuting {
        outing_id: i64,
    },
    /// Deletes an outing, records its replacement and recomputes every tire.
    ReplaceOuting {
        outing_id: i64,
        input: OutingInput,
    },
    RecordMeasurement {
        tire_id: String,
        date: Date,
        readings: DepthReadings,
        notes: String,
    },
    /// Closes the open stage, carrying the selected tires forward.
    AdvanceStage {
        selected: Vec<String>,
        end_date: Date,
    },
    RecomputeAll,
}

impl Command {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RegisterTrack(_) => "RegisterTrack",
            Self::UpdateTrack(_) => "UpdateTrack",
            Self::SeedDefaultTracks => "SeedDefaultTracks",
            Self::RegisterCar(_) => "RegisterCar",
            Self::SetCarActive { .. } => "SetCarActive",
            Self::RegisterTire(_) => "RegisterTire",
            Self::SetTireStatus { .. } => "SetTireStatus",
            Self::DiscardTire { .. } => "DiscardTire",
            Self::PurchaseTires(_) => "PurchaseTires",
            Self::AssembleSet(_) => "AssembleSet",
            Self::DisassembleSet { .. } => "DisassembleSet",
            Self::RecordOuting(_) => "RecordOuting",
            Self::UpdateOuting { .. } => "UpdateOuting",
            Self::DeleteOuting { .. } => "DeleteOuting",
            Self::ReplaceOuting { .. } => "ReplaceOuting",
            Self::RecordMeasurement { .. } => "RecordMeasurement",
            Self::AdvanceStage { .. } => "AdvanceStage",
            Self::RecomputeAll => "RecomputeAll",
        }
    }
}
