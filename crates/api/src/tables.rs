// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flat CSV tables for spreadsheet interchange.
//!
//! Three tables leave the ledger: `tires`, `ledger` (one row per ledger line
//! with its outing's fields repeated) and `measurements`. Importing them
//! replaces tires, sets, outings, ledger lines and measurements in one
//! transaction. Tracks, cars and the season stay as they are.
//!
//! ## Import rules
//!
//! - Header names are matched after trimming and lowercasing; every column
//!   of the table must be present.
//! - Tracks and cars named by a row must already be registered.
//! - `mounted` and `in_use` tires come back as `available`, since no set is
//!   active after an import. Every set referenced by an outing is rebuilt as a
//!   disassembled set from that outing's ledger lines.
//! - Measurement conditions and actions are recomputed from the readings.

use crate::error::ApiError;
use crate::ledger::TireLedger;
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use tire_ledger::{CoreError, State};
use tire_ledger_domain::{
    DepthReadings, DomainError, IdGenerator, Measurement, Outing, SeasonPolicy, SetStatus, Tire,
    TireCategory, TireSet, TireStatus, UsageEntry, WheelPosition, evaluate_measurement,
    format_date, parse_date, validate_tire,
};
use tracing::{info, warn};

/// File name of the tire registry table.
pub const TIRES_FILE: &str = "tires.csv";
/// File name of the ledger table.
pub const LEDGER_FILE: &str = "ledger.csv";
/// File name of the measurements table.
pub const MEASUREMENTS_FILE: &str = "measurements.csv";

/// Failures reading or writing a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// A table could not be parsed.
    #[error("Failed to read the {table} table: {source}")]
    Read {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent.
    #[error("The {table} table has no '{column}' column")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A table could not be written.
    #[error("Failed to write the {table} table: {source}")]
    Write {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A file or directory could not be opened.
    #[error("Failed to open {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },
}

/// A row type with a fixed set of columns.
trait Table: Serialize + DeserializeOwned {
    const NAME: &'static str;
    const COLUMNS: &'static [&'static str];
}

/// One row of the tire registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TireRow {
    pub tire_id: String,
    pub category: String,
    pub car: Option<String>,
    pub barcode: Option<String>,
    pub registered_on: String,
    pub distance_limit: i64,
    pub accumulated_distance: f64,
    pub initial_depth: Option<f64>,
    pub registered_stage: u8,
    pub current_stage: u8,
    pub status: String,
    pub notes: String,
}

impl Table for TireRow {
    const NAME: &'static str = "tires";
    const COLUMNS: &'static [&'static str] = &[
        "tire_id",
        "category",
        "car",
        "barcode",
        "registered_on",
        "distance_limit",
        "accumulated_distance",
        "initial_depth",
        "registered_stage",
        "current_stage",
        "status",
        "notes",
    ];
}

impl From<&Tire> for TireRow {
    fn from(tire: &Tire) -> Self {
        Self {
            tire_id: tire.tire_id.clone(),
            category: tire.category.as_str().to_string(),
            car: tire.car.clone(),
            barcode: tire.barcode.clone(),
            registered_on: format_date(tire.registered_on),
            distance_limit: tire.distance_limit,
            accumulated_distance: tire.accumulated_distance,
            initial_depth: tire.initial_depth,
            registered_stage: tire.registered_stage,
            current_stage: tire.current_stage,
            status: tire.status.as_str().to_string(),
            notes: tire.notes.clone(),
        }
    }
}

impl TryFrom<&TireRow> for Tire {
    type Error = DomainError;

    fn try_from(row: &TireRow) -> Result<Self, Self::Error> {
        let status: TireStatus = match row.status.parse::<TireStatus>()? {
            TireStatus::Mounted | TireStatus::InUse => TireStatus::Available,
            other => other,
        };
        Ok(Self {
            tire_id: row.tire_id.clone(),
            category: row.category.parse()?,
            car: row.car.clone(),
            barcode: row.barcode.clone(),
            registered_on: parse_date(&row.registered_on)?,
            distance_limit: row.distance_limit,
            accumulated_distance: row.accumulated_distance,
            initial_depth: row.initial_depth,
            registered_stage: row.registered_stage,
            current_stage: row.current_stage,
            status,
            notes: row.notes.clone(),
        })
    }
}

/// One ledger line together with the fields of its outing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub outing_id: i64,
    pub date: String,
    pub track_id: String,
    pub set_id: String,
    pub session_type: String,
    pub condition: String,
    pub laps: i64,
    pub distance: f64,
    pub notes: String,
    pub tire_id: String,
    pub position: String,
    pub distance_before: f64,
    pub distance_after: f64,
}

impl Table for LedgerRow {
    const NAME: &'static str = "ledger";
    const COLUMNS: &'static [&'static str] = &[
        "outing_id",
        "date",
        "track_id",
        "set_id",
        "session_type",
        "condition",
        "laps",
        "distance",
        "notes",
        "tire_id",
        "position",
        "distance_before",
        "distance_after",
    ];
}

impl LedgerRow {
    fn new(outing: &Outing, entry: &UsageEntry) -> Self {
        Self {
            outing_id: entry.outing_id,
            date: format_date(outing.date),
            track_id: outing.track_id.clone(),
            set_id: outing.set_id.clone(),
            session_type: outing.session_type.as_str().to_string(),
            condition: outing.condition.as_str().to_string(),
            laps: outing.laps,
            distance: outing.distance,
            notes: outing.notes.clone(),
            tire_id: entry.tire_id.clone(),
            position: entry.position.as_str().to_string(),
            distance_before: entry.distance_before,
            distance_after: entry.distance_after,
        }
    }

    fn outing(&self) -> Result<Outing, DomainError> {
        if self.laps <= 0 {
            return Err(DomainError::InvalidLapCount { laps: self.laps });
        }
        Ok(Outing {
            outing_id: Some(self.outing_id),
            date: parse_date(&self.date)?,
            track_id: self.track_id.clone(),
            set_id: self.set_id.clone(),
            session_type: self.session_type.parse()?,
            condition: self.condition.parse()?,
            laps: self.laps,
            distance: self.distance,
            notes: self.notes.clone(),
        })
    }

    fn entry(&self) -> Result<UsageEntry, DomainError> {
        Ok(UsageEntry {
            entry_id: None,
            tire_id: self.tire_id.clone(),
            outing_id: self.outing_id,
            position: self.position.parse()?,
            distance_before: self.distance_before,
            distance_after: self.distance_after,
        })
    }
}

/// One tread depth measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRow {
    pub tire_id: String,
    pub date: String,
    pub stage: u8,
    pub inner: f64,
    pub centre_inner: f64,
    pub centre_outer: f64,
    pub outer: f64,
    pub average_depth: f64,
    pub distance: f64,
    pub depth_condition: String,
    pub distance_condition: String,
    pub action: String,
    pub notes: String,
}

impl Table for MeasurementRow {
    const NAME: &'static str = "measurements";
    const COLUMNS: &'static [&'static str] = &[
        "tire_id",
        "date",
        "stage",
        "inner",
        "centre_inner",
        "centre_outer",
        "outer",
        "average_depth",
        "distance",
        "depth_condition",
        "distance_condition",
        "action",
        "notes",
    ];
}

impl From<&Measurement> for MeasurementRow {
    fn from(m: &Measurement) -> Self {
        Self {
            tire_id: m.tire_id.clone(),
            date: format_date(m.date),
            stage: m.stage,
            inner: m.readings.inner,
            centre_inner: m.readings.centre_inner,
            centre_outer: m.readings.centre_outer,
            outer: m.readings.outer,
            average_depth: m.average_depth,
            distance: m.distance,
            depth_condition: m.depth_condition.as_str().to_string(),
            distance_condition: m.distance_condition.as_str().to_string(),
            action: m.action.as_str().to_string(),
            notes: m.notes.clone(),
        }
    }
}

impl MeasurementRow {
    fn measurement(&self, state: &State, policy: &SeasonPolicy) -> Result<Measurement, CoreError> {
        let tire: &Tire = state.tire(&self.tire_id).ok_or_else(|| CoreError::NotFound {
            entity: "tire",
            id: self.tire_id.clone(),
        })?;
        policy.validate_stage(self.stage)?;
        let readings: DepthReadings = DepthReadings {
            inner: self.inner,
            centre_inner: self.centre_inner,
            centre_outer: self.centre_outer,
            outer: self.outer,
        };
        Ok(evaluate_measurement(
            &self.tire_id,
            parse_date(&self.date)?,
            self.stage,
            readings,
            self.distance,
            tire.distance_limit,
            policy.limit_floor_km,
            &self.notes,
        )?)
    }
}

/// The three interchange tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatTables {
    pub tires: Vec<TireRow>,
    pub ledger: Vec<LedgerRow>,
    pub measurements: Vec<MeasurementRow>,
}

impl FlatTables {
    /// Flattens the registry and ledger of a state.
    #[must_use]
    pub fn from_state(state: &State) -> Self {
        let tires: Vec<TireRow> = state.tires.iter().map(TireRow::from).collect();

        let mut outings: Vec<&Outing> = state.outings.iter().collect();
        outings.sort_by_key(|o| o.outing_id);
        let mut ledger: Vec<LedgerRow> = Vec::new();
        for outing in outings {
            let Some(outing_id) = outing.outing_id else {
                continue;
            };
            let mut entries: Vec<&UsageEntry> = state.entries_for(outing_id).collect();
            entries.sort_by_key(|e| e.position);
            ledger.extend(entries.into_iter().map(|e| LedgerRow::new(outing, e)));
        }

        let measurements: Vec<MeasurementRow> =
            state.measurements.iter().map(MeasurementRow::from).collect();

        Self {
            tires,
            ledger,
            measurements,
        }
    }

    /// Writes `tires.csv`, `ledger.csv` and `measurements.csv` into `dir`,
    /// creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be created or written.
    pub fn write_dir(&self, dir: &Path) -> Result<(), TableError> {
        std::fs::create_dir_all(dir).map_err(|source| TableError::Io {
            target: dir.display().to_string(),
            source,
        })?;
        write_table(create(&dir.join(TIRES_FILE))?, &self.tires)?;
        write_table(create(&dir.join(LEDGER_FILE))?, &self.ledger)?;
        write_table(create(&dir.join(MEASUREMENTS_FILE))?, &self.measurements)?;
        Ok(())
    }

    /// Reads the three tables from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing or malformed.
    pub fn read_dir(dir: &Path) -> Result<Self, TableError> {
        Ok(Self {
            tires: read_table(open(&dir.join(TIRES_FILE))?)?,
            ledger: read_table(open(&dir.join(LEDGER_FILE))?)?,
            measurements: read_table(open(&dir.join(MEASUREMENTS_FILE))?)?,
        })
    }

    /// Reads the three tables from in-memory readers.
    ///
    /// # Errors
    ///
    /// Returns an error if a table is malformed or lacks a column.
    pub fn read_from<R: io::Read>(
        tires: R,
        ledger: R,
        measurements: R,
    ) -> Result<Self, TableError> {
        Ok(Self {
            tires: read_table(tires)?,
            ledger: read_table(ledger)?,
            measurements: read_table(measurements)?,
        })
    }

    /// Builds the state that replaces `current`'s inventory.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for unknown tracks, cars or tires,
    /// `CoreError::DuplicateKey` for repeated tires or ledger lines, and a
    /// domain violation for any value that does not parse or validate.
    pub fn build_state(&self, current: &State, policy: &SeasonPolicy) -> Result<State, CoreError> {
        let mut state: State = current.clone();
        state.tires = Vec::new();
        state.sets = Vec::new();
        state.outings = Vec::new();
        state.ledger = Vec::new();
        state.measurements = Vec::new();

        for row in &self.tires {
            let tire: Tire = Tire::try_from(row)?;
            validate_tire(&tire)?;
            policy.validate_stage(tire.registered_stage)?;
            policy.validate_stage(tire.current_stage)?;
            if state.tire(&tire.tire_id).is_some() {
                return Err(CoreError::DuplicateKey {
                    entity: "tire",
                    id: tire.tire_id,
                });
            }
            if let Some(car) = tire.car.as_deref()
                && current.car(car).is_none()
            {
                return Err(CoreError::NotFound {
                    entity: "car",
                    id: car.to_string(),
                });
            }
            state.tires.push(tire);
        }

        let mut outings: BTreeMap<i64, Outing> = BTreeMap::new();
        for row in &self.ledger {
            let outing: Outing = row.outing()?;
            if current.track(&outing.track_id).is_none() {
                return Err(CoreError::NotFound {
                    entity: "track",
                    id: outing.track_id,
                });
            }
            if state.tire(&row.tire_id).is_none() {
                return Err(CoreError::NotFound {
                    entity: "tire",
                    id: row.tire_id.clone(),
                });
            }
            if let Some(existing) = outings.get(&row.outing_id) {
                if *existing != outing {
                    return Err(CoreError::InvalidState {
                        entity: "outing",
                        id: row.outing_id.to_string(),
                        reason: "ledger rows disagree on the outing's fields".to_string(),
                    });
                }
            } else {
                outings.insert(row.outing_id, outing);
            }

            let entry: UsageEntry = row.entry()?;
            if state
                .ledger
                .iter()
                .any(|e| e.outing_id == entry.outing_id && e.tire_id == entry.tire_id)
            {
                return Err(CoreError::DuplicateKey {
                    entity: "ledger line",
                    id: format!("{}/{}", entry.outing_id, entry.tire_id),
                });
            }
            state.ledger.push(entry);
        }
        state.outings = outings.into_values().collect();
        state.sets = historical_sets(&state);
        if let Some(highest) = state.outings.iter().filter_map(|o| o.outing_id).max() {
            state.last_outing_id = state.last_outing_id.max(highest);
        }

        for row in &self.measurements {
            let measurement: Measurement = row.measurement(&state, policy)?;
            state.measurements.push(measurement);
        }

        Ok(state)
    }
}

/// Rebuilds, as disassembled sets, every set an outing refers to.
///
/// Slots come from the ledger positions of the set's outings; the first tire
/// seen in a position keeps it.
fn historical_sets(state: &State) -> Vec<TireSet> {
    let mut sets: BTreeMap<String, TireSet> = BTreeMap::new();
    let mut outings: Vec<&Outing> = state.outings.iter().collect();
    outings.sort_by_key(|o| (o.date, o.outing_id));

    for outing in outings {
        let Some(outing_id) = outing.outing_id else {
            continue;
        };
        let mut entries: Vec<&UsageEntry> = state.entries_for(outing_id).collect();
        entries.sort_by_key(|e| e.position);

        let set: &mut TireSet = sets.entry(outing.set_id.clone()).or_insert_with(|| {
            let category: TireCategory = entries
                .first()
                .and_then(|e| state.tire(&e.tire_id))
                .map(|t| t.category)
                .unwrap_or_default();
            TireSet {
                set_id: outing.set_id.clone(),
                name: outing.set_id.clone(),
                category,
                car: None,
                track_id: Some(outing.track_id.clone()),
                assembled_on: outing.date,
                status: SetStatus::Disassembled,
                slots: [None, None, None, None],
            }
        });
        for entry in entries {
            let position: WheelPosition = entry.position;
            if set.tire_at(position).is_none() && !set.holds(&entry.tire_id) {
                set.slots[position.index()] = Some(entry.tire_id.clone());
            }
        }
    }
    sets.into_values().collect()
}

fn create(path: &Path) -> Result<File, TableError> {
    File::create(path).map_err(|source| TableError::Io {
        target: path.display().to_string(),
        source,
    })
}

fn open(path: &Path) -> Result<File, TableError> {
    File::open(path).map_err(|source| TableError::Io {
        target: path.display().to_string(),
        source,
    })
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '-'], "_")
}

fn write_table<T: Table, W: io::Write>(writer: W, rows: &[T]) -> Result<(), TableError> {
    let mut writer: csv::Writer<W> = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    let write_err = |source: csv::Error| TableError::Write {
        table: T::NAME,
        source,
    };
    writer.write_record(T::COLUMNS).map_err(write_err)?;
    for row in rows {
        writer.serialize(row).map_err(write_err)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        target: T::NAME.to_string(),
        source,
    })
}

fn read_table<T: Table, R: io::Read>(reader: R) -> Result<Vec<T>, TableError> {
    let read_err = |source: csv::Error| TableError::Read {
        table: T::NAME,
        source,
    };
    let mut reader: csv::Reader<R> = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: StringRecord = reader.headers().map_err(read_err)?.clone();
    let normalized: StringRecord = headers.iter().map(normalize_header).collect();
    for &column in T::COLUMNS {
        if !normalized.iter().any(|h| h == column) {
            return Err(TableError::MissingColumn {
                table: T::NAME,
                column,
            });
        }
    }
    reader.set_headers(normalized);

    let rows: Vec<T> = reader
        .deserialize::<T>()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(read_err)?;
    Ok(rows)
}

impl<G: IdGenerator> TireLedger<G> {
    /// Flattens the committed registry and ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn export_tables(&mut self) -> Result<FlatTables, ApiError> {
        let state: State = self.state()?;
        Ok(FlatTables::from_state(&state))
    }

    /// Replaces tires, sets, outings, ledger lines and measurements with the
    /// contents of `tables`, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if a row names an unregistered track,
    /// car or tire, and `ApiError::Validation` for malformed values. Nothing
    /// is replaced in either case.
    pub fn import_tables(&mut self, tables: &FlatTables) -> Result<State, ApiError> {
        let policy: SeasonPolicy = *self.policy();
        let mut dissolved: usize = 0;
        let state: State = self.persistence_mut().replace_inventory_with(|current| {
            dissolved = current.sets.iter().filter(|s| s.is_active()).count();
            tables.build_state(current, &policy)
        })?;
        let released: usize = tables
            .tires
            .iter()
            .filter(|row| row.status == "mounted" || row.status == "in_use")
            .count();
        if dissolved > 0 || released > 0 {
            warn!(
                dissolved_sets = dissolved,
                released_tires = released,
                "Import dissolved active sets; their tires are available again"
            );
        }
        info!(
            tires = state.tires.len(),
            outings = state.outings.len(),
            measurements = state.measurements.len(),
            "Imported tables"
        );
        Ok(state)
    }
}
