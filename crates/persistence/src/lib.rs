// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the tire ledger.
//!
//! Every mutation follows the same shape: open an immediate transaction,
//! load the [`State`] inside it, let [`tire_ledger::apply`] decide the
//! command, write the resulting changes, commit. A rejected command or a
//! failed statement rolls the whole transaction back, so no partial ledger
//! lines or half-assembled sets ever reach the database.
//!
//! ## Testing
//!
//! Tests use shared in-memory databases with a unique name per
//! [`Persistence::new_in_memory`] call. File databases run in WAL mode.

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

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tire_ledger::{Command, CoreError, Outcome, State, TransitionResult, apply};
use tire_ledger_domain::{IdGenerator, SeasonPolicy, Tire, UsageEntry};
use tracing::{info, warn};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Store for the whole inventory, backed by one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Opens a fresh in-memory database.
    ///
    /// Each call gets its own database, so tests never share state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Opens (creating if needed) a database file and migrates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Names of the tables created by the migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be read.
    pub fn table_names(&mut self) -> Result<Vec<String>, PersistenceError> {
        backend::sqlite::table_names(&mut self.conn)
    }

    /// Runs one command in its own transaction and commits its changes.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Rejected` if the rules refuse the command,
    /// or a database error if a statement fails. Nothing is written in
    /// either case.
    pub fn execute<G: IdGenerator>(
        &mut self,
        policy: &SeasonPolicy,
        ids: &G,
        command: Command,
    ) -> Result<TransitionResult, PersistenceError> {
        let name: &'static str = command.name();
        let result: Result<TransitionResult, PersistenceError> =
            self.conn.immediate_transaction(|conn| {
                let state: State = queries::load_state(conn)?;
                let result: TransitionResult = apply(&state, policy, ids, command)?;
                mutations::write_changes(conn, &result.changes)?;
                Ok(result)
            });

        match &result {
            Ok(committed) => {
                info!(
                    command = name,
                    changes = committed.changes.len(),
                    "Committed command"
                );
                if let Outcome::OutingDeleted {
                    outing_id,
                    stale_tires,
                } = &committed.outcome
                    && !stale_tires.is_empty()
                {
                    warn!(
                        outing_id,
                        stale_tires = ?stale_tires,
                        "Tire distances no longer match the ledger until a recompute runs"
                    );
                }
            }
            Err(PersistenceError::Rejected(err)) => {
                info!(command = name, error = %err, "Command rejected");
            }
            Err(err) => warn!(command = name, error = %err, "Command failed"),
        }
        result
    }

    /// Replaces the tire inventory with a state built from the current one.
    ///
    /// `build` runs inside the transaction, so it validates against exactly
    /// the data it replaces.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Rejected` if `build` refuses, or a
    /// database error if a row cannot be written.
    pub fn replace_inventory_with<F>(&mut self, build: F) -> Result<State, PersistenceError>
    where
        F: FnOnce(&State) -> Result<State, CoreError>,
    {
        self.conn.immediate_transaction(|conn| {
            let current: State = queries::load_state(conn)?;
            let replacement: State = build(&current)?;
            mutations::import::replace_inventory(conn, &replacement)?;
            queries::load_state(conn)
        })
    }

    /// Loads the full state.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row is invalid.
    pub fn load_state(&mut self) -> Result<State, PersistenceError> {
        queries::load_state(&mut self.conn)
    }

    /// Looks up one tire.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if the tire
    /// does not exist.
    pub fn get_tire(&mut self, tire_id: &str) -> Result<Option<Tire>, PersistenceError> {
        queries::inventory::get_tire(&mut self.conn, tire_id)
    }

    /// Ledger lines of one tire in outing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn history_for_tire(&mut self, tire_id: &str) -> Result<Vec<UsageEntry>, PersistenceError> {
        queries::ledger::history_for_tire(&mut self.conn, tire_id)
    }

    /// The open stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the season row cannot be read.
    pub fn current_stage(&mut self) -> Result<u8, PersistenceError> {
        queries::season::load_season(&mut self.conn)?.stage()
    }
}
