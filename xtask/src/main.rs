// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask ci` is what CI runs: clippy, rustdoc, formatting, the test
//! suite, and `verify-schema`.
//!
//! `verify-schema` applies the embedded `SQLite` migrations to a fresh
//! in-memory database, checks that every table, column, foreign key and
//! unique constraint the persistence layer relies on exists, then reverts all
//! migrations and checks that nothing is left behind.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{bail, eyre, Context},
    Result,
};
use diesel::sql_types::Text;
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run everything CI runs
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check every target
    #[command(visible_alias = "c")]
    Check,

    /// Run clippy, rustdoc and the formatting check
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build docs for each crate with warnings denied
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Apply formatting
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run the test suite
    #[command(visible_alias = "t")]
    Test,

    /// Apply and revert the migrations against a scratch `SQLite` database
    #[command(visible_alias = "vs")]
    VerifySchema,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(&["build", "--all-targets", "--all-features"]),
            Self::Check => run_cargo(&["check", "--all-targets", "--all-features"]),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => run_cargo(&["fmt", "--all", "--check"]),
            Self::FixFormatting => run_cargo(&["fmt", "--all"]),
            Self::Test => run_cargo(&["test", "--workspace", "--all-targets"]),
            Self::VerifySchema => verify_schema(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    run_cargo(&["test", "--workspace", "--all-targets"])?;
    verify_schema()
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    run_cargo(&["fmt", "--all", "--check"])
}

fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--workspace",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd("cargo", ["doc", "--no-deps", "--package", &package.name])
            .env("RUSTDOCFLAGS", "-D warnings")
            .run_with_trace()?;
    }

    Ok(())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// A table the persistence layer expects, by name.
struct ExpectedTable {
    name: &'static str,
    columns: &'static [&'static str],
    /// `(column, referenced table, referenced column)`
    foreign_keys: &'static [(&'static str, &'static str, &'static str)],
    unique: &'static [&'static [&'static str]],
}

const EXPECTED_TABLES: &[ExpectedTable] = &[
    ExpectedTable {
        name: "tracks",
        columns: &[
            "track_id",
            "name",
            "lap_length_km",
            "layout",
            "direction",
            "characteristics",
            "wear_bias_fl",
            "wear_bias_fr",
            "wear_bias_rl",
            "wear_bias_rr",
        ],
        foreign_keys: &[],
        unique: &[],
    },
    ExpectedTable {
        name: "cars",
        columns: &[
            "name",
            "race_number",
            "driver",
            "category",
            "is_active",
            "registered_on",
        ],
        foreign_keys: &[],
        unique: &[],
    },
    ExpectedTable {
        name: "tires",
        columns: &[
            "tire_id",
            "category",
            "car_name",
            "barcode",
            "registered_on",
            "distance_limit",
            "accumulated_distance",
            "initial_depth",
            "registered_stage",
            "current_stage",
            "status",
            "notes",
        ],
        foreign_keys: &[("car_name", "cars", "name")],
        unique: &[],
    },
    ExpectedTable {
        name: "tire_sets",
        columns: &[
            "set_id",
            "name",
            "category",
            "car_name",
            "track_id",
            "assembled_on",
            "status",
            "tire_fl",
            "tire_fr",
            "tire_rl",
            "tire_rr",
        ],
        foreign_keys: &[
            ("car_name", "cars", "name"),
            ("track_id", "tracks", "track_id"),
            ("tire_fl", "tires", "tire_id"),
            ("tire_fr", "tires", "tire_id"),
            ("tire_rl", "tires", "tire_id"),
            ("tire_rr", "tires", "tire_id"),
        ],
        unique: &[],
    },
    ExpectedTable {
        name: "outings",
        columns: &[
            "outing_id",
            "outing_date",
            "track_id",
            "set_id",
            "session_type",
            "track_condition",
            "laps",
            "distance",
            "notes",
        ],
        foreign_keys: &[
            ("track_id", "tracks", "track_id"),
            ("set_id", "tire_sets", "set_id"),
        ],
        unique: &[],
    },
    ExpectedTable {
        name: "tire_usage_history",
        columns: &[
            "entry_id",
            "tire_id",
            "outing_id",
            "position",
            "distance_before",
            "distance_after",
        ],
        foreign_keys: &[
            ("tire_id", "tires", "tire_id"),
            ("outing_id", "outings", "outing_id"),
        ],
        unique: &[&["outing_id", "tire_id"]],
    },
    ExpectedTable {
        name: "measurements",
        columns: &[
            "measurement_id",
            "tire_id",
            "measured_on",
            "stage",
            "depth_inner",
            "depth_centre_inner",
            "depth_centre_outer",
            "depth_outer",
            "average_depth",
            "distance",
            "depth_condition",
            "distance_condition",
            "action",
            "notes",
        ],
        foreign_keys: &[("tire_id", "tires", "tire_id")],
        unique: &[],
    },
    ExpectedTable {
        name: "season_state",
        columns: &["id", "current_stage", "last_outing_id"],
        foreign_keys: &[],
        unique: &[],
    },
    ExpectedTable {
        name: "stage_records",
        columns: &[
            "stage",
            "start_date",
            "end_date",
            "tires_purchased",
            "retained_json",
            "discarded",
            "status",
        ],
        foreign_keys: &[],
        unique: &[],
    },
];

/// What `PRAGMA` introspection reports for one table.
#[derive(Debug, Default)]
struct TableShape {
    columns: BTreeSet<String>,
    foreign_keys: BTreeSet<(String, String, String)>,
    unique: BTreeSet<Vec<String>>,
}

fn verify_schema() -> Result<()> {
    tracing::info!("Applying migrations to a scratch database");
    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;

    let shapes: BTreeMap<String, TableShape> = introspect(&mut conn)?;
    let problems: Vec<String> = compare(&shapes);
    for problem in &problems {
        tracing::error!("{problem}");
    }
    if !problems.is_empty() {
        bail!("schema verification failed with {} problem(s)", problems.len());
    }
    tracing::info!(tables = shapes.len(), "Schema matches");

    tracing::info!("Reverting all migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    let leftover: Vec<String> = table_names(&mut conn)?;
    if !leftover.is_empty() {
        bail!("tables left after reverting: {}", leftover.join(", "));
    }

    tracing::info!("Migrations apply and revert cleanly");
    Ok(())
}

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

fn table_names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let rows: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to list tables")?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

fn introspect(conn: &mut SqliteConnection) -> Result<BTreeMap<String, TableShape>> {
    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    let mut shapes: BTreeMap<String, TableShape> = BTreeMap::new();
    for table in table_names(conn)? {
        let mut shape = TableShape::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(format!("PRAGMA table_info({table})"))
            .load(conn)
            .wrap_err(format!("Failed to get columns for {table}"))?;
        shape.columns = columns.into_iter().map(|c| c.name).collect();

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({table})"))
                .load(conn)
                .wrap_err(format!("Failed to get foreign keys for {table}"))?;
        shape.foreign_keys = fks.into_iter().map(|fk| (fk.from, fk.table, fk.to)).collect();

        let indexes: Vec<IndexInfo> = diesel::sql_query(format!("PRAGMA index_list({table})"))
            .load(conn)
            .wrap_err(format!("Failed to get indexes for {table}"))?;
        // origin 'u' marks a UNIQUE table constraint
        for index in indexes.into_iter().filter(|i| i.origin == "u") {
            let index_columns: Vec<ColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", index.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get columns of index {}", index.name))?;
            shape
                .unique
                .insert(index_columns.into_iter().map(|c| c.name).collect());
        }

        shapes.insert(table, shape);
    }
    Ok(shapes)
}

fn compare(shapes: &BTreeMap<String, TableShape>) -> Vec<String> {
    let mut problems: Vec<String> = Vec::new();

    let expected_names: BTreeSet<&str> = EXPECTED_TABLES.iter().map(|t| t.name).collect();
    for name in shapes.keys() {
        if !expected_names.contains(name.as_str()) {
            problems.push(format!("unexpected table {name}"));
        }
    }

    for expected in EXPECTED_TABLES {
        let Some(shape) = shapes.get(expected.name) else {
            problems.push(format!("missing table {}", expected.name));
            continue;
        };

        let wanted: BTreeSet<String> = expected.columns.iter().map(ToString::to_string).collect();
        for column in wanted.difference(&shape.columns) {
            problems.push(format!("{}: missing column {column}", expected.name));
        }
        for column in shape.columns.difference(&wanted) {
            problems.push(format!("{}: unexpected column {column}", expected.name));
        }

        for &(from, table, to) in expected.foreign_keys {
            let key = (from.to_string(), table.to_string(), to.to_string());
            if !shape.foreign_keys.contains(&key) {
                problems.push(format!(
                    "{}: missing foreign key {from} -> {table}({to})",
                    expected.name
                ));
            }
        }

        for &columns in expected.unique {
            let key: Vec<String> = columns.iter().map(ToString::to_string).collect();
            if !shape.unique.contains(&key) {
                problems.push(format!(
                    "{}: missing unique constraint ({})",
                    expected.name,
                    columns.join(", ")
                ));
            }
        }
    }

    problems
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
