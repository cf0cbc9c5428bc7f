// Copyright (C) 2026 The PRF Asset Management Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Project automation for the PRF workspace.
//!
//! - `cargo xtask ci` runs formatting, clippy, build and the `SQLite` tests.
//! - `cargo xtask test-mariadb` starts a throwaway `MariaDB` container and
//!   runs the ignored backend validation tests against it.
//! - `cargo xtask verify-migrations` applies both migration trees and fails
//!   if the resulting schemas differ.
//!
//! Plain `cargo test` never needs Docker.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::thread::sleep;
use std::time::Duration;
use std::{io, process::Output};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

/// Package holding the backend validation tests.
const PERSISTENCE_PACKAGE: &str = "prf-persistence";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
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
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests against `SQLite`
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    VerifyMigrations,
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
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => run_cargo(&["fmt", "--all"]),
            Self::Test => run_cargo(&["test", "--all-targets", "--all-features", "--workspace"]),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    run_cargo(&["build", "--all-targets", "--all-features"])?;
    run_cargo(&["test", "--all-targets", "--all-features", "--workspace"])
}

fn lint() -> Result<()> {
    run_cargo(&["fmt", "--all", "--check"])?;
    lint_clippy()?;
    lint_docs()
}

fn lint_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--tests",
        "--benches",
        "--",
        "-D",
        "warnings",
    ])
}

fn fix_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--tests",
        "--benches",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

fn lint_docs() -> Result<()> {
    let packages: Vec<String> = workspace_packages()?;
    let mut args: Vec<&str> = vec!["doc", "--no-deps", "--all-features"];
    for package in &packages {
        args.push("--package");
        args.push(package);
    }
    cmd("cargo", &args)
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    Ok(())
}

/// Names of the workspace members, excluding this crate.
fn workspace_packages() -> Result<Vec<String>> {
    let metadata = cargo_metadata::MetadataCommand::new()
        .no_deps()
        .exec()
        .wrap_err("failed to read cargo metadata")?;
    Ok(metadata
        .workspace_packages()
        .into_iter()
        .map(|package| package.name.to_string())
        .filter(|name| name != "xtask")
        .collect())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// A throwaway `MariaDB` container, removed on drop.
struct MariaDbContainer {
    name: &'static str,
    port: u16,
}

impl MariaDbContainer {
    const DATABASE: &'static str = "prf_test";
    const USER: &'static str = "prf";
    const PASSWORD: &'static str = "test_password";

    /// Starts the container and waits until it accepts queries.
    fn start(name: &'static str, port: u16) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        Self::remove(name);
        tracing::info!("Starting MariaDB container: {name}");
        cmd!(
            "docker",
            "run",
            "--name",
            name,
            "-e",
            format!("MARIADB_DATABASE={}", Self::DATABASE),
            "-e",
            format!("MARIADB_USER={}", Self::USER),
            "-e",
            format!("MARIADB_PASSWORD={}", Self::PASSWORD),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        let container: Self = Self { name, port };
        container.wait_ready(30)?;
        Ok(container)
    }

    fn wait_ready(&self, attempts: u32) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=attempts {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/{attempts}");
            let probe = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                Self::USER,
                format!("-p{}", Self::PASSWORD),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();
            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within {attempts} seconds"))
    }

    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            Self::USER,
            Self::PASSWORD,
            self.port,
            Self::DATABASE
        )
    }

    fn remove(name: &str) {
        let _ = cmd!("docker", "rm", "--force", name)
            .stdout_null()
            .stderr_null()
            .run();
    }
}

impl Drop for MariaDbContainer {
    fn drop(&mut self) {
        tracing::info!("Removing MariaDB container: {}", self.name);
        Self::remove(self.name);
    }
}

/// Runs the ignored backend validation tests against a `MariaDB` container.
///
/// The container is removed whether or not the tests pass.
fn test_mariadb() -> Result<()> {
    let container: MariaDbContainer = MariaDbContainer::start("prf-test-mariadb", 3307)?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        PERSISTENCE_PACKAGE,
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.database_url())
    .env("PRF_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Applies both migration trees and compares the resulting schemas.
///
/// Tables, column types, nullability, primary keys and foreign keys must
/// match. Index names are backend-specific and not compared.
fn verify_migrations() -> Result<()> {
    let container: MariaDbContainer = MariaDbContainer::start("prf-verify-migrations", 3308)?;

    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite_conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;
    tracing::info!("SQLite migrations applied");

    let mut mysql_conn = MysqlConnection::establish(&container.database_url())
        .wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;
    tracing::info!("MySQL migrations applied");

    let sqlite_schema: Schema = introspect_sqlite(&mut sqlite_conn)?;
    let mysql_schema: Schema = introspect_mysql(&mut mysql_conn)?;

    let problems: Vec<String> = compare_schemas(&sqlite_schema, &mysql_schema);
    if !problems.is_empty() {
        return Err(eyre!(
            "Schema parity check failed:\n{}",
            problems.join("\n")
        ));
    }

    tracing::info!(
        tables = sqlite_schema.tables.len(),
        "Schema parity verification passed"
    );
    Ok(())
}

/// Backend-neutral view of a migrated schema.
#[derive(Debug, Default, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Table {
    /// Column name to (normalized type, nullable).
    columns: BTreeMap<String, (String, bool)>,
    primary_key: BTreeSet<String>,
    /// (column, referenced table, referenced column)
    foreign_keys: BTreeSet<(String, String, String)>,
}

/// Tables the migration harness owns.
const MIGRATION_TABLE: &str = "__diesel_schema_migrations";

fn introspect_sqlite(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        #[diesel(column_name = type_)]
        type_name: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
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

    let names: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;

    let mut schema: Schema = Schema::default();
    for TableName { name } in names {
        if name == MIGRATION_TABLE {
            continue;
        }
        let mut table: Table = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(format!(
            "SELECT name, type AS type_, \"notnull\", pk FROM pragma_table_info('{name}')"
        ))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read columns of {name}"))?;
        for column in columns {
            if column.pk > 0 {
                table.primary_key.insert(column.name.clone());
            }
            // SQLite reports INTEGER PRIMARY KEY columns as nullable.
            let nullable: bool = column.notnull == 0 && column.pk == 0;
            table
                .columns
                .insert(column.name, (normalize_type(&column.type_name), nullable));
        }

        let foreign_keys: Vec<ForeignKeyInfo> = diesel::sql_query(format!(
            "SELECT \"table\", \"from\", \"to\" FROM pragma_foreign_key_list('{name}')"
        ))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read foreign keys of {name}"))?;
        for fk in foreign_keys {
            table.foreign_keys.insert((fk.from, fk.table, fk.to));
        }

        schema.tables.insert(name, table);
    }
    Ok(schema)
}

fn introspect_mysql(conn: &mut MysqlConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        table_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table: String,
        #[diesel(sql_type = Text)]
        referenced_column: String,
    }

    let columns: Vec<ColumnInfo> = diesel::sql_query(
        "SELECT TABLE_NAME AS table_name, COLUMN_NAME AS column_name, DATA_TYPE AS data_type, \
         IS_NULLABLE AS is_nullable, COLUMN_KEY AS column_key \
         FROM information_schema.COLUMNS WHERE TABLE_SCHEMA = DATABASE() \
         ORDER BY TABLE_NAME, ORDINAL_POSITION",
    )
    .load(conn)
    .wrap_err("Failed to read MySQL columns")?;

    let mut schema: Schema = Schema::default();
    for column in columns {
        if column.table_name == MIGRATION_TABLE {
            continue;
        }
        let table: &mut Table = schema.tables.entry(column.table_name).or_default();
        if column.column_key == "PRI" {
            table.primary_key.insert(column.column_name.clone());
        }
        table.columns.insert(
            column.column_name,
            (normalize_type(&column.data_type), column.is_nullable == "YES"),
        );
    }

    let foreign_keys: Vec<ForeignKeyInfo> = diesel::sql_query(
        "SELECT TABLE_NAME AS table_name, COLUMN_NAME AS column_name, \
         REFERENCED_TABLE_NAME AS referenced_table, REFERENCED_COLUMN_NAME AS referenced_column \
         FROM information_schema.KEY_COLUMN_USAGE \
         WHERE TABLE_SCHEMA = DATABASE() AND REFERENCED_TABLE_NAME IS NOT NULL",
    )
    .load(conn)
    .wrap_err("Failed to read MySQL foreign keys")?;
    for fk in foreign_keys {
        if let Some(table) = schema.tables.get_mut(&fk.table_name) {
            table
                .foreign_keys
                .insert((fk.column_name, fk.referenced_table, fk.referenced_column));
        }
    }
    Ok(schema)
}

/// Maps a backend column type onto `integer`, `real`, `blob` or `text`.
///
/// `SQLite` and `MySQL` spell the same storage classes many ways; the
/// migrations only need to agree on the class.
fn normalize_type(declared: &str) -> String {
    let upper: String = declared.to_uppercase();
    let class: &str = if upper.contains("INT") || upper == "BOOLEAN" || upper == "BOOL" {
        "integer"
    } else if ["REAL", "FLOA", "DOUB", "DECIMAL", "NUMERIC"]
        .iter()
        .any(|t| upper.contains(t))
    {
        "real"
    } else if upper.contains("BLOB") || upper.contains("BINARY") {
        "blob"
    } else {
        "text"
    };
    class.to_string()
}

/// Lists every difference between the two schemas.
fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Vec<String> {
    let mut problems: Vec<String> = Vec::new();

    for name in sqlite.tables.keys() {
        if !mysql.tables.contains_key(name) {
            problems.push(format!("  - table '{name}' exists only in SQLite"));
        }
    }
    for name in mysql.tables.keys() {
        if !sqlite.tables.contains_key(name) {
            problems.push(format!("  - table '{name}' exists only in MySQL"));
        }
    }

    for (name, lite) in &sqlite.tables {
        let Some(my) = mysql.tables.get(name) else {
            continue;
        };
        let columns: BTreeSet<&String> = lite.columns.keys().chain(my.columns.keys()).collect();
        for column in columns {
            match (lite.columns.get(column), my.columns.get(column)) {
                (Some(a), Some(b)) if a != b => problems.push(format!(
                    "  - {name}.{column}: SQLite {a:?} vs MySQL {b:?} (type, nullable)"
                )),
                (Some(_), None) => {
                    problems.push(format!("  - {name}.{column} exists only in SQLite"));
                }
                (None, Some(_)) => {
                    problems.push(format!("  - {name}.{column} exists only in MySQL"));
                }
                _ => {}
            }
        }
        if lite.primary_key != my.primary_key {
            problems.push(format!(
                "  - {name}: primary key SQLite {:?} vs MySQL {:?}",
                lite.primary_key, my.primary_key
            ));
        }
        if lite.foreign_keys != my.foreign_keys {
            problems.push(format!(
                "  - {name}: foreign keys SQLite {:?} vs MySQL {:?}",
                lite.foreign_keys, my.foreign_keys
            ));
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
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
