//! Embedded database fixture and SQL script discovery for fdbi tests
//!
//! Each [`EmbeddedDb`] is a fresh private in-memory SQLite database. The
//! scripts of its [`ScriptSet`] run in declaration order: `BeforeEach`
//! scripts when the fixture is created, `AfterEach` scripts when it is
//! dropped.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Once;

use fdbi::{Connection, SqliteConnection};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of discoverable script files, compared case-insensitively.
pub const FILE_EXTENSION: &str = "sql";

/// Migration scripts that create and seed the `WORDS` table.
pub const MIGRATIONS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/db/migrations");

/// Sets up tracing subscriber once per test binary, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        use tracing_subscriber::{
            fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
        };

        let filter_layer = EnvFilter::try_from_default_env().unwrap_or("warn".into());
        let fmt_layer = layer().with_test_writer();

        let _ = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init();
    });
}

/// When a script runs relative to a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Before the test body, when the fixture is created.
    #[default]
    BeforeEach,
    /// After the test body, when the fixture is dropped.
    AfterEach,
}

/// Expand `path` into the SQL scripts it names.
///
/// A file with a `.sql` extension yields itself. A directory yields every
/// `.sql` file beneath it, sorted by path. Anything else yields nothing.
pub fn sql_scripts(path: impl AsRef<Path>) -> Vec<PathBuf> {
    let path = path.as_ref();
    if path.is_file() {
        return if is_sql(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
    }
    if !path.is_dir() {
        return Vec::new();
    }

    let mut scripts: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_sql(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    scripts.sort();
    scripts
}

fn is_sql(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
}

/// Script paths declared for a test, each tagged with a [`Phase`].
#[derive(Debug, Clone, Default)]
pub struct ScriptSet {
    entries: Vec<(Phase, PathBuf)>,
}

impl ScriptSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the scripts under `path` before the test.
    pub fn before(self, path: impl Into<PathBuf>) -> Self {
        self.phase(Phase::BeforeEach, path)
    }

    /// Run the scripts under `path` after the test.
    pub fn after(self, path: impl Into<PathBuf>) -> Self {
        self.phase(Phase::AfterEach, path)
    }

    /// Run the scripts under `path` in `phase`.
    pub fn phase(mut self, phase: Phase, path: impl Into<PathBuf>) -> Self {
        self.entries.push((phase, path.into()));
        self
    }

    /// The scripts for `phase`, in declaration order with each declared
    /// path expanded by [`sql_scripts`].
    pub fn scripts_for(&self, phase: Phase) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|(p, _)| *p == phase)
            .flat_map(|(_, path)| sql_scripts(path))
            .collect()
    }
}

/// A fresh in-memory database provisioned from SQL scripts.
pub struct EmbeddedDb {
    conn: SqliteConnection,
    scripts: ScriptSet,
}

impl EmbeddedDb {
    /// A database with the `WORDS` migrations applied.
    pub fn new() -> fdbi::Result<Self> {
        Self::with_scripts(ScriptSet::new().before(MIGRATIONS))
    }

    /// A database provisioned by `scripts`.
    pub fn with_scripts(scripts: ScriptSet) -> fdbi::Result<Self> {
        setup_tracing();
        let conn = SqliteConnection::open_in_memory()?;
        run_scripts(&conn, &scripts.scripts_for(Phase::BeforeEach))?;
        Ok(Self { conn, scripts })
    }

    /// The underlying connection.
    pub fn connection(&self) -> &SqliteConnection {
        &self.conn
    }
}

fn run_scripts(conn: &SqliteConnection, scripts: &[PathBuf]) -> fdbi::Result<()> {
    for script in scripts {
        debug!(script = %script.display(), "running script");
        let sql = std::fs::read_to_string(script)?;
        conn.execute_script(&sql)?;
    }
    Ok(())
}

impl Deref for EmbeddedDb {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl Drop for EmbeddedDb {
    fn drop(&mut self) {
        let scripts = self.scripts.scripts_for(Phase::AfterEach);
        if let Err(e) = run_scripts(&self.conn, &scripts) {
            warn!(error = %e, "after-each script failed");
        }
    }
}
