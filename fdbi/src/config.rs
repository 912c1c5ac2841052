//! Connection configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::sqlite::SqliteConnection;

/// Where and how to open a database.
///
/// Missing fields take their defaults when deserialized, so `{}` is a
/// private in-memory database.
///
/// # Example
///
/// ```ignore
/// use fdbi::DbConfig;
///
/// let conn = DbConfig::file("words.db")
///     .busy_timeout(Duration::from_secs(5))
///     .foreign_keys(true)
///     .connect()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Database file. `None` opens a private in-memory database.
    pub path: Option<PathBuf>,
    /// Open without write access.
    pub read_only: bool,
    /// Create the file if it does not exist.
    pub create: bool,
    /// How long to wait on a locked database, in milliseconds.
    pub busy_timeout_ms: Option<u64>,
    /// Enforce foreign key constraints.
    pub foreign_keys: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: None,
            read_only: false,
            create: true,
            busy_timeout_ms: None,
            foreign_keys: false,
        }
    }
}

impl DbConfig {
    /// A private in-memory database.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// The database file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Open without write access.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Create the file if it does not exist.
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Wait up to `timeout` on a locked database.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        // saturate instead of wrapping for timeouts past u64 milliseconds
        self.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Enforce foreign key constraints.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// The configuration as a SQLite `file:` URI.
    pub fn url(&self) -> String {
        match &self.path {
            None => "file::memory:".to_string(),
            Some(path) if self.read_only => format!("file:{}?mode=ro", path.display()),
            Some(path) => format!("file:{}", path.display()),
        }
    }

    fn flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }

    /// Open a connection as configured.
    pub fn connect(&self) -> Result<SqliteConnection> {
        debug!(url = %self.url(), "opening database");
        let inner = match &self.path {
            None if self.read_only => {
                return Err(Error::Config(
                    "an in-memory database cannot be read-only".to_string(),
                ))
            }
            None => rusqlite::Connection::open_in_memory_with_flags(self.flags())?,
            Some(path) => rusqlite::Connection::open_with_flags(path, self.flags())?,
        };

        if let Some(ms) = self.busy_timeout_ms {
            // SQLite takes the timeout as a C int
            let ms = ms.min(i32::MAX as u64);
            inner.busy_timeout(Duration::from_millis(ms))?;
        }
        if self.foreign_keys {
            inner.pragma_update(None, "foreign_keys", true)?;
        }
        Ok(SqliteConnection::from_rusqlite(inner))
    }
}
