//! SQLite connection implementation

use std::cell::Cell;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{Connection, Parameters, PreparedStatement};
use crate::value::Value;

use super::cursor::SqliteCursor;
use super::types::to_sqlite_value;

/// A SQLite database connection.
///
/// This wraps `rusqlite::Connection` and implements the fdbi `Connection`
/// trait.
///
/// SQLite has no auto-commit switch of its own, so it is emulated: with
/// auto-commit off, a transaction is opened before the first statement
/// that needs one, `commit` and `rollback` end whatever is open, and
/// turning auto-commit back on commits whatever is still open.
///
/// # Example
///
/// ```ignore
/// use fdbi::{Connection, ConnectionExt, SqliteConnection};
///
/// let conn = SqliteConnection::open_in_memory()?;
/// conn.execute_script("CREATE TABLE WORDS (WORD TEXT, COUNT INTEGER)")?;
/// conn.update("INSERT INTO WORDS VALUES ('a', 1)")?;
/// ```
pub struct SqliteConnection {
    inner: rusqlite::Connection,
    auto_commit: Cell<bool>,
}

impl SqliteConnection {
    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_rusqlite(rusqlite::Connection::open_in_memory()?))
    }

    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_rusqlite(rusqlite::Connection::open(path)?))
    }

    /// Wrap an already opened rusqlite connection.
    ///
    /// Auto-commit starts out on if no transaction is open on `inner`.
    pub fn from_rusqlite(inner: rusqlite::Connection) -> Self {
        let auto_commit = Cell::new(inner.is_autocommit());
        Self { inner, auto_commit }
    }

    /// Get a reference to the underlying rusqlite connection.
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.inner
    }

    /// Close the connection, reporting any error SQLite raises.
    ///
    /// A transaction still open at this point is rolled back.
    pub fn close(self) -> Result<()> {
        self.inner.close().map_err(|(_, e)| Error::Sqlite(e))
    }

    fn in_transaction(&self) -> bool {
        !self.inner.is_autocommit()
    }

    /// Open a transaction if auto-commit is off and none is open yet.
    fn begin_if_manual(&self) -> Result<()> {
        if !self.auto_commit.get() && !self.in_transaction() {
            debug!("opening transaction");
            self.inner.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    fn end_transaction(&self, verb: &str) -> Result<()> {
        if self.auto_commit.get() {
            return Err(Error::Transaction(format!(
                "cannot {} while auto-commit is enabled",
                verb.to_lowercase()
            )));
        }
        // the next transaction opens with the next statement
        if self.in_transaction() {
            self.inner.execute_batch(verb)?;
        }
        Ok(())
    }
}

impl Connection for SqliteConnection {
    type Statement<'c> = SqliteStatement<'c>;

    fn prepare(&self, sql: &str) -> Result<Self::Statement<'_>> {
        self.begin_if_manual()?;
        let inner = self.inner.prepare(sql)?;
        Ok(SqliteStatement { inner })
    }

    fn execute_script(&self, sql: &str) -> Result<()> {
        debug!(sql, "executing script");
        self.begin_if_manual()?;
        self.inner.execute_batch(sql)?;
        Ok(())
    }

    fn auto_commit(&self) -> Result<bool> {
        Ok(self.auto_commit.get())
    }

    fn set_auto_commit(&self, enabled: bool) -> Result<()> {
        if enabled == self.auto_commit.get() {
            return Ok(());
        }
        if enabled && self.in_transaction() {
            self.inner.execute_batch("COMMIT")?;
        }
        self.auto_commit.set(enabled);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.end_transaction("COMMIT")
    }

    fn rollback(&self) -> Result<()> {
        self.end_transaction("ROLLBACK")
    }
}

/// A statement prepared on a [`SqliteConnection`].
pub struct SqliteStatement<'c> {
    inner: rusqlite::Statement<'c>,
}

impl SqliteStatement<'_> {
    /// Number of `?` placeholders in the statement.
    pub fn parameter_count(&self) -> usize {
        self.inner.parameter_count()
    }
}

impl Parameters for SqliteStatement<'_> {
    fn set_value(&mut self, index: usize, value: Value) -> Result<()> {
        self.inner
            .raw_bind_parameter(index, to_sqlite_value(value))?;
        Ok(())
    }
}

impl PreparedStatement for SqliteStatement<'_> {
    type Cursor<'s> = SqliteCursor<'s> where Self: 's;

    fn execute_update(&mut self) -> Result<u64> {
        let affected = self.inner.raw_execute()?;
        Ok(affected as u64)
    }

    fn execute_query(&mut self) -> Result<Self::Cursor<'_>> {
        Ok(SqliteCursor::new(self.inner.raw_query()))
    }
}
