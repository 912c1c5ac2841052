//! Connection, prepared statement and parameter traits

use crate::error::Result;
use crate::traits::{Cursor, ToValue};
use crate::value::Value;

/// Positional parameters of a prepared statement.
///
/// Indexes are 1-based and follow the order of the `?` placeholders in
/// the SQL text. Binders receive this as `&mut dyn Parameters`.
pub trait Parameters {
    /// Bind `value` to the placeholder at `index`.
    fn set_value(&mut self, index: usize, value: Value) -> Result<()>;
}

/// Extension trait for typed binding.
pub trait ParametersExt: Parameters {
    /// Bind any [`ToValue`] to the placeholder at `index`.
    fn set<T: ToValue>(&mut self, index: usize, value: T) -> Result<()> {
        self.set_value(index, value.to_value())
    }

    /// Bind SQL NULL to the placeholder at `index`.
    fn set_null(&mut self, index: usize) -> Result<()> {
        self.set_value(index, Value::Null)
    }
}

impl<P: Parameters + ?Sized> ParametersExt for P {}

/// A statement prepared on a connection, ready to be bound and executed.
pub trait PreparedStatement: Parameters {
    /// The cursor type returned by [`execute_query`](Self::execute_query).
    type Cursor<'s>: Cursor
    where
        Self: 's;

    /// Execute a statement that changes the database, returning the
    /// number of rows affected.
    fn execute_update(&mut self) -> Result<u64>;

    /// Execute a query. The cursor borrows the statement, so the statement
    /// stays prepared until the cursor is dropped.
    fn execute_query(&mut self) -> Result<Self::Cursor<'_>>;
}

/// A database connection.
///
/// This is the seam between fdbi and a concrete driver. Everything in
/// [`ConnectionExt`](crate::ConnectionExt) is written against it.
pub trait Connection {
    /// The prepared statement type for this connection.
    type Statement<'c>: PreparedStatement
    where
        Self: 'c;

    /// Prepare a single SQL statement with `?` placeholders.
    fn prepare(&self, sql: &str) -> Result<Self::Statement<'_>>;

    /// Run SQL text that may hold several statements, without parameters.
    fn execute_script(&self, sql: &str) -> Result<()>;

    /// Whether each statement is committed as soon as it completes.
    fn auto_commit(&self) -> Result<bool>;

    /// Switch auto-commit on or off.
    ///
    /// Switching it on while a transaction is open commits that
    /// transaction.
    fn set_auto_commit(&self, enabled: bool) -> Result<()>;

    /// Commit the work done since auto-commit was switched off or since
    /// the last commit/rollback.
    fn commit(&self) -> Result<()>;

    /// Discard the work done since auto-commit was switched off or since
    /// the last commit/rollback.
    fn rollback(&self) -> Result<()>;
}
