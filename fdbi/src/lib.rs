//! fdbi - Functional Database Interface
//!
//! Thin functional extensions over a SQL client: statements with
//! late-bound parameters, lazy row streams that always release their
//! cursor, and transaction scopes that always restore auto-commit.
//!
//! # Features
//!
//! - **Bound Statements**: [`Statement`] pairs SQL text with a [`Binder`]
//!   closure that runs at every execution, so captured state rebinds
//! - **Lazy Rows**: [`ResultIter`] advances the cursor once per element and
//!   closes it on exhaustion, on `close` or on drop
//! - **Streams**: [`stream()`] hands the same rows to an async consumer
//! - **Transactions**: [`transaction()`] commits on `Ok`, rolls back on
//!   error or panic, and restores auto-commit
//! - **SQLite Backend**: [`SqliteConnection`] over `rusqlite`, configured
//!   through [`DbConfig`]
//!
//! # Example
//!
//! ```ignore
//! use fdbi::{Connection, ConnectionExt, ParametersExt, RowExt, SqliteConnection, Statement};
//!
//! let conn = SqliteConnection::open_in_memory()?;
//! conn.execute_script(
//!     "CREATE TABLE WORDS (WORD CHAR(20), COUNT INTEGER DEFAULT 0);
//!      INSERT INTO WORDS VALUES ('a', 1), ('b', 2), ('c', 10);",
//! )?;
//!
//! let below = Statement::with_binder("SELECT WORD FROM WORDS WHERE COUNT < ?", |p| p.set(1, 5));
//! let words: Vec<String> = conn.find(&below, |row| row.get(0))?;
//! assert_eq!(words, ["a", "b"]);
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod result_iter;
pub mod sqlite;
pub mod statement;
pub mod stream;
pub mod traits;
pub mod transaction;
pub mod value;

// Re-export main types
pub use config::DbConfig;
pub use error::{Error, Result};
pub use query::{execute_script, find, query, update, update_batch, ConnectionExt};
pub use result_iter::ResultIter;
pub use sqlite::{SqliteConnection, SqliteCursor, SqliteStatement};
pub use statement::{Binder, Sql, Statement};
pub use stream::{stream, ResultStream, RowStream};
pub use traits::{
    Connection, Cursor, FromRow, FromValue, Parameters, ParametersExt, PreparedStatement, Row,
    RowExt, ToValue,
};
pub use transaction::transaction;
pub use value::Value;
