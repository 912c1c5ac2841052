//! SQLite implementation for fdbi

mod connection;
mod cursor;
mod types;

pub use connection::{SqliteConnection, SqliteStatement};
pub use cursor::SqliteCursor;
