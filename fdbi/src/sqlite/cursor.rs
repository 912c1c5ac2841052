//! SQLite cursor and row implementation

use fallible_streaming_iterator::FallibleStreamingIterator;
use rusqlite::{Row as SqliteRow, Rows};

use crate::error::{Error, Result};
use crate::traits::{Cursor, Row};
use crate::value::Value;

use super::types::from_sqlite_value;

/// A forward-only cursor over the rows of an executed SQLite statement.
///
/// Closing drops the underlying [`Rows`], which resets the statement so it
/// can be executed again or finalized.
pub struct SqliteCursor<'s> {
    rows: Option<Rows<'s>>,
}

impl<'s> SqliteCursor<'s> {
    pub(crate) fn new(rows: Rows<'s>) -> Self {
        Self { rows: Some(rows) }
    }
}

impl Cursor for SqliteCursor<'_> {
    fn advance(&mut self) -> Result<bool> {
        match self.rows.as_mut() {
            Some(rows) => {
                rows.advance()?;
                Ok(rows.get().is_some())
            }
            None => Ok(false),
        }
    }

    fn row(&self) -> Option<&dyn Row> {
        let row = self.rows.as_ref()?.get()?;
        Some(row as &dyn Row)
    }

    fn close(&mut self) -> Result<()> {
        self.rows = None;
        Ok(())
    }
}

impl Row for SqliteRow<'_> {
    fn column_count(&self) -> usize {
        self.as_ref().column_count()
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.as_ref()
            .column_index(name)
            .map_err(|_| Error::ColumnNotFound(name.to_string()))
    }

    fn get_value(&self, index: usize) -> Result<Value> {
        from_sqlite_value(self.get_ref(index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RowExt;
    use rusqlite::Connection;

    fn words() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE WORDS (WORD CHAR(20), COUNT INTEGER DEFAULT 0);
             INSERT INTO WORDS VALUES ('a', 1), ('b', 2);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_cursor_walks_rows() {
        let conn = words();
        let mut stmt = conn
            .prepare("SELECT WORD, COUNT FROM WORDS ORDER BY WORD")
            .unwrap();
        let mut cursor = SqliteCursor::new(stmt.raw_query());

        assert!(cursor.row().is_none());
        assert!(cursor.advance().unwrap());
        let row = cursor.row().unwrap();
        assert_eq!(row.column_count(), 2);
        assert_eq!(row.get::<String>(0).unwrap(), "a");
        assert_eq!(row.get_named::<i64>("count").unwrap(), 1);

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.row().unwrap().get::<String>(0).unwrap(), "b");
        assert!(!cursor.advance().unwrap());
        assert!(cursor.row().is_none());
    }

    #[test]
    fn test_closed_cursor_reports_no_rows() {
        let conn = words();
        let mut stmt = conn.prepare("SELECT WORD FROM WORDS").unwrap();
        let mut cursor = SqliteCursor::new(stmt.raw_query());

        cursor.close().unwrap();
        cursor.close().unwrap();
        assert!(!cursor.advance().unwrap());
        assert!(cursor.row().is_none());
    }

    #[test]
    fn test_unknown_column() {
        let conn = words();
        let mut stmt = conn.prepare("SELECT WORD FROM WORDS").unwrap();
        let mut cursor = SqliteCursor::new(stmt.raw_query());
        assert!(cursor.advance().unwrap());

        let err = cursor.row().unwrap().get_named::<String>("MISSING");
        assert!(matches!(err, Err(Error::ColumnNotFound(name)) if name == "MISSING"));
        assert!(cursor.row().unwrap().get_value(5).is_err());
    }
}
