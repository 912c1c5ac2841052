//! Row access and the FromRow extraction trait

use crate::error::Result;
use crate::traits::FromValue;
use crate::value::Value;

/// The row a cursor is currently positioned on.
///
/// Columns are addressed by 0-based index. Backends implement this for
/// their native row type; extractors receive it as `&dyn Row`.
pub trait Row {
    /// Number of columns in the row.
    fn column_count(&self) -> usize;

    /// Resolve a column name to its index.
    ///
    /// Returns `Error::ColumnNotFound` if no column has that name.
    fn column_index(&self, name: &str) -> Result<usize>;

    /// Get a value from the row by column index as a dynamic Value.
    fn get_value(&self, index: usize) -> Result<Value>;
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value by 0-based column index.
    fn get<T: FromValue>(&self, index: usize) -> Result<T> {
        T::from_value(self.get_value(index)?)
    }

    /// Get a typed value by column name.
    fn get_named<T: FromValue>(&self, name: &str) -> Result<T> {
        let index = self.column_index(name)?;
        self.get(index)
    }
}

impl<R: Row + ?Sized> RowExt for R {}

/// Types that can be extracted from the current row.
///
/// `T::from_row` has the extractor signature, so it can be handed to
/// [`find`](crate::find) and friends directly:
///
/// ```ignore
/// let pairs: Vec<(String, i64)> =
///     fdbi::find(&conn, "SELECT WORD, COUNT FROM WORDS", <(String, i64)>::from_row)?;
/// ```
///
/// Tuples read their elements from consecutive columns starting at 0.
pub trait FromRow: Sized {
    /// Construct an instance of this type from a row.
    fn from_row(row: &dyn Row) -> Result<Self>;
}

macro_rules! tuple_from_row {
    ($($name:ident: $idx:tt),+) => {
        impl<$($name: FromValue),+> FromRow for ($($name,)+) {
            fn from_row(row: &dyn Row) -> Result<Self> {
                Ok(($(row.get::<$name>($idx)?,)+))
            }
        }
    };
}

tuple_from_row!(A: 0);
tuple_from_row!(A: 0, B: 1);
tuple_from_row!(A: 0, B: 1, C: 2);
tuple_from_row!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;

    /// An in-memory row for exercising extractors without a database.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct TestRow {
        pub(crate) columns: Vec<&'static str>,
        pub(crate) values: Vec<Value>,
    }

    impl TestRow {
        pub(crate) fn new(columns: &[&'static str], values: Vec<Value>) -> Self {
            Self {
                columns: columns.to_vec(),
                values,
            }
        }
    }

    impl Row for TestRow {
        fn column_count(&self) -> usize {
            self.values.len()
        }

        fn column_index(&self, name: &str) -> Result<usize> {
            self.columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
        }

        fn get_value(&self, index: usize) -> Result<Value> {
            self.values
                .get(index)
                .cloned()
                .ok_or_else(|| Error::ColumnNotFound(index.to_string()))
        }
    }

    #[test]
    fn test_typed_access_by_index_and_name() {
        let row = TestRow::new(
            &["WORD", "COUNT"],
            vec![Value::String("a".into()), Value::I64(1)],
        );
        assert_eq!(row.get::<String>(0).unwrap(), "a");
        assert_eq!(row.get_named::<i32>("count").unwrap(), 1);
        assert!(matches!(
            row.get_named::<i32>("missing"),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_tuple_from_row() {
        let row = TestRow::new(
            &["WORD", "COUNT", "NOTE"],
            vec![Value::String("c".into()), Value::I64(10), Value::Null],
        );
        let dyn_row: &dyn Row = &row;
        let (word, count, note) = <(String, i64, Option<String>)>::from_row(dyn_row).unwrap();
        assert_eq!((word.as_str(), count, note), ("c", 10, None));
    }
}
