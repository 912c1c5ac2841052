//! Core traits for fdbi

mod connection;
mod cursor;
mod from_value;
mod row;
mod to_value;

pub use connection::{Connection, Parameters, ParametersExt, PreparedStatement};
pub use cursor::Cursor;
pub use from_value::FromValue;
pub(crate) use from_value::{DATETIME_FORMAT, DATE_FORMAT, TIME_FORMAT};
pub use row::{FromRow, Row, RowExt};
pub use to_value::ToValue;

#[cfg(test)]
pub(crate) use row::tests::TestRow;
