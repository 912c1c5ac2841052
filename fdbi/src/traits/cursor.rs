//! Cursor trait for forward-only result handles

use crate::error::Result;
use crate::traits::Row;

/// A forward-only result cursor produced by executing a query.
///
/// The only way to learn whether another row exists is to move onto it,
/// so `advance` both checks for a row and positions on it. `row` then
/// exposes the row the cursor sits on until the next `advance`.
pub trait Cursor {
    /// Move to the next row. Returns `false` once the rows are used up.
    fn advance(&mut self) -> Result<bool>;

    /// The current row, if the last `advance` landed on one.
    fn row(&self) -> Option<&dyn Row>;

    /// Release the cursor and the statement execution behind it.
    ///
    /// Calling `close` more than once is allowed.
    fn close(&mut self) -> Result<()>;
}
