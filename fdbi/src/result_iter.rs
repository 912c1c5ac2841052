//! Lazy, single-pass iteration over a query cursor

use std::iter::FusedIterator;

use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::traits::{Cursor, Row};

/// What the adapter knows about the row after the one last handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    /// The cursor has not been advanced since the last element was taken.
    Unknown,
    /// The cursor was advanced and sits on a row nobody has taken yet.
    Available,
    /// The cursor reported no more rows, failed, or was closed.
    Exhausted,
}

/// A forward-only sequence of values extracted from a cursor.
///
/// Each element is produced by applying the extractor to the row the
/// cursor sits on. The cursor is advanced at most once per element: the
/// advance happens in [`has_next`](Self::has_next) and its outcome is
/// cached until [`next_value`](Self::next_value) consumes it, so any
/// number of `has_next` calls in between is harmless.
///
/// The cursor is closed when the rows run out, when [`close`](Self::close)
/// is called, or when the iterator is dropped, whichever comes first.
///
/// `ResultIter` is also an [`Iterator`] over `Result<T>`. An extractor
/// error is yielded in place of that row and iteration carries on with the
/// next row; a cursor error is yielded once and ends the iteration.
pub struct ResultIter<C: Cursor, E> {
    cursor: C,
    extractor: E,
    lookahead: Lookahead,
    closed: bool,
}

impl<C, E, T> ResultIter<C, E>
where
    C: Cursor,
    E: FnMut(&dyn Row) -> Result<T>,
{
    /// Wrap `cursor`, taking ownership of it.
    pub fn new(cursor: C, extractor: E) -> Self {
        Self {
            cursor,
            extractor,
            lookahead: Lookahead::Unknown,
            closed: false,
        }
    }

    /// Whether another element is available.
    ///
    /// Advances the cursor only if the previous advance has already been
    /// consumed by `next_value`.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.lookahead == Lookahead::Unknown {
            match self.cursor.advance() {
                Ok(true) => self.lookahead = Lookahead::Available,
                Ok(false) => {
                    trace!("row stream exhausted");
                    self.lookahead = Lookahead::Exhausted;
                    self.close()?;
                }
                Err(e) => {
                    self.lookahead = Lookahead::Exhausted;
                    self.close_quietly();
                    return Err(e);
                }
            }
        }
        Ok(self.lookahead == Lookahead::Available)
    }

    /// Extract the next element.
    ///
    /// Fails with [`Error::Exhausted`] when no element is left.
    pub fn next_value(&mut self) -> Result<T> {
        if !self.has_next()? {
            return Err(Error::Exhausted);
        }
        self.lookahead = Lookahead::Unknown;
        let row = self.cursor.row().ok_or(Error::Exhausted)?;
        (self.extractor)(row)
    }

    /// Release the cursor. Calling this again does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.lookahead = Lookahead::Exhausted;
        trace!("closing row stream");
        self.cursor.close()
    }

    /// Whether the cursor has been released.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn close_quietly(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close cursor");
        }
    }
}

impl<C, E, T> Iterator for ResultIter<C, E>
where
    C: Cursor,
    E: FnMut(&dyn Row) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_value()),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<C, E, T> FusedIterator for ResultIter<C, E>
where
    C: Cursor,
    E: FnMut(&dyn Row) -> Result<T>,
{
}

impl<C: Cursor, E> Drop for ResultIter<C, E> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.cursor.close() {
                warn!(error = %e, "failed to close cursor on drop");
            }
        }
    }
}
