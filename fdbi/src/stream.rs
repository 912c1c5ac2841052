//! Asynchronous consumption of query results

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::Stream;
use tracing::debug;

use crate::error::Result;
use crate::query::prepare_bound;
use crate::result_iter::ResultIter;
use crate::statement::Sql;
use crate::traits::{Connection, Cursor, PreparedStatement, Row};

/// The stream handed to a [`stream`] consumer.
pub type RowStream<'a, T> = Pin<&'a mut (dyn Stream<Item = Result<T>> + 'a)>;

/// A [`ResultIter`] exposed as a [`Stream`].
///
/// Every poll reads the next row synchronously and is immediately ready,
/// so rows arrive one at a time in cursor order with nothing buffered.
/// Awaiting between rows lets other tasks on the same thread run; the
/// database calls themselves still block.
pub struct ResultStream<C: Cursor, E> {
    rows: ResultIter<C, E>,
}

impl<C, E, T> ResultStream<C, E>
where
    C: Cursor,
    E: FnMut(&dyn Row) -> Result<T>,
{
    /// Wrap `cursor`, taking ownership of it.
    pub fn new(cursor: C, extractor: E) -> Self {
        Self {
            rows: ResultIter::new(cursor, extractor),
        }
    }

    /// Release the cursor. Calling this again does nothing.
    pub fn close(&mut self) -> Result<()> {
        self.rows.close()
    }
}

// Never pinned structurally: polling only needs `&mut self.rows`.
impl<C: Cursor, E> Unpin for ResultStream<C, E> {}

impl<C, E, T> Stream for ResultStream<C, E>
where
    C: Cursor,
    E: FnMut(&dyn Row) -> Result<T>,
{
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().rows.next())
    }
}

/// Run a query and hand its rows to `consumer` as a [`Stream`].
///
/// The consumer may stop reading at any point. Once its future
/// completes, the cursor is closed and the prepared statement released,
/// however many rows were read.
///
/// ```ignore
/// let words = fdbi::stream(&conn, "SELECT WORD FROM WORDS", |row| row.get(0), |rows| {
///     Box::pin(async move { rows.try_collect::<Vec<String>>().await })
/// })
/// .await?;
/// ```
pub async fn stream<C, S, T, E, F, R>(
    conn: &C,
    sql: &S,
    extractor: E,
    consumer: F,
) -> Result<R>
where
    C: Connection + ?Sized,
    S: Sql + ?Sized,
    E: FnMut(&dyn Row) -> Result<T>,
    F: for<'a> FnOnce(RowStream<'a, T>) -> LocalBoxFuture<'a, Result<R>>,
{
    let mut prepared = prepare_bound(conn, sql)?;
    let mut rows = ResultStream::new(prepared.execute_query()?, extractor);
    // pin the concrete stream before it is unsized to `dyn Stream`
    let pinned = Pin::new(&mut rows);
    let outcome = consumer(pinned).await;
    let closed = rows.close();
    debug!("row stream released");
    let value = outcome?;
    closed?;
    Ok(value)
}
