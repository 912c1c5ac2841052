//! Statement execution: updates, batches, queries and finds

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::error::Result;
use crate::result_iter::ResultIter;
use crate::statement::{Binder, Sql};
use crate::stream::{self, RowStream};
use crate::traits::{Connection, PreparedStatement, Row};

/// Prepare `sql` on `conn` and run its binding step.
pub(crate) fn prepare_bound<'c, C, S>(conn: &'c C, sql: &S) -> Result<C::Statement<'c>>
where
    C: Connection + ?Sized,
    S: Sql + ?Sized,
{
    debug!(sql = sql.sql(), "preparing statement");
    let mut prepared = conn.prepare(sql.sql())?;
    sql.bind(&mut prepared)?;
    Ok(prepared)
}

/// Execute an INSERT, UPDATE, DELETE or DDL statement and return the
/// number of rows it affected.
///
/// Driver errors are returned as they are, wrapped in
/// [`Error::Sqlite`](crate::Error::Sqlite).
pub fn update<C, S>(conn: &C, sql: &S) -> Result<u64>
where
    C: Connection + ?Sized,
    S: Sql + ?Sized,
{
    let mut prepared = prepare_bound(conn, sql)?;
    let affected = prepared.execute_update()?;
    debug!(affected, "statement executed");
    Ok(affected)
}

/// Prepare `sql` once and execute it once per binder, in order.
///
/// Returns one affected-row count per binder. An empty `binders` slice
/// returns an empty vector without touching the connection.
///
/// # Example
///
/// ```ignore
/// let rows = ["d", "e"];
/// let binders: Vec<Box<dyn Binder>> = rows
///     .iter()
///     .map(|w| Box::new(move |p: &mut dyn Parameters| p.set(1, *w)) as Box<dyn Binder>)
///     .collect();
/// let refs: Vec<&dyn Binder> = binders.iter().map(|b| b.as_ref()).collect();
/// let counts = update_batch(&conn, "INSERT INTO WORDS (WORD) VALUES (?)", &refs)?;
/// ```
pub fn update_batch<C>(conn: &C, sql: &str, binders: &[&dyn Binder]) -> Result<Vec<u64>>
where
    C: Connection + ?Sized,
{
    if binders.is_empty() {
        return Ok(Vec::new());
    }

    debug!(sql, batch = binders.len(), "preparing batch");
    let mut prepared = conn.prepare(sql)?;
    let mut counts = Vec::with_capacity(binders.len());
    for binder in binders {
        binder.bind(&mut prepared)?;
        counts.push(prepared.execute_update()?);
    }
    Ok(counts)
}

/// Run SQL text holding any number of statements, without parameters.
pub fn execute_script<C: Connection + ?Sized>(conn: &C, sql: &str) -> Result<()> {
    conn.execute_script(sql)
}

/// Run a query and hand the lazily extracted rows to `processor`.
///
/// Rows are read from the cursor only as the processor pulls them. The
/// cursor is closed once the processor returns, whether it read every row,
/// stopped early or failed. An error from the processor takes precedence
/// over an error closing the cursor.
///
/// # Example
///
/// ```ignore
/// let first_two = query(&conn, "SELECT WORD FROM WORDS", |row| row.get::<String>(0), |rows| {
///     rows.take(2).collect::<Result<Vec<_>>>()
/// })?;
/// ```
pub fn query<C, S, T, E, P, R>(conn: &C, sql: &S, extractor: E, processor: P) -> Result<R>
where
    C: Connection + ?Sized,
    S: Sql + ?Sized,
    E: FnMut(&dyn Row) -> Result<T>,
    P: FnOnce(&mut dyn Iterator<Item = Result<T>>) -> Result<R>,
{
    let mut prepared = prepare_bound(conn, sql)?;
    let cursor = prepared.execute_query()?;
    let mut rows = ResultIter::new(cursor, extractor);
    let outcome = processor(&mut rows);
    let closed = rows.close();
    let value = outcome?;
    closed?;
    Ok(value)
}

/// Run a query and collect every extracted row.
///
/// The first extractor error is returned immediately, the rows extracted
/// so far are discarded, and the cursor is closed either way.
pub fn find<C, S, T, E>(conn: &C, sql: &S, extractor: E) -> Result<Vec<T>>
where
    C: Connection + ?Sized,
    S: Sql + ?Sized,
    E: FnMut(&dyn Row) -> Result<T>,
{
    query(conn, sql, extractor, |rows| rows.collect())
}

/// Statement execution as methods on any [`Connection`].
///
/// Scripts go through [`Connection::execute_script`] directly.
///
/// # Example
///
/// ```ignore
/// use fdbi::{Connection, ConnectionExt, RowExt, SqliteConnection};
///
/// let conn = SqliteConnection::open_in_memory()?;
/// conn.execute_script("CREATE TABLE WORDS (WORD TEXT)")?;
/// conn.update("INSERT INTO WORDS VALUES ('a')")?;
/// let words: Vec<String> = conn.find("SELECT WORD FROM WORDS", |row| row.get(0))?;
/// ```
pub trait ConnectionExt: Connection {
    /// See [`update`].
    fn update<S: Sql + ?Sized>(&self, sql: &S) -> Result<u64> {
        update(self, sql)
    }

    /// See [`update_batch`].
    fn update_batch(&self, sql: &str, binders: &[&dyn Binder]) -> Result<Vec<u64>> {
        update_batch(self, sql, binders)
    }

    /// See [`query`].
    fn query<S, T, E, P, R>(&self, sql: &S, extractor: E, processor: P) -> Result<R>
    where
        S: Sql + ?Sized,
        E: FnMut(&dyn Row) -> Result<T>,
        P: FnOnce(&mut dyn Iterator<Item = Result<T>>) -> Result<R>,
    {
        query(self, sql, extractor, processor)
    }

    /// See [`find`].
    fn find<S, T, E>(&self, sql: &S, extractor: E) -> Result<Vec<T>>
    where
        S: Sql + ?Sized,
        E: FnMut(&dyn Row) -> Result<T>,
    {
        find(self, sql, extractor)
    }

    /// See [`stream::stream`].
    fn stream<'a, S, T, E, F, R>(
        &'a self,
        sql: &'a S,
        extractor: E,
        consumer: F,
    ) -> LocalBoxFuture<'a, Result<R>>
    where
        S: Sql + ?Sized,
        T: 'a,
        E: FnMut(&dyn Row) -> Result<T> + 'a,
        F: for<'r> FnOnce(RowStream<'r, T>) -> LocalBoxFuture<'r, Result<R>> + 'a,
        R: 'a,
    {
        Box::pin(stream::stream(self, sql, extractor, consumer))
    }

    /// See [`transaction`](crate::transaction()).
    fn transaction<R, E, F>(&self, block: F) -> std::result::Result<R, E>
    where
        E: From<crate::Error>,
        F: FnOnce(&Self) -> std::result::Result<R, E>,
    {
        crate::transaction::transaction(self, block)
    }
}

impl<C: Connection + ?Sized> ConnectionExt for C {}
