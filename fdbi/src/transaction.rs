//! Transactional scope over a connection's auto-commit flag

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::traits::Connection;

/// Run `block` in a transaction on `conn`.
///
/// Auto-commit is switched off for the duration of the block. If the block
/// returns `Ok`, the work is committed. If the block or the commit fails,
/// the work is rolled back and the original error is returned unchanged.
/// Either way auto-commit is put back the way it was found, and that is the
/// last thing that happens. A panic inside the block rolls back and
/// restores auto-commit as it unwinds.
///
/// The block may return any error type that a fdbi [`Error`] converts
/// into, so `anyhow::Error` and application error enums pass through.
///
/// # Example
///
/// ```ignore
/// use fdbi::{transaction, ConnectionExt};
///
/// transaction(&conn, |conn| {
///     conn.update("INSERT INTO WORDS (WORD) VALUES ('d')")?;
///     conn.update("UPDATE WORDS SET COUNT = COUNT + 1")?;
///     Ok::<_, fdbi::Error>(())
/// })?;
/// ```
pub fn transaction<C, R, E, F>(conn: &C, block: F) -> std::result::Result<R, E>
where
    C: Connection + ?Sized,
    E: From<Error>,
    F: FnOnce(&C) -> std::result::Result<R, E>,
{
    let scope = Scope::begin(conn)?;
    let outcome = block(conn).and_then(|value| {
        conn.commit()?;
        debug!("transaction committed");
        Ok(value)
    });
    match outcome {
        Ok(value) => {
            scope.finish()?;
            Ok(value)
        }
        Err(e) => {
            scope.abort();
            Err(e)
        }
    }
}

/// Restores auto-commit when the transaction ends, rolling back first if
/// it ends without `finish` or `abort` (a panic in the block).
struct Scope<'c, C: Connection + ?Sized> {
    conn: &'c C,
    auto_commit: bool,
    armed: bool,
}

impl<'c, C: Connection + ?Sized> Scope<'c, C> {
    fn begin(conn: &'c C) -> Result<Self> {
        let auto_commit = conn.auto_commit()?;
        conn.set_auto_commit(false)?;
        debug!(auto_commit, "transaction started");
        Ok(Self {
            conn,
            auto_commit,
            armed: true,
        })
    }

    fn finish(mut self) -> Result<()> {
        self.armed = false;
        self.conn.set_auto_commit(self.auto_commit)
    }

    fn abort(mut self) {
        self.armed = false;
        self.rollback_and_restore();
    }

    fn rollback_and_restore(&self) {
        match self.conn.rollback() {
            Ok(()) => debug!("transaction rolled back"),
            Err(e) => warn!(error = %e, "rollback failed"),
        }
        if let Err(e) = self.conn.set_auto_commit(self.auto_commit) {
            warn!(error = %e, "failed to restore auto-commit");
        }
    }
}

impl<C: Connection + ?Sized> Drop for Scope<'_, C> {
    fn drop(&mut self) {
        if self.armed {
            self.rollback_and_restore();
        }
    }
}
