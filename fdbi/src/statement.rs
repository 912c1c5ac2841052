//! SQL text paired with a late-bound parameter binder

use std::fmt;

use crate::error::Result;
use crate::traits::Parameters;

/// Fills the placeholders of a prepared statement just before it runs.
///
/// Every closure `Fn(&mut dyn Parameters) -> Result<()>` is a binder, so a
/// binder that captures `Cell`s or other shared state binds whatever that
/// state holds at execution time.
pub trait Binder {
    /// Write parameter values into `params`.
    fn bind(&self, params: &mut dyn Parameters) -> Result<()>;
}

impl<F> Binder for F
where
    F: Fn(&mut dyn Parameters) -> Result<()>,
{
    fn bind(&self, params: &mut dyn Parameters) -> Result<()> {
        self(params)
    }
}

/// Anything that can be executed: SQL text plus an optional binding step.
///
/// Plain strings have nothing to bind. Implement this for your own types
/// to compute parameters from their state each time they are executed:
///
/// ```ignore
/// struct CountBelow(Cell<i64>);
///
/// impl Sql for CountBelow {
///     fn sql(&self) -> &str {
///         "SELECT WORD FROM WORDS WHERE COUNT < ?"
///     }
///
///     fn bind(&self, params: &mut dyn Parameters) -> fdbi::Result<()> {
///         params.set(1, self.0.get())
///     }
/// }
/// ```
pub trait Sql {
    /// The SQL text, with `?` placeholders.
    fn sql(&self) -> &str;

    /// Bind parameters on the prepared statement. Does nothing by default.
    fn bind(&self, _params: &mut dyn Parameters) -> Result<()> {
        Ok(())
    }
}

impl Sql for str {
    fn sql(&self) -> &str {
        self
    }
}

impl Sql for String {
    fn sql(&self) -> &str {
        self.as_str()
    }
}

/// SQL text with an optional [`Binder`].
///
/// The text never changes after construction. A `Statement` holds no
/// database resources, so it can be executed any number of times.
///
/// # Example
///
/// ```ignore
/// use fdbi::{ConnectionExt, ParametersExt, Statement};
///
/// let word = Cell::new("a");
/// let stmt = Statement::with_binder("SELECT COUNT FROM WORDS WHERE WORD = ?", |p| {
///     p.set(1, word.get())
/// });
/// let counts: Vec<i64> = conn.find(&stmt, |row| row.get(0))?;
/// ```
pub struct Statement<'b> {
    text: String,
    binder: Option<Box<dyn Binder + 'b>>,
}

impl<'b> Statement<'b> {
    /// A statement without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            text: sql.into(),
            binder: None,
        }
    }

    /// A statement whose parameters are set by `binder` at every execution.
    pub fn with_binder<F>(sql: impl Into<String>, binder: F) -> Self
    where
        F: Fn(&mut dyn Parameters) -> Result<()> + 'b,
    {
        Self::from_binder(sql, binder)
    }

    /// A statement bound by any [`Binder`] implementation.
    pub fn from_binder<B: Binder + 'b>(sql: impl Into<String>, binder: B) -> Self {
        Self {
            text: sql.into(),
            binder: Some(Box::new(binder)),
        }
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// Whether a binder is attached.
    pub fn has_binder(&self) -> bool {
        self.binder.is_some()
    }
}

impl Sql for Statement<'_> {
    fn sql(&self) -> &str {
        &self.text
    }

    fn bind(&self, params: &mut dyn Parameters) -> Result<()> {
        match &self.binder {
            Some(binder) => binder.bind(params),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.text)
            .field("binder", &self.has_binder())
            .finish()
    }
}

impl From<&str> for Statement<'_> {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for Statement<'_> {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}
