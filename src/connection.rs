//! Connection contract consumed by the mapping session.
//!
//! The session never opens, closes or pools connections. It borrows something
//! implementing [`Connection`] and drives it with placeholder SQL plus an
//! ordered argument list. Query results come back through a forward-only
//! [`RowCursor`] read by column name.

use crate::query::Dialect;
use crate::value::Value;
use std::error::Error as StdError;
use thiserror::Error;

/// Failure reported by a connection or cursor implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl DriverError {
    /// Creates an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping the driver's own error type.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Trait for executing statements against a database.
///
/// Implementations are synchronous: every call blocks until the database has
/// answered. Arguments are positional and line up with the placeholders of the
/// SQL text in the order given.
///
/// # Examples
///
/// ```no_run
/// use deckhand::{Connection, RowCursor, SqliteConnection, Value};
///
/// # fn main() -> Result<(), deckhand::DriverError> {
/// let conn = SqliteConnection::open_in_memory()?;
/// conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
/// conn.execute("INSERT INTO t (name) VALUES (?)", &[Value::from("Pesho")])?;
///
/// let mut cursor = conn.query("SELECT name FROM t", &[])?;
/// while cursor.advance()? {
///     println!("{:?}", cursor.read_text("name")?);
/// }
/// # Ok(())
/// # }
/// ```
pub trait Connection {
    /// Cursor returned by [`Connection::query`].
    type Cursor: RowCursor;

    /// SQL dialect statements must be rendered in for this connection.
    fn dialect(&self) -> Dialect;

    /// Execute a statement and return the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns `DriverError` if the statement fails.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, DriverError>;

    /// Execute a statement that produces rows.
    ///
    /// # Errors
    ///
    /// Returns `DriverError` if the statement fails.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Self::Cursor, DriverError>;

    /// Key generated by the most recent INSERT on this connection.
    ///
    /// Only consulted for dialects without `RETURNING` support. The default
    /// reports that the connection cannot tell.
    fn last_insert_id(&self) -> Result<Option<i64>, DriverError> {
        Ok(None)
    }
}

/// Forward-only cursor over a result set.
///
/// A fresh cursor is positioned before the first row; call
/// [`advance`](RowCursor::advance) before reading. Readers return `Ok(None)`
/// for SQL NULL.
pub trait RowCursor {
    /// Move to the next row. Returns `false` once the rows are exhausted.
    fn advance(&mut self) -> Result<bool, DriverError>;

    /// Whether the result set has a column with this name.
    fn has_column(&self, column: &str) -> bool;

    fn read_int(&self, column: &str) -> Result<Option<i32>, DriverError>;

    fn read_long(&self, column: &str) -> Result<Option<i64>, DriverError>;

    fn read_text(&self, column: &str) -> Result<Option<String>, DriverError>;

    /// Read a date column in its textual `YYYY-MM-DD` form.
    fn read_date_text(&self, column: &str) -> Result<Option<String>, DriverError> {
        self.read_text(column)
    }
}
