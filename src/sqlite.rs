//! SQLite implementation of [`Connection`], backed by `rusqlite`.
//!
//! Dates are stored as `YYYY-MM-DD` text, which is how SQLite itself treats
//! `DATE` columns.

use crate::config::DatabaseConfig;
use crate::connection::{Connection, DriverError, RowCursor};
use crate::query::Dialect;
use crate::value::Value;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, OpenFlags};
use std::collections::VecDeque;
use std::path::Path;

/// Database URL that opens a private in-memory database.
pub const MEMORY_URL: &str = ":memory:";

impl From<rusqlite::Error> for DriverError {
    fn from(err: rusqlite::Error) -> Self {
        DriverError::with_source(err.to_string(), err)
    }
}

/// A single SQLite database connection.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self, DriverError> {
        log::debug!("Opening in-memory SQLite database");
        Ok(Self::from_raw(rusqlite::Connection::open_in_memory()?))
    }

    /// Open a database file, creating it if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        log::debug!("Opening SQLite database at {}", path.display());
        Ok(Self::from_raw(rusqlite::Connection::open(path)?))
    }

    /// Open the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `DriverError` if the file cannot be opened, or does not exist
    /// and `create_if_missing` is off.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DriverError> {
        if config.url == MEMORY_URL {
            return Self::open_in_memory();
        }

        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        log::debug!(
            "Opening SQLite database at {} (create_if_missing = {})",
            config.url,
            config.create_if_missing
        );
        Ok(Self::from_raw(rusqlite::Connection::open_with_flags(&config.url, flags)?))
    }

    /// Wrap an already opened `rusqlite` connection.
    pub fn from_raw(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// The underlying `rusqlite` connection.
    pub fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Int(Some(v)) => SqlValue::Integer(i64::from(*v)),
        Value::BigInt(Some(v)) => SqlValue::Integer(*v),
        Value::Text(Some(v)) => SqlValue::Text(v.clone()),
        Value::Date(Some(v)) => SqlValue::Text(v.format("%Y-%m-%d").to_string()),
        Value::Int(None) | Value::BigInt(None) | Value::Text(None) | Value::Date(None) => SqlValue::Null,
    }
}

impl Connection for SqliteConnection {
    type Cursor = SqliteCursor;

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, DriverError> {
        let rows = self.conn.execute(sql, params_from_iter(params.iter().map(to_sql_value)))?;
        Ok(rows as u64)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<SqliteCursor, DriverError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(params.iter().map(to_sql_value)))?;
        let mut materialized = VecDeque::new();
        while let Some(row) = rows.next()? {
            let record = (0..columns.len())
                .map(|index| row.get::<_, SqlValue>(index))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            materialized.push_back(record);
        }

        Ok(SqliteCursor {
            columns,
            rows: materialized,
            current: None,
        })
    }

    fn last_insert_id(&self) -> Result<Option<i64>, DriverError> {
        Ok(Some(self.conn.last_insert_rowid()))
    }
}

/// Fully materialized SQLite result set.
#[derive(Debug)]
pub struct SqliteCursor {
    columns: Vec<String>,
    rows: VecDeque<Vec<SqlValue>>,
    current: Option<Vec<SqlValue>>,
}

impl SqliteCursor {
    fn value(&self, column: &str) -> Result<&SqlValue, DriverError> {
        let index = self
            .columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| DriverError::new(format!("no such column: {column}")))?;
        self.current
            .as_ref()
            .ok_or_else(|| DriverError::new("cursor is not positioned on a row"))
            .map(|row| &row[index])
    }
}

fn type_error(column: &str, expected: &str, actual: &SqlValue) -> DriverError {
    DriverError::new(format!(
        "column `{column}` holds {:?}, expected {expected}",
        actual.data_type()
    ))
}

impl RowCursor for SqliteCursor {
    fn advance(&mut self) -> Result<bool, DriverError> {
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    fn read_int(&self, column: &str) -> Result<Option<i32>, DriverError> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(v) => i32::try_from(*v)
                .map(Some)
                .map_err(|_| DriverError::new(format!("column `{column}` value {v} overflows i32"))),
            other => Err(type_error(column, "integer", other)),
        }
    }

    fn read_long(&self, column: &str) -> Result<Option<i64>, DriverError> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(v) => Ok(Some(*v)),
            other => Err(type_error(column, "integer", other)),
        }
    }

    fn read_text(&self, column: &str) -> Result<Option<String>, DriverError> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(v) => Ok(Some(v.clone())),
            other => Err(type_error(column, "text", other)),
        }
    }
}
