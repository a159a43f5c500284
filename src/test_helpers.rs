//! In-memory connection and fixtures for unit tests.

use crate::connection::{Connection, DriverError, RowCursor};
use crate::entity::{Entity, EntityDescriptor};
use crate::query::Dialect;
use crate::value::Value;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Default, PartialEq, crate::Entity)]
#[table_name = "users"]
pub struct TestUser {
    #[primary_key]
    pub id: i64,
    pub username: String,
    pub age: Option<i32>,
    #[column_name = "registration_date"]
    pub registration: NaiveDate,
    #[skip]
    pub nickname: String,
}

pub fn users_descriptor() -> Arc<EntityDescriptor> {
    TestUser::descriptor().unwrap()
}

pub type Row = Vec<(String, Value)>;

/// A `users` row with the date stored as text, the way SQLite returns it.
pub fn row(id: i64, username: &str, age: Option<i32>, registration: &str) -> Row {
    vec![
        ("id".to_string(), Value::from(id)),
        ("username".to_string(), Value::from(username)),
        ("age".to_string(), Value::from(age)),
        ("registration_date".to_string(), Value::from(registration)),
    ]
}

#[derive(Debug, Default)]
pub struct MockCursor {
    rows: VecDeque<Row>,
    current: Option<Row>,
}

impl MockCursor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            current: None,
        }
    }

    fn get(&self, column: &str) -> Result<&Value, DriverError> {
        self.current
            .as_ref()
            .ok_or_else(|| DriverError::new("cursor is not positioned on a row"))?
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| DriverError::new(format!("no such column: {column}")))
    }
}

impl RowCursor for MockCursor {
    fn advance(&mut self) -> Result<bool, DriverError> {
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn has_column(&self, column: &str) -> bool {
        self.get(column).is_ok()
    }

    fn read_int(&self, column: &str) -> Result<Option<i32>, DriverError> {
        match self.get(column)? {
            Value::Int(v) => Ok(*v),
            other => Err(DriverError::new(format!("{column} is {}", other.kind()))),
        }
    }

    fn read_long(&self, column: &str) -> Result<Option<i64>, DriverError> {
        match self.get(column)? {
            Value::BigInt(v) => Ok(*v),
            other => Err(DriverError::new(format!("{column} is {}", other.kind()))),
        }
    }

    fn read_text(&self, column: &str) -> Result<Option<String>, DriverError> {
        match self.get(column)? {
            Value::Text(v) => Ok(v.clone()),
            other => Err(DriverError::new(format!("{column} is {}", other.kind()))),
        }
    }
}

/// Connection that records every statement and answers from queued results.
#[derive(Debug)]
pub struct MockConnection {
    dialect: Dialect,
    pub executed: RefCell<Vec<(String, Vec<Value>)>>,
    cursors: RefCell<VecDeque<MockCursor>>,
    rows_affected: Cell<u64>,
    last_insert_id: Cell<Option<i64>>,
    failure: RefCell<Option<String>>,
}

impl MockConnection {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            executed: RefCell::new(Vec::new()),
            cursors: RefCell::new(VecDeque::new()),
            rows_affected: Cell::new(1),
            last_insert_id: Cell::new(None),
            failure: RefCell::new(None),
        }
    }

    pub fn push_rows(&self, rows: Vec<Row>) {
        self.cursors.borrow_mut().push_back(MockCursor::new(rows));
    }

    pub fn set_rows_affected(&self, rows: u64) {
        self.rows_affected.set(rows);
    }

    pub fn set_last_insert_id(&self, id: i64) {
        self.last_insert_id.set(Some(id));
    }

    /// Makes the next statement fail with `message`.
    pub fn fail_next(&self, message: &str) {
        *self.failure.borrow_mut() = Some(message.to_string());
    }

    pub fn last_sql(&self) -> String {
        self.executed
            .borrow()
            .last()
            .map(|(sql, _)| sql.clone())
            .unwrap_or_default()
    }

    pub fn last_params(&self) -> Vec<Value> {
        self.executed
            .borrow()
            .last()
            .map(|(_, params)| params.clone())
            .unwrap_or_default()
    }

    fn record(&self, sql: &str, params: &[Value]) -> Result<(), DriverError> {
        self.executed.borrow_mut().push((sql.to_string(), params.to_vec()));
        match self.failure.borrow_mut().take() {
            Some(message) => Err(DriverError::new(message)),
            None => Ok(()),
        }
    }
}

impl Connection for MockConnection {
    type Cursor = MockCursor;

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, DriverError> {
        self.record(sql, params)?;
        Ok(self.rows_affected.get())
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<MockCursor, DriverError> {
        self.record(sql, params)?;
        Ok(self.cursors.borrow_mut().pop_front().unwrap_or_default())
    }

    fn last_insert_id(&self) -> Result<Option<i64>, DriverError> {
        Ok(self.last_insert_id.get())
    }
}
