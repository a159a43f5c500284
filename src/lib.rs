//! # Deckhand
//!
//! A small metadata-driven entity mapper. Entity types describe their table
//! mapping once (usually through `#[derive(Entity)]`), and a [`Session`] turns
//! them into parameterized SQL and back into typed values over any
//! [`Connection`].
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use deckhand::{Entity, Session, SqliteConnection};
//!
//! #[derive(Debug, Default, Entity)]
//! #[table_name = "users"]
//! struct User {
//!     #[primary_key]
//!     id: i64,
//!     username: String,
//!     age: i32,
//!     #[column_name = "registration_date"]
//!     registration: NaiveDate,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = SqliteConnection::open_in_memory()?;
//! let session = Session::new(&conn);
//! session.create_table::<User>()?;
//!
//! let mut user = User {
//!     username: "Pesho".to_string(),
//!     age: 23,
//!     registration: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     ..Default::default()
//! };
//! session.persist(&mut user)?;
//!
//! let stored: User = session.find_first(Some("id > 0".into()))?;
//! assert_eq!(stored.username, "Pesho");
//! # Ok(())
//! # }
//! ```

extern crate self as deckhand;

pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod hydrate;
pub mod query;
pub mod session;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod value;

#[cfg(feature = "tracing")]
mod tracing_helpers;

#[cfg(test)]
mod test_helpers;

pub use crate::config::DatabaseConfig;
pub use connection::{Connection, DriverError, RowCursor};
pub use entity::{resolve, ColumnDescriptor, Entity, EntityDescriptor, EntityMetadata, FieldDef};
pub use error::{OrmError, Result};
pub use query::{Dialect, Predicate, Statement};
pub use session::{Persisted, Session};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqliteCursor};
pub use value::{ColumnType, Value, ValueError, ValueKind};

/// Derive macro generating the [`Entity`] implementation for a struct.
pub use deckhand_derive::Entity;
