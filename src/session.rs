//! The mapping session.
//!
//! A [`Session`] borrows one connection for its whole lifetime and turns
//! entity operations into statements on it. It owns no state of its own, so
//! creating one is free and any number may share a connection.

use crate::connection::{Connection, DriverError, RowCursor};
use crate::entity::{ColumnDescriptor, Entity, EntityDescriptor};
use crate::error::{OrmError, Result};
use crate::hydrate::hydrate;
use crate::query::{statement, Predicate, Statement};
use crate::value::{bind_columns, key_value, Value, ValueKind};

#[cfg(feature = "tracing")]
use crate::tracing_helpers;

/// Outcome of [`Session::persist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// A new row was inserted and the entity now carries its key.
    Inserted { id: i64 },
    /// An existing row was updated.
    Updated { rows_affected: u64 },
}

/// Maps entities onto a borrowed [`Connection`].
///
/// # Examples
///
/// ```no_run
/// use deckhand::{Entity, Persisted, Predicate, Session, SqliteConnection};
///
/// #[derive(Debug, Default, Entity)]
/// #[table_name = "tags"]
/// struct Tag {
///     #[primary_key]
///     id: i32,
///     label: String,
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = SqliteConnection::open_in_memory()?;
/// let session = Session::new(&conn);
/// session.create_table_if_not_exists::<Tag>()?;
///
/// let mut tag = Tag { label: "rust".to_string(), ..Default::default() };
/// assert!(matches!(session.persist(&mut tag)?, Persisted::Inserted { .. }));
///
/// let tags: Vec<Tag> = session.find(Some(Predicate::new("label = ?").bind("rust")))?;
/// assert_eq!(tags.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<'c, C: Connection> {
    conn: &'c C,
}

impl<'c, C: Connection> Clone for Session<'c, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'c, C: Connection> Copy for Session<'c, C> {}

impl<'c, C: Connection> Session<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// The borrowed connection.
    pub fn connection(&self) -> &'c C {
        self.conn
    }

    /// Creates the table for `E`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Configuration`] for invalid mapping metadata and
    /// [`OrmError::Schema`] when the DDL fails, including when the table
    /// already exists.
    pub fn create_table<E: Entity>(&self) -> Result<()> {
        let descriptor = E::descriptor()?;
        let stmt = statement::create_table(&descriptor, self.conn.dialect());
        self.run_ddl(&descriptor, &stmt)
    }

    /// Creates the table for `E` unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Configuration`] for invalid mapping metadata and
    /// [`OrmError::Schema`] when the DDL fails.
    pub fn create_table_if_not_exists<E: Entity>(&self) -> Result<()> {
        let descriptor = E::descriptor()?;
        let stmt = statement::create_table_if_not_exists(&descriptor, self.conn.dialect());
        self.run_ddl(&descriptor, &stmt)
    }

    fn run_ddl(&self, descriptor: &EntityDescriptor, stmt: &Statement) -> Result<()> {
        self.execute("create_table", descriptor, stmt).map_err(|e| {
            OrmError::schema(format!("failed to create table `{}`", descriptor.table()), e)
        })?;
        Ok(())
    }

    /// Inserts or updates `entity` depending on its primary key.
    ///
    /// A key that is NULL, zero or negative means the entity is new: every
    /// non-key column is inserted and the generated key is written back into
    /// the entity. Any positive key updates the row with that key.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Formatting`] when a field value cannot be bound and
    /// [`OrmError::Persistence`] when the statement fails or the generated key
    /// cannot be retrieved.
    pub fn persist<E: Entity>(&self, entity: &mut E) -> Result<Persisted> {
        let descriptor = E::descriptor()?;
        let columns = bind_columns(&descriptor, entity)?;

        match existing_key(&descriptor, entity) {
            Some(key) => {
                let stmt = statement::update(
                    &descriptor,
                    &columns,
                    key_value(descriptor.primary_key(), key)?.into(),
                    self.conn.dialect(),
                )?;
                let rows_affected = self.execute("update", &descriptor, &stmt).map_err(|e| {
                    OrmError::persistence(
                        format!("failed to update `{}` row {key}", descriptor.table()),
                        e,
                    )
                })?;
                Ok(Persisted::Updated { rows_affected })
            }
            None => {
                let stmt = statement::insert(&descriptor, &columns, self.conn.dialect())?;
                let id = self.insert(&descriptor, &stmt)?;
                entity.set_field(
                    descriptor.primary_key().field,
                    key_value(descriptor.primary_key(), id)?,
                )?;
                Ok(Persisted::Inserted { id })
            }
        }
    }

    fn insert(&self, descriptor: &EntityDescriptor, stmt: &Statement) -> Result<i64> {
        let failed = |e| OrmError::persistence(format!("failed to insert into `{}`", descriptor.table()), e);

        let id = if stmt.dialect().supports_returning() {
            let mut cursor = self.query("insert", descriptor, stmt).map_err(failed)?;
            if !cursor.advance().map_err(failed)? {
                return Err(OrmError::Persistence {
                    message: format!("insert into `{}` returned no key", descriptor.table()),
                    source: None,
                });
            }
            read_key(&cursor, descriptor.primary_key()).map_err(failed)?
        } else {
            self.execute("insert", descriptor, stmt).map_err(failed)?;
            self.conn.last_insert_id().map_err(failed)?
        };

        id.ok_or_else(|| OrmError::Persistence {
            message: format!(
                "connection did not report the key generated for `{}`",
                descriptor.table()
            ),
            source: None,
        })
    }

    /// All rows of `E` matching `predicate`, or every row when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Query`] when the SELECT fails and
    /// [`OrmError::Hydration`] when a row cannot be converted.
    pub fn find<E: Entity>(&self, predicate: Option<Predicate>) -> Result<Vec<E>> {
        let descriptor = E::descriptor()?;
        let stmt = statement::select(&descriptor, predicate.as_ref(), None, self.conn.dialect())?;
        let mut cursor = self.select(&descriptor, &stmt)?;

        let mut entities = Vec::new();
        while advance(&mut cursor)? {
            entities.push(hydrate(&descriptor, &cursor)?);
        }
        Ok(entities)
    }

    /// Every row of `E`.
    ///
    /// # Errors
    ///
    /// Same as [`find`](Self::find).
    pub fn find_all<E: Entity>(&self) -> Result<Vec<E>> {
        self.find(None)
    }

    /// The first row of `E` matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Hydration`] when nothing matches, plus the errors
    /// of [`find`](Self::find).
    pub fn find_first<E: Entity>(&self, predicate: Option<Predicate>) -> Result<E> {
        let descriptor = E::descriptor()?;
        let stmt = statement::select(&descriptor, predicate.as_ref(), Some(1), self.conn.dialect())?;
        let mut cursor = self.select(&descriptor, &stmt)?;

        if !advance(&mut cursor)? {
            log::warn!("find_first on `{}` matched no rows", descriptor.table());
            return Err(OrmError::hydration(format!(
                "no `{}` row matched the query",
                descriptor.table()
            )));
        }
        hydrate(&descriptor, &cursor)
    }

    /// Deletes the row with `entity`'s primary key and returns the number of
    /// rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Persistence`] when the entity has no positive key
    /// or the DELETE fails.
    pub fn delete<E: Entity>(&self, entity: &E) -> Result<u64> {
        let descriptor = E::descriptor()?;
        let key = existing_key(&descriptor, entity).ok_or_else(|| OrmError::Persistence {
            message: format!(
                "cannot delete from `{}` without a positive primary key",
                descriptor.table()
            ),
            source: None,
        })?;

        let stmt = statement::delete(
            &descriptor,
            key_value(descriptor.primary_key(), key)?.into(),
            self.conn.dialect(),
        )?;
        self.execute("delete", &descriptor, &stmt).map_err(|e| {
            OrmError::persistence(format!("failed to delete `{}` row {key}", descriptor.table()), e)
        })
    }

    fn select(&self, descriptor: &EntityDescriptor, stmt: &Statement) -> Result<C::Cursor> {
        self.query("select", descriptor, stmt)
            .map_err(|e| OrmError::query(format!("failed to select from `{}`", descriptor.table()), e))
    }

    fn execute(
        &self,
        operation: &'static str,
        descriptor: &EntityDescriptor,
        stmt: &Statement,
    ) -> std::result::Result<u64, DriverError> {
        log_statement(operation, stmt);
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::statement_span(operation, descriptor.table(), stmt.sql()).entered();
        #[cfg(not(feature = "tracing"))]
        let _ = descriptor;

        self.conn.execute(stmt.sql(), stmt.params())
    }

    fn query(
        &self,
        operation: &'static str,
        descriptor: &EntityDescriptor,
        stmt: &Statement,
    ) -> std::result::Result<C::Cursor, DriverError> {
        log_statement(operation, stmt);
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::statement_span(operation, descriptor.table(), stmt.sql()).entered();
        #[cfg(not(feature = "tracing"))]
        let _ = descriptor;

        self.conn.query(stmt.sql(), stmt.params())
    }
}

fn log_statement(operation: &str, stmt: &Statement) {
    log::debug!("{operation}: {}", stmt.sql());
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("{operation}: {}", stmt.to_inline_sql());
    }
}

fn advance<R: RowCursor>(cursor: &mut R) -> Result<bool> {
    cursor
        .advance()
        .map_err(|e| OrmError::hydration_read("failed to fetch next row", e))
}

/// The entity's key when it identifies an existing row.
fn existing_key<E: Entity>(descriptor: &EntityDescriptor, entity: &E) -> Option<i64> {
    let key = match entity.get_field(descriptor.primary_key().field)? {
        Value::Int(v) => v.map(i64::from),
        Value::BigInt(v) => v,
        _ => None,
    };
    key.filter(|k| *k > 0)
}

fn read_key<R: RowCursor>(cursor: &R, pk: &ColumnDescriptor) -> std::result::Result<Option<i64>, DriverError> {
    match pk.kind {
        ValueKind::Integer => Ok(cursor.read_int(pk.name)?.map(i64::from)),
        _ => cursor.read_long(pk.name),
    }
}
