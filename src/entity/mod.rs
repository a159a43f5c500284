//! Entity mapping metadata.
//!
//! A type takes part in mapping by implementing [`Entity`]: it declares its
//! table and fields once through [`Entity::metadata`], and exposes dynamic
//! field access so the session can read and assign values by field name.
//! `#[derive(Entity)]` generates all of it.

mod descriptor;
mod registry;

pub use descriptor::{ColumnDescriptor, EntityDescriptor};
pub use registry::resolve;

use crate::error::Result;
use crate::value::{Value, ValueKind};
use std::sync::Arc;

/// Declared mapping of one struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust field name.
    pub field: &'static str,
    /// Column the field maps to. `None` leaves the field unmapped.
    pub column: Option<&'static str>,
    pub kind: ValueKind,
    pub primary_key: bool,
    pub nullable: bool,
}

impl FieldDef {
    /// A mapped, non-nullable field stored under `column`.
    pub fn new(field: &'static str, column: &'static str, kind: ValueKind) -> Self {
        Self {
            field,
            column: Some(column),
            kind,
            primary_key: false,
            nullable: false,
        }
    }

    /// A field the mapper ignores.
    pub fn unmapped(field: &'static str, kind: ValueKind) -> Self {
        Self {
            field,
            column: None,
            kind,
            primary_key: false,
            nullable: false,
        }
    }

    /// Marks the field as the entity's primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Raw mapping metadata as declared by an entity type.
///
/// Nothing is validated here; [`EntityDescriptor::from_metadata`] does that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMetadata {
    pub table: Option<&'static str>,
    pub fields: Vec<FieldDef>,
}

impl EntityMetadata {
    pub fn new(table: Option<&'static str>, fields: Vec<FieldDef>) -> Self {
        Self { table, fields }
    }
}

/// A type that maps to one table.
///
/// Implementations are normally generated:
///
/// ```rust
/// use deckhand::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// #[table_name = "books"]
/// struct Book {
///     #[primary_key]
///     id: i32,
///     title: String,
///     #[skip]
///     cached_rank: i32,
/// }
///
/// let descriptor = Book::descriptor().unwrap();
/// assert_eq!(descriptor.table(), "books");
/// assert_eq!(descriptor.columns().len(), 2);
/// ```
///
/// A hand-written implementation is equally valid as long as `get_field` and
/// `set_field` agree with `metadata` on field names and kinds.
pub trait Entity: Default + 'static {
    /// Table and field mapping of this type.
    fn metadata() -> EntityMetadata;

    /// Current value of a mapped field. `None` for a name that is not mapped.
    fn get_field(&self, field: &str) -> Option<Value>;

    /// Assigns a mapped field.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Hydration`](crate::OrmError::Hydration) when the
    /// field is unknown or the value does not fit the field's type.
    fn set_field(&mut self, field: &str, value: Value) -> Result<()>;

    /// Validated descriptor of this type, resolved once and cached.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Configuration`](crate::OrmError::Configuration) when
    /// the metadata is inconsistent.
    fn descriptor() -> Result<Arc<EntityDescriptor>> {
        resolve::<Self>()
    }
}
