//! Conversion between Rust field types and [`Value`].
//!
//! `#[derive(Entity)]` goes through [`ColumnType`] for every mapped field, so a
//! field whose type has no implementation is rejected at compile time instead
//! of producing an untyped column.

use super::{Value, ValueKind};
use chrono::NaiveDate;
use thiserror::Error;

/// Error converting a [`Value`] into a field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// NULL arrived for a field that cannot hold it.
    #[error("value is null but the field is not nullable")]
    Null,
    /// The value's kind differs from the field's declared kind.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
}

/// A Rust type that can be stored in a mapped column.
///
/// `Option<T>` maps to the same kind as `T` and marks the column nullable.
///
/// ```rust
/// use deckhand::{ColumnType, Value, ValueError, ValueKind};
///
/// assert_eq!(<i32 as ColumnType>::KIND, ValueKind::Integer);
/// assert_eq!(42i32.to_value(), Value::Int(Some(42)));
///
/// let age: Option<i32> = ColumnType::from_value(Value::Int(None)).unwrap();
/// assert_eq!(age, None);
///
/// let err = <i32 as ColumnType>::from_value(Value::Int(None)).unwrap_err();
/// assert_eq!(err, ValueError::Null);
/// ```
pub trait ColumnType: Sized {
    /// Declared kind of the column.
    const KIND: ValueKind;
    /// Whether the column accepts NULL.
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;
}

macro_rules! impl_column_type {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl ColumnType for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn to_value(&self) -> Value {
                Value::$variant(Some(Clone::clone(self)))
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(Some(v)) => Ok(v),
                    Value::$variant(None) => Err(ValueError::Null),
                    other => Err(ValueError::TypeMismatch {
                        expected: ValueKind::$kind,
                        actual: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_column_type!(i32, Integer, Int);
impl_column_type!(i64, Long, BigInt);
impl_column_type!(String, Text, Text);
impl_column_type!(NaiveDate, Date, Date);

impl<T: ColumnType> ColumnType for Option<T> {
    const KIND: ValueKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::null(T::KIND),
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        if value.kind() != T::KIND {
            return Err(ValueError::TypeMismatch {
                expected: T::KIND,
                actual: value.kind(),
            });
        }
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }
}
