//! Runtime field values and their declared kinds.
//!
//! Every mapped field has exactly one [`ValueKind`]. A [`Value`] always carries
//! its kind, including when it is NULL, so binding and hydration never have to
//! guess a type.

mod binder;
mod column_type;
mod literal;

pub use binder::{bind_columns, bind_value, key_value, BoundColumn};
pub use column_type::{ColumnType, ValueError};
pub use literal::literal;

pub(crate) use binder::from_query_value;

use chrono::NaiveDate;
use std::fmt;

/// Declared value kind of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// Variable-length text.
    Text,
    /// Calendar date without time zone.
    Date,
}

impl ValueKind {
    /// Whether a primary key may be declared with this kind.
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Long)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Long => "long",
            ValueKind::Text => "text",
            ValueKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// A typed, possibly NULL field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Int(Option<i32>),
    BigInt(Option<i64>),
    Text(Option<String>),
    Date(Option<NaiveDate>),
}

impl Value {
    /// The NULL value of the given kind.
    pub fn null(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Integer => Value::Int(None),
            ValueKind::Long => Value::BigInt(None),
            ValueKind::Text => Value::Text(None),
            ValueKind::Date => Value::Date(None),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Integer,
            Value::BigInt(_) => ValueKind::Long,
            Value::Text(_) => ValueKind::Text,
            Value::Date(_) => ValueKind::Date,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Int(None) | Value::BigInt(None) | Value::Text(None) | Value::Date(None)
        )
    }
}

macro_rules! impl_value_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(Some(v))
            }
        }

        impl From<Option<$ty>> for Value {
            fn from(v: Option<$ty>) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_value_from!(i32, Int);
impl_value_from!(i64, BigInt);
impl_value_from!(String, Text);
impl_value_from!(NaiveDate, Date);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(Some(v.to_string()))
    }
}

impl From<Value> for sea_query::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(v) => v.into(),
            Value::BigInt(v) => v.into(),
            Value::Text(v) => v.into(),
            Value::Date(v) => v.into(),
        }
    }
}
