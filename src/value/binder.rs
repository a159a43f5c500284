//! Turns entity field values into statement arguments.
//!
//! Binding is strict: a value must have exactly the kind its column declares,
//! and NULL is only accepted where the field is nullable. No value is ever
//! coerced into another kind.

use super::{Value, ValueKind};
use crate::entity::{ColumnDescriptor, Entity, EntityDescriptor};
use crate::error::{OrmError, Result};

/// One non-key column paired with the value it will be bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundColumn {
    pub column: &'static str,
    pub value: sea_query::Value,
}

/// Reads every non-key column of `entity` in declaration order.
///
/// # Errors
///
/// Returns [`OrmError::Formatting`] when a value is missing, has the wrong kind
/// or is NULL for a non-nullable column.
pub fn bind_columns<E: Entity>(descriptor: &EntityDescriptor, entity: &E) -> Result<Vec<BoundColumn>> {
    descriptor
        .value_columns()
        .map(|column| {
            let value = bind_value(column, entity.get_field(column.field))?;
            Ok(BoundColumn {
                column: column.name,
                value,
            })
        })
        .collect()
}

/// Converts a single field value into its statement argument.
///
/// # Errors
///
/// Returns [`OrmError::Formatting`] when the value cannot be bound to `column`.
pub fn bind_value(column: &ColumnDescriptor, value: Option<Value>) -> Result<sea_query::Value> {
    let value = value.ok_or_else(|| {
        OrmError::Formatting(format!("field `{}` produced no value", column.field))
    })?;

    if value.kind() != column.kind {
        return Err(OrmError::Formatting(format!(
            "field `{}` is declared {} but holds a {} value",
            column.field,
            column.kind,
            value.kind()
        )));
    }

    if value.is_null() && !column.nullable {
        return Err(OrmError::Formatting(format!(
            "field `{}` is not nullable but holds NULL",
            column.field
        )));
    }

    Ok(value.into())
}

/// Builds the primary key value written back after an INSERT.
///
/// # Errors
///
/// Returns [`OrmError::Persistence`] when the generated key does not fit the
/// key field's kind.
pub fn key_value(primary_key: &ColumnDescriptor, id: i64) -> Result<Value> {
    match primary_key.kind {
        ValueKind::Integer => i32::try_from(id).map(Value::from).map_err(|_| OrmError::Persistence {
            message: format!(
                "generated key {id} does not fit integer field `{}`",
                primary_key.field
            ),
            source: None,
        }),
        ValueKind::Long => Ok(Value::from(id)),
        kind => Err(OrmError::Persistence {
            message: format!("primary key field `{}` has non-numeric kind {kind}", primary_key.field),
            source: None,
        }),
    }
}

/// Converts a rendered statement argument back into a [`Value`].
///
/// Only the variants this crate produces are accepted. Unsigned values come
/// from `LIMIT` and are narrowed to `BigInt`.
pub(crate) fn from_query_value(value: sea_query::Value) -> Result<Value> {
    use sea_query::Value as Q;

    match value {
        Q::Int(v) => Ok(Value::Int(v)),
        Q::BigInt(v) => Ok(Value::BigInt(v)),
        Q::String(v) => Ok(Value::Text(v.map(|s| s.to_string()))),
        Q::ChronoDate(v) => Ok(Value::Date(v.map(|d| chrono::NaiveDate::clone(&d)))),
        Q::Unsigned(v) => Ok(Value::BigInt(v.map(i64::from))),
        Q::BigUnsigned(v) => v
            .map(i64::try_from)
            .transpose()
            .map(Value::BigInt)
            .map_err(|_| OrmError::Formatting("unsigned argument exceeds i64::MAX".to_string())),
        other => Err(OrmError::Formatting(format!("unsupported statement argument: {other:?}"))),
    }
}
