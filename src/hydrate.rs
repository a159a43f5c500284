//! Row to entity conversion.

use crate::connection::RowCursor;
use crate::entity::{Entity, EntityDescriptor};
use crate::error::{OrmError, Result};
use crate::value::{Value, ValueKind};
use chrono::NaiveDate;

/// Builds an entity from the cursor's current row.
///
/// Starts from `E::default()` and assigns every mapped column by name.
/// Unmapped fields keep their default value. Extra result columns are ignored.
///
/// # Errors
///
/// Returns [`OrmError::Hydration`] when a mapped column is missing from the
/// result set, cannot be read as its declared kind, or holds NULL for a field
/// that cannot store it.
pub fn hydrate<E: Entity, R: RowCursor>(descriptor: &EntityDescriptor, row: &R) -> Result<E> {
    let mut entity = E::default();

    for column in descriptor.columns() {
        if !row.has_column(column.name) {
            return Err(OrmError::hydration(format!(
                "result set has no column `{}` for field `{}`",
                column.name, column.field
            )));
        }

        let read_error = |e| {
            OrmError::hydration_read(
                format!("failed to read column `{}` as {}", column.name, column.kind),
                e,
            )
        };
        let value = match column.kind {
            ValueKind::Integer => Value::Int(row.read_int(column.name).map_err(read_error)?),
            ValueKind::Long => Value::BigInt(row.read_long(column.name).map_err(read_error)?),
            ValueKind::Text => Value::Text(row.read_text(column.name).map_err(read_error)?),
            ValueKind::Date => {
                let text = row.read_date_text(column.name).map_err(read_error)?;
                Value::Date(text.as_deref().map(parse_date).transpose()?)
            }
        };

        entity.set_field(column.field, value)?;
    }

    Ok(entity)
}

/// Parses the date part of `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or ISO-8601
/// timestamps.
fn parse_date(text: &str) -> Result<NaiveDate> {
    let date = text.split(['T', ' ']).next().unwrap_or(text);
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| OrmError::hydration(format!("invalid date `{text}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{row, users_descriptor, MockCursor, TestUser};

    #[test]
    fn test_hydrate_row() {
        let mut cursor = MockCursor::new(vec![row(3, "Pesho", Some(23), "2024-01-01")]);
        assert!(cursor.advance().unwrap());

        let user: TestUser = hydrate(&users_descriptor(), &cursor).unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.username, "Pesho");
        assert_eq!(user.age, Some(23));
        assert_eq!(user.registration, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(user.nickname, "");
    }

    #[test]
    fn test_hydrate_null_into_optional_field() {
        let mut cursor = MockCursor::new(vec![row(3, "Pesho", None, "2024-01-01")]);
        cursor.advance().unwrap();

        let user: TestUser = hydrate(&users_descriptor(), &cursor).unwrap();
        assert_eq!(user.age, None);
    }

    #[test]
    fn test_hydrate_timestamp_text() {
        let mut cursor = MockCursor::new(vec![row(1, "Gosho", Some(30), "2024-02-29 10:15:00")]);
        cursor.advance().unwrap();

        let user: TestUser = hydrate(&users_descriptor(), &cursor).unwrap();
        assert_eq!(user.registration, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_hydrate_missing_column() {
        let mut record = row(1, "Gosho", Some(30), "2024-01-01");
        record.retain(|(name, _)| name != "username");
        let mut cursor = MockCursor::new(vec![record]);
        cursor.advance().unwrap();

        let err = hydrate::<TestUser, _>(&users_descriptor(), &cursor).unwrap_err();
        assert!(err.is_hydration());
        assert!(err.to_string().contains("`username`"));
    }

    #[test]
    fn test_hydrate_invalid_date() {
        let mut cursor = MockCursor::new(vec![row(1, "Gosho", Some(30), "yesterday")]);
        cursor.advance().unwrap();

        let err = hydrate::<TestUser, _>(&users_descriptor(), &cursor).unwrap_err();
        assert!(err.is_hydration());
    }
}
