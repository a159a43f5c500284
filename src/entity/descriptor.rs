//! Validation of declared metadata into a descriptor.

use super::EntityMetadata;
use crate::error::{OrmError, Result};
use crate::value::ValueKind;
use std::collections::HashSet;

/// One mapped column of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Rust field name, as accepted by `get_field`/`set_field`.
    pub field: &'static str,
    /// SQL column name.
    pub name: &'static str,
    pub kind: ValueKind,
    pub nullable: bool,
}

/// Validated mapping of an entity type.
///
/// Columns keep declaration order, and the primary key is one of them.
/// Unmapped fields are not represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    type_name: &'static str,
    table: &'static str,
    columns: Vec<ColumnDescriptor>,
    primary_key: usize,
}

impl EntityDescriptor {
    /// Validates raw metadata.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Configuration`] when:
    /// - no table, or an empty table name, is declared
    /// - there is not exactly one primary key
    /// - the primary key is unmapped or not an integer kind
    /// - two fields map to the same column
    pub fn from_metadata(type_name: &'static str, metadata: EntityMetadata) -> Result<Self> {
        let table = match metadata.table {
            Some(table) if !table.trim().is_empty() => table,
            _ => return Err(OrmError::configuration(type_name, "type must declare a table mapping")),
        };

        let keys: Vec<_> = metadata.fields.iter().filter(|f| f.primary_key).collect();
        match keys.as_slice() {
            [] => return Err(OrmError::configuration(type_name, "entity missing primary key")),
            [key] => {
                if key.column.is_none() {
                    return Err(OrmError::configuration(
                        type_name,
                        format!("primary key field `{}` must be mapped to a column", key.field),
                    ));
                }
                if !key.kind.is_numeric() {
                    return Err(OrmError::configuration(
                        type_name,
                        format!(
                            "primary key field `{}` must be an integer or long, found {}",
                            key.field, key.kind
                        ),
                    ));
                }
            }
            many => {
                let names: Vec<_> = many.iter().map(|f| f.field).collect();
                return Err(OrmError::configuration(
                    type_name,
                    format!("entity declares more than one primary key: {}", names.join(", ")),
                ));
            }
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(metadata.fields.len());
        let mut primary_key = 0;
        for field in metadata.fields {
            let Some(name) = field.column else {
                continue;
            };
            if !seen.insert(name) {
                return Err(OrmError::configuration(
                    type_name,
                    format!("column `{name}` is mapped more than once"),
                ));
            }
            if field.primary_key {
                primary_key = columns.len();
            }
            columns.push(ColumnDescriptor {
                field: field.field,
                name,
                kind: field.kind,
                nullable: field.nullable && !field.primary_key,
            });
        }

        Ok(Self {
            type_name,
            table,
            columns,
            primary_key,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn primary_key(&self) -> &ColumnDescriptor {
        &self.columns[self.primary_key]
    }

    /// All mapped columns, primary key included.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Mapped columns other than the primary key, in declaration order.
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> + '_ {
        let pk = self.primary_key;
        self.columns
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != pk)
            .map(|(_, column)| column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FieldDef;

    fn user_fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("id", "id", ValueKind::Long).primary_key(),
            FieldDef::new("username", "username", ValueKind::Text),
            FieldDef::new("age", "age", ValueKind::Integer),
            FieldDef::new("registration", "registration_date", ValueKind::Date),
        ]
    }

    fn message(err: OrmError) -> String {
        match err {
            OrmError::Configuration { message, .. } => message,
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_metadata() {
        let desc =
            EntityDescriptor::from_metadata("User", EntityMetadata::new(Some("users"), user_fields()))
                .unwrap();
        assert_eq!(desc.table(), "users");
        assert_eq!(desc.primary_key().name, "id");
        let names: Vec<_> = desc.value_columns().map(|c| c.name).collect();
        assert_eq!(names, ["username", "age", "registration_date"]);
    }

    #[test]
    fn test_missing_table() {
        let err = EntityDescriptor::from_metadata("User", EntityMetadata::new(None, user_fields()))
            .unwrap_err();
        assert_eq!(message(err), "type must declare a table mapping");

        let err =
            EntityDescriptor::from_metadata("User", EntityMetadata::new(Some(" "), user_fields()))
                .unwrap_err();
        assert_eq!(message(err), "type must declare a table mapping");
    }

    #[test]
    fn test_missing_primary_key() {
        let fields = vec![FieldDef::new("username", "username", ValueKind::Text)];
        let err = EntityDescriptor::from_metadata("User", EntityMetadata::new(Some("users"), fields))
            .unwrap_err();
        assert_eq!(message(err), "entity missing primary key");
    }

    #[test]
    fn test_two_primary_keys() {
        let mut fields = user_fields();
        fields[2] = fields[2].clone().primary_key();
        let err = EntityDescriptor::from_metadata("User", EntityMetadata::new(Some("users"), fields))
            .unwrap_err();
        assert!(message(err).contains("more than one primary key"));
    }

    #[test]
    fn test_text_primary_key_rejected() {
        let fields = vec![FieldDef::new("code", "code", ValueKind::Text).primary_key()];
        let err = EntityDescriptor::from_metadata("Country", EntityMetadata::new(Some("countries"), fields))
            .unwrap_err();
        assert!(message(err).contains("must be an integer or long"));
    }

    #[test]
    fn test_unmapped_primary_key_rejected() {
        let fields = vec![FieldDef::unmapped("id", ValueKind::Long).primary_key()];
        let err = EntityDescriptor::from_metadata("User", EntityMetadata::new(Some("users"), fields))
            .unwrap_err();
        assert!(message(err).contains("must be mapped"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut fields = user_fields();
        fields.push(FieldDef::new("nickname", "username", ValueKind::Text));
        let err = EntityDescriptor::from_metadata("User", EntityMetadata::new(Some("users"), fields))
            .unwrap_err();
        assert!(message(err).contains("`username`"));
    }

    #[test]
    fn test_unmapped_fields_dropped() {
        let mut fields = user_fields();
        fields.insert(1, FieldDef::unmapped("session_token", ValueKind::Text));
        let desc = EntityDescriptor::from_metadata("User", EntityMetadata::new(Some("users"), fields))
            .unwrap();
        assert_eq!(desc.columns().len(), 4);
        assert!(desc.columns().iter().all(|c| c.field != "session_token"));
    }

    #[test]
    fn test_primary_key_position_tracked() {
        let fields = vec![
            FieldDef::new("title", "title", ValueKind::Text),
            FieldDef::new("id", "book_id", ValueKind::Integer).primary_key(),
        ];
        let desc = EntityDescriptor::from_metadata("Book", EntityMetadata::new(Some("books"), fields))
            .unwrap();
        assert_eq!(desc.primary_key().field, "id");
        assert_eq!(desc.value_columns().count(), 1);
    }
}
