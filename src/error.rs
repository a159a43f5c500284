//! Error types surfaced by every mapping operation.
//!
//! Nothing in the crate retries or swallows a failure: each operation reports
//! the first error it hits, classified by the stage that produced it.

use crate::connection::DriverError;
use crate::value::ValueError;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = OrmError> = std::result::Result<T, E>;

/// Errors produced while mapping entities to and from relational rows.
#[derive(Debug, Error)]
pub enum OrmError {
    /// The entity type's mapping metadata is missing or inconsistent.
    #[error("configuration error for `{entity}`: {message}")]
    Configuration {
        entity: &'static str,
        message: String,
    },

    /// DDL execution failed (for example the table already exists).
    #[error("schema error: {message}")]
    Schema {
        message: String,
        #[source]
        source: DriverError,
    },

    /// INSERT, UPDATE or DELETE could not be carried out.
    #[error("persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    /// A SELECT statement failed to execute.
    #[error("query error: {message}")]
    Query {
        message: String,
        #[source]
        source: DriverError,
    },

    /// A row could not be converted into an entity instance.
    #[error("hydration error: {message}")]
    Hydration {
        message: String,
        #[source]
        source: Option<DriverError>,
    },

    /// A field value could not be bound as a statement argument.
    #[error("formatting error: {0}")]
    Formatting(String),

    /// Loading [`DatabaseConfig`](crate::DatabaseConfig) failed.
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl OrmError {
    pub(crate) fn configuration(entity: &'static str, message: impl Into<String>) -> Self {
        OrmError::Configuration {
            entity,
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>, source: DriverError) -> Self {
        OrmError::Schema {
            message: message.into(),
            source,
        }
    }

    pub(crate) fn persistence(message: impl Into<String>, source: DriverError) -> Self {
        OrmError::Persistence {
            message: message.into(),
            source: Some(source),
        }
    }

    pub(crate) fn query(message: impl Into<String>, source: DriverError) -> Self {
        OrmError::Query {
            message: message.into(),
            source,
        }
    }

    /// Builds a [`OrmError::Hydration`] without an underlying driver error.
    pub fn hydration(message: impl Into<String>) -> Self {
        OrmError::Hydration {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn hydration_read(message: impl Into<String>, source: DriverError) -> Self {
        OrmError::Hydration {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Reports a value that could not be stored into an entity field.
    ///
    /// Called from `#[derive(Entity)]`-generated `set_field` implementations.
    pub fn field_conversion(entity: &str, field: &str, err: ValueError) -> Self {
        OrmError::hydration(format!("cannot assign `{entity}.{field}`: {err}"))
    }

    /// Reports a field name the entity does not map.
    pub fn unknown_field(entity: &str, field: &str) -> Self {
        OrmError::hydration(format!("`{entity}` has no mapped field named `{field}`"))
    }

    /// True for [`OrmError::Hydration`].
    pub fn is_hydration(&self) -> bool {
        matches!(self, OrmError::Hydration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;
    use std::error::Error as _;

    #[test]
    fn test_configuration_display_names_entity() {
        let err = OrmError::configuration("app::User", "entity missing primary key");
        let display = err.to_string();
        assert!(display.contains("app::User"));
        assert!(display.contains("entity missing primary key"));
    }

    #[test]
    fn test_schema_error_keeps_driver_source() {
        let err = OrmError::schema(
            "failed to create table `users`",
            DriverError::new("table users already exists"),
        );
        assert!(err.to_string().starts_with("schema error"));
        let source = err.source().expect("driver error should be the source");
        assert_eq!(source.to_string(), "table users already exists");
    }

    #[test]
    fn test_field_conversion_is_hydration() {
        let err = OrmError::field_conversion(
            "User",
            "age",
            ValueError::TypeMismatch {
                expected: ValueKind::Integer,
                actual: ValueKind::Text,
            },
        );
        assert!(err.is_hydration());
        assert!(err.to_string().contains("User.age"));
    }
}
