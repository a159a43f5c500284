use std::fmt;

/// SQL dialect a statement is rendered in.
///
/// The dialect decides identifier quoting, placeholder style (`?` or `$n`)
/// and how a generated key is read back after an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Whether `INSERT ... RETURNING` can hand back the generated key.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::Sqlite)
    }

    /// Character the dialect quotes identifiers with.
    pub fn identifier_quote(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres | Dialect::Sqlite => '"',
        }
    }

    /// Whether placeholders are numbered (`$1`, `$2`, ...) rather than `?`.
    pub fn numbered_placeholders(self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// Renders a `sea_query` statement with the builder matching `$dialect`.
macro_rules! build_for {
    ($dialect:expr, $statement:expr) => {
        match $dialect {
            $crate::query::Dialect::MySql => $statement.build(sea_query::MysqlQueryBuilder),
            $crate::query::Dialect::Postgres => $statement.build(sea_query::PostgresQueryBuilder),
            $crate::query::Dialect::Sqlite => $statement.build(sea_query::SqliteQueryBuilder),
        }
    };
}

pub(crate) use build_for;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_returning() {
        assert!(!Dialect::MySql.supports_returning());
        assert!(Dialect::Postgres.supports_returning());
        assert!(Dialect::Sqlite.supports_returning());
    }

    #[test]
    fn test_identifier_quote() {
        assert_eq!(Dialect::MySql.identifier_quote(), '`');
        assert_eq!(Dialect::Postgres.identifier_quote(), '"');
        assert!(Dialect::Postgres.numbered_placeholders());
        assert!(!Dialect::Sqlite.numbered_placeholders());
    }
}
