//! Rendering of the statements a session issues.
//!
//! Each function takes a validated [`EntityDescriptor`] and produces a
//! [`Statement`]: SQL text with placeholders plus the ordered arguments.
//! Nothing here touches a connection.

use super::dialect::build_for;
use super::{Dialect, Predicate};
use crate::entity::{ColumnDescriptor, EntityDescriptor};
use crate::error::{OrmError, Result};
use crate::value::{from_query_value, literal, BoundColumn, Value, ValueKind};
use sea_query::{
    ColumnDef, DeleteStatement, Expr, ExprTrait, InsertStatement, SelectStatement, Table,
    UpdateStatement, Values,
};

/// Length of the `VARCHAR` columns text fields are created with.
pub const TEXT_COLUMN_LENGTH: u32 = 255;

/// Rendered SQL with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
    dialect: Dialect,
}

impl Statement {
    fn new(sql: String, values: Values, dialect: Dialect) -> Result<Self> {
        let params = values
            .iter()
            .cloned()
            .map(from_query_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sql, params, dialect })
    }

    fn ddl(sql: String, dialect: Dialect) -> Self {
        Self {
            sql,
            params: Vec::new(),
            dialect,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The statement with every placeholder replaced by its argument's SQL
    /// literal. Meant for logs only; never execute the result.
    pub fn to_inline_sql(&self) -> String {
        let mut out = String::with_capacity(self.sql.len());
        let mut chars = self.sql.chars().peekable();
        let mut next = 0;
        let mut quote: Option<char> = None;

        while let Some(c) = chars.next() {
            if let Some(open) = quote {
                if c == open {
                    quote = None;
                }
                out.push(c);
                continue;
            }
            match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                '?' => {
                    self.push_param(&mut out, next, "?");
                    next += 1;
                }
                '$' if chars.peek().is_some_and(char::is_ascii_digit) => {
                    let mut digits = String::new();
                    while let Some(d) = chars.next_if(char::is_ascii_digit) {
                        digits.push(d);
                    }
                    match digits.parse::<usize>() {
                        Ok(n) if n > 0 => self.push_param(&mut out, n - 1, &format!("${digits}")),
                        _ => {
                            out.push('$');
                            out.push_str(&digits);
                        }
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }

    fn push_param(&self, out: &mut String, index: usize, placeholder: &str) {
        match self.params.get(index) {
            Some(value) => out.push_str(&literal(value)),
            None => out.push_str(placeholder),
        }
    }
}

/// `CREATE TABLE` for the entity's mapped columns.
///
/// The primary key becomes an auto-incrementing integer column. Other columns
/// follow their kind and nullability.
pub fn create_table(descriptor: &EntityDescriptor, dialect: Dialect) -> Statement {
    table_statement(descriptor, dialect, false)
}

/// Same as [`create_table`] with `IF NOT EXISTS`.
pub fn create_table_if_not_exists(descriptor: &EntityDescriptor, dialect: Dialect) -> Statement {
    table_statement(descriptor, dialect, true)
}

fn table_statement(descriptor: &EntityDescriptor, dialect: Dialect, if_not_exists: bool) -> Statement {
    let mut table = Table::create();
    table.table(descriptor.table());
    if if_not_exists {
        table.if_not_exists();
    }

    let pk = descriptor.primary_key();
    let mut pk_def = ColumnDef::new(pk.name);
    // SQLite only aliases the rowid for a column declared exactly INTEGER.
    if pk.kind == ValueKind::Long && dialect != Dialect::Sqlite {
        pk_def.big_integer();
    } else {
        pk_def.integer();
    }
    pk_def.not_null().auto_increment().primary_key();
    table.col(&mut pk_def);

    for column in descriptor.value_columns() {
        table.col(&mut column_def(column));
    }

    Statement::ddl(build_for!(dialect, table), dialect)
}

fn column_def(column: &ColumnDescriptor) -> ColumnDef {
    let mut def = ColumnDef::new(column.name);
    match column.kind {
        ValueKind::Integer => def.integer(),
        ValueKind::Long => def.big_integer(),
        ValueKind::Text => def.string_len(TEXT_COLUMN_LENGTH),
        ValueKind::Date => def.date(),
    };
    if column.nullable {
        def.null();
    } else {
        def.not_null();
    }
    def
}

/// `INSERT` of every non-key column. The key column is left to the database.
///
/// On dialects with `RETURNING` the generated key is returned as the single
/// result column.
///
/// # Errors
///
/// Returns [`OrmError::Configuration`] when the entity has no non-key column.
pub fn insert(descriptor: &EntityDescriptor, columns: &[BoundColumn], dialect: Dialect) -> Result<Statement> {
    if columns.is_empty() {
        return Err(OrmError::configuration(
            descriptor.type_name(),
            "entity has no columns to insert besides its primary key",
        ));
    }

    let mut query = InsertStatement::default();
    query.into_table(descriptor.table());
    query.columns(columns.iter().map(|c| c.column));
    query
        .values(columns.iter().map(|c| Expr::val(c.value.clone())))
        .map_err(|e| OrmError::Formatting(format!("failed to build insert: {e}")))?;
    if dialect.supports_returning() {
        query.returning_col(descriptor.primary_key().name);
    }

    let (sql, values) = build_for!(dialect, query);
    Statement::new(sql, values, dialect)
}

/// `UPDATE` of every non-key column, matched on the primary key.
pub fn update(
    descriptor: &EntityDescriptor,
    columns: &[BoundColumn],
    key: sea_query::Value,
    dialect: Dialect,
) -> Result<Statement> {
    let mut query = UpdateStatement::default();
    query.table(descriptor.table());
    for column in columns {
        query.value(column.column, column.value.clone());
    }
    query.and_where(Expr::col(descriptor.primary_key().name).eq(key));

    let (sql, values) = build_for!(dialect, query);
    Statement::new(sql, values, dialect)
}

/// `SELECT *` with an optional caller predicate and row limit.
pub fn select(
    descriptor: &EntityDescriptor,
    predicate: Option<&Predicate>,
    limit: Option<u64>,
    dialect: Dialect,
) -> Result<Statement> {
    let mut query = SelectStatement::default();
    query.column(sea_query::Asterisk).from(descriptor.table());
    if let Some(predicate) = predicate {
        let fragment = predicate.render(dialect)?;
        let params: Vec<sea_query::Value> = predicate.params().iter().cloned().map(Into::into).collect();
        query.and_where(Expr::cust_with_values(fragment, params));
    }
    if let Some(limit) = limit {
        query.limit(limit);
    }

    let (sql, values) = build_for!(dialect, query);
    Statement::new(sql, values, dialect)
}

/// `DELETE` of the row matching the primary key.
pub fn delete(descriptor: &EntityDescriptor, key: sea_query::Value, dialect: Dialect) -> Result<Statement> {
    let mut query = DeleteStatement::default();
    query
        .from_table(descriptor.table())
        .and_where(Expr::col(descriptor.primary_key().name).eq(key));

    let (sql, values) = build_for!(dialect, query);
    Statement::new(sql, values, dialect)
}
