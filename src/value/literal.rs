//! Inline SQL rendering of values, used only for trace output.
//!
//! Statements sent to a connection are always parameterized. The inline form
//! exists so a logged statement can be pasted into a SQL shell.

use super::Value;

/// Renders a value as a SQL literal.
///
/// Text and dates are single-quoted with embedded quotes doubled. Integers are
/// bare and NULL is `NULL`.
///
/// ```rust
/// use deckhand::value::literal;
/// use deckhand::Value;
///
/// assert_eq!(literal(&Value::from("O'Brien")), "'O''Brien'");
/// assert_eq!(literal(&Value::from(23i32)), "23");
/// assert_eq!(literal(&Value::Text(None)), "NULL");
/// ```
pub fn literal(value: &Value) -> String {
    match value {
        Value::Int(Some(v)) => v.to_string(),
        Value::BigInt(Some(v)) => v.to_string(),
        Value::Text(Some(v)) => quote(v),
        Value::Date(Some(v)) => quote(&v.format("%Y-%m-%d").to_string()),
        Value::Int(None) | Value::BigInt(None) | Value::Text(None) | Value::Date(None) => {
            "NULL".to_string()
        }
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
