//! Spans around statement execution.

use tracing::Span;

/// Span covering one statement sent to the connection.
pub(crate) fn statement_span(operation: &'static str, table: &str, sql: &str) -> Span {
    tracing::debug_span!("deckhand.statement", operation, table, sql)
}
