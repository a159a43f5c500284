//! SQL synthesis.
//!
//! Statements are rendered with `sea_query` for the dialect of the connection
//! they will run on. Every value travels as a positional argument; the SQL
//! text only ever contains identifiers and placeholders.

mod dialect;
mod predicate;
pub mod statement;

pub use dialect::Dialect;
pub use predicate::Predicate;
pub use statement::Statement;
