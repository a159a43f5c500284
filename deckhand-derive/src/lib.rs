//! Procedural macros for deckhand
//!
//! This crate provides the `Entity` derive. Use it through the re-export in
//! `deckhand` rather than depending on it directly.

mod attributes;
mod macros;

use proc_macro::TokenStream;

/// Derive macro for `Entity` - generates the table mapping of a struct
///
/// This macro generates `deckhand::Entity` with:
/// - `metadata()` listing every mapped field with its column, kind and nullability
/// - `get_field()` / `set_field()` dispatching on the field name
///
/// Attributes:
/// - `#[table_name = "..."]` on the struct (required)
/// - `#[primary_key]` on exactly one integer field
/// - `#[column_name = "..."]` to override the column name (defaults to the field name)
/// - `#[skip]` to leave a field unmapped; it keeps its `Default` value when loaded
///
/// Every mapped field type must implement `deckhand::ColumnType`.
#[proc_macro_derive(Entity, attributes(table_name, primary_key, column_name, skip))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    macros::derive_entity(input)
}
