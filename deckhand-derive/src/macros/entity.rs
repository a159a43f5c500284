//! Derive macro for Entity
//!
//! Generates the `deckhand::Entity` implementation of a struct with named
//! fields. Mapping mistakes that can be seen from the struct alone are
//! reported at compile time; the same checks run again at runtime for
//! hand-written implementations.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

use crate::attributes;

/// Generate the `Entity` implementation
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct MappedField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    name: String,
    column: String,
    is_primary_key: bool,
}

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let table_name = match attributes::extract_table_name(&input.attrs)? {
        Some(name) if !name.trim().is_empty() => name,
        Some(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "#[table_name] must not be empty",
            ))
        }
        None => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Entity requires #[table_name = \"...\"] on the struct",
            ))
        }
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Entity can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Entity can only be derived for structs",
            ))
        }
    };

    let mut mapped = Vec::new();
    let mut columns = HashSet::new();
    for field in fields {
        let attrs = attributes::parse_column_attributes(field)?;
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        if attrs.is_ignored {
            if attrs.is_primary_key {
                return Err(syn::Error::new_spanned(
                    ident,
                    "the primary key field cannot be #[skip]",
                ));
            }
            continue;
        }

        let name = ident.unraw().to_string();
        let column = attrs.column_name.unwrap_or_else(|| name.clone());
        if column.trim().is_empty() {
            return Err(syn::Error::new_spanned(ident, "#[column_name] must not be empty"));
        }
        if !columns.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("column `{column}` is mapped more than once"),
            ));
        }

        mapped.push(MappedField {
            ident,
            ty: &field.ty,
            name,
            column,
            is_primary_key: attrs.is_primary_key,
        });
    }

    let keys: Vec<_> = mapped.iter().filter(|f| f.is_primary_key).collect();
    match keys.as_slice() {
        [_] => {}
        [] => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Entity requires exactly one #[primary_key] field",
            ))
        }
        [_, extra, ..] => {
            return Err(syn::Error::new_spanned(
                extra.ident,
                "only one field may be marked #[primary_key]",
            ))
        }
    }

    let struct_str = struct_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_defs = mapped.iter().map(|f| {
        let name = &f.name;
        let column = &f.column;
        let ty = f.ty;
        let is_primary_key = f.is_primary_key;
        quote! {
            ::deckhand::FieldDef {
                field: #name,
                column: ::core::option::Option::Some(#column),
                kind: <#ty as ::deckhand::ColumnType>::KIND,
                primary_key: #is_primary_key,
                nullable: <#ty as ::deckhand::ColumnType>::NULLABLE,
            }
        }
    });

    let get_arms = mapped.iter().map(|f| {
        let name = &f.name;
        let ident = f.ident;
        quote! {
            #name => ::core::option::Option::Some(::deckhand::ColumnType::to_value(&self.#ident)),
        }
    });

    let set_arms = mapped.iter().map(|f| {
        let name = &f.name;
        let ident = f.ident;
        let ty = f.ty;
        quote! {
            #name => {
                self.#ident = <#ty as ::deckhand::ColumnType>::from_value(value)
                    .map_err(|err| ::deckhand::OrmError::field_conversion(#struct_str, #name, err))?;
                ::core::result::Result::Ok(())
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::deckhand::Entity for #struct_name #ty_generics #where_clause {
            fn metadata() -> ::deckhand::EntityMetadata {
                ::deckhand::EntityMetadata::new(
                    ::core::option::Option::Some(#table_name),
                    ::std::vec![#(#field_defs),*],
                )
            }

            fn get_field(&self, field: &str) -> ::core::option::Option<::deckhand::Value> {
                match field {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_field(&mut self, field: &str, value: ::deckhand::Value) -> ::deckhand::Result<()> {
                match field {
                    #(#set_arms)*
                    _ => ::core::result::Result::Err(::deckhand::OrmError::unknown_field(#struct_str, field)),
                }
            }
        }
    })
}
