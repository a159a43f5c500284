//! Attribute parsing utilities

use syn::{Attribute, ExprLit, Field, Lit};

/// Read the string value of a `#[name = "..."]` attribute.
fn string_value(attr: &Attribute) -> syn::Result<String> {
    let meta = attr.meta.require_name_value()?;
    match &meta.value {
        syn::Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

/// Extract table name from struct attributes
pub fn extract_table_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident("table_name") {
            return string_value(attr).map(Some);
        }
    }
    Ok(None)
}

/// Mapping attributes of one field.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ColumnAttributes {
    pub is_primary_key: bool,
    pub column_name: Option<String>,
    pub is_ignored: bool,
}

/// Parse all column attributes from a field
pub fn parse_column_attributes(field: &Field) -> syn::Result<ColumnAttributes> {
    let mut attrs = ColumnAttributes::default();

    for attr in &field.attrs {
        if attr.path().is_ident("primary_key") {
            attr.meta.require_path_only()?;
            attrs.is_primary_key = true;
        } else if attr.path().is_ident("column_name") {
            attrs.column_name = Some(string_value(attr)?);
        } else if attr.path().is_ident("skip") {
            attr.meta.require_path_only()?;
            attrs.is_ignored = true;
        }
    }

    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    fn first_field(input: &DeriveInput) -> &Field {
        match &input.data {
            syn::Data::Struct(data) => data.fields.iter().next().unwrap(),
            _ => panic!("expected a struct"),
        }
    }

    #[test]
    fn test_extract_table_name() {
        let input: DeriveInput = parse_quote! {
            #[table_name = "users"]
            struct User { id: i64 }
        };
        assert_eq!(extract_table_name(&input.attrs).unwrap(), Some("users".to_string()));
    }

    #[test]
    fn test_extract_table_name_missing() {
        let input: DeriveInput = parse_quote! {
            struct User { id: i64 }
        };
        assert_eq!(extract_table_name(&input.attrs).unwrap(), None);
    }

    #[test]
    fn test_table_name_must_be_string() {
        let input: DeriveInput = parse_quote! {
            #[table_name = 42]
            struct User { id: i64 }
        };
        assert!(extract_table_name(&input.attrs).is_err());
    }

    #[test]
    fn test_parse_column_attributes() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[primary_key]
                #[column_name = "user_id"]
                id: i64,
            }
        };
        let attrs = parse_column_attributes(first_field(&input)).unwrap();
        assert!(attrs.is_primary_key);
        assert_eq!(attrs.column_name.as_deref(), Some("user_id"));
        assert!(!attrs.is_ignored);
    }

    #[test]
    fn test_parse_skip() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[skip]
                cache: String,
            }
        };
        let attrs = parse_column_attributes(first_field(&input)).unwrap();
        assert!(attrs.is_ignored);
        assert_eq!(attrs.column_name, None);
    }

    #[test]
    fn test_primary_key_takes_no_value() {
        let input: DeriveInput = parse_quote! {
            struct User {
                #[primary_key = "yes"]
                id: i64,
            }
        };
        assert!(parse_column_attributes(first_field(&input)).is_err());
    }
}
