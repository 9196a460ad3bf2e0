//! Attribute parsing for the Model derive macro.
//!
//! Handles struct-level and field-level `#[orm(...)]` attributes and folds
//! them into the runtime tag grammar (`key[:value];...`).

use heck::ToSnakeCase;
use syn::ext::IdentExt;
use syn::{DeriveInput, LitStr, Result};

/// Struct-level attributes.
pub(crate) struct ModelAttr {
    pub table: String,
}

impl ModelAttr {
    pub fn parse(input: &DeriveInput) -> Result<Self> {
        let mut table = None;
        for attr in &input.attrs {
            if !attr.path().is_ident("orm") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value: LitStr = meta.value()?.parse()?;
                    table = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported struct attribute, expected `table`"))
                }
            })?;
        }
        let table = table.unwrap_or_else(|| input.ident.to_string().to_snake_case());
        Ok(Self { table })
    }
}

/// Field-level attributes, resolved to the column they map onto.
pub(crate) struct FieldAttr {
    pub member: syn::Ident,
    /// Member name without a raw identifier prefix.
    pub name: String,
    pub column: String,
    pub ignored: bool,
    /// Tag handed to the runtime `Field::new`.
    pub tag: String,
}

impl FieldAttr {
    pub fn parse(field: &syn::Field) -> Result<Self> {
        let member = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "Model fields must be named"))?;

        let mut column: Option<String> = None;
        let mut primary = false;
        let mut ignored = false;
        let mut extra: Option<LitStr> = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("orm") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    let value: LitStr = meta.value()?.parse()?;
                    column = Some(value.value());
                } else if meta.path.is_ident("primary_key") || meta.path.is_ident("id") {
                    primary = true;
                } else if meta.path.is_ident("ignore") {
                    ignored = true;
                } else if meta.path.is_ident("tag") {
                    extra = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected `column`, `primary_key`, `id`, `ignore` or `tag`",
                    ));
                }
                Ok(())
            })?;
        }

        // Keys from a raw tag count the same as the dedicated attributes.
        let mut passthrough = Vec::new();
        if let Some(lit) = &extra {
            for pair in lit.value().split(';') {
                let pair = pair.trim();
                if pair.is_empty() {
                    continue;
                }
                let (key, value) = match pair.split_once(':') {
                    Some((key, value)) => (key.trim(), value.trim()),
                    None => (pair, ""),
                };
                match key.to_uppercase().as_str() {
                    "" => return Err(syn::Error::new_spanned(lit, "empty key in tag")),
                    "COLUMN" if value.is_empty() => {
                        return Err(syn::Error::new_spanned(lit, "COLUMN requires a value"));
                    }
                    "COLUMN" => {
                        column.get_or_insert_with(|| value.to_string());
                    }
                    "PRIMARY_KEY" => primary = true,
                    "-" | "IGNORE" => ignored = true,
                    _ => passthrough.push(pair.to_string()),
                }
            }
        }

        let name = member.unraw().to_string();
        let column = column.unwrap_or_else(|| name.to_snake_case());

        let mut parts = vec![format!("column:{column}")];
        if primary {
            parts.push("primary_key".to_string());
        }
        if ignored {
            parts.push("ignore".to_string());
        }
        parts.extend(passthrough);

        Ok(Self {
            member,
            name,
            column,
            ignored,
            tag: parts.join(";"),
        })
    }
}
