//! Derive macros for fluorm
//!
//! Provides `#[derive(Model)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod model;

/// Derive `Model` and `FromRow` for a struct.
///
/// # Example
///
/// ```ignore
/// use fluorm::Model;
///
/// #[derive(Debug, Default, Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(id)]
///     id: i64,
///     name: String,
///     #[orm(column = "ct")]
///     count: i64,
///     #[orm(ignore)]
///     scratch: Vec<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (default: the snake-cased struct name)
/// - `#[orm(id)]` / `#[orm(primary_key)]` - Mark field as primary key
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(ignore)]` - Skip the field on reads and writes
/// - `#[orm(tag = "k:v;...")]` - Raw mapping tag, merged with the above
///
/// Every field type must implement `Default`; mapped field types must also
/// implement `Clone`, `Into<fluorm::Value>` and `fluorm::FromValue`.
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
