//! Model derive macro implementation

use crate::attrs::{FieldAttr, ModelAttr};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let table = ModelAttr::parse(&input)?.table;
    let attrs = fields
        .iter()
        .map(FieldAttr::parse)
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    for (field, attr) in fields.iter().zip(&attrs) {
        if !attr.ignored && !seen.insert(attr.column.as_str()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("column `{}` is mapped by more than one field", attr.column),
            ));
        }
    }

    let schema_fields = attrs.iter().map(|attr| {
        let name = &attr.name;
        let tag = &attr.tag;
        quote! { ::fluorm::Field::new(#name, #tag) }
    });

    let mapped: Vec<&FieldAttr> = attrs.iter().filter(|a| !a.ignored).collect();

    let attribute_inserts = mapped.iter().map(|attr| {
        let member = &attr.member;
        let column = &attr.column;
        quote! {
            attrs.insert(
                ::std::string::String::from(#column),
                ::fluorm::Value::from(::core::clone::Clone::clone(&self.#member)),
            );
        }
    });

    let set_arms = mapped.iter().map(|attr| {
        let member = &attr.member;
        let column = &attr.column;
        quote! {
            #column => {
                self.#member = ::fluorm::FromValue::from_value(value)
                    .map_err(|e| e.for_column(column))?;
                ::core::result::Result::Ok(true)
            }
        }
    });

    let defaults = attrs.iter().map(|attr| {
        let member = &attr.member;
        quote! { #member: ::core::default::Default::default() }
    });

    Ok(quote! {
        impl #impl_generics ::fluorm::Model for #name #ty_generics #where_clause {
            fn schema() -> &'static ::fluorm::Schema {
                ::fluorm::schema::cached::<Self>(|| {
                    ::fluorm::Schema::new(#table, ::std::vec![#(#schema_fields),*])
                })
            }

            fn attributes(&self) -> ::fluorm::Record {
                let mut attrs = ::fluorm::Record::new();
                #(#attribute_inserts)*
                attrs
            }

            fn set_column(
                &mut self,
                column: &str,
                value: ::fluorm::Value,
            ) -> ::fluorm::OrmResult<bool> {
                match column {
                    #(#set_arms)*
                    _ => {
                        let _ = value;
                        ::core::result::Result::Ok(false)
                    }
                }
            }
        }

        impl #impl_generics ::fluorm::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &::fluorm::Row) -> ::fluorm::OrmResult<Self> {
                let mut model = Self {
                    #(#defaults),*
                };
                for (column, value) in row.iter() {
                    ::fluorm::Model::set_column(&mut model, column, ::core::clone::Clone::clone(value))?;
                }
                ::core::result::Result::Ok(model)
            }
        }
    })
}
