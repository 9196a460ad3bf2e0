//! Table metadata for a record type.

use crate::field::Field;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

/// The field set of one record type and its primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table: String,
    fields: Vec<Field>,
    primary: Option<usize>,
}

impl Schema {
    /// Create a schema. The primary key is the first field tagged as one.
    pub fn new(table: impl Into<String>, fields: Vec<Field>) -> Self {
        let primary = fields.iter().position(Field::is_primary);
        Self {
            table: table.into(),
            fields,
            primary,
        }
    }

    /// Create a schema from `(member, tag)` pairs.
    ///
    /// # Panics
    ///
    /// Panics when a tag is malformed (see [`Field::new`]).
    pub fn from_tags(table: impl Into<String>, members: &[(&str, &str)]) -> Self {
        let fields = members
            .iter()
            .map(|(name, tag)| Field::new(name, tag))
            .collect();
        Self::new(table, fields)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn primary_field(&self) -> Option<&Field> {
        self.primary.map(|index| &self.fields[index])
    }

    /// Field by member name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// The non-ignored field a result column maps onto.
    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_column(column))
    }

    /// Column names of all non-ignored fields.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| !f.is_ignored())
            .map(Field::column)
    }
}

static REGISTRY: LazyLock<RwLock<HashMap<TypeId, &'static Schema>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// The schema of `T`, built by `build` on first use and shared afterwards.
pub fn cached<T: 'static>(build: impl FnOnce() -> Schema) -> &'static Schema {
    let key = TypeId::of::<T>();

    if let Some(schema) = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .copied()
    {
        return schema;
    }

    // Build outside the lock; if another thread won the race its schema is kept.
    let schema = build();
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    *registry
        .entry(key)
        .or_insert_with(|| &*Box::leak(Box::new(schema)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_is_first_tagged_field() {
        let schema = Schema::from_tags(
            "users",
            &[("name", ""), ("id", "primary_key"), ("uid", "primary_key")],
        );
        assert_eq!(schema.primary_field().map(Field::name), Some("id"));
    }

    #[test]
    fn ignored_fields_are_not_columns() {
        let schema = Schema::from_tags("users", &[("name", ""), ("scratch", "-")]);
        assert_eq!(schema.columns().collect::<Vec<_>>(), vec!["name"]);
        assert!(schema.field_by_column("scratch").is_none());
        assert!(schema.field("scratch").is_some());
    }

    #[test]
    fn cached_builds_once_per_type() {
        struct Marker;
        let first = cached::<Marker>(|| Schema::from_tags("markers", &[("id", "")]));
        let second = cached::<Marker>(|| Schema::from_tags("other", &[]));
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.table(), "markers");
    }
}
