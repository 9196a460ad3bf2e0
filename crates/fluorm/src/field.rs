//! Per-member column metadata parsed from a mapping tag.
//!
//! A tag is a `;`-separated list of `key[:value]` pairs, for example
//! `column:ct;primary_key`. Keys are case-insensitive. Recognized keys:
//!
//! - `COLUMN:<name>` overrides the column name (default: the snake-cased member name)
//! - `PRIMARY_KEY` marks the primary key
//! - `-` or `IGNORE` excludes the member from reads and writes
//!
//! Any other key is kept and available through [`Field::attr`].

use crate::error::{OrmError, OrmResult};
use heck::ToSnakeCase;
use std::collections::BTreeMap;

/// Column metadata for one struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    column: String,
    primary: bool,
    ignored: bool,
    attrs: BTreeMap<String, String>,
}

impl Field {
    /// Build the metadata of member `name` from its tag.
    ///
    /// # Panics
    ///
    /// Panics on a malformed tag. Tags are static declarations, so this is a
    /// programming error. Use [`Field::parse`] to get an error instead.
    pub fn new(name: &str, tag: &str) -> Self {
        match Self::parse(name, tag) {
            Ok(field) => field,
            Err(err) => panic!("invalid mapping tag on `{name}`: {err}"),
        }
    }

    /// Build the metadata of member `name`, reporting malformed tags.
    pub fn parse(name: &str, tag: &str) -> OrmResult<Self> {
        let attrs = parse_tag(tag)?;

        let ignored = attrs.contains_key("-") || attrs.contains_key("IGNORE");
        let primary = attrs.contains_key("PRIMARY_KEY");
        let column = match attrs.get("COLUMN") {
            Some(column) if column.is_empty() => {
                return Err(OrmError::validation("COLUMN requires a value"));
            }
            Some(column) => column.clone(),
            None => name.to_snake_case(),
        };

        Ok(Self {
            name: name.to_string(),
            column,
            primary,
            ignored,
            attrs,
        })
    }

    /// The member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// A tag attribute, by case-insensitive key. Flag keys map to `""`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(&key.to_uppercase()).map(String::as_str)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    /// Whether a result column maps onto this member.
    pub fn is_column(&self, column: &str) -> bool {
        !self.ignored && self.column == column
    }
}

fn parse_tag(tag: &str) -> OrmResult<BTreeMap<String, String>> {
    let mut attrs = BTreeMap::new();
    for pair in tag.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (pair, ""),
        };
        if key.is_empty() {
            return Err(OrmError::validation(format!("empty key in `{pair}`")));
        }
        attrs.insert(key.to_uppercase(), value.to_string());
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_defaults_to_snake_case() {
        let field = Field::new("BirthDate", "");
        assert_eq!(field.column(), "birth_date");
        assert!(!field.is_primary());
        assert!(!field.is_ignored());
    }

    #[test]
    fn tag_overrides_column() {
        let field = Field::new("count", "column:ct");
        assert_eq!(field.name(), "count");
        assert_eq!(field.column(), "ct");
        assert!(field.is_column("ct"));
        assert!(!field.is_column("count"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let field = Field::new("id", "Primary_Key; column:user_id ;size:64");
        assert!(field.is_primary());
        assert_eq!(field.column(), "user_id");
        assert_eq!(field.attr("size"), Some("64"));
        assert_eq!(field.attr("primary_key"), Some(""));
    }

    #[test]
    fn ignored_fields_match_nothing() {
        let field = Field::new("cache", "-");
        assert!(field.is_ignored());
        assert!(!field.is_column("cache"));
        assert!(Field::new("cache", "ignore").is_ignored());
    }

    #[test]
    fn values_may_contain_colons() {
        let field = Field::new("created", "default:12:00:00");
        assert_eq!(field.attr("default"), Some("12:00:00"));
    }

    #[test]
    fn malformed_tags_are_reported() {
        assert!(Field::parse("a", ":value").is_err());
        assert!(Field::parse("a", "column:").is_err());
    }

    #[test]
    #[should_panic(expected = "invalid mapping tag")]
    fn new_panics_on_malformed_tag() {
        Field::new("a", ";:x");
    }
}
