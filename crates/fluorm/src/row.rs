//! Result rows and row mapping traits

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Record, Value};
use std::sync::Arc;

/// One result row: column names plus positional values.
///
/// Rows of one result set share their column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row.
    ///
    /// Returns an error when the number of values does not match the number
    /// of columns.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> OrmResult<Self> {
        if columns.len() != values.len() {
            return Err(OrmError::validation(format!(
                "row has {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value of a column, by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|index| &self.values[index])
    }

    /// Decode a column into `T`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .cloned()
            .ok_or_else(|| OrmError::decode(column, "column not found in row"))?;
        T::from_value(value).map_err(|e| e.for_column(column))
    }

    /// Decode the value at `index` into `T`.
    pub fn try_get_index<T: FromValue>(&self, index: usize) -> OrmResult<T> {
        let (column, value) = self
            .columns
            .get(index)
            .zip(self.values.get(index))
            .ok_or_else(|| OrmError::decode(index.to_string(), "column index out of range"))?;
        T::from_value(value.clone()).map_err(|e| e.for_column(column))
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Trait for types that can be constructed from a result row.
pub trait FromRow: Sized {
    /// Construct an instance from a row.
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}

impl FromRow for Record {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row
            .iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect())
    }
}

macro_rules! impl_from_row_tuple {
    ($($t:ident : $i:tt),+) => {
        impl<$($t: FromValue),+> FromRow for ($($t,)+) {
            fn from_row(row: &Row) -> OrmResult<Self> {
                Ok(($(row.try_get_index::<$t>($i)?,)+))
            }
        }
    };
}

impl_from_row_tuple!(A: 0);
impl_from_row_tuple!(A: 0, B: 1);
impl_from_row_tuple!(A: 0, B: 1, C: 2);
impl_from_row_tuple!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::from_pairs([
            ("name", Value::from("ada")),
            ("balance", Value::from(42_i64)),
        ])
    }

    #[test]
    fn get_by_name() {
        let row = sample();
        assert_eq!(row.get("name"), Some(&Value::from("ada")));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.try_get::<i64>("balance").unwrap(), 42);
    }

    #[test]
    fn missing_column_names_the_column() {
        let err = sample().try_get::<String>("email").unwrap_err();
        match err {
            OrmError::Decode { column, .. } => assert_eq!(column, "email"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let columns: Arc<[String]> = vec!["a".to_string()].into();
        assert!(Row::new(columns, vec![]).is_err());
    }

    #[test]
    fn tuples_decode_by_position() {
        let (name, balance): (String, u32) = FromRow::from_row(&sample()).unwrap();
        assert_eq!(name, "ada");
        assert_eq!(balance, 42);
    }

    #[test]
    fn records_keep_every_column() {
        let record = Record::from_row(&sample()).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record["balance"], Value::from(42_i64));
    }
}
