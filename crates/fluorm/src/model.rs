//! Record types mapped onto a table.

use crate::error::{OrmError, OrmResult};
use crate::row::FromRow;
use crate::schema::Schema;
use crate::value::{Record, Value};

/// A struct stored in one table.
///
/// Usually derived with `#[derive(Model)]`, which also implements
/// [`FromRow`]:
///
/// ```ignore
/// #[derive(Debug, Default, Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(id)]
///     id: i64,
///     name: String,
///     #[orm(column = "ct")]
///     count: i64,
///     #[orm(ignore)]
///     scratch: String,
/// }
/// ```
pub trait Model: FromRow + Sized + 'static {
    /// Column metadata, built once per type.
    fn schema() -> &'static Schema;

    fn table_name() -> &'static str {
        Self::schema().table()
    }

    /// Column to value map of every non-ignored field.
    fn attributes(&self) -> Record;

    /// Write a decoded column into the matching field.
    ///
    /// Returns `Ok(false)` when no field maps onto `column`.
    fn set_column(&mut self, column: &str, value: Value) -> OrmResult<bool>;

    /// The primary key value, if the type declares one.
    fn primary_key(&self) -> Option<Value> {
        let field = Self::schema().primary_field()?;
        self.attributes().remove(field.column())
    }

    /// Store a primary key value, typically the id generated by an INSERT.
    fn set_primary_key(&mut self, value: Value) -> OrmResult<()> {
        let Some(field) = Self::schema().primary_field() else {
            return Err(OrmError::validation(format!(
                "{} has no primary key",
                Self::table_name()
            )));
        };
        self.set_column(field.column(), value)?;
        Ok(())
    }
}
