//! Terminal operations: compile the statement and run it on an executor.

use super::{Builder, Property};
use crate::bindings::Segment;
use crate::client::{ExecResult, Executor};
use crate::error::{OrmError, OrmResult};
use crate::query::Aggregate;
use crate::row::{FromRow, Row};
use crate::value::{FromValue, Record, Value};

impl Builder {
    // ==================== Reads ====================

    /// Execute the query and map every row.
    pub async fn get<T: FromRow>(&self, conn: &impl Executor) -> OrmResult<Vec<T>> {
        self.get_columns(&[], conn).await
    }

    /// Execute the query with `columns` as the projection, unless one was
    /// already selected on the builder.
    ///
    /// The builder itself is left unchanged.
    pub async fn get_columns<T: FromRow>(
        &self,
        columns: &[&str],
        conn: &impl Executor,
    ) -> OrmResult<Vec<T>> {
        let sql = self.compile_with_columns(columns);
        let rows = conn.query(&sql, &self.get_bindings()).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query with `LIMIT 1` and map the first row, if any.
    pub async fn first<T: FromRow>(&self, conn: &impl Executor) -> OrmResult<Option<T>> {
        let builder = self.clone().take(1);
        Ok(builder.get::<T>(conn).await?.into_iter().next())
    }

    /// Execute the query and return the first raw row.
    pub async fn scan(&self, conn: &impl Executor) -> OrmResult<Option<Row>> {
        let sql = self.compile_with_columns(&[]);
        conn.scan(&sql, &self.get_bindings()).await
    }

    fn compile_with_columns(&self, columns: &[&str]) -> String {
        if self.query.columns.is_some() {
            return self.to_sql();
        }
        let mut query = self.query.clone();
        query.columns = Some(if columns.is_empty() {
            vec!["*".to_string()]
        } else {
            columns.iter().map(|c| (*c).to_string()).collect()
        });
        self.grammar.compile_select(&query)
    }

    // ==================== Aggregates ====================

    /// Derive the single-row aggregate statement for this query.
    ///
    /// The derived builder is a deep copy with the projection and the
    /// `select` bindings removed.
    pub fn aggregate_builder(&self, function: &str, columns: &[&str]) -> Builder {
        let mut builder = self
            .clone_without(&[Property::Columns])
            .clone_without_bindings(&[Segment::Select]);
        let columns = if columns.is_empty() {
            vec!["*".to_string()]
        } else {
            columns.iter().map(|c| (*c).to_string()).collect()
        };
        builder.query.aggregate = Some(Aggregate {
            function: function.to_uppercase(),
            columns,
        });
        builder
    }

    /// Run an aggregate function and decode its single value.
    pub async fn aggregate<T: FromValue>(
        &self,
        function: &str,
        columns: &[&str],
        conn: &impl Executor,
    ) -> OrmResult<T> {
        let builder = self.aggregate_builder(function, columns);
        let row = conn
            .scan(&builder.to_sql(), &builder.get_bindings())
            .await?
            .ok_or_else(|| OrmError::not_found(format!("{function} returned no row")))?;
        let value = row
            .values()
            .first()
            .cloned()
            .ok_or_else(|| OrmError::decode("aggregate", "row has no columns"))?;
        T::from_value(value).map_err(|e| e.for_column("aggregate"))
    }

    pub async fn count(&self, conn: &impl Executor) -> OrmResult<i64> {
        self.aggregate("count", &[], conn).await
    }

    /// `MIN(column)`. Decode into an `Option` to accept empty tables.
    pub async fn min<T: FromValue>(&self, column: &str, conn: &impl Executor) -> OrmResult<T> {
        self.aggregate("min", &[column], conn).await
    }

    /// `MAX(column)`. Decode into an `Option` to accept empty tables.
    pub async fn max<T: FromValue>(&self, column: &str, conn: &impl Executor) -> OrmResult<T> {
        self.aggregate("max", &[column], conn).await
    }

    pub async fn sum<T: FromValue>(&self, column: &str, conn: &impl Executor) -> OrmResult<T> {
        self.aggregate("sum", &[column], conn).await
    }

    pub async fn avg<T: FromValue>(&self, column: &str, conn: &impl Executor) -> OrmResult<T> {
        self.aggregate("avg", &[column], conn).await
    }

    // ==================== Writes ====================

    /// Insert one record.
    pub async fn insert(&self, values: Record, conn: &impl Executor) -> OrmResult<ExecResult> {
        self.inserts(&[values], conn).await
    }

    /// Insert several records with one statement.
    ///
    /// Every record must carry the same set of columns.
    pub async fn inserts(&self, values: &[Record], conn: &impl Executor) -> OrmResult<ExecResult> {
        let (sql, bindings) = self.grammar.compile_insert(&self.query, values)?;
        conn.execute(&sql, &bindings).await
    }

    /// Update the matching rows and return the number affected.
    pub async fn update(&self, values: Record, conn: &impl Executor) -> OrmResult<u64> {
        if values.is_empty() {
            return Err(OrmError::validation("UPDATE requires at least one column"));
        }
        let sql = self.grammar.compile_update(&self.query, &values);
        let bindings = self
            .grammar
            .prepare_bindings_for_update(&self.bindings, &values);
        Ok(conn.execute(&sql, &bindings).await?.rows_affected)
    }

    /// Delete the matching rows and return the number affected.
    pub async fn delete(&self, conn: &impl Executor) -> OrmResult<u64> {
        let sql = self.grammar.compile_delete(&self.query);
        Ok(conn.execute(&sql, &self.get_bindings()).await?.rows_affected)
    }

    /// Delete the row whose `{table}.id` equals `id`.
    pub async fn delete_by_id(&self, id: impl Into<Value>, conn: &impl Executor) -> OrmResult<u64> {
        let column = format!("{}.id", self.query.from);
        self.clone().where_eq(&column, id).delete(conn).await
    }
}
