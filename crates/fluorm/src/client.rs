//! The execution boundary.
//!
//! fluorm renders SQL and bindings; an [`Executor`] owns the driver, the
//! network and any pooling, retry or timeout policy. Failures it returns are
//! propagated to the caller unchanged.

use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;

/// Outcome of an INSERT, UPDATE or DELETE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Auto-increment id generated by the statement, zero if none.
    pub last_insert_id: u64,
    pub rows_affected: u64,
}

/// Runs compiled statements against a database.
///
/// Implementations wrap a driver connection, a pool or a transaction.
/// [`Connection`](crate::Connection) implements this trait itself so a
/// connection can be passed to every terminal builder method.
pub trait Executor: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// The default implementation runs [`Executor::query`] and keeps the
    /// first row.
    fn scan(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<Option<Row>>> + Send {
        async move { Ok(self.query(sql, params).await?.into_iter().next()) }
    }

    /// Execute a statement that returns no rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<ExecResult>> + Send;
}

impl<E: Executor> Executor for &E {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        (*self).query(sql, params).await
    }

    async fn scan(&self, sql: &str, params: &[Value]) -> OrmResult<Option<Row>> {
        (*self).scan(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        (*self).execute(sql, params).await
    }
}

impl<E: Executor> Executor for Arc<E> {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.as_ref().query(sql, params).await
    }

    async fn scan(&self, sql: &str, params: &[Value]) -> OrmResult<Option<Row>> {
        self.as_ref().scan(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.as_ref().execute(sql, params).await
    }
}
