//! A grammar bound to an executor.

use crate::builder::Builder;
use crate::client::{ExecResult, Executor};
use crate::config::DatabaseConfig;
use crate::error::{OrmError, OrmResult};
use crate::grammar::{Grammar, MySqlGrammar};
use crate::model::Model;
use crate::monitor::SqlLogger;
use crate::row::Row;
use crate::value::{Record, Value};
use std::sync::Arc;
use std::time::Instant;

/// Entry point for building and running statements on one database.
///
/// A `Connection` is itself an [`Executor`]: statements passed through it are
/// logged and then delegated to the wrapped executor.
#[derive(Debug)]
pub struct Connection<E> {
    executor: E,
    grammar: Arc<dyn Grammar>,
    logger: SqlLogger,
}

impl<E: Executor> Connection<E> {
    /// Wrap `executor` with the MySQL grammar.
    pub fn new(executor: E) -> Self {
        Self::with_grammar(executor, MySqlGrammar::new())
    }

    /// Wrap `executor` with a custom grammar.
    pub fn with_grammar(executor: E, grammar: impl Grammar + 'static) -> Self {
        Self {
            executor,
            grammar: Arc::new(grammar),
            logger: SqlLogger::default(),
        }
    }

    /// Wrap `executor` with the grammar named by `config.driver`.
    pub fn from_config(executor: E, config: &DatabaseConfig) -> OrmResult<Self> {
        match config.driver.to_lowercase().as_str() {
            "mysql" => Ok(Self::with_grammar(
                executor,
                MySqlGrammar::with_table_prefix(config.prefix.clone()),
            )),
            other => Err(OrmError::config(format!("no grammar for driver `{other}`"))),
        }
    }

    /// Replace the SQL logger.
    pub fn with_logger(mut self, logger: SqlLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    // ==================== Builders ====================

    /// An empty builder using this connection's grammar.
    pub fn query(&self) -> Builder {
        Builder::new(Arc::clone(&self.grammar))
    }

    /// A builder targeting `table`.
    pub fn table(&self, table: &str) -> Builder {
        self.query().from(table)
    }

    /// A builder targeting the table of `M`.
    pub fn model<M: Model>(&self) -> Builder {
        self.table(M::table_name())
    }

    // ==================== Records ====================

    /// Insert `model` and store the generated id in its primary key.
    ///
    /// A blank primary key is left out of the INSERT so the database can
    /// assign one.
    pub async fn create<M: Model>(&self, model: &mut M) -> OrmResult<ExecResult> {
        let mut attributes = model.attributes();
        let primary = M::schema().primary_field();
        if let Some(field) = primary
            && attributes.get(field.column()).is_some_and(Value::is_blank)
        {
            attributes.remove(field.column());
        }

        let result = self.model::<M>().insert(attributes, self).await?;
        if primary.is_some() && result.last_insert_id > 0 {
            model.set_primary_key(Value::from(result.last_insert_id))?;
        }
        Ok(result)
    }

    /// Update `model` by primary key, or insert it when the key is blank.
    pub async fn save<M: Model>(&self, model: &mut M) -> OrmResult<u64> {
        let Some((column, id)) = persisted_key(model) else {
            return Ok(self.create(model).await?.rows_affected);
        };
        let mut attributes: Record = model.attributes();
        attributes.remove(&column);
        self.model::<M>()
            .where_eq(&column, id)
            .update(attributes, self)
            .await
    }

    /// Delete `model` by primary key.
    ///
    /// Fails with a validation error when the key is blank, rather than
    /// deleting every row of the table.
    pub async fn destroy<M: Model>(&self, model: &M) -> OrmResult<u64> {
        let Some((column, id)) = persisted_key(model) else {
            return Err(OrmError::validation(format!(
                "cannot delete from {} without a primary key value",
                M::table_name()
            )));
        };
        self.model::<M>().where_eq(&column, id).delete(self).await
    }
}

/// The primary key column and its value, when the value is set.
fn persisted_key<M: Model>(model: &M) -> Option<(String, Value)> {
    let field = M::schema().primary_field()?;
    let id = model.primary_key()?;
    if id.is_blank() {
        return None;
    }
    Some((field.column().to_string(), id))
}

impl<E: Executor> Executor for Connection<E> {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.logger.before(sql, params.len());
        let start = Instant::now();
        let result = self.executor.query(sql, params).await;
        self.logger.after(sql, start.elapsed(), result.as_ref().err());
        result
    }

    async fn scan(&self, sql: &str, params: &[Value]) -> OrmResult<Option<Row>> {
        self.logger.before(sql, params.len());
        let start = Instant::now();
        let result = self.executor.scan(sql, params).await;
        self.logger.after(sql, start.elapsed(), result.as_ref().err());
        result
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.logger.before(sql, params.len());
        let start = Instant::now();
        let result = self.executor.execute(sql, params).await;
        self.logger.after(sql, start.elapsed(), result.as_ref().err());
        result
    }
}
