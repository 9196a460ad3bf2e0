//! Grammars compile a [`Query`] into SQL text.
//!
//! A grammar is a pure transform: it never inspects the database and only
//! fails for inputs it cannot represent (such as an INSERT whose records do
//! not share one column set).

mod mysql;


pub use mysql::MySqlGrammar;

use crate::bindings::{Bindings, Segment};
use crate::error::OrmResult;
use crate::query::Query;
use crate::value::{Record, Value};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Compiler from the query AST to dialect specific SQL.
pub trait Grammar: Send + Sync + fmt::Debug {
    /// Compile a select query into SQL.
    fn compile_select(&self, query: &Query) -> String;

    /// Compile an insert statement into SQL and its ordered bindings.
    fn compile_insert(&self, query: &Query, values: &[Record]) -> OrmResult<(String, Vec<Value>)>;

    /// Compile an update statement into SQL.
    fn compile_update(&self, query: &Query, values: &Record) -> String;

    /// Compile a delete statement into SQL.
    fn compile_delete(&self, query: &Query) -> String;

    /// Prepare the bindings for an update statement.
    ///
    /// Join bindings come first, then the update values in key order, then
    /// every remaining segment except `select`. Expressions among the update
    /// values render inline and are skipped.
    fn prepare_bindings_for_update(&self, bindings: &Bindings, values: &Record) -> Vec<Value> {
        let mut results: Vec<Value> = bindings.get(Segment::Join).to_vec();
        results.extend(
            values
                .values()
                .filter(|value| !self.is_expression(value))
                .cloned(),
        );
        results.extend(bindings.flatten_except(&[Segment::Select, Segment::Join]));
        results
    }

    /// The placeholder for a value, or the raw text of an expression.
    fn parameter(&self, value: &Value) -> String {
        match value.as_expression() {
            Some(expr) => expr.value().to_string(),
            None => "?".to_string(),
        }
    }

    /// Determine if the given value is a raw expression.
    fn is_expression(&self, value: &Value) -> bool {
        value.is_expression()
    }
}

static LEADING_BOOLEAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(and|or) ").expect("leading boolean pattern is valid")
});

/// Strip the leading `AND `/`OR ` from a joined predicate list.
///
/// Only the first connector is removed; every later one stays in place.
pub fn remove_leading_boolean(value: &str) -> String {
    LEADING_BOOLEAN.replace(value, "").into_owned()
}

/// Join non-empty segments with single spaces.
pub(crate) fn concatenate<S: AsRef<str>>(segments: &[S]) -> String {
    let mut sql = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        if !sql.is_empty() {
            sql.push(' ');
        }
        sql.push_str(segment);
    }
    sql
}
