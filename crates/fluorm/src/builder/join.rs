//! JOIN clauses.

use super::Builder;
use crate::bindings::Segment;
use crate::query::{Boolean, Join, Query, Where, WhereKind};
use crate::value::Value;

const JOIN_TYPES: [&str; 4] = ["INNER", "LEFT", "RIGHT", "CROSS"];

/// The ON clause of a join, built inside [`Builder::join_with`].
#[derive(Debug, Clone)]
pub struct JoinClause {
    query: Query,
    bindings: Vec<Value>,
}

impl JoinClause {
    fn new() -> Self {
        Self {
            query: Query::for_join(),
            bindings: Vec::new(),
        }
    }

    /// Compare two columns, joined with AND.
    pub fn on(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_column(first, operator, second, Boolean::And)
    }

    /// Compare two columns, joined with OR.
    pub fn or_on(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_column(first, operator, second, Boolean::Or)
    }

    /// Compare a column with a bound value.
    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_op(column, "=", value.into())
    }

    fn where_op(mut self, column: &str, operator: &str, value: Value) -> Self {
        if !value.is_expression() {
            self.bindings.push(value.clone());
        }
        self.query.wheres.push(Where {
            kind: WhereKind::Basic {
                column: column.to_string(),
                operator: operator.to_string(),
                value,
            },
            boolean: Boolean::And,
        });
        self
    }

    fn push_column(mut self, first: &str, operator: &str, second: &str, boolean: Boolean) -> Self {
        self.query.wheres.push(Where {
            kind: WhereKind::Column {
                first: first.to_string(),
                operator: operator.to_string(),
                second: second.to_string(),
            },
            boolean,
        });
        self
    }
}

impl Builder {
    /// Add an inner join comparing two columns.
    pub fn join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_with(table, "inner", |j| j.on(first, operator, second))
    }

    /// Add a left join comparing two columns.
    pub fn left_join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_with(table, "left", |j| j.on(first, operator, second))
    }

    /// Add a right join comparing two columns.
    pub fn right_join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_with(table, "right", |j| j.on(first, operator, second))
    }

    /// Add an inner join whose ON compares a column with a bound value.
    pub fn join_where(
        self,
        table: &str,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        let value = value.into();
        self.join_with(table, "inner", |j| j.where_op(column, operator, value))
    }

    /// Add a join and build its ON clause with a closure.
    ///
    /// # Panics
    ///
    /// Panics when `kind` is not one of `inner`, `left`, `right`, `cross`
    /// (any case).
    pub fn join_with<F>(mut self, table: &str, kind: &str, build: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        let kind = kind.to_uppercase();
        if !JOIN_TYPES.contains(&kind.as_str()) {
            panic!("unsupported join type `{kind}`");
        }
        let clause = build(JoinClause::new());
        self.bindings.extend(Segment::Join, clause.bindings);
        self.query.joins.push(Join {
            kind,
            table: table.to_string(),
            query: clause.query,
        });
        self
    }
}
