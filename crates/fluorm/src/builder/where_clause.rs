//! WHERE and HAVING predicates.

use super::Builder;
use crate::bindings::Segment;
use crate::query::{Boolean, Having, HavingKind, Where, WhereKind};
use crate::value::Value;

impl Builder {
    fn push_where(mut self, kind: WhereKind, boolean: Boolean) -> Self {
        self.query.wheres.push(Where { kind, boolean });
        self
    }

    // ==================== Basic ====================

    /// Add an `=` predicate joined with AND.
    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_op_boolean(column, "=", value, Boolean::And)
    }

    /// Add a predicate with an explicit operator joined with AND.
    pub fn where_op(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.where_op_boolean(column, operator, value, Boolean::And)
    }

    /// Add a `=` predicate joined with OR.
    pub fn or_where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_op_boolean(column, "=", value, Boolean::Or)
    }

    /// Add a predicate with an explicit operator joined with OR.
    pub fn or_where(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.where_op_boolean(column, operator, value, Boolean::Or)
    }

    /// Add a basic predicate.
    ///
    /// An [`Expression`](crate::Expression) value renders inline and is not bound.
    pub fn where_op_boolean(
        mut self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
        boolean: Boolean,
    ) -> Self {
        let value = value.into();
        if !value.is_expression() {
            self.bindings.add(Segment::Where, value.clone());
        }
        self.push_where(
            WhereKind::Basic {
                column: column.to_string(),
                operator: operator.to_string(),
                value,
            },
            boolean,
        )
    }

    // ==================== Column comparison ====================

    /// Compare two columns with `=`.
    pub fn where_column(self, first: &str, second: &str) -> Self {
        self.where_column_op(first, "=", second, Boolean::And)
    }

    /// Compare two columns with `=`, joined with OR.
    pub fn or_where_column(self, first: &str, second: &str) -> Self {
        self.where_column_op(first, "=", second, Boolean::Or)
    }

    /// Compare two columns. Nothing is bound.
    pub fn where_column_op(
        self,
        first: &str,
        operator: &str,
        second: &str,
        boolean: Boolean,
    ) -> Self {
        self.push_where(
            WhereKind::Column {
                first: first.to_string(),
                operator: operator.to_string(),
                second: second.to_string(),
            },
            boolean,
        )
    }

    // ==================== Raw ====================

    /// Add a raw predicate with its own bindings.
    pub fn where_raw<I, V>(mut self, sql: &str, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.bindings
            .extend(Segment::Where, bindings.into_iter().map(Into::into));
        self.push_where(
            WhereKind::Raw {
                sql: sql.to_string(),
            },
            Boolean::And,
        )
    }

    /// Add a raw predicate joined with OR.
    pub fn or_where_raw<I, V>(mut self, sql: &str, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.bindings
            .extend(Segment::Where, bindings.into_iter().map(Into::into));
        self.push_where(
            WhereKind::Raw {
                sql: sql.to_string(),
            },
            Boolean::Or,
        )
    }

    // ==================== IN ====================

    /// Add `column IN (...)`.
    ///
    /// An empty list matches nothing.
    pub fn where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, Boolean::And, false)
    }

    pub fn or_where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, Boolean::Or, false)
    }

    /// Add `column NOT IN (...)`.
    ///
    /// An empty list matches everything.
    pub fn where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, Boolean::And, true)
    }

    pub fn or_where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, Boolean::Or, true)
    }

    fn push_in<I, V>(mut self, column: &str, values: I, boolean: Boolean, not: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        // Nested lists flatten into the ledger, so the node counts the same way.
        let mut flat = Vec::new();
        for value in values {
            match value.into() {
                Value::List(items) => flat.extend(items),
                other => flat.push(other),
            }
        }
        self.bindings.extend(
            Segment::Where,
            flat.iter().filter(|value| !value.is_expression()).cloned(),
        );
        let column = column.to_string();
        let kind = if not {
            WhereKind::NotIn {
                column,
                values: flat,
            }
        } else {
            WhereKind::In {
                column,
                values: flat,
            }
        };
        self.push_where(kind, boolean)
    }

    // ==================== NULL ====================

    pub fn where_null(self, column: &str) -> Self {
        self.push_where(
            WhereKind::Null {
                column: column.to_string(),
            },
            Boolean::And,
        )
    }

    pub fn or_where_null(self, column: &str) -> Self {
        self.push_where(
            WhereKind::Null {
                column: column.to_string(),
            },
            Boolean::Or,
        )
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.push_where(
            WhereKind::NotNull {
                column: column.to_string(),
            },
            Boolean::And,
        )
    }

    pub fn or_where_not_null(self, column: &str) -> Self {
        self.push_where(
            WhereKind::NotNull {
                column: column.to_string(),
            },
            Boolean::Or,
        )
    }

    // ==================== BETWEEN ====================

    pub fn where_between(self, column: &str, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.push_between(column, from.into(), to.into(), Boolean::And, false)
    }

    pub fn or_where_between(
        self,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.push_between(column, from.into(), to.into(), Boolean::Or, false)
    }

    pub fn where_not_between(
        self,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.push_between(column, from.into(), to.into(), Boolean::And, true)
    }

    pub fn or_where_not_between(
        self,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.push_between(column, from.into(), to.into(), Boolean::Or, true)
    }

    fn push_between(
        mut self,
        column: &str,
        from: Value,
        to: Value,
        boolean: Boolean,
        not: bool,
    ) -> Self {
        self.bindings.add(Segment::Where, from);
        self.bindings.add(Segment::Where, to);
        self.push_where(
            WhereKind::Between {
                column: column.to_string(),
                not,
            },
            boolean,
        )
    }

    // ==================== HAVING ====================

    /// Add a HAVING predicate joined with AND.
    pub fn having(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.push_having(column, operator, value.into(), Boolean::And)
    }

    /// Add a HAVING predicate joined with OR.
    pub fn or_having(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.push_having(column, operator, value.into(), Boolean::Or)
    }

    /// Add a raw HAVING predicate with its own bindings.
    pub fn having_raw<I, V>(mut self, sql: &str, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.bindings
            .extend(Segment::Having, bindings.into_iter().map(Into::into));
        self.query.havings.push(Having {
            kind: HavingKind::Raw {
                sql: sql.to_string(),
            },
            boolean: Boolean::And,
        });
        self
    }

    fn push_having(mut self, column: &str, operator: &str, value: Value, boolean: Boolean) -> Self {
        if !value.is_expression() {
            self.bindings.add(Segment::Having, value.clone());
        }
        self.query.havings.push(Having {
            kind: HavingKind::Basic {
                column: column.to_string(),
                operator: operator.to_string(),
                value,
            },
            boolean,
        });
        self
    }
}
