//! Fluent query builder.
//!
//! A [`Builder`] owns one statement: the [`Query`] AST, the [`Bindings`]
//! ledger that feeds its placeholders, and the [`Grammar`] that renders it.
//! Chain methods consume and return the builder; terminal methods
//! (`get`, `first`, `count`, `insert`, `update`, `delete`, ...) compile the
//! statement and hand it to an [`Executor`](crate::Executor).
//!
//! ```ignore
//! let users: Vec<User> = conn
//!     .table("users")
//!     .where_eq("gender", "M")
//!     .where_in("addr", ["Columbia", "Alaska"])
//!     .order_by_desc("balance")
//!     .limit(1)
//!     .get(&conn)
//!     .await?;
//! ```
//!
//! A builder describes a single statement and is not meant to be shared
//! between threads while it is being mutated. Cloning produces an independent
//! deep copy.

mod execute;
mod join;
mod select;
mod where_clause;

#[cfg(test)]
mod tests;

pub use join::JoinClause;

use crate::bindings::{Bindings, Segment};
use crate::grammar::{Grammar, MySqlGrammar};
use crate::query::{Query, Union};
use crate::value::Value;
use std::sync::Arc;

/// Query properties that [`Builder::clone_without`] can reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Columns,
    Orders,
    Limit,
    Offset,
}

/// Fluent builder for one SQL statement.
#[derive(Debug, Clone)]
pub struct Builder {
    grammar: Arc<dyn Grammar>,
    query: Query,
    bindings: Bindings,
}

impl Builder {
    /// Create an empty builder rendering with `grammar`.
    pub fn new(grammar: Arc<dyn Grammar>) -> Self {
        Self {
            grammar,
            query: Query::new(),
            bindings: Bindings::new(),
        }
    }

    /// Create a builder for `table` using the default MySQL grammar.
    pub fn table(table: &str) -> Self {
        Self::new(Arc::new(MySqlGrammar::new())).from(table)
    }

    /// Set the table which the query is targeting.
    pub fn from(mut self, table: &str) -> Self {
        self.query.from = table.to_string();
        self
    }

    /// The accumulated AST.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The binding ledger.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// The grammar used to compile this builder.
    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    /// Add a binding to the query.
    ///
    /// Lists are expanded, one binding per element.
    pub fn add_binding(mut self, value: impl Into<Value>, segment: Segment) -> Self {
        self.bindings.add(segment, value.into());
        self
    }

    /// Compile the SELECT statement.
    pub fn to_sql(&self) -> String {
        self.grammar.compile_select(&self.query)
    }

    /// All bindings in placeholder order.
    pub fn get_bindings(&self) -> Vec<Value> {
        self.bindings.flatten()
    }

    /// A deep copy with the given properties reset.
    pub fn clone_without(&self, properties: &[Property]) -> Self {
        let mut builder = self.clone();
        for property in properties {
            match property {
                Property::Columns => builder.query.columns = None,
                Property::Orders => builder.query.orders.clear(),
                Property::Limit => builder.query.limit = 0,
                Property::Offset => builder.query.offset = 0,
            }
        }
        builder
    }

    /// A deep copy with the given binding segments emptied.
    pub fn clone_without_bindings(&self, segments: &[Segment]) -> Self {
        let mut builder = self.clone();
        builder.bindings = self.bindings.without(segments);
        builder
    }

    /// Attach another query with `UNION`.
    ///
    /// Afterwards `order_by`, `limit` and `offset` apply to the union.
    pub fn union(self, other: Builder) -> Self {
        self.push_union(other, false)
    }

    /// Attach another query with `UNION ALL`.
    pub fn union_all(self, other: Builder) -> Self {
        self.push_union(other, true)
    }

    fn push_union(mut self, other: Builder, all: bool) -> Self {
        self.bindings.extend(Segment::Union, other.get_bindings());
        self.query.unions.push(Union {
            query: Box::new(other.query),
            all,
        });
        self
    }
}
