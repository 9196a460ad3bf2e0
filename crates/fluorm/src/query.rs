//! The statement AST accumulated by [`Builder`](crate::Builder).
//!
//! A [`Query`] is plain data: the builder appends clauses to it and a
//! [`Grammar`](crate::Grammar) renders it. Clause lists only grow while a
//! statement is being built.

use crate::value::Value;
use std::fmt;

/// Connector placed in front of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boolean {
    #[default]
    And,
    Or,
}

impl Boolean {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boolean::And => "AND",
            Boolean::Or => "OR",
        }
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate node of a WHERE (or join ON) clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    pub kind: WhereKind,
    pub boolean: Boolean,
}

/// Discriminant and payload of a [`Where`] node.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereKind {
    /// `column operator ?`
    Basic {
        column: String,
        operator: String,
        value: Value,
    },
    /// `first operator second`, both sides are identifiers
    Column {
        first: String,
        operator: String,
        second: String,
    },
    /// Verbatim SQL
    Raw { sql: String },
    /// `column IN (?, ...)`
    In { column: String, values: Vec<Value> },
    /// `column NOT IN (?, ...)`
    NotIn { column: String, values: Vec<Value> },
    /// `column IS NULL`
    Null { column: String },
    /// `column IS NOT NULL`
    NotNull { column: String },
    /// `column [NOT] BETWEEN ? AND ?`
    Between { column: String, not: bool },
}

/// Predicate node of a HAVING clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Having {
    pub kind: HavingKind,
    pub boolean: Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HavingKind {
    Basic {
        column: String,
        operator: String,
        value: Value,
    },
    Raw { sql: String },
}

/// ORDER BY entry. Used for both the base query and the union orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Column { column: String, direction: String },
    Raw { sql: String },
}

/// An aggregate projection such as `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub function: String,
    pub columns: Vec<String>,
}

/// A join target together with its ON clause.
///
/// The nested query only carries predicates and has
/// [`Query::join_clause`] set, so its predicates render after `ON`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: String,
    pub table: String,
    pub query: Query,
}

/// A query attached with UNION.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub query: Box<Query>,
    pub all: bool,
}

/// One statement's clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub distinct: bool,
    /// Projection list. `None` means never set; the grammar renders `*`.
    pub columns: Option<Vec<String>>,
    pub from: String,
    pub joins: Vec<Join>,
    pub wheres: Vec<Where>,
    pub groups: Vec<String>,
    pub havings: Vec<Having>,
    pub orders: Vec<Order>,
    /// Zero means no limit.
    pub limit: u64,
    /// Zero means no offset.
    pub offset: u64,
    pub unions: Vec<Union>,
    pub union_orders: Vec<Order>,
    pub union_limit: u64,
    pub union_offset: u64,
    pub aggregate: Option<Aggregate>,
    /// This query is the ON clause of a join.
    pub join_clause: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the nested query that holds a join's ON predicates.
    pub fn for_join() -> Self {
        Self {
            join_clause: true,
            ..Self::default()
        }
    }

    pub fn has_unions(&self) -> bool {
        !self.unions.is_empty()
    }
}
