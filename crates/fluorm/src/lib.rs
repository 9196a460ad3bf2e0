//! # fluorm
//!
//! A fluent SQL query builder and lightweight record mapper.
//!
//! ## Features
//!
//! - **Fluent builder**: chain `where_eq`, `join`, `order_by`, `limit`, ... then run a terminal method
//! - **Grammar compiler**: a pure transform from the query AST to MySQL text with `?` placeholders
//! - **Ordered bindings**: bound values always line up with their placeholders
//! - **Record mapping**: `#[derive(Model)]` maps struct members onto columns
//! - **Bring your own driver**: statements run through the [`Executor`] trait
//! - **SQL logging**: statements are emitted as `tracing` events at target `fluorm.sql`
//!
//! ## Example
//!
//! ```ignore
//! use fluorm::{Connection, Model, record};
//!
//! #[derive(Debug, Default, Model)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     balance: f64,
//! }
//!
//! let conn = Connection::new(my_executor);
//!
//! let richest: Option<User> = conn
//!     .table("users")
//!     .where_eq("gender", "M")
//!     .where_in("addr", ["Columbia", "Alaska"])
//!     .order_by_desc("balance")
//!     .first(&conn)
//!     .await?;
//!
//! conn.table("users")
//!     .where_eq("id", 7)
//!     .update(record! { "balance" => fluorm::raw("balance + 1") }, &conn)
//!     .await?;
//! ```

extern crate self as fluorm;

pub mod bindings;
pub mod builder;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod expression;
pub mod field;
pub mod grammar;
pub mod manager;
pub mod model;
pub mod monitor;
pub mod query;
pub mod row;
pub mod schema;
pub mod value;

pub use bindings::{Bindings, Segment};
pub use builder::{Builder, JoinClause, Property};
pub use client::{ExecResult, Executor};
pub use config::{DatabaseConfig, ManagerConfig};
pub use connection::Connection;
pub use error::{BoxError, OrmError, OrmResult};
pub use expression::{Expression, raw};
pub use field::Field;
pub use grammar::{Grammar, MySqlGrammar};
pub use manager::{Connector, Manager};
pub use model::Model;
pub use monitor::{QueryType, SqlLogger};
pub use query::{Boolean, Query};
pub use row::{FromRow, Row};
pub use schema::Schema;
pub use value::{FromValue, Record, Value};

#[cfg(feature = "derive")]
pub use fluorm_derive::Model;

/// Build a [`Record`] from `column => value` pairs.
///
/// ```
/// let record = fluorm::record! { "name" => "ada", "balance" => 42 };
/// assert_eq!(record.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert(::std::string::String::from($column), $crate::Value::from($value));
        )+
        record
    }};
}
