//! Projection, grouping, ordering and paging.

use super::Builder;
use crate::bindings::Segment;
use crate::query::Order;
use crate::value::Value;

impl Builder {
    // ==================== Projection ====================

    /// Replace the projection.
    ///
    /// An empty slice selects `*`.
    pub fn select(mut self, columns: &[&str]) -> Self {
        let columns = if columns.is_empty() {
            vec!["*".to_string()]
        } else {
            columns.iter().map(|c| (*c).to_string()).collect()
        };
        self.query.columns = Some(columns);
        self
    }

    /// Select every column.
    pub fn select_all(self) -> Self {
        self.select(&[])
    }

    /// Append columns to the projection.
    pub fn add_select(mut self, columns: &[&str]) -> Self {
        self.query
            .columns
            .get_or_insert_with(Vec::new)
            .extend(columns.iter().map(|c| (*c).to_string()));
        self
    }

    /// Append a raw projection expression with its own bindings.
    pub fn select_raw<I, V>(mut self, sql: &str, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.bindings
            .extend(Segment::Select, bindings.into_iter().map(Into::into));
        self.query
            .columns
            .get_or_insert_with(Vec::new)
            .push(sql.to_string());
        self
    }

    /// Return distinct rows.
    pub fn distinct(mut self) -> Self {
        self.query.distinct = true;
        self
    }

    // ==================== Grouping ====================

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.query
            .groups
            .extend(columns.iter().map(|c| (*c).to_string()));
        self
    }

    // ==================== Ordering ====================

    /// Add an ORDER BY entry.
    ///
    /// Once a union is attached the entry orders the union instead.
    ///
    /// # Panics
    ///
    /// Panics when `direction` is not `asc` or `desc` (any case).
    pub fn order_by(mut self, column: &str, direction: &str) -> Self {
        let direction = direction.to_uppercase();
        if direction != "ASC" && direction != "DESC" {
            panic!("order direction must be `asc` or `desc`, got `{direction}`");
        }
        let order = Order::Column {
            column: column.to_string(),
            direction,
        };
        if self.query.has_unions() {
            self.query.union_orders.push(order);
        } else {
            self.query.orders.push(order);
        }
        self
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, "desc")
    }

    /// Add a raw ORDER BY entry with its own bindings.
    ///
    /// Once a union is attached the entry orders the combined result, so its
    /// bindings follow the union's.
    pub fn order_by_raw<I, V>(mut self, sql: &str, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let order = Order::Raw {
            sql: sql.to_string(),
        };
        let segment = if self.query.has_unions() {
            self.query.union_orders.push(order);
            Segment::Union
        } else {
            self.query.orders.push(order);
            Segment::Order
        };
        self.bindings
            .extend(segment, bindings.into_iter().map(Into::into));
        self
    }

    // ==================== Paging ====================

    /// Set the row limit. Zero removes it.
    pub fn limit(mut self, value: u64) -> Self {
        if self.query.has_unions() {
            self.query.union_limit = value;
        } else {
            self.query.limit = value;
        }
        self
    }

    /// Alias for [`limit`](Self::limit).
    pub fn take(self, value: u64) -> Self {
        self.limit(value)
    }

    /// Set the number of rows to skip. Zero removes it.
    pub fn offset(mut self, value: u64) -> Self {
        if self.query.has_unions() {
            self.query.union_offset = value;
        } else {
            self.query.offset = value;
        }
        self
    }

    /// Alias for [`offset`](Self::offset).
    pub fn skip(self, value: u64) -> Self {
        self.offset(value)
    }
}
