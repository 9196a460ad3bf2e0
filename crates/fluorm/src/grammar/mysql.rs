//! MySQL grammar: back-tick identifiers and `?` placeholders.

use super::{Grammar, concatenate, remove_leading_boolean};
use crate::error::{OrmError, OrmResult};
use crate::query::{Aggregate, HavingKind, Join, Order, Query, Where, WhereKind};
use crate::value::{Record, Value};

/// SELECT components, in the order they are compiled.
#[derive(Debug, Clone, Copy)]
enum Component {
    Aggregate,
    Columns,
    From,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
}

const SELECT_COMPONENTS: [Component; 10] = [
    Component::Aggregate,
    Component::Columns,
    Component::From,
    Component::Joins,
    Component::Wheres,
    Component::Groups,
    Component::Havings,
    Component::Orders,
    Component::Limit,
    Component::Offset,
];

/// MySQL has no OFFSET without LIMIT; this is the largest row count it accepts.
const NO_LIMIT: u64 = u64::MAX;

/// Grammar for MySQL-compatible servers.
#[derive(Debug, Clone, Default)]
pub struct MySqlGrammar {
    table_prefix: String,
}

impl MySqlGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grammar that prefixes every table name.
    pub fn with_table_prefix(prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: prefix.into(),
        }
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Prefix and quote a table name.
    ///
    /// `users as u` becomes `` `users` as `u` ``.
    pub fn wrap_table(&self, table: &str) -> String {
        if let Some((name, alias)) = table.split_once(" as ") {
            return format!(
                "{} as {}",
                self.wrap_table(name.trim()),
                self.wrap_value(alias.trim())
            );
        }
        match table.rsplit_once('.') {
            Some((schema, name)) => format!(
                "{}.{}",
                self.wrap_value(schema),
                self.wrap_value(&format!("{}{}", self.table_prefix, name))
            ),
            None => self.wrap_value(&format!("{}{}", self.table_prefix, table)),
        }
    }

    /// Quote a column reference.
    ///
    /// The value is split on `.`; in a multi-part path the first segment is
    /// a table and only receives the prefix, every other segment is quoted.
    pub fn wrap(&self, value: &str) -> String {
        let segments: Vec<&str> = value.split('.').collect();
        let multi = segments.len() > 1;
        segments
            .iter()
            .enumerate()
            .map(|(key, segment)| {
                if key == 0 && multi {
                    format!("{}{}", self.table_prefix, segment)
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a single identifier segment. `*` is left alone.
    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        format!("`{}`", value.replace('`', "``"))
    }

    fn compile_components(&self, query: &Query) -> Vec<String> {
        let mut sql = Vec::with_capacity(SELECT_COMPONENTS.len());
        for component in SELECT_COMPONENTS {
            let part = match component {
                Component::Aggregate => match &query.aggregate {
                    Some(aggregate) => self.compile_aggregate(query, aggregate),
                    None => String::new(),
                },
                Component::Columns => self.compile_columns(query),
                Component::From if !query.from.is_empty() => {
                    format!("FROM {}", self.wrap_table(&query.from))
                }
                Component::Joins if !query.joins.is_empty() => self.compile_joins(&query.joins),
                Component::Wheres => self.compile_wheres(query),
                Component::Groups if !query.groups.is_empty() => {
                    format!("GROUP BY {}", query.groups.join(", "))
                }
                Component::Havings => self.compile_havings(query),
                Component::Orders => self.compile_orders(&query.orders),
                Component::Limit => compile_limit(query.limit, query.offset),
                Component::Offset if query.offset > 0 => format!("OFFSET {}", query.offset),
                _ => String::new(),
            };
            if !part.is_empty() {
                sql.push(part);
            }
        }
        sql
    }

    fn compile_aggregate(&self, query: &Query, aggregate: &Aggregate) -> String {
        let mut column = aggregate.columns.join(", ");
        if query.distinct && column != "*" {
            column = format!("DISTINCT {column}");
        }
        format!("SELECT {}({}) AS aggregate", aggregate.function, column)
    }

    fn compile_columns(&self, query: &Query) -> String {
        // An aggregating select builds its own projection.
        if query.aggregate.is_some() {
            return String::new();
        }
        let columns = match &query.columns {
            Some(columns) if !columns.is_empty() => columns.join(", "),
            _ => "*".to_string(),
        };
        let select = if query.distinct {
            "SELECT DISTINCT"
        } else {
            "SELECT"
        };
        format!("{select} {columns}")
    }

    fn compile_joins(&self, joins: &[Join]) -> String {
        joins
            .iter()
            .map(|join| {
                let on = self.compile_wheres(&join.query);
                concatenate(&[
                    format!("{} JOIN", join.kind),
                    self.wrap_table(&join.table),
                    on,
                ])
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn compile_wheres(&self, query: &Query) -> String {
        if query.wheres.is_empty() {
            return String::new();
        }
        let sql: Vec<String> = query
            .wheres
            .iter()
            .map(|w| format!("{} {}", w.boolean, self.compile_where(w)))
            .collect();
        let conjunction = if query.join_clause { "ON" } else { "WHERE" };
        format!("{} {}", conjunction, remove_leading_boolean(&sql.join(" ")))
    }

    fn compile_where(&self, node: &Where) -> String {
        match &node.kind {
            WhereKind::Basic {
                column,
                operator,
                value,
            } => format!(
                "{} {} {}",
                self.wrap(column),
                operator,
                self.parameter(value)
            ),
            WhereKind::Column {
                first,
                operator,
                second,
            } => format!("{} {} {}", self.wrap(first), operator, self.wrap(second)),
            WhereKind::Raw { sql } => sql.clone(),
            WhereKind::In { column, values } => {
                if values.is_empty() {
                    return "0 = 1".to_string();
                }
                format!("{} IN ({})", self.wrap(column), self.parameters(values))
            }
            WhereKind::NotIn { column, values } => {
                if values.is_empty() {
                    return "1 = 1".to_string();
                }
                format!("{} NOT IN ({})", self.wrap(column), self.parameters(values))
            }
            WhereKind::Null { column } => format!("{} IS NULL", self.wrap(column)),
            WhereKind::NotNull { column } => format!("{} IS NOT NULL", self.wrap(column)),
            WhereKind::Between { column, not } => {
                let between = if *not { "NOT BETWEEN" } else { "BETWEEN" };
                format!("{} {} ? AND ?", self.wrap(column), between)
            }
        }
    }

    fn compile_havings(&self, query: &Query) -> String {
        if query.havings.is_empty() {
            return String::new();
        }
        let sql: Vec<String> = query
            .havings
            .iter()
            .map(|having| match &having.kind {
                HavingKind::Basic {
                    column,
                    operator,
                    value,
                } => format!(
                    "{} {} {} {}",
                    having.boolean,
                    column,
                    operator,
                    self.parameter(value)
                ),
                HavingKind::Raw { sql } => format!("{} {}", having.boolean, sql),
            })
            .collect();
        format!("HAVING {}", remove_leading_boolean(&sql.join(" ")))
    }

    fn compile_orders(&self, orders: &[Order]) -> String {
        if orders.is_empty() {
            return String::new();
        }
        let sql: Vec<String> = orders
            .iter()
            .map(|order| match order {
                Order::Column { column, direction } => format!("{column} {direction}"),
                Order::Raw { sql } => sql.clone(),
            })
            .collect();
        format!("ORDER BY {}", sql.join(", "))
    }

    /// `UNION [ALL] <select>` for every attached query, then the ordering and
    /// paging of the combined result.
    fn compile_unions(&self, query: &Query) -> String {
        let mut sql: Vec<String> = query
            .unions
            .iter()
            .map(|union| {
                let keyword = if union.all { "UNION ALL" } else { "UNION" };
                format!("{} {}", keyword, self.compile_union_operand(&union.query))
            })
            .collect();
        sql.push(self.compile_orders(&query.union_orders));
        sql.push(compile_limit(query.union_limit, query.union_offset));
        if query.union_offset > 0 {
            sql.push(format!("OFFSET {}", query.union_offset));
        }
        concatenate(&sql)
    }

    /// A select taking part in a union. MySQL only accepts ORDER BY or
    /// LIMIT on a union operand when it is parenthesized.
    fn compile_union_operand(&self, query: &Query) -> String {
        let sql = self.compile_select(query);
        if query.has_unions() || is_ordered_or_paged(query) {
            format!("({sql})")
        } else {
            sql
        }
    }

    fn parameters(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|value| self.parameter(value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn compile_update_columns(&self, values: &Record) -> String {
        values
            .iter()
            .map(|(key, value)| format!("{} = {}", self.wrap(key), self.parameter(value)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Trailing `ORDER BY` / `LIMIT` shared by UPDATE and DELETE.
    fn compile_tail(&self, query: &Query) -> Vec<String> {
        let mut tail = vec![self.compile_orders(&query.orders)];
        if query.limit > 0 {
            tail.push(format!("LIMIT {}", query.limit));
        }
        tail
    }

    fn compile_delete_with_joins(&self, query: &Query, table: &str, wheres: String) -> String {
        let alias = match table.split_once(" as ") {
            Some((_, alias)) => alias.to_string(),
            None => table.to_string(),
        };
        concatenate(&[
            format!("DELETE {alias} FROM {table}"),
            self.compile_joins(&query.joins),
            wheres,
        ])
    }
}

fn is_ordered_or_paged(query: &Query) -> bool {
    !query.orders.is_empty() || query.limit > 0 || query.offset > 0
}

/// `LIMIT n`, or the largest row count when only an offset is set.
fn compile_limit(limit: u64, offset: u64) -> String {
    match (limit, offset) {
        (0, 0) => String::new(),
        (0, _) => format!("LIMIT {NO_LIMIT}"),
        (limit, _) => format!("LIMIT {limit}"),
    }
}

impl Grammar for MySqlGrammar {
    fn compile_select(&self, query: &Query) -> String {
        let sql = concatenate(&self.compile_components(query));
        if !query.has_unions() {
            return sql;
        }
        let base = if is_ordered_or_paged(query) {
            format!("({sql})")
        } else {
            sql
        };
        concatenate(&[base, self.compile_unions(query)])
    }

    fn compile_insert(&self, query: &Query, values: &[Record]) -> OrmResult<(String, Vec<Value>)> {
        let Some(first) = values.first() else {
            return Err(OrmError::validation("INSERT requires at least one record"));
        };
        let columns: Vec<&String> = first.keys().collect();

        let mut bindings = Vec::with_capacity(columns.len() * values.len());
        let mut groups = Vec::with_capacity(values.len());

        for (index, record) in values.iter().enumerate() {
            if record.len() != columns.len() || !columns.iter().all(|c| record.contains_key(*c)) {
                return Err(OrmError::validation(format!(
                    "INSERT record {index} has columns [{}] but the first record has [{}]",
                    record.keys().cloned().collect::<Vec<_>>().join(", "),
                    first.keys().cloned().collect::<Vec<_>>().join(", "),
                )));
            }

            let mut parameters = Vec::with_capacity(columns.len());
            for column in &columns {
                let value = &record[*column];
                parameters.push(self.parameter(value));
                if !self.is_expression(value) {
                    bindings.push(value.clone());
                }
            }
            groups.push(format!("({})", parameters.join(", ")));
        }

        let column_list = columns
            .iter()
            .map(|c| self.wrap(c))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.wrap_table(&query.from),
            column_list,
            groups.join(", ")
        );
        Ok((sql, bindings))
    }

    fn compile_update(&self, query: &Query, values: &Record) -> String {
        let table = self.wrap_table(&query.from);
        let joins = if query.joins.is_empty() {
            String::new()
        } else {
            self.compile_joins(&query.joins)
        };

        let mut sql = vec![
            format!("UPDATE {table}"),
            joins,
            format!("SET {}", self.compile_update_columns(values)),
            self.compile_wheres(query),
        ];
        sql.extend(self.compile_tail(query));
        concatenate(&sql)
    }

    fn compile_delete(&self, query: &Query) -> String {
        let table = self.wrap_table(&query.from);
        let wheres = self.compile_wheres(query);

        if !query.joins.is_empty() {
            return self.compile_delete_with_joins(query, &table, wheres);
        }

        let mut sql = vec![format!("DELETE FROM {table}"), wheres];
        sql.extend(self.compile_tail(query));
        concatenate(&sql)
    }
}
