//! SQL logging through `tracing`.
//!
//! [`Connection`](crate::Connection) hands every statement to its
//! [`SqlLogger`] before and after execution. Events are emitted at target
//! `fluorm.sql`, so they can be filtered independently of application logs.

use crate::error::OrmError;
use std::fmt;
use std::time::Duration;
use tracing::Level;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// Other SQL (e.g., DDL, custom)
    Other,
}

impl QueryType {
    /// Detect query type from SQL string.
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = strip_sql_prefix(sql);
        if starts_with_keyword(trimmed, "SELECT") || starts_with_keyword(trimmed, "WITH") {
            QueryType::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            QueryType::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            QueryType::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Select => write!(f, "SELECT"),
            QueryType::Insert => write!(f, "INSERT"),
            QueryType::Update => write!(f, "UPDATE"),
            QueryType::Delete => write!(f, "DELETE"),
            QueryType::Other => write!(f, "OTHER"),
        }
    }
}

/// Skip leading whitespace, comments and opening parentheses.
fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") {
            match s.find('\n') {
                Some(pos) => s = &s[pos + 1..],
                None => return "",
            }
            continue;
        }
        if s.starts_with("/*") {
            match s.find("*/") {
                Some(pos) => s = &s[pos + 2..],
                None => return "",
            }
            continue;
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            return s;
        }
    }
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}

/// Cut `sql` to at most `max_bytes`, on a char boundary.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN => tracing::warn!($($field)*),
            Level::INFO => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

/// Emits the SQL a connection executes as `tracing` events.
#[derive(Debug, Clone)]
pub struct SqlLogger {
    /// Tracing event level for statements.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Statements slower than this are reported at WARN.
    pub slow_query_threshold: Option<Duration>,
    /// Set to `false` to silence statement events entirely.
    pub enabled: bool,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            slow_query_threshold: None,
            enabled: true,
        }
    }
}

impl SqlLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger that emits nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Log a statement about to be executed.
    pub fn before(&self, sql: &str, param_count: usize) {
        if !self.enabled {
            return;
        }
        let query_type = QueryType::from_sql(sql);
        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "fluorm.sql",
            %query_type,
            param_count,
            sql = %sql,
        );
    }

    /// Log the outcome of a statement.
    pub fn after(&self, sql: &str, elapsed: Duration, error: Option<&OrmError>) {
        if !self.enabled {
            return;
        }
        let query_type = QueryType::from_sql(sql);
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if let Some(error) = error {
            tracing::warn!(
                target: "fluorm.sql",
                %query_type,
                elapsed_ms,
                error = %error,
                "statement failed"
            );
            return;
        }
        match self.slow_query_threshold {
            Some(threshold) if elapsed > threshold => {
                tracing::warn!(
                    target: "fluorm.sql",
                    %query_type,
                    elapsed_ms,
                    sql = %self.truncate_sql(sql),
                    "slow query"
                );
            }
            _ => tracing::trace!(target: "fluorm.sql", %query_type, elapsed_ms, "done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_query_type() {
        assert_eq!(QueryType::from_sql("SELECT * FROM `users`"), QueryType::Select);
        assert_eq!(QueryType::from_sql("  insert into t values (?)"), QueryType::Insert);
        assert_eq!(
            QueryType::from_sql("-- touch\nUPDATE `t` SET `a` = ?"),
            QueryType::Update
        );
        assert_eq!(
            QueryType::from_sql("/* hint */ DELETE FROM `t`"),
            QueryType::Delete
        );
        assert_eq!(QueryType::from_sql("(SELECT 1)"), QueryType::Select);
        assert_eq!(QueryType::from_sql("SHOW TABLES"), QueryType::Other);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("abc", 10), "abc");

        let logger = SqlLogger::new().max_sql_length(6);
        assert_eq!(logger.truncate_sql("SELECT *"), "SELECT...");
        assert_eq!(logger.no_truncate().truncate_sql("SELECT *"), "SELECT *");
    }
}
