//! Raw SQL fragments that are rendered verbatim instead of bound.

use std::fmt;

/// A literal SQL fragment.
///
/// When an `Expression` appears where a bound value is expected (for example
/// as an UPDATE value), the grammar writes its text directly into the SQL and
/// no placeholder or binding is produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    /// Create a new raw expression.
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// The SQL text of the expression.
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Create a raw query expression.
///
/// # Example
/// ```ignore
/// conn.table("users")
///     .where_eq("id", 7)
///     .update(record! { "updated_at" => fluorm::raw("NOW()") }, &conn)
///     .await?;
/// ```
pub fn raw(sql: impl Into<String>) -> Expression {
    Expression::new(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_keeps_text() {
        let expr = raw("NOW()");
        assert_eq!(expr.value(), "NOW()");
        assert_eq!(expr.to_string(), "NOW()");
    }
}
