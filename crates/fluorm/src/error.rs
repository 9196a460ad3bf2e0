//! Error types for fluorm

use thiserror::Error;

/// Result type alias for fluorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Boxed error returned by an [`Executor`](crate::Executor) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for query building, mapping and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// Connection could not be opened
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution failed inside the executor
    #[error("Execution error: {0}")]
    Execution(#[source] BoxError),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A value could not be converted to the requested type
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OrmError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap an executor failure without altering it
    pub fn execution(err: impl Into<BoxError>) -> Self {
        Self::Execution(err.into())
    }

    /// Create a conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Attach a column name to a conversion error.
    ///
    /// Errors that already carry a column are returned unchanged.
    pub fn for_column(self, column: &str) -> Self {
        match self {
            Self::Conversion(message) => Self::decode(column, message),
            other => other,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a connection failure
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is an executor failure
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
