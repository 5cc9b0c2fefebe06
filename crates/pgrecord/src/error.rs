//! Error types for pgrecord

use thiserror::Error;

/// Result type alias for pgrecord operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for query building and database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conditions were given in a shape the builder cannot turn into a filter
    #[error("Unsupported condition shape: {0}")]
    InvalidConditionShape(String),

    /// `{name:array}` was used with a bind value that is not a list
    #[error("Array placeholder {{{name}:array}} used with a non-sequence value")]
    ArrayPlaceholderTypeMismatch { name: String },

    /// A placeholder in the filter has no matching bind entry
    #[error("Unresolved placeholder '{name}': no bind value supplied")]
    UnresolvedPlaceholder { name: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid condition shape error
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidConditionShape(message.into())
    }

    /// Create an array placeholder mismatch error
    pub fn array_mismatch(name: impl Into<String>) -> Self {
        Self::ArrayPlaceholderTypeMismatch { name: name.into() }
    }

    /// Create an unresolved placeholder error
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::UnresolvedPlaceholder { name: name.into() }
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this error was raised while building or translating parameters,
    /// i.e. before anything reached the database.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConditionShape(_)
                | Self::ArrayPlaceholderTypeMismatch { .. }
                | Self::UnresolvedPlaceholder { .. }
                | Self::Validation(_)
        )
    }

    /// Parse a tokio_postgres error into a more specific OrmError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::OrmError;

    #[test]
    fn array_mismatch_message_names_the_placeholder() {
        let err = OrmError::array_mismatch("ids");
        assert_eq!(
            err.to_string(),
            "Array placeholder {ids:array} used with a non-sequence value"
        );
    }

    #[test]
    fn build_errors_are_classified() {
        assert!(OrmError::invalid_shape("number").is_build_error());
        assert!(OrmError::unresolved("x").is_build_error());
        assert!(!OrmError::Connection("refused".into()).is_build_error());
    }
}
