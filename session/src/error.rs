//! Session error types.

use thiserror::Error;

/// Errors from running one query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Parse error.
    #[error(transparent)]
    Parse(#[from] hql_parser::ParseError),

    /// Class lookup or execution error.
    #[error(transparent)]
    Query(#[from] hql_query::QueryError),
}

impl SessionError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, SessionError::Parse(_))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
