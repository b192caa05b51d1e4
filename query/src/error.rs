//! Query error types.

use hql_eval::EvalError;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur during query execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("no such class: {name}")]
    NoSuchClass { name: String },

    #[error("filter expression should be boolean (got {type_name})")]
    NonBooleanFilter { type_name: String },

    #[error("sort keys of type {left} and {right} are not comparable")]
    IncomparableSortKeys { left: String, right: String },

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl QueryError {
    pub fn no_such_class(name: impl Into<String>) -> Self {
        Self::NoSuchClass { name: name.into() }
    }

    pub fn non_boolean_filter(type_name: impl Into<String>) -> Self {
        Self::NonBooleanFilter {
            type_name: type_name.into(),
        }
    }

    pub fn incomparable_sort_keys(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::IncomparableSortKeys {
            left: left.into(),
            right: right.into(),
        }
    }
}
