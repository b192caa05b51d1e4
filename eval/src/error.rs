//! Evaluation error types.

use thiserror::Error;

/// Errors raised while evaluating an expression.
///
/// Type names are those of the offending values: `integer`, `string`,
/// `null`, or the class name of a heap object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Field missing from the instance's layout.
    #[error("no such field: {field} in class {class}")]
    NoSuchField { field: String, class: String },

    /// Field access on null.
    #[error("trying to access {field} of null")]
    NullAccess { field: String },

    /// Field access on something that is not an instance.
    #[error("trying to access {field} of a value of type {type_name}")]
    NotAnInstance { field: String, type_name: String },

    /// Arithmetic on unsupported operand types.
    #[error("{verb} values of type {left} and {right} is not supported")]
    Arithmetic {
        verb: &'static str,
        left: String,
        right: String,
    },

    /// Non-boolean operand of AND/OR.
    #[error("{side} operand of {op} should be boolean (got {type_name})")]
    NotBoolean {
        side: &'static str,
        op: &'static str,
        type_name: String,
    },

    /// Comparison of incompatible values.
    #[error("comparing values of type {left} and {right} is not supported")]
    Comparison { left: String, right: String },
}

impl EvalError {
    pub fn no_such_field(field: impl Into<String>, class: impl Into<String>) -> Self {
        Self::NoSuchField {
            field: field.into(),
            class: class.into(),
        }
    }

    pub fn null_access(field: impl Into<String>) -> Self {
        Self::NullAccess {
            field: field.into(),
        }
    }

    pub fn not_an_instance(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::NotAnInstance {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    pub fn arithmetic(
        verb: &'static str,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::Arithmetic {
            verb,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn not_boolean(side: &'static str, op: &'static str, type_name: impl Into<String>) -> Self {
        Self::NotBoolean {
            side,
            op,
            type_name: type_name.into(),
        }
    }

    pub fn comparison(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Comparison {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
