//! Graph construction and lookup errors.

use hql_core::Identifier;
use hql_hprof::DecodeError;
use thiserror::Error;

/// Errors raised while building or querying a [`crate::Heap`].
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unresolved reference to {id} from {from}")]
    UnresolvedReference { id: Identifier, from: Identifier },

    #[error("class {class} has no load-class record")]
    MissingClassName { class: Identifier },

    #[error("no string for identifier {id}")]
    MissingString { id: Identifier },

    #[error("superclass {superclass} of class {class} was never dumped")]
    UnknownSuperclass {
        class: Identifier,
        superclass: Identifier,
    },

    #[error("no such class: {name}")]
    NoSuchClass { name: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn unresolved_reference(id: Identifier, from: Identifier) -> Self {
        Self::UnresolvedReference { id, from }
    }

    pub fn missing_string(id: Identifier) -> Self {
        Self::MissingString { id }
    }

    pub fn no_such_class(name: impl Into<String>) -> Self {
        Self::NoSuchClass { name: name.into() }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
