//! Decode error types.

use hql_core::Identifier;
use thiserror::Error;

/// Errors raised while decoding a snapshot. All of them abort the load.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Input ended before a value could be read.
    #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The format string in the header is not null-terminated.
    #[error("unterminated format string in header")]
    UnterminatedHeader,

    /// Identifier width other than 4 or 8.
    #[error("unsupported identifier size: {size}")]
    UnsupportedIdentifierSize { size: u32 },

    /// Type code outside the BasicType enumeration.
    #[error("unknown basic type: {code} at offset {offset}")]
    UnknownBasicType { code: u8, offset: usize },

    /// Heap-dump sub-record tag this reader cannot size.
    #[error("unknown heap dump record tag 0x{tag:02x} at offset {offset}")]
    UnknownHeapDumpTag { tag: u8, offset: usize },

    /// An instance dump names a class that was never dumped.
    #[error("instance {instance} refers to unknown class {class}")]
    UnknownClass {
        instance: Identifier,
        class: Identifier,
    },

    /// The superclass chain of a class loops back on itself.
    #[error("class hierarchy of {class} is cyclic")]
    CyclicHierarchy { class: Identifier },

    /// The field layout of a class does not match an instance blob.
    #[error("instance {instance} declares {declared} bytes of fields but its class layout needs {needed}")]
    FieldLengthMismatch {
        instance: Identifier,
        declared: usize,
        needed: usize,
    },
}

impl DecodeError {
    pub fn unexpected_eof(offset: usize, needed: usize, available: usize) -> Self {
        Self::UnexpectedEof {
            offset,
            needed,
            available,
        }
    }

    pub fn unknown_basic_type(code: u8, offset: usize) -> Self {
        Self::UnknownBasicType { code, offset }
    }

    pub fn unknown_heap_dump_tag(tag: u8, offset: usize) -> Self {
        Self::UnknownHeapDumpTag { tag, offset }
    }
}

/// Result type for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;
