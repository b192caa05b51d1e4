//! HQL hprof reader
//!
//! Decodes the binary heap-snapshot format written by JVM heap dumpers into
//! flat, identifier-keyed records:
//! - `reader`: header, top-level records and heap-dump sub-records
//! - `record`: the intermediate record types handed to the graph builder
//! - `cursor`: big-endian primitive decoding with offset tracking

mod cursor;
mod error;
mod reader;
mod record;
pub mod tag;

pub use cursor::Cursor;
pub use error::{DecodeError, DecodeResult};
pub use reader::read_snapshot;
pub use record::*;
