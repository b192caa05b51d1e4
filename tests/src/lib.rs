//! HQL test support
//!
//! Writes hprof snapshots in memory so every layer of the workspace can be
//! tested against real bytes:
//! - `snapshot`: the fluent [`SnapshotBuilder`]
//! - `fixtures`: ready-made heaps shared by the end-to-end tests

mod snapshot;

pub use snapshot::{FieldValue, SnapshotBuilder};

pub mod prelude {
    pub use crate::fixtures;
    pub use crate::{FieldValue, SnapshotBuilder};
    pub use hql_core::BasicType;
}
