//! HQL heap graph
//!
//! Resolves the flat records of an hprof snapshot into a navigable graph:
//! - `Heap`: arenas of classes, instances and arrays plus lookups
//! - `Class`, `Instance`, `Array`: nodes referring to each other by index
//! - Reference resolution is memoized, so shared and cyclic references map
//!   to a single node

mod builder;
mod error;
mod heap;
mod index;
mod node;

pub use error::{GraphError, GraphResult};
pub use heap::{Heap, STRING_CLASS};
pub use node::{Array, Class, FieldValue, Instance};
