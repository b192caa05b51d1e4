//! HQL Core Types
//!
//! This crate provides the foundational types used throughout HQL:
//! - Snapshot identifiers and heap arena indices (Identifier, ClassId, InstanceId, ArrayId)
//! - Field encodings and decoded primitives (BasicType, Primitive)
//! - The dynamically-typed query value (Value)

mod basic_type;
mod id;
mod value;

pub use basic_type::*;
pub use id::*;
pub use value::*;
