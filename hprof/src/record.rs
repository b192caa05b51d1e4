//! Intermediate records decoded from a snapshot.
//!
//! Records still refer to each other by raw `Identifier`; the graph builder
//! resolves them into arena nodes and then drops them.

use hql_core::{BasicType, Identifier, Primitive};
use std::collections::HashMap;

/// A value as stored in the snapshot: a primitive or an object handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    Ref(Identifier),
    Primitive(Primitive),
}

/// Snapshot file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Format name, e.g. `JAVA PROFILE 1.0.2`.
    pub format: String,
    /// Width of every identifier in bytes (4 or 8).
    pub identifier_size: u32,
    /// Milliseconds since the epoch.
    pub timestamp: u64,
}

/// Declared instance field of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name_id: Identifier,
    pub ty: BasicType,
}

/// Class object dump.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRecord {
    pub id: Identifier,
    /// Null for `java.lang.Object` and primitive-array classes.
    pub superclass_id: Identifier,
    pub instance_size: u32,
    pub static_fields: Vec<(Identifier, RawValue)>,
    /// Fields declared by this class only, in declaration order.
    pub instance_fields: Vec<FieldDescriptor>,
}

/// Instance object dump with its field blob already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRecord {
    pub id: Identifier,
    pub class_id: Identifier,
    /// Own fields first, then each ancestor's, as laid out by the writer.
    pub fields: Vec<(Identifier, RawValue)>,
}

/// Object array dump.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectArrayRecord {
    pub id: Identifier,
    pub elements: Vec<Identifier>,
}

/// Primitive array dump.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveArrayRecord {
    pub id: Identifier,
    pub element_type: BasicType,
    pub elements: Vec<Primitive>,
}

/// Any instance-like record: something a field can point at other than a class.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectRecord {
    Instance(InstanceRecord),
    ObjectArray(ObjectArrayRecord),
    PrimitiveArray(PrimitiveArrayRecord),
}

impl ObjectRecord {
    pub fn id(&self) -> Identifier {
        match self {
            ObjectRecord::Instance(r) => r.id,
            ObjectRecord::ObjectArray(r) => r.id,
            ObjectRecord::PrimitiveArray(r) => r.id,
        }
    }
}

/// Everything the reader keeps from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub header: Header,
    /// String id -> text.
    pub strings: HashMap<Identifier, String>,
    /// Class id -> name string id.
    pub class_names: HashMap<Identifier, Identifier>,
    /// Class dumps in snapshot order.
    pub classes: Vec<ClassRecord>,
    /// Instance and array dumps in snapshot order.
    pub objects: Vec<ObjectRecord>,
}

impl Snapshot {
    pub fn instance_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o, ObjectRecord::Instance(_)))
            .count()
    }
}
