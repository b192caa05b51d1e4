//! Identity types for heap entities.
//!
//! Two families of identifiers live here:
//! - `Identifier`: the raw object handle written by the snapshot producer
//! - `ClassId`, `InstanceId`, `ArrayId`: dense arena indices assigned while
//!   building the heap graph

use std::fmt;

/// Raw object handle from a heap snapshot.
///
/// Snapshots declare an identifier width of 4 or 8 bytes. The bytes are packed
/// big-endian, so comparing two identifiers of the same width compares their
/// bytes lexicographically. The all-zero identifier is the null reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identifier(u64);

impl Identifier {
    /// The null reference.
    pub const NULL: Identifier = Identifier(0);

    /// Create an identifier from its packed value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Create an identifier from big-endian bytes.
    ///
    /// Returns `None` when more than eight bytes are given.
    pub fn from_be_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 8 {
            return None;
        }
        let raw = bytes
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        Some(Self(raw))
    }

    /// Get the packed value.
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Returns true if this is the null reference.
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Index of a class node in the heap arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Index of an instance node in the heap arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u32);

impl InstanceId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// Index of an array node in the heap arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(pub u32);

impl ArrayId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// Non-owning reference to any node of the heap graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Class(ClassId),
    Instance(InstanceId),
    Array(ArrayId),
}

impl ObjectRef {
    /// Returns true if this refers to an instance.
    pub fn is_instance(&self) -> bool {
        matches!(self, ObjectRef::Instance(_))
    }

    /// Get as an InstanceId if this refers to an instance.
    pub fn as_instance(&self) -> Option<InstanceId> {
        match self {
            ObjectRef::Instance(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as an ArrayId if this refers to an array.
    pub fn as_array(&self) -> Option<ArrayId> {
        match self {
            ObjectRef::Array(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as a ClassId if this refers to a class.
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            ObjectRef::Class(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<ClassId> for ObjectRef {
    fn from(id: ClassId) -> Self {
        ObjectRef::Class(id)
    }
}

impl From<InstanceId> for ObjectRef {
    fn from(id: InstanceId) -> Self {
        ObjectRef::Instance(id)
    }
}

impl From<ArrayId> for ObjectRef {
    fn from(id: ArrayId) -> Self {
        ObjectRef::Array(id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectRef::Class(id) => write!(f, "{}", id),
            ObjectRef::Instance(id) => write!(f, "{}", id),
            ObjectRef::Array(id) => write!(f, "{}", id),
        }
    }
}
