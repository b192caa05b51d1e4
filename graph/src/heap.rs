//! The materialized, read-only heap.

use hql_core::{ArrayId, ClassId, Identifier, InstanceId, ObjectRef, Primitive};
use hql_hprof::{read_snapshot, Header, Snapshot};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::builder::build_heap;
use crate::error::{GraphError, GraphResult};
use crate::index::{ClassNameIndex, ObjectIndex};
use crate::node::{Array, Class, FieldValue, Instance};

/// Class name of Java strings.
pub const STRING_CLASS: &str = "java.lang.String";

/// A resolved heap snapshot.
///
/// Owns every class, instance and array node; nodes refer to each other
/// through arena indices.
#[derive(Debug)]
pub struct Heap {
    pub(crate) header: Header,
    pub(crate) classes: Vec<Class>,
    pub(crate) instances: Vec<Instance>,
    pub(crate) arrays: Vec<Array>,
    pub(crate) objects: ObjectIndex,
    pub(crate) names: ClassNameIndex,
}

impl Heap {
    // ==================== LOADING ====================

    /// Build a heap from decoded snapshot records.
    pub fn from_snapshot(snapshot: Snapshot) -> GraphResult<Self> {
        build_heap(snapshot)
    }

    /// Decode and build a heap from snapshot bytes.
    pub fn from_bytes(bytes: &[u8]) -> GraphResult<Self> {
        let snapshot = read_snapshot(bytes)?;
        Self::from_snapshot(snapshot)
    }

    /// Memory-map a snapshot file and build its heap.
    pub fn open(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and only lives until decoding
        // has copied everything it needs into owned records.
        let mmap = unsafe { Mmap::map(&file)? };
        info!(path = %path.display(), bytes = mmap.len(), "Mapped snapshot");
        Self::from_bytes(&mmap)
    }

    // ==================== LOOKUP ====================

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Look up a class by its dotted or slashed name.
    pub fn class_by_name(&self, name: &str) -> GraphResult<&Class> {
        self.find_class(name)
            .ok_or_else(|| GraphError::no_such_class(name))
    }

    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.find_class_id(name).map(|id| self.class(id))
    }

    /// Arena index of a class, by dotted or slashed name.
    pub fn find_class_id(&self, name: &str) -> Option<ClassId> {
        self.names
            .get(name)
            .or_else(|| self.names.get(&name.replace('/', ".")))
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn arrays(&self) -> &[Array] {
        &self.arrays
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    pub fn instance(&self, id: InstanceId) -> &Instance {
        &self.instances[id.index()]
    }

    pub fn array(&self, id: ArrayId) -> &Array {
        &self.arrays[id.index()]
    }

    /// The class of an instance.
    pub fn class_of(&self, id: InstanceId) -> &Class {
        self.class(self.instance(id).class)
    }

    /// The node a snapshot identifier resolved to.
    pub fn resolve(&self, id: Identifier) -> Option<ObjectRef> {
        self.objects.get(id)
    }

    /// Snapshot identifier of a node.
    pub fn identifier(&self, node: ObjectRef) -> Identifier {
        match node {
            ObjectRef::Class(id) => self.class(id).id,
            ObjectRef::Instance(id) => self.instance(id).id,
            ObjectRef::Array(id) => self.array(id).id,
        }
    }

    /// Java-style type name of a node: the class name of an instance,
    /// `java.lang.Class` for a class, `int[]` and the like for arrays.
    pub fn type_name(&self, node: ObjectRef) -> String {
        match node {
            ObjectRef::Class(_) => "java.lang.Class".to_string(),
            ObjectRef::Instance(id) => self.class_of(id).name.clone(),
            ObjectRef::Array(id) => self.array(id).type_name(),
        }
    }

    // ==================== STRINGS ====================

    pub fn is_string(&self, id: InstanceId) -> bool {
        self.class_of(id).name == STRING_CLASS
    }

    /// Text of a `java.lang.String` instance.
    ///
    /// `char[]` values are UTF-16. `byte[]` values are Latin-1 unless the
    /// instance's `coder` is 1, in which case they are UTF-16LE.
    pub fn string_value(&self, id: InstanceId) -> Option<String> {
        if !self.is_string(id) {
            return None;
        }
        let instance = self.instance(id);
        let array = match instance.field("value")? {
            FieldValue::Ref(ObjectRef::Array(array)) => self.array(*array),
            _ => return None,
        };

        let utf16 = matches!(
            instance.field("coder"),
            Some(FieldValue::Primitive(Primitive::Byte(1)))
        );
        if utf16 && array.element_type == hql_core::BasicType::Byte {
            let units: Vec<u16> = array
                .bytes()
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            return Some(String::from_utf16_lossy(&units));
        }
        array.text()
    }

    /// Text of a string instance or a `char[]`/`byte[]` array.
    pub fn text_of(&self, node: ObjectRef) -> Option<String> {
        match node {
            ObjectRef::Instance(id) => self.string_value(id),
            ObjectRef::Array(id) => self.array(id).text(),
            ObjectRef::Class(_) => None,
        }
    }
}
