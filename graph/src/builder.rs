//! Heap graph construction.
//!
//! Turns the identifier-keyed records of a [`Snapshot`] into arena nodes in
//! four passes:
//! 1. allocate one `Class` per class dump
//! 2. resolve every object record through a memoized depth-first walk
//! 3. name classes and fill in superclasses, statics and field layouts
//! 4. fill in instance fields and attach instances to their classes
//!
//! Nodes are cached before anything they reference is resolved, so cyclic
//! structures terminate and every identifier maps to exactly one node.

use hql_core::{ArrayId, BasicType, ClassId, Identifier, InstanceId, ObjectRef};
use hql_hprof::{ClassRecord, Header, ObjectRecord, RawValue, Snapshot};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{GraphError, GraphResult};
use crate::heap::Heap;
use crate::index::{ClassNameIndex, ObjectIndex};
use crate::node::{Array, Class, FieldValue, Instance};

/// Build a heap from decoded records.
pub(crate) fn build_heap(snapshot: Snapshot) -> GraphResult<Heap> {
    let span = tracing::info_span!(
        "build_heap",
        classes = snapshot.classes.len(),
        objects = snapshot.objects.len()
    );
    let _guard = span.enter();

    let mut builder = HeapBuilder::new(snapshot);
    builder.allocate_classes();
    builder.resolve_objects()?;
    builder.link_classes()?;
    builder.populate_instances()?;
    let heap = builder.finish();

    info!(
        classes = heap.classes().len(),
        instances = heap.instances().len(),
        arrays = heap.arrays().len(),
        "Built heap graph"
    );
    Ok(heap)
}

struct HeapBuilder {
    header: Header,
    strings: HashMap<Identifier, String>,
    class_names: HashMap<Identifier, Identifier>,
    class_records: Vec<ClassRecord>,
    records: Vec<ObjectRecord>,
    /// Identifier -> position in `records`
    record_index: HashMap<Identifier, usize>,

    classes: Vec<Class>,
    instances: Vec<Instance>,
    arrays: Vec<Array>,
    objects: ObjectIndex,
    names: ClassNameIndex,
    /// Object arrays allocated but not yet filled, with their record.
    pending: Vec<(ArrayId, usize)>,
}

impl HeapBuilder {
    fn new(snapshot: Snapshot) -> Self {
        let record_index = snapshot
            .objects
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id(), i))
            .collect();
        let capacity = snapshot.classes.len() + snapshot.objects.len();

        Self {
            header: snapshot.header,
            strings: snapshot.strings,
            class_names: snapshot.class_names,
            class_records: snapshot.classes,
            records: snapshot.objects,
            record_index,
            classes: Vec::new(),
            instances: Vec::new(),
            arrays: Vec::new(),
            objects: ObjectIndex::with_capacity(capacity),
            names: ClassNameIndex::new(),
            pending: Vec::new(),
        }
    }

    // ==================== PASS 1: CLASSES ====================

    fn allocate_classes(&mut self) {
        self.classes.reserve(self.class_records.len());
        for record in &self.class_records {
            let id = ClassId::new(self.classes.len());
            self.classes
                .push(Class::placeholder(record.id, record.instance_size));
            self.objects.insert(record.id, ObjectRef::Class(id));
        }
    }

    // ==================== PASS 2: OBJECTS ====================

    fn resolve_objects(&mut self) -> GraphResult<()> {
        for i in 0..self.records.len() {
            let id = self.records[i].id();
            self.resolve(id, id)?;
            self.drain_pending()?;
        }
        debug!(
            instances = self.instances.len(),
            arrays = self.arrays.len(),
            "Resolved object records"
        );
        Ok(())
    }

    /// Look up or allocate the node for `id`.
    ///
    /// Object arrays are cached empty and queued; their elements are
    /// resolved by `drain_pending`.
    fn resolve(&mut self, id: Identifier, from: Identifier) -> GraphResult<FieldValue> {
        if id.is_null() {
            return Ok(FieldValue::Null);
        }
        if let Some(node) = self.objects.get(id) {
            return Ok(FieldValue::Ref(node));
        }

        let position = *self
            .record_index
            .get(&id)
            .ok_or_else(|| GraphError::unresolved_reference(id, from))?;

        let node = match &self.records[position] {
            ObjectRecord::Instance(record) => {
                let class = self
                    .objects
                    .get(record.class_id)
                    .and_then(|r| r.as_class())
                    .ok_or_else(|| GraphError::unresolved_reference(record.class_id, id))?;
                let instance = InstanceId::new(self.instances.len());
                self.instances.push(Instance {
                    id,
                    class,
                    fields: IndexMap::new(),
                });
                ObjectRef::Instance(instance)
            }
            ObjectRecord::ObjectArray(_) => {
                let array = ArrayId::new(self.arrays.len());
                self.arrays.push(Array {
                    id,
                    element_type: BasicType::Object,
                    elements: Vec::new(),
                });
                self.pending.push((array, position));
                ObjectRef::Array(array)
            }
            ObjectRecord::PrimitiveArray(record) => {
                let array = ArrayId::new(self.arrays.len());
                self.arrays.push(Array {
                    id,
                    element_type: record.element_type,
                    elements: record
                        .elements
                        .iter()
                        .map(|p| FieldValue::Primitive(*p))
                        .collect(),
                });
                ObjectRef::Array(array)
            }
        };

        self.objects.insert(id, node);
        Ok(FieldValue::Ref(node))
    }

    fn drain_pending(&mut self) -> GraphResult<()> {
        while let Some((array, position)) = self.pending.pop() {
            let element_ids = match &mut self.records[position] {
                ObjectRecord::ObjectArray(record) => std::mem::take(&mut record.elements),
                _ => continue,
            };
            let owner = self.arrays[array.index()].id;

            let mut elements = Vec::with_capacity(element_ids.len());
            for element in element_ids {
                elements.push(self.resolve(element, owner)?);
            }
            self.arrays[array.index()].elements = elements;
        }
        Ok(())
    }

    fn lookup(&self, raw: RawValue, from: Identifier) -> GraphResult<FieldValue> {
        match raw {
            RawValue::Primitive(p) => Ok(FieldValue::Primitive(p)),
            RawValue::Ref(id) if id.is_null() => Ok(FieldValue::Null),
            RawValue::Ref(id) => self
                .objects
                .get(id)
                .map(FieldValue::Ref)
                .ok_or_else(|| GraphError::unresolved_reference(id, from)),
        }
    }

    fn string(&self, id: Identifier) -> GraphResult<&str> {
        self.strings
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| GraphError::missing_string(id))
    }

    // ==================== PASS 3: CLASS DETAILS ====================

    fn link_classes(&mut self) -> GraphResult<()> {
        for i in 0..self.class_records.len() {
            let record = &self.class_records[i];
            let class_id = ClassId::new(i);

            let name_id = self
                .class_names
                .get(&record.id)
                .copied()
                .ok_or(GraphError::MissingClassName { class: record.id })?;
            let name = self.string(name_id)?.replace('/', ".");

            let superclass = if record.superclass_id.is_null() {
                None
            } else {
                let superclass = self
                    .objects
                    .get(record.superclass_id)
                    .and_then(|r| r.as_class())
                    .ok_or(GraphError::UnknownSuperclass {
                        class: record.id,
                        superclass: record.superclass_id,
                    })?;
                Some(superclass)
            };

            let mut static_fields = IndexMap::with_capacity(record.static_fields.len());
            for (name_id, raw) in &record.static_fields {
                let field = self.string(*name_id)?.to_string();
                static_fields.insert(field, self.lookup(*raw, record.id)?);
            }

            let mut fields = IndexMap::with_capacity(record.instance_fields.len());
            for descriptor in &record.instance_fields {
                fields.insert(self.string(descriptor.name_id)?.to_string(), descriptor.ty);
            }

            if let Err(kept) = self.names.insert(&name, class_id) {
                warn!(
                    name = %name,
                    kept = %self.classes[kept.index()].id,
                    ignored = %record.id,
                    "Duplicate class name, keeping the first class"
                );
            }

            let class = &mut self.classes[i];
            class.name = name;
            class.superclass = superclass;
            class.static_fields = static_fields;
            class.fields = fields;
        }
        Ok(())
    }

    // ==================== PASS 4: INSTANCE FIELDS ====================

    fn populate_instances(&mut self) -> GraphResult<()> {
        for record in &self.records {
            let ObjectRecord::Instance(record) = record else {
                continue;
            };
            let Some(ObjectRef::Instance(instance)) = self.objects.get(record.id) else {
                return Err(GraphError::unresolved_reference(record.id, record.id));
            };

            let mut fields = IndexMap::with_capacity(record.fields.len());
            for (name_id, raw) in &record.fields {
                let name = self.string(*name_id)?.to_string();
                fields.insert(name, self.lookup(*raw, record.id)?);
            }

            let node = &mut self.instances[instance.index()];
            node.fields = fields;
            let class = node.class;
            self.classes[class.index()].instances.push(instance);
        }
        Ok(())
    }

    fn finish(self) -> Heap {
        Heap {
            header: self.header,
            classes: self.classes,
            instances: self.instances,
            arrays: self.arrays,
            objects: self.objects,
            names: self.names,
        }
    }
}
