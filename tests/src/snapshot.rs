//! Fluent writer for small, valid hprof snapshots.
//!
//! Identifiers are handed out as plain `u64`s when classes and objects are
//! declared, so objects can reference each other (including cyclically)
//! before any bytes are produced. `build` lays everything out as a real heap
//! dumper would: header, strings, load-class records, then heap dump
//! segment(s).

use hql_core::BasicType;
use std::collections::HashMap;

const STRING: u8 = 0x01;
const LOAD_CLASS: u8 = 0x02;
const HEAP_DUMP: u8 = 0x0C;
const HEAP_DUMP_SEGMENT: u8 = 0x1C;
const HEAP_DUMP_END: u8 = 0x2C;

const CLASS_DUMP: u8 = 0x20;
const INSTANCE_DUMP: u8 = 0x21;
const OBJECT_ARRAY_DUMP: u8 = 0x22;
const PRIMITIVE_ARRAY_DUMP: u8 = 0x23;

/// Root records as (tag, identifier count, u32 count).
const ROOT_LAYOUTS: [(u8, usize, usize); 9] = [
    (0xFF, 1, 0),
    (0x01, 2, 0),
    (0x02, 1, 2),
    (0x03, 1, 2),
    (0x04, 1, 1),
    (0x05, 1, 0),
    (0x06, 1, 1),
    (0x07, 1, 0),
    (0x08, 1, 2),
];

/// A value to store in a field, static or array slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Null,
    Ref(u64),
    Bool(bool),
    Char(u16),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl FieldValue {
    /// The type a static of this value is tagged with.
    pub fn basic_type(&self) -> BasicType {
        match self {
            FieldValue::Null | FieldValue::Ref(_) => BasicType::Object,
            FieldValue::Bool(_) => BasicType::Boolean,
            FieldValue::Char(_) => BasicType::Char,
            FieldValue::Byte(_) => BasicType::Byte,
            FieldValue::Short(_) => BasicType::Short,
            FieldValue::Int(_) => BasicType::Int,
            FieldValue::Long(_) => BasicType::Long,
            FieldValue::Float(_) => BasicType::Float,
            FieldValue::Double(_) => BasicType::Double,
        }
    }
}

#[derive(Debug, Clone)]
struct ClassSpec {
    id: u64,
    name: String,
    superclass: u64,
    statics: Vec<(String, FieldValue)>,
    fields: Vec<(String, BasicType)>,
}

#[derive(Debug, Clone)]
enum ObjectSpec {
    Instance {
        id: u64,
        class: u64,
        values: Vec<(String, FieldValue)>,
        padding: usize,
    },
    ObjectArray {
        id: u64,
        elements: Vec<u64>,
    },
    PrimitiveArray {
        id: u64,
        ty: BasicType,
        values: Vec<FieldValue>,
    },
}

impl ObjectSpec {
    fn id(&self) -> u64 {
        match self {
            ObjectSpec::Instance { id, .. }
            | ObjectSpec::ObjectArray { id, .. }
            | ObjectSpec::PrimitiveArray { id, .. } => *id,
        }
    }
}

/// Builder for hprof byte streams.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    identifier_size: usize,
    timestamp: u64,
    next_id: u64,
    strings: Vec<(u64, String)>,
    string_ids: HashMap<String, u64>,
    classes: Vec<ClassSpec>,
    objects: Vec<ObjectSpec>,
    roots: Vec<u64>,
    unknown_records: Vec<(u8, Vec<u8>)>,
    raw_heap_records: Vec<Vec<u8>>,
    string_class: Option<u64>,
    compact_strings: bool,
    split_segments: bool,
    objects_first: bool,
    omit_class_dumps: bool,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    /// A builder for a snapshot with 4-byte identifiers.
    pub fn new() -> Self {
        Self {
            identifier_size: 4,
            timestamp: 0,
            next_id: 0x1000,
            strings: Vec::new(),
            string_ids: HashMap::new(),
            classes: Vec::new(),
            objects: Vec::new(),
            roots: Vec::new(),
            unknown_records: Vec::new(),
            raw_heap_records: Vec::new(),
            string_class: None,
            compact_strings: false,
            split_segments: false,
            objects_first: false,
            omit_class_dumps: false,
        }
    }

    // ==================== LAYOUT OPTIONS ====================

    pub fn identifier_size(mut self, size: usize) -> Self {
        assert!(size == 4 || size == 8, "identifier size must be 4 or 8");
        self.identifier_size = size;
        self
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Store `java.lang.String` as `byte[] value` plus `byte coder`.
    pub fn compact_strings(mut self, enabled: bool) -> Self {
        self.compact_strings = enabled;
        self
    }

    /// Write classes and objects into separate heap dump segments.
    pub fn split_segments(mut self, enabled: bool) -> Self {
        self.split_segments = enabled;
        self
    }

    /// Write object dumps before class dumps.
    pub fn objects_first(mut self, enabled: bool) -> Self {
        self.objects_first = enabled;
        self
    }

    /// Keep load-class records but drop class dumps.
    pub fn omit_class_dumps(mut self, enabled: bool) -> Self {
        self.omit_class_dumps = enabled;
        self
    }

    // ==================== DECLARATIONS ====================

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 0x10;
        self.next_id
    }

    fn string_id(&mut self, text: &str) -> u64 {
        if let Some(id) = self.string_ids.get(text) {
            return *id;
        }
        let id = self.alloc_id();
        self.strings.push((id, text.to_string()));
        self.string_ids.insert(text.to_string(), id);
        id
    }

    /// Declare a class with its own instance fields.
    pub fn class(
        &mut self,
        name: &str,
        superclass: Option<u64>,
        fields: &[(&str, BasicType)],
    ) -> u64 {
        let id = self.alloc_id();
        self.string_id(name);
        let fields = fields
            .iter()
            .map(|(field, ty)| {
                self.string_id(field);
                (field.to_string(), *ty)
            })
            .collect();
        self.classes.push(ClassSpec {
            id,
            name: name.to_string(),
            superclass: superclass.unwrap_or(0),
            statics: Vec::new(),
            fields,
        });
        id
    }

    pub fn static_field(&mut self, class: u64, name: &str, value: FieldValue) {
        self.string_id(name);
        self.class_mut(class)
            .statics
            .push((name.to_string(), value));
    }

    /// Declare an instance. Fields left out are written as zero or null.
    pub fn instance(&mut self, class: u64, values: &[(&str, FieldValue)]) -> u64 {
        let id = self.alloc_id();
        self.objects.push(ObjectSpec::Instance {
            id,
            class,
            values: values
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
            padding: 0,
        });
        id
    }

    /// Set or replace a field of a declared instance.
    pub fn set_field(&mut self, instance: u64, name: &str, value: FieldValue) {
        let ObjectSpec::Instance { values, .. } = self.object_mut(instance) else {
            panic!("{:#x} is not an instance", instance);
        };
        values.retain(|(n, _)| n != name);
        values.push((name.to_string(), value));
    }

    /// Append `extra` zero bytes to an instance's field blob.
    pub fn pad_instance(&mut self, instance: u64, extra: usize) {
        let ObjectSpec::Instance { padding, .. } = self.object_mut(instance) else {
            panic!("{:#x} is not an instance", instance);
        };
        *padding += extra;
    }

    /// Declare an object array; `0` elements are null.
    pub fn object_array(&mut self, elements: &[u64]) -> u64 {
        let id = self.alloc_id();
        self.objects.push(ObjectSpec::ObjectArray {
            id,
            elements: elements.to_vec(),
        });
        id
    }

    pub fn set_elements(&mut self, array: u64, new_elements: &[u64]) {
        let ObjectSpec::ObjectArray { elements, .. } = self.object_mut(array) else {
            panic!("{:#x} is not an object array", array);
        };
        *elements = new_elements.to_vec();
    }

    pub fn primitive_array(&mut self, ty: BasicType, values: &[FieldValue]) -> u64 {
        assert_ne!(ty, BasicType::Object, "use object_array for references");
        let id = self.alloc_id();
        self.objects.push(ObjectSpec::PrimitiveArray {
            id,
            ty,
            values: values.to_vec(),
        });
        id
    }

    pub fn char_array(&mut self, text: &str) -> u64 {
        let values: Vec<FieldValue> = text.encode_utf16().map(FieldValue::Char).collect();
        self.primitive_array(BasicType::Char, &values)
    }

    pub fn byte_array(&mut self, bytes: &[u8]) -> u64 {
        let values: Vec<FieldValue> = bytes.iter().map(|b| FieldValue::Byte(*b as i8)).collect();
        self.primitive_array(BasicType::Byte, &values)
    }

    pub fn int_array(&mut self, values: &[i32]) -> u64 {
        let values: Vec<FieldValue> = values.iter().copied().map(FieldValue::Int).collect();
        self.primitive_array(BasicType::Int, &values)
    }

    /// Declare a `java.lang.String` instance holding `text`.
    pub fn java_string(&mut self, text: &str) -> u64 {
        let class = self.string_class();
        if self.compact_strings {
            let (bytes, coder): (Vec<u8>, i8) = if text.chars().all(|c| (c as u32) <= 0xFF) {
                (text.chars().map(|c| c as u8).collect(), 0)
            } else {
                (
                    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect(),
                    1,
                )
            };
            let value = self.byte_array(&bytes);
            self.instance(
                class,
                &[
                    ("value", FieldValue::Ref(value)),
                    ("coder", FieldValue::Byte(coder)),
                ],
            )
        } else {
            let value = self.char_array(text);
            self.instance(class, &[("value", FieldValue::Ref(value))])
        }
    }

    fn string_class(&mut self) -> u64 {
        if let Some(id) = self.string_class {
            return id;
        }
        let id = if self.compact_strings {
            self.class(
                "java/lang/String",
                None,
                &[
                    ("value", BasicType::Object),
                    ("coder", BasicType::Byte),
                    ("hash", BasicType::Int),
                ],
            )
        } else {
            self.class(
                "java/lang/String",
                None,
                &[("value", BasicType::Object), ("hash", BasicType::Int)],
            )
        };
        self.string_class = Some(id);
        id
    }

    /// Mark an object as a GC root under every root record kind.
    pub fn root(&mut self, id: u64) {
        self.roots.push(id);
    }

    /// Add a top-level record the reader should skip.
    pub fn unknown_record(&mut self, tag: u8, payload: &[u8]) {
        self.unknown_records.push((tag, payload.to_vec()));
    }

    /// Append raw bytes at the end of the heap dump body.
    pub fn raw_heap_dump_record(&mut self, bytes: &[u8]) {
        self.raw_heap_records.push(bytes.to_vec());
    }

    fn class_mut(&mut self, id: u64) -> &mut ClassSpec {
        self.classes
            .iter_mut()
            .find(|c| c.id == id)
            .unwrap_or_else(|| panic!("no class {:#x}", id))
    }

    fn object_mut(&mut self, id: u64) -> &mut ObjectSpec {
        self.objects
            .iter_mut()
            .find(|o| o.id() == id)
            .unwrap_or_else(|| panic!("no object {:#x}", id))
    }

    fn class_spec(&self, id: u64) -> &ClassSpec {
        self.classes
            .iter()
            .find(|c| c.id == id)
            .unwrap_or_else(|| panic!("no class {:#x}", id))
    }

    // ==================== ENCODING ====================

    /// Encode the snapshot.
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"JAVA PROFILE 1.0.2\0");
        out.extend_from_slice(&(self.identifier_size as u32).to_be_bytes());
        out.extend_from_slice(&self.timestamp.to_be_bytes());

        for (id, text) in &self.strings {
            let mut body = Vec::new();
            self.put_id(&mut body, *id);
            body.extend_from_slice(text.as_bytes());
            put_record(&mut out, STRING, &body);
        }

        for (serial, class) in self.classes.iter().enumerate() {
            let mut body = Vec::new();
            body.extend_from_slice(&(serial as u32 + 1).to_be_bytes());
            self.put_id(&mut body, class.id);
            body.extend_from_slice(&0u32.to_be_bytes());
            self.put_id(&mut body, self.string_ids[&class.name]);
            put_record(&mut out, LOAD_CLASS, &body);
        }

        for (tag, payload) in &self.unknown_records {
            put_record(&mut out, *tag, payload);
        }

        let mut roots = Vec::new();
        for id in &self.roots {
            for (tag, ids, words) in ROOT_LAYOUTS {
                roots.push(tag);
                for _ in 0..ids {
                    self.put_id(&mut roots, *id);
                }
                roots.extend(std::iter::repeat(0u8).take(4 * words));
            }
        }

        let mut classes = Vec::new();
        if !self.omit_class_dumps {
            for class in &self.classes {
                self.put_class_dump(&mut classes, class);
            }
        }

        let mut objects = Vec::new();
        for object in &self.objects {
            self.put_object_dump(&mut objects, object);
        }

        let (first, second) = if self.objects_first {
            (objects, classes)
        } else {
            (classes, objects)
        };

        let raw: Vec<u8> = self.raw_heap_records.concat();
        if self.split_segments {
            put_record(&mut out, HEAP_DUMP_SEGMENT, &[roots, first].concat());
            put_record(&mut out, HEAP_DUMP_SEGMENT, &[second, raw].concat());
        } else {
            put_record(&mut out, HEAP_DUMP, &[roots, first, second, raw].concat());
        }
        put_record(&mut out, HEAP_DUMP_END, &[]);

        out
    }

    fn put_id(&self, out: &mut Vec<u8>, id: u64) {
        if self.identifier_size == 4 {
            out.extend_from_slice(&(id as u32).to_be_bytes());
        } else {
            out.extend_from_slice(&id.to_be_bytes());
        }
    }

    fn put_class_dump(&self, out: &mut Vec<u8>, class: &ClassSpec) {
        out.push(CLASS_DUMP);
        self.put_id(out, class.id);
        out.extend_from_slice(&0u32.to_be_bytes());
        self.put_id(out, class.superclass);
        for _ in 0..5 {
            self.put_id(out, 0);
        }
        let instance_size: usize = class
            .fields
            .iter()
            .map(|(_, ty)| ty.size(self.identifier_size))
            .sum();
        out.extend_from_slice(&(instance_size as u32).to_be_bytes());

        // one constant pool entry so readers must skip it
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&7u16.to_be_bytes());
        out.push(BasicType::Int.code());
        out.extend_from_slice(&0u32.to_be_bytes());

        out.extend_from_slice(&(class.statics.len() as u16).to_be_bytes());
        for (name, value) in &class.statics {
            self.put_id(out, self.string_ids[name]);
            let ty = value.basic_type();
            out.push(ty.code());
            self.put_value(out, ty, *value);
        }

        out.extend_from_slice(&(class.fields.len() as u16).to_be_bytes());
        for (name, ty) in &class.fields {
            self.put_id(out, self.string_ids[name]);
            out.push(ty.code());
        }
    }

    fn put_object_dump(&self, out: &mut Vec<u8>, object: &ObjectSpec) {
        match object {
            ObjectSpec::Instance {
                id,
                class,
                values,
                padding,
            } => {
                let mut blob = Vec::new();
                let mut current = *class;
                while current != 0 {
                    let spec = self.class_spec(current);
                    for (name, ty) in &spec.fields {
                        let value = values
                            .iter()
                            .find(|(n, _)| n == name)
                            .map(|(_, v)| *v)
                            .unwrap_or(FieldValue::Null);
                        self.put_value(&mut blob, *ty, value);
                    }
                    current = spec.superclass;
                }
                blob.extend(std::iter::repeat(0u8).take(*padding));

                out.push(INSTANCE_DUMP);
                self.put_id(out, *id);
                out.extend_from_slice(&0u32.to_be_bytes());
                self.put_id(out, *class);
                out.extend_from_slice(&(blob.len() as u32).to_be_bytes());
                out.extend_from_slice(&blob);
            }
            ObjectSpec::ObjectArray { id, elements } => {
                out.push(OBJECT_ARRAY_DUMP);
                self.put_id(out, *id);
                out.extend_from_slice(&0u32.to_be_bytes());
                out.extend_from_slice(&(elements.len() as u32).to_be_bytes());
                self.put_id(out, 0);
                for element in elements {
                    self.put_id(out, *element);
                }
            }
            ObjectSpec::PrimitiveArray { id, ty, values } => {
                out.push(PRIMITIVE_ARRAY_DUMP);
                self.put_id(out, *id);
                out.extend_from_slice(&0u32.to_be_bytes());
                out.extend_from_slice(&(values.len() as u32).to_be_bytes());
                out.push(ty.code());
                for value in values {
                    self.put_value(out, *ty, *value);
                }
            }
        }
    }

    fn put_value(&self, out: &mut Vec<u8>, ty: BasicType, value: FieldValue) {
        match (ty, value) {
            (BasicType::Object, FieldValue::Ref(id)) => self.put_id(out, id),
            (_, FieldValue::Null) => out.extend(std::iter::repeat(0u8).take(ty.size(self.identifier_size))),
            (BasicType::Boolean, FieldValue::Bool(b)) => out.push(u8::from(b)),
            (BasicType::Char, FieldValue::Char(c)) => out.extend_from_slice(&c.to_be_bytes()),
            (BasicType::Byte, FieldValue::Byte(b)) => out.push(b as u8),
            (BasicType::Short, FieldValue::Short(s)) => out.extend_from_slice(&s.to_be_bytes()),
            (BasicType::Int, FieldValue::Int(i)) => out.extend_from_slice(&i.to_be_bytes()),
            (BasicType::Long, FieldValue::Long(l)) => out.extend_from_slice(&l.to_be_bytes()),
            (BasicType::Float, FieldValue::Float(f)) => {
                out.extend_from_slice(&f.to_bits().to_be_bytes())
            }
            (BasicType::Double, FieldValue::Double(d)) => {
                out.extend_from_slice(&d.to_bits().to_be_bytes())
            }
            (ty, value) => panic!("a {} slot cannot hold {:?}", ty, value),
        }
    }
}

fn put_record(out: &mut Vec<u8>, tag: u8, body: &[u8]) {
    out.push(tag);
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let bytes = SnapshotBuilder::new().timestamp(5).build();

        assert!(bytes.starts_with(b"JAVA PROFILE 1.0.2\0"));
        assert_eq!(&bytes[19..23], &4u32.to_be_bytes());
        assert_eq!(&bytes[23..31], &5u64.to_be_bytes());
    }

    #[test]
    fn test_field_names_are_interned_once() {
        let mut builder = SnapshotBuilder::new();
        builder.class("A", None, &[("x", BasicType::Int)]);
        builder.class("B", None, &[("x", BasicType::Int)]);

        let names: Vec<&str> = builder.strings.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(names, vec!["A", "x", "B"]);
    }

    #[test]
    #[should_panic(expected = "a int slot cannot hold")]
    fn test_mismatched_value_panics() {
        let mut builder = SnapshotBuilder::new();
        let cls = builder.class("A", None, &[("x", BasicType::Int)]);
        builder.instance(cls, &[("x", FieldValue::Bool(true))]);
        builder.build();
    }
}
