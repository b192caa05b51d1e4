//! Graph nodes: classes, instances and arrays.

use hql_core::{BasicType, ClassId, Identifier, InstanceId, ObjectRef, Primitive, Value};
use indexmap::IndexMap;
use std::fmt;

/// A resolved field, static or array element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Null,
    Primitive(Primitive),
    Ref(ObjectRef),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_ref(&self) -> Option<ObjectRef> {
        match self {
            FieldValue::Ref(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            FieldValue::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Convert to a query value, widening primitives.
    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Primitive(p) => Value::from(*p),
            FieldValue::Ref(r) => Value::Object(*r),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Primitive(p) => write!(f, "{}", p),
            FieldValue::Ref(r) => write!(f, "#{}", r),
        }
    }
}

/// A class in the heap.
#[derive(Debug, Clone)]
pub struct Class {
    /// Snapshot identifier
    pub id: Identifier,
    /// Dotted class name, e.g. `java.lang.String`
    pub name: String,
    pub superclass: Option<ClassId>,
    /// Instance size as declared by the class dump
    pub instance_size: u32,
    pub static_fields: IndexMap<String, FieldValue>,
    /// Own instance fields in declaration order
    pub fields: IndexMap<String, BasicType>,
    /// Instances of exactly this class, in snapshot order
    pub instances: Vec<InstanceId>,
}

impl Class {
    pub(crate) fn placeholder(id: Identifier, instance_size: u32) -> Self {
        Self {
            id,
            name: String::new(),
            superclass: None,
            instance_size,
            static_fields: IndexMap::new(),
            fields: IndexMap::new(),
            instances: Vec::new(),
        }
    }

    /// Names of the declared instance fields, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn static_field(&self, name: &str) -> Option<&FieldValue> {
        self.static_fields.get(name)
    }
}

/// An object instance.
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: Identifier,
    pub class: ClassId,
    /// Own fields first, then inherited ones
    pub fields: IndexMap<String, FieldValue>,
}

impl Instance {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// An object or primitive array.
#[derive(Debug, Clone)]
pub struct Array {
    pub id: Identifier,
    /// `Object` for object arrays
    pub element_type: BasicType,
    pub elements: Vec<FieldValue>,
}

impl Array {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Java-style type name such as `char[]`.
    pub fn type_name(&self) -> String {
        format!("{}[]", self.element_type)
    }

    /// Decode a `char[]` (UTF-16) or `byte[]` (Latin-1) as text.
    pub fn text(&self) -> Option<String> {
        match self.element_type {
            BasicType::Char => {
                let units: Vec<u16> = self
                    .elements
                    .iter()
                    .filter_map(|e| match e.as_primitive() {
                        Some(Primitive::Char(c)) => Some(c),
                        _ => None,
                    })
                    .collect();
                Some(String::from_utf16_lossy(&units))
            }
            BasicType::Byte => Some(
                self.bytes()
                    .into_iter()
                    .map(char::from)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Raw contents of a `byte[]`.
    pub(crate) fn bytes(&self) -> Vec<u8> {
        self.elements
            .iter()
            .filter_map(|e| match e.as_primitive() {
                Some(Primitive::Byte(b)) => Some(b as u8),
                _ => None,
            })
            .collect()
    }
}
