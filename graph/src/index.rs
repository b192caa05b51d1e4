//! Lookup indexes over the heap arenas.

use hql_core::{ClassId, Identifier, ObjectRef};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Class name index: name -> ClassId, in first-seen order.
#[derive(Debug, Default)]
pub struct ClassNameIndex {
    index: IndexMap<String, ClassId>,
}

impl ClassNameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `class` unless it is already bound.
    ///
    /// Returns the class that keeps the binding when the name is taken.
    pub fn insert(&mut self, name: &str, class: ClassId) -> Result<(), ClassId> {
        match self.index.get(name) {
            Some(existing) => Err(*existing),
            None => {
                self.index.insert(name.to_string(), class);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<ClassId> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Object index: snapshot Identifier -> resolved node.
///
/// Holds classes as well as instances and arrays, so it doubles as the
/// memo table of reference resolution.
#[derive(Debug, Default)]
pub struct ObjectIndex {
    index: HashMap<Identifier, ObjectRef>,
}

impl ObjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, id: Identifier, node: ObjectRef) {
        self.index.insert(id, node);
    }

    pub fn get(&self, id: Identifier) -> Option<ObjectRef> {
        self.index.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
