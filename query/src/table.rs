//! Class tables.

use hql_core::{ClassId, InstanceId};
use hql_graph::Heap;

use crate::{QueryError, QueryResult};

/// The instances of one class, viewed as rows.
///
/// Columns are the class's own declared instance fields in declaration
/// order. Rows are the instances of exactly this class; subclass
/// instances belong to their own tables.
#[derive(Debug, Clone)]
pub struct Table {
    class: ClassId,
    name: String,
    columns: Vec<String>,
    rows: Vec<InstanceId>,
}

impl Table {
    /// Resolve `class_name` (dotted or slashed) against the heap.
    pub fn new(heap: &Heap, class_name: &str) -> QueryResult<Self> {
        let class_id = heap
            .find_class_id(class_name)
            .ok_or_else(|| QueryError::no_such_class(class_name))?;
        let class = heap.class(class_id);

        Ok(Self {
            class: class_id,
            name: class.name.clone(),
            columns: class.field_names().map(str::to_string).collect(),
            rows: class.instances.clone(),
        })
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Dotted class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[InstanceId] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
