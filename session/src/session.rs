//! Query sessions.

use hql_graph::Heap;
use hql_parser::{parse_query, split_queries};
use hql_query::{QueryExecutor, QueryResults, Table};
use std::collections::HashMap;
use tracing::debug;

use crate::error::SessionResult;

/// A query session over one heap.
///
/// Tables are built the first time a class is queried and reused after.
pub struct Session<'h> {
    heap: &'h Heap,
    executor: QueryExecutor<'h>,
    /// Class name as written in the query -> table.
    tables: HashMap<String, Table>,
}

impl<'h> Session<'h> {
    /// Create a new session.
    pub fn new(heap: &'h Heap) -> Self {
        Self {
            heap,
            executor: QueryExecutor::new(heap),
            tables: HashMap::new(),
        }
    }

    pub fn heap(&self) -> &'h Heap {
        self.heap
    }

    /// Number of cached tables.
    pub fn cached_tables(&self) -> usize {
        self.tables.len()
    }

    /// Parse and run one query.
    pub fn run_query(&mut self, input: &str) -> SessionResult<QueryResults> {
        let query = parse_query(input)?;

        if !self.tables.contains_key(&query.class_name) {
            let table = Table::new(self.heap, &query.class_name)?;
            debug!(class = table.name(), rows = table.len(), "Cached table");
            self.tables.insert(query.class_name.clone(), table);
        }
        let table = &self.tables[&query.class_name];

        Ok(self.executor.select(table, &query)?)
    }

    /// Run every query of a script, in order.
    ///
    /// A failing query does not stop the ones after it.
    pub fn run_script(&mut self, input: &str) -> Vec<(String, SessionResult<QueryResults>)> {
        split_queries(input)
            .into_iter()
            .map(|text| {
                let result = self.run_query(&text);
                (text, result)
            })
            .collect()
    }
}

/// Run one query against a heap without keeping a session.
pub fn run_query(heap: &Heap, input: &str) -> SessionResult<QueryResults> {
    Session::new(heap).run_query(input)
}
