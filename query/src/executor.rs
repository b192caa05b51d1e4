//! Query execution.

use hql_eval::Evaluator;
use hql_graph::Heap;
use hql_parser::{Expr, Query, Span};
use tracing::debug;

use crate::operators::OperatorContext;
use crate::result::QueryResults;
use crate::table::Table;
use crate::QueryResult;

/// Query executor.
pub struct QueryExecutor<'h> {
    heap: &'h Heap,
    evaluator: Evaluator<'h>,
}

impl<'h> QueryExecutor<'h> {
    /// Create a new executor.
    pub fn new(heap: &'h Heap) -> Self {
        Self {
            heap,
            evaluator: Evaluator::new(heap),
        }
    }

    pub fn heap(&self) -> &'h Heap {
        self.heap
    }

    /// Run a query against a table.
    ///
    /// Stages run strictly in order: filter, sort, offset, limit, project.
    /// The first failing stage aborts the query.
    pub fn select(&self, table: &Table, query: &Query) -> QueryResult<QueryResults> {
        let ctx = OperatorContext::new(&self.evaluator);
        let columns = self.columns(table, query);
        let mut rows = table.rows().to_vec();
        debug!(class = table.name(), rows = rows.len(), "Scanning table");

        if let Some(filter) = &query.filter {
            rows = ctx.execute_filter(rows, filter)?;
            debug!(rows = rows.len(), "Filtered");
        }

        if let Some(order_by) = &query.order_by {
            rows = ctx.execute_sort(rows, order_by)?;
            debug!(direction = ?order_by.direction, "Sorted");
        }

        rows = ctx.execute_offset(rows, query.offset);
        rows = ctx.execute_limit(rows, query.limit);
        debug!(rows = rows.len(), offset = ?query.offset, limit = ?query.limit, "Paged");

        let names = columns.iter().map(|(name, _)| name.clone()).collect();
        let mut results = QueryResults::with_columns(names);
        for row in ctx.execute_project(&rows, &columns)? {
            results.push(row);
        }
        Ok(results)
    }

    /// Named column expressions; `*` expands to the table's columns.
    fn columns(&self, table: &Table, query: &Query) -> Vec<(String, Expr)> {
        if query.selects_all() {
            return table
                .columns()
                .iter()
                .map(|name| (name.clone(), Expr::Field(name.clone(), Span::default())))
                .collect();
        }
        query
            .projections
            .iter()
            .map(|p| (p.name.clone(), p.expr.clone()))
            .collect()
    }
}
