//! Pipeline operator execution.
//!
//! Each operator takes the instances that survived the previous stage and
//! returns the ones passed to the next: filter, sort, offset, limit, and
//! finally project, which turns instances into rendered rows.

use hql_core::{InstanceId, Value};
use hql_eval::Evaluator;
use hql_parser::{Expr, OrderBy, OrderDirection};
use std::cmp::Ordering;

use crate::render::render_value;
use crate::result::QueryRow;
use crate::{QueryError, QueryResult};

/// Operator executor context.
pub struct OperatorContext<'e, 'h> {
    evaluator: &'e Evaluator<'h>,
}

impl<'e, 'h> OperatorContext<'e, 'h> {
    /// Create a new operator context.
    pub fn new(evaluator: &'e Evaluator<'h>) -> Self {
        Self { evaluator }
    }

    /// Keep the rows whose condition is true. The condition must yield a
    /// boolean for every row.
    pub fn execute_filter(
        &self,
        rows: Vec<InstanceId>,
        condition: &Expr,
    ) -> QueryResult<Vec<InstanceId>> {
        let mut results = Vec::new();

        for row in rows {
            match self.evaluator.eval(condition, row)? {
                Value::Bool(true) => results.push(row),
                Value::Bool(false) => {}
                other => {
                    return Err(QueryError::non_boolean_filter(
                        self.evaluator.type_name(&other),
                    ))
                }
            }
        }

        Ok(results)
    }

    /// Stable sort by one key. Nulls come first in ascending order.
    pub fn execute_sort(
        &self,
        rows: Vec<InstanceId>,
        order_by: &OrderBy,
    ) -> QueryResult<Vec<InstanceId>> {
        let mut keyed = Vec::with_capacity(rows.len());
        let mut first: Option<(SortKind, Value)> = None;

        for row in rows {
            let value = self.evaluator.eval(&order_by.expr, row)?;
            let key = self.sort_key(&value, first.as_ref().map(|(_, v)| v))?;

            if let Some(kind) = key.kind() {
                match &first {
                    None => first = Some((kind, value)),
                    Some((expected, seen)) if *expected != kind => {
                        return Err(QueryError::incomparable_sort_keys(
                            self.evaluator.type_name(seen),
                            self.evaluator.type_name(&value),
                        ));
                    }
                    Some(_) => {}
                }
            }
            keyed.push((key, row));
        }

        match order_by.direction {
            OrderDirection::Asc => keyed.sort_by(|(a, _), (b, _)| a.compare(b)),
            OrderDirection::Desc => keyed.sort_by(|(a, _), (b, _)| b.compare(a)),
        }

        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }

    /// Sort key of a value. Objects other than strings have no order.
    fn sort_key(&self, value: &Value, first: Option<&Value>) -> QueryResult<SortKey> {
        let key = match value {
            Value::Null => SortKey::Null,
            Value::Bool(b) => SortKey::Bool(*b),
            Value::Int(i) => SortKey::Int(*i),
            Value::Float(f) => SortKey::Float(*f),
            other => match self.evaluator.text(other) {
                Some(text) => SortKey::Text(text),
                None => {
                    let type_name = self.evaluator.type_name(other);
                    let left = first
                        .map(|v| self.evaluator.type_name(v))
                        .unwrap_or_else(|| type_name.clone());
                    return Err(QueryError::incomparable_sort_keys(left, type_name));
                }
            },
        };
        Ok(key)
    }

    /// Drop the first `offset` rows.
    pub fn execute_offset(&self, rows: Vec<InstanceId>, offset: Option<u64>) -> Vec<InstanceId> {
        match offset {
            Some(n) => rows.into_iter().skip(to_count(n)).collect(),
            None => rows,
        }
    }

    /// Keep at most `limit` rows.
    pub fn execute_limit(&self, rows: Vec<InstanceId>, limit: Option<u64>) -> Vec<InstanceId> {
        match limit {
            Some(n) => rows.into_iter().take(to_count(n)).collect(),
            None => rows,
        }
    }

    /// Evaluate and render every column for every row.
    pub fn execute_project(
        &self,
        rows: &[InstanceId],
        columns: &[(String, Expr)],
    ) -> QueryResult<Vec<QueryRow>> {
        let heap = self.evaluator.heap();
        let mut results = Vec::with_capacity(rows.len());

        for row in rows {
            let mut projected = QueryRow::new();
            for (name, expr) in columns {
                let value = self.evaluator.eval(expr, *row)?;
                projected.push(name.clone(), render_value(heap, &value));
            }
            results.push(projected);
        }

        Ok(results)
    }
}

fn to_count(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

// ==================== SORT KEYS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKind {
    Numeric,
    Textual,
    Boolean,
}

#[derive(Debug, Clone)]
enum SortKey {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl SortKey {
    fn kind(&self) -> Option<SortKind> {
        match self {
            SortKey::Null => None,
            SortKey::Int(_) | SortKey::Float(_) => Some(SortKind::Numeric),
            SortKey::Text(_) => Some(SortKind::Textual),
            SortKey::Bool(_) => Some(SortKind::Boolean),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            SortKey::Int(i) => Some(*i as f64),
            SortKey::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Total order over keys of one kind; NaN sorts after every number.
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Null, SortKey::Null) => Ordering::Equal,
            (SortKey::Null, _) => Ordering::Less,
            (_, SortKey::Null) => Ordering::Greater,
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
        }
    }
}
