//! Expression evaluation.

use crate::{EvalError, EvalResult};
use hql_core::{InstanceId, ObjectRef, Value};
use hql_graph::Heap;
use hql_parser::{BinaryOp, Expr, Literal, LiteralKind};
use std::cmp::Ordering;

/// Expression evaluator.
///
/// The evaluator only borrows the heap, so one evaluator serves every
/// instance of a query.
pub struct Evaluator<'h> {
    heap: &'h Heap,
}

impl<'h> Evaluator<'h> {
    /// Create a new evaluator.
    pub fn new(heap: &'h Heap) -> Self {
        Self { heap }
    }

    pub fn heap(&self) -> &'h Heap {
        self.heap
    }

    /// Evaluate an expression with `this` as the current instance.
    pub fn eval(&self, expr: &Expr, this: InstanceId) -> EvalResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(self.eval_literal(lit)),
            Expr::Field(name, _) => self.eval_field(this, name),
            Expr::Access(inner, field, _) => self.eval_access(inner, field, this),
            Expr::BinaryOp(op, left, right, _) => self.eval_binary_op(*op, left, right, this),
        }
    }

    fn eval_literal(&self, lit: &Literal) -> Value {
        match &lit.kind {
            LiteralKind::Null => Value::Null,
            LiteralKind::Bool(b) => Value::Bool(*b),
            LiteralKind::Int(i) => Value::Int(*i),
            LiteralKind::Float(f) => Value::Float(*f),
            LiteralKind::String(s) => Value::Str(s.clone()),
        }
    }

    /// Read a field of an instance.
    fn eval_field(&self, instance: InstanceId, name: &str) -> EvalResult<Value> {
        self.heap
            .instance(instance)
            .field(name)
            .map(|value| value.to_value())
            .ok_or_else(|| EvalError::no_such_field(name, &self.heap.class_of(instance).name))
    }

    fn eval_access(&self, inner: &Expr, field: &str, this: InstanceId) -> EvalResult<Value> {
        match self.eval(inner, this)? {
            Value::Null => Err(EvalError::null_access(field)),
            Value::Object(ObjectRef::Instance(id)) => self.eval_field(id, field),
            other => Err(EvalError::not_an_instance(field, self.type_name(&other))),
        }
    }

    /// Evaluate a binary operation. Both operands are always evaluated.
    fn eval_binary_op(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        this: InstanceId,
    ) -> EvalResult<Value> {
        let left_val = self.eval(left, this)?;
        let right_val = self.eval(right, this)?;

        match op {
            // Arithmetic
            BinaryOp::Add => self.eval_add(&left_val, &right_val),
            BinaryOp::Sub => self.eval_numeric("subtracting", &left_val, &right_val, |a, b| a - b),
            BinaryOp::Mul => self.eval_numeric("multiplying", &left_val, &right_val, |a, b| a * b),
            BinaryOp::Div => self.eval_numeric("dividing", &left_val, &right_val, |a, b| a / b),

            // Comparison
            BinaryOp::Eq => Ok(Value::Bool(self.values_equal(&left_val, &right_val)?)),
            BinaryOp::NotEq => Ok(Value::Bool(!self.values_equal(&left_val, &right_val)?)),
            BinaryOp::Lt => self.eval_ordering(&left_val, &right_val, Ordering::is_lt),
            BinaryOp::LtEq => self.eval_ordering(&left_val, &right_val, Ordering::is_le),
            BinaryOp::Gt => self.eval_ordering(&left_val, &right_val, Ordering::is_gt),
            BinaryOp::GtEq => self.eval_ordering(&left_val, &right_val, Ordering::is_ge),

            // Logical
            BinaryOp::And => self.eval_logical("AND", &left_val, &right_val, |a, b| a && b),
            BinaryOp::Or => self.eval_logical("OR", &left_val, &right_val, |a, b| a || b),
        }
    }

    // ==================== ARITHMETIC ====================

    fn eval_add(&self, left: &Value, right: &Value) -> EvalResult<Value> {
        if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
            return Ok(Value::Float(a + b));
        }
        match (self.text(left), self.text(right)) {
            (Some(a), Some(b)) => Ok(Value::Str(a + &b)),
            _ => Err(EvalError::arithmetic(
                "adding",
                self.type_name(left),
                self.type_name(right),
            )),
        }
    }

    /// Numbers are computed in f64 whatever their width.
    fn eval_numeric(
        &self,
        verb: &'static str,
        left: &Value,
        right: &Value,
        op: fn(f64, f64) -> f64,
    ) -> EvalResult<Value> {
        match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(op(a, b))),
            _ => Err(EvalError::arithmetic(
                verb,
                self.type_name(left),
                self.type_name(right),
            )),
        }
    }

    // ==================== COMPARISON ====================

    /// Equality over values of the same kind.
    pub fn values_equal(&self, left: &Value, right: &Value) -> EvalResult<bool> {
        match (left, right) {
            (Value::Null, Value::Null) => return Ok(true),
            (Value::Null, _) | (_, Value::Null) => return Ok(false),
            (Value::Bool(a), Value::Bool(b)) => return Ok(a == b),
            (Value::Int(a), Value::Int(b)) => return Ok(a == b),
            _ => {}
        }
        if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
            return Ok(a == b);
        }
        if let (Some(a), Some(b)) = (self.text(left), self.text(right)) {
            return Ok(a == b);
        }
        match (left, right) {
            (Value::Object(a), Value::Object(b)) => Ok(a == b),
            _ => Err(EvalError::comparison(
                self.type_name(left),
                self.type_name(right),
            )),
        }
    }

    /// Order two numbers or two textual values.
    ///
    /// Returns `None` when a NaN is involved.
    pub fn compare(&self, left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            return Ok(Some(a.cmp(b)));
        }
        if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
            return Ok(a.partial_cmp(&b));
        }
        match (self.text(left), self.text(right)) {
            (Some(a), Some(b)) => Ok(Some(a.cmp(&b))),
            _ => Err(EvalError::comparison(
                self.type_name(left),
                self.type_name(right),
            )),
        }
    }

    fn eval_ordering(
        &self,
        left: &Value,
        right: &Value,
        accept: fn(Ordering) -> bool,
    ) -> EvalResult<Value> {
        let ordering = self.compare(left, right)?;
        Ok(Value::Bool(ordering.is_some_and(accept)))
    }

    // ==================== LOGICAL ====================

    fn eval_logical(
        &self,
        op: &'static str,
        left: &Value,
        right: &Value,
        combine: fn(bool, bool) -> bool,
    ) -> EvalResult<Value> {
        let a = left
            .as_bool()
            .ok_or_else(|| EvalError::not_boolean("left", op, self.type_name(left)))?;
        let b = right
            .as_bool()
            .ok_or_else(|| EvalError::not_boolean("right", op, self.type_name(right)))?;
        Ok(Value::Bool(combine(a, b)))
    }

    // ==================== VALUE HELPERS ====================

    /// Text of a string value, a `java.lang.String` object or a
    /// `char[]`/`byte[]` array.
    pub fn text(&self, value: &Value) -> Option<String> {
        match value {
            Value::Str(s) => Some(s.clone()),
            Value::Object(node) => self.heap.text_of(*node),
            _ => None,
        }
    }

    /// Type name used in error messages; heap objects report their class.
    pub fn type_name(&self, value: &Value) -> String {
        match value {
            Value::Object(node) => self.heap.type_name(*node),
            other => other.type_name().to_string(),
        }
    }
}
