//! HQL Eval
//!
//! Evaluates query expressions against one instance of a heap.
//!
//! Responsibilities:
//! - Read fields of the current instance and of referenced objects
//! - Arithmetic, comparison and logical operators over dynamic values
//! - Treat `java.lang.String` objects as text

mod error;
mod evaluator;

pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
