//! HQL Parser
//!
//! This crate provides parsing for HQL query text:
//! - Query parsing (SELECT ... FROM ... WHERE ... ORDER BY ... LIMIT ... OFFSET)
//! - Expression parsing (arithmetic, comparison, logical, field access)
//! - Script splitting for batch input
//! - Error handling with location information

mod ast;
mod error;
mod lexer;
mod parser;
mod script;

pub use ast::*;
pub use error::*;
pub use parser::{parse_expr, parse_query, Parser};
pub use script::split_queries;
