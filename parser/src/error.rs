//! Parser error types.

use crate::lexer::TokenKind;
use crate::Span;
use std::fmt;

/// A query that could not be read, with the position of the offending token.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// What the parser would have accepted here; empty for lexical errors.
    pub expected: Vec<String>,
    /// Name of the token that was found instead.
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: Vec::new(),
            found: None,
        }
    }

    /// `found` where `expected` was required.
    pub(crate) fn unexpected(span: Span, expected: &str, found: &TokenKind) -> Self {
        let message = match found {
            TokenKind::Eof => format!("unexpected end of input, expected {}", expected),
            other => format!("expected {}, found {}", expected, other.name()),
        };
        Self {
            message,
            span,
            expected: vec![expected.to_string()],
            found: Some(found.name().to_string()),
        }
    }

    /// A second comparison operator at the same level, as in `a < b < c`.
    pub(crate) fn chained_comparison(span: Span, found: &TokenKind) -> Self {
        Self {
            message: "comparison operators cannot be chained, combine them with AND".to_string(),
            span,
            expected: vec!["AND".to_string(), "OR".to_string()],
            found: Some(found.name().to_string()),
        }
    }

    pub fn duplicate_clause(span: Span, clause: &str) -> Self {
        Self {
            message: format!("duplicate {} clause", clause),
            span,
            expected: Vec::new(),
            found: Some(clause.to_string()),
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.line(),
            self.column(),
            self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
