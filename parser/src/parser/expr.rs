//! Expression parsing.
//!
//! Handles operator precedence, lowest first:
//! - Logical: OR, AND
//! - Comparison: =, !=, <>, <, <=, >, >= (non-associative)
//! - Additive: +, -
//! - Multiplicative: *, /
//! - Postfix: field access (.)
//! - Primary: literals, fields, parenthesized expressions

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            let start = left.span();
            self.advance();
            let right = self.parse_and()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(BinaryOp::Or, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;

        while self.check(&TokenKind::And) {
            let start = left.span();
            self.advance();
            let right = self.parse_comparison()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(BinaryOp::And, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn comparison_op(&self) -> Option<BinaryOp> {
        match self.peek().kind {
            TokenKind::Eq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        }
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_additive()?;

        let Some(op) = self.comparison_op() else {
            return Ok(left);
        };
        let start = left.span();
        self.advance();
        let right = self.parse_additive()?;
        let span = self.span_from(start);

        if self.comparison_op().is_some() {
            let token = self.peek();
            return Err(ParseError::chained_comparison(token.span, &token.kind));
        }

        Ok(Expr::BinaryOp(op, Box::new(left), Box::new(right), span))
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = if self.check(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.check(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };

            let start = left.span();
            self.advance();
            let right = self.parse_multiplicative()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(op, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_postfix()?;

        loop {
            let op = if self.check(&TokenKind::Star) {
                BinaryOp::Mul
            } else if self.check(&TokenKind::Slash) {
                BinaryOp::Div
            } else {
                break;
            };

            let start = left.span();
            self.advance();
            let right = self.parse_postfix()?;
            let span = self.span_from(start);
            left = Expr::BinaryOp(op, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.check(&TokenKind::Dot) {
            let start = expr.span();
            self.advance();
            let field = self.expect_name()?;
            let span = self.span_from(start);
            expr = Expr::Access(Box::new(expr), field, span);
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        let kind = match &token.kind {
            TokenKind::Null => LiteralKind::Null,
            TokenKind::True => LiteralKind::Bool(true),
            TokenKind::False => LiteralKind::Bool(false),
            TokenKind::Int(n) => LiteralKind::Int(*n),
            TokenKind::Float(f) => LiteralKind::Float(*f),
            TokenKind::String(s) => LiteralKind::String(s.clone()),

            // Negative numeric literal
            TokenKind::Minus => {
                self.advance();
                let kind = match self.peek().kind {
                    TokenKind::Int(n) => LiteralKind::Int(-n),
                    TokenKind::Float(f) => LiteralKind::Float(-f),
                    _ => return Err(self.unexpected("number")),
                };
                self.advance();
                let span = self.span_from(token.span);
                return Ok(Expr::Literal(Literal { kind, span }));
            }

            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                return Ok(Expr::Field(name, token.span));
            }

            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(expr);
            }

            _ => return Err(self.unexpected("expression")),
        };

        self.advance();
        Ok(Expr::Literal(Literal {
            kind,
            span: token.span,
        }))
    }
}
