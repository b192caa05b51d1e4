//! SELECT statement parsing.

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser {
    /// Parse `SELECT columns FROM class clause* ;?` up to end of input.
    pub fn parse_query(&mut self) -> ParseResult<Query> {
        let start = self.expect(&TokenKind::Select)?.span;
        let projections = self.parse_columns()?;
        self.expect(&TokenKind::From)?;
        let class_name = self.parse_class_name()?;

        let mut query = Query {
            class_name,
            projections,
            filter: None,
            order_by: None,
            limit: None,
            offset: None,
            span: start,
        };
        self.parse_clauses(&mut query)?;

        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected("WHERE, ORDER BY, LIMIT, OFFSET or end of query"));
        }

        query.span = self.span_from(start);
        Ok(query)
    }

    fn parse_columns(&mut self) -> ParseResult<Vec<Projection>> {
        if self.check(&TokenKind::Star) {
            self.advance();
            return Ok(Vec::new());
        }

        let mut projections = vec![self.parse_projection()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            projections.push(self.parse_projection()?);
        }
        Ok(projections)
    }

    fn parse_projection(&mut self) -> ParseResult<Projection> {
        let start = self.peek().span;
        let expr = self.parse_expr()?;
        let expr_span = self.span_from(start);

        let alias = if self.check(&TokenKind::As) {
            self.advance();
            Some(self.expect_name()?)
        } else {
            None
        };

        let name = match &alias {
            Some(alias) => alias.clone(),
            None => self.text(expr_span).trim().to_string(),
        };
        Ok(Projection {
            expr,
            name,
            alias,
            span: self.span_from(start),
        })
    }

    /// Class name with `.` or `/` separators, normalized to dots.
    fn parse_class_name(&mut self) -> ParseResult<String> {
        let mut name = self.expect_name()?;
        while self.check(&TokenKind::Dot) || self.check(&TokenKind::Slash) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_name()?);
        }
        Ok(name)
    }

    fn parse_clauses(&mut self, query: &mut Query) -> ParseResult<()> {
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Where => {
                    if query.filter.is_some() {
                        return Err(ParseError::duplicate_clause(token.span, "WHERE"));
                    }
                    self.advance();
                    query.filter = Some(self.parse_expr()?);
                }
                TokenKind::Order => {
                    if query.order_by.is_some() {
                        return Err(ParseError::duplicate_clause(token.span, "ORDER BY"));
                    }
                    self.advance();
                    self.expect(&TokenKind::By)?;
                    query.order_by = Some(self.parse_order_by(token.span)?);
                }
                TokenKind::Limit => {
                    if query.limit.is_some() {
                        return Err(ParseError::duplicate_clause(token.span, "LIMIT"));
                    }
                    self.advance();
                    query.limit = Some(self.parse_count()?);
                }
                TokenKind::Offset => {
                    if query.offset.is_some() {
                        return Err(ParseError::duplicate_clause(token.span, "OFFSET"));
                    }
                    self.advance();
                    query.offset = Some(self.parse_count()?);
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_order_by(&mut self, start: Span) -> ParseResult<OrderBy> {
        let expr = self.parse_expr()?;
        let direction = match self.peek().kind {
            TokenKind::Asc => {
                self.advance();
                OrderDirection::Asc
            }
            TokenKind::Desc => {
                self.advance();
                OrderDirection::Desc
            }
            _ => OrderDirection::Asc,
        };
        Ok(OrderBy {
            expr,
            direction,
            span: self.span_from(start),
        })
    }

    fn parse_count(&mut self) -> ParseResult<u64> {
        let span = self.peek().span;
        let n = self.expect_int()?;
        u64::try_from(n).map_err(|_| ParseError::new("expected a non-negative integer", span))
    }
}
