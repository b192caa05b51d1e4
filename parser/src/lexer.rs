//! Lexer (tokenizer) for query text.

use crate::{ParseError, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords (case-insensitive)
    Select,
    From,
    Where,
    Order,
    By,
    Asc,
    Desc,
    Limit,
    Offset,
    As,
    And,
    Or,
    Null,
    True,
    False,

    // Literals
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    // Symbols
    LParen,    // (
    RParen,    // )
    Comma,     // ,
    Dot,       // .
    Semicolon, // ;
    Eq,        // =
    NotEq,     // != or <>
    Lt,        // <
    LtEq,      // <=
    Gt,        // >
    GtEq,      // >=
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /

    // End of file
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::Order => "ORDER",
            TokenKind::By => "BY",
            TokenKind::Asc => "ASC",
            TokenKind::Desc => "DESC",
            TokenKind::Limit => "LIMIT",
            TokenKind::Offset => "OFFSET",
            TokenKind::As => "AS",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::String(_) => "string",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Eof => "end of input",
        }
    }

    /// Returns true if this token is a keyword (not an identifier, literal, or punctuation).
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Select
                | TokenKind::From
                | TokenKind::Where
                | TokenKind::Order
                | TokenKind::By
                | TokenKind::Asc
                | TokenKind::Desc
                | TokenKind::Limit
                | TokenKind::Offset
                | TokenKind::As
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
        )
    }
}

/// A token with its span.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Keywords, matched without regard to case.
const KEYWORDS: [(&str, TokenKind); 15] = [
    ("SELECT", TokenKind::Select),
    ("FROM", TokenKind::From),
    ("WHERE", TokenKind::Where),
    ("ORDER", TokenKind::Order),
    ("BY", TokenKind::By),
    ("ASC", TokenKind::Asc),
    ("DESC", TokenKind::Desc),
    ("LIMIT", TokenKind::Limit),
    ("OFFSET", TokenKind::Offset),
    ("AS", TokenKind::As),
    ("AND", TokenKind::And),
    ("OR", TokenKind::Or),
    ("NULL", TokenKind::Null),
    ("TRUE", TokenKind::True),
    ("FALSE", TokenKind::False),
];

/// Lexer state: a byte offset into the query plus its line and column.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

/// Where a token started.
#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize all input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let mark = self.mark();
            let Some(c) = self.bump() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: self.span(mark),
                });
                return Ok(tokens);
            };
            let kind = self.scan(c, mark)?;
            tokens.push(Token {
                kind,
                span: self.span(mark),
            });
        }
    }

    // ==================== CURSOR ====================

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `c` if it is next.
    fn eat(&mut self, c: char) -> bool {
        let matched = self.peek() == Some(c);
        if matched {
            self.bump();
        }
        matched
    }

    /// Consume characters while `accept` holds and return them.
    fn eat_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn span(&self, mark: Mark) -> Span {
        Span::new(mark.pos, self.pos, mark.line, mark.column)
    }

    /// Whitespace and `--` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            if !self.rest().starts_with("--") {
                return;
            }
            self.eat_while(|c| c != '\n');
        }
    }

    // ==================== TOKENS ====================

    fn scan(&mut self, c: char, mark: Mark) -> ParseResult<TokenKind> {
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            '=' => TokenKind::Eq,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '<' if self.eat('=') => TokenKind::LtEq,
            '<' if self.eat('>') => TokenKind::NotEq,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::GtEq,
            '>' => TokenKind::Gt,
            '!' if self.eat('=') => TokenKind::NotEq,
            '\'' | '"' => TokenKind::String(self.scan_string(c, mark)?),
            '`' => TokenKind::Ident(self.scan_quoted_ident(mark)?),
            '0'..='9' => self.scan_number(mark)?,
            c if is_ident_start(c) => self.scan_word(mark),
            other => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", other),
                    self.span(mark),
                ))
            }
        };
        Ok(kind)
    }

    /// Body of a quoted string. A doubled quote or a backslash escape
    /// stands for the quote itself.
    fn scan_string(&mut self, quote: char, mark: Mark) -> ParseResult<String> {
        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::new("unterminated string literal", self.span(mark)));
            };
            match c {
                c if c == quote && self.eat(quote) => value.push(quote),
                c if c == quote => return Ok(value),
                '\\' => value.push(self.scan_escape(mark)?),
                c => value.push(c),
            }
        }
    }

    fn scan_escape(&mut self, mark: Mark) -> ParseResult<char> {
        let escape = self.mark();
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some(c @ ('\\' | '\'' | '"')) => Ok(c),
            Some(c) => Err(ParseError::new(
                format!("invalid escape sequence '\\{}'", c),
                self.span(escape),
            )),
            None => Err(ParseError::new("unterminated string literal", self.span(mark))),
        }
    }

    /// A backquoted identifier, which may spell a keyword.
    fn scan_quoted_ident(&mut self, mark: Mark) -> ParseResult<String> {
        let ident = self.eat_while(|c| c != '`' && c != '\n');
        if !self.eat('`') {
            return Err(ParseError::new("unterminated quoted identifier", self.span(mark)));
        }
        if ident.is_empty() {
            return Err(ParseError::new("empty quoted identifier", self.span(mark)));
        }
        Ok(ident.to_string())
    }

    /// Digits with an optional fraction. The `.` is only taken when a digit
    /// follows, so `1.x` stays an access.
    fn scan_number(&mut self, mark: Mark) -> ParseResult<TokenKind> {
        self.eat_while(|c| c.is_ascii_digit());
        let fraction = self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit());
        if fraction {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }

        let text = &self.input[mark.pos..self.pos];
        let kind = if fraction {
            text.parse().map(TokenKind::Float).ok()
        } else {
            text.parse().map(TokenKind::Int).ok()
        };
        kind.ok_or_else(|| ParseError::new(format!("number out of range: {}", text), self.span(mark)))
    }

    fn scan_word(&mut self, mark: Mark) -> TokenKind {
        self.eat_while(is_ident_continue);
        let word = &self.input[mark.pos..self.pos];
        KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(word))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| TokenKind::Ident(word.to_string()))
    }
}

/// Java identifiers may contain `$`, as in nested class names.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
