// mallet-parser - Parser for mallet
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Recursive descent parser for mallet source code.
//!
//! Converts tokens into `MalletVal` forms.

use std::fmt;

use crate::keyword::Keyword;
use crate::lexer::{Lexer, Token};
use crate::symbol::Symbol;
use crate::value::MalletVal;

/// What went wrong while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A collection or string literal was never closed
    Unbalanced,
    /// A map literal held an odd number of forms
    OddMap,
    /// A closing delimiter with no matching opener
    UnexpectedDelimiter,
    /// An integer literal outside the 64-bit range
    InvalidNumber,
    /// Forms nested deeper than [`MAX_NESTING`]
    TooDeep,
}

/// Deepest nesting of forms the parser accepts. Each collection and reader
/// macro adds a level, as does the innermost form.
pub const MAX_NESTING: usize = 512;

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at {}:{}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// The parser converts tokens into `MalletVal` forms.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let line = lexer.line();
        let column = lexer.column();
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            line,
            column,
            depth: 0,
        }
    }

    /// Parse a single top-level form, skipping comments.
    /// Returns None if at end of input.
    pub fn parse(&mut self) -> Result<Option<MalletVal>, ParseError> {
        while matches!(self.current, Token::Comment(_)) {
            self.advance();
        }
        if matches!(self.current, Token::Eof) {
            return Ok(None);
        }
        self.depth = 0;
        let val = self.parse_form()?;
        Ok(Some(val))
    }

    /// Parse all forms from the source.
    pub fn parse_all(&mut self) -> Result<Vec<MalletVal>, ParseError> {
        let mut forms = Vec::new();
        while let Some(form) = self.parse()? {
            forms.push(form);
        }
        Ok(forms)
    }

    /// Parse a string and return the first form (convenience function).
    pub fn parse_str(source: &str) -> Result<Option<MalletVal>, ParseError> {
        Parser::new(source).parse()
    }

    /// Parse a string and return all forms (convenience function).
    pub fn parse_all_str(source: &str) -> Result<Vec<MalletVal>, ParseError> {
        Parser::new(source).parse_all()
    }

    // ========================================================================
    // Internal parsing methods
    // ========================================================================

    fn advance(&mut self) -> Token {
        let prev = std::mem::replace(&mut self.current, Token::Eof);
        self.line = self.lexer.line();
        self.column = self.lexer.column();
        self.current = self.lexer.next_token();
        prev
    }

    fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError {
            kind,
            message: message.into(),
            line: self.line,
            column: self.column,
        }
    }

    fn parse_form(&mut self) -> Result<MalletVal, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(
                ParseErrorKind::TooDeep,
                format!("Forms nested deeper than {} levels", MAX_NESTING),
            ));
        }
        self.depth += 1;
        let result = self.parse_current();
        self.depth -= 1;
        result
    }

    fn parse_current(&mut self) -> Result<MalletVal, ParseError> {
        match &self.current {
            Token::LParen => Ok(MalletVal::list(self.parse_seq(Token::RParen, "list")?)),
            Token::LBracket => Ok(MalletVal::vector(self.parse_seq(Token::RBracket, "vector")?)),
            Token::LBrace => self.parse_map(),

            Token::Quote => self.parse_quote("quote"),
            Token::Quasiquote => self.parse_quote("quasiquote"),
            Token::Unquote => self.parse_quote("unquote"),
            Token::SpliceUnquote => self.parse_quote("splice-unquote"),
            Token::Deref => self.parse_quote("deref"),

            Token::String { .. } => self.parse_string(),
            Token::Atom(_) => self.parse_atom(),
            Token::Comment(_) => {
                self.advance();
                Ok(MalletVal::Nil)
            }

            Token::RParen | Token::RBracket | Token::RBrace => {
                let tok = self.current.to_string();
                Err(self.error(
                    ParseErrorKind::UnexpectedDelimiter,
                    format!("Unexpected '{}'", tok),
                ))
            }
            Token::Eof => Err(self.error(ParseErrorKind::Unbalanced, "Unexpected end of input")),
        }
    }

    fn parse_seq(&mut self, close: Token, what: &str) -> Result<Vec<MalletVal>, ParseError> {
        self.advance(); // consume opener
        let mut elements = Vec::new();

        loop {
            if self.current == close {
                self.advance();
                return Ok(elements);
            }
            if matches!(self.current, Token::Eof) {
                return Err(self.error(
                    ParseErrorKind::Unbalanced,
                    format!("Expected '{}' to close {}, found end of input", close, what),
                ));
            }
            elements.push(self.parse_form()?);
        }
    }

    fn parse_map(&mut self) -> Result<MalletVal, ParseError> {
        let (line, column) = (self.line, self.column);
        let elements = self.parse_seq(Token::RBrace, "map")?;
        MalletVal::map(elements).map_err(|e| ParseError {
            kind: ParseErrorKind::OddMap,
            message: format!("Map literal must contain an even number of forms, got {}", e.len),
            line,
            column,
        })
    }

    fn parse_quote(&mut self, name: &str) -> Result<MalletVal, ParseError> {
        self.advance(); // consume the macro token
        if matches!(self.current, Token::Eof) {
            return Err(self.error(
                ParseErrorKind::Unbalanced,
                format!("Expected a form after {}, found end of input", name),
            ));
        }
        let form = self.parse_form()?;
        Ok(MalletVal::list(vec![MalletVal::symbol(name), form]))
    }

    fn parse_string(&mut self) -> Result<MalletVal, ParseError> {
        match self.advance() {
            Token::String {
                text,
                terminated: true,
            } => Ok(MalletVal::string(unescape(&text))),
            _ => Err(self.error(ParseErrorKind::Unbalanced, "Unterminated string literal")),
        }
    }

    fn parse_atom(&mut self) -> Result<MalletVal, ParseError> {
        let Token::Atom(text) = self.advance() else {
            return Err(self.error(ParseErrorKind::Unbalanced, "Expected an atom"));
        };

        if is_integer(&text) {
            return text.parse::<i64>().map(MalletVal::int).map_err(|_| {
                self.error(
                    ParseErrorKind::InvalidNumber,
                    format!("Integer literal out of range: {}", text),
                )
            });
        }

        Ok(match text.as_str() {
            "nil" => MalletVal::Nil,
            "true" => MalletVal::bool(true),
            "false" => MalletVal::bool(false),
            s if s.starts_with(':') => MalletVal::Keyword(Keyword::parse(s)),
            s => MalletVal::Symbol(Symbol::new(s)),
        })
    }
}

/// Optional minus sign followed by at least one digit, and nothing else.
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve backslash escapes: `\n` is a newline, any other escaped
/// character stands for itself.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Read the first form of `source`, or Nil when it holds none.
pub fn read_str(source: &str) -> Result<MalletVal, ParseError> {
    Ok(Parser::parse_str(source)?.unwrap_or(MalletVal::Nil))
}

/// Parse a string and return all forms.
pub fn read_all(source: &str) -> Result<Vec<MalletVal>, ParseError> {
    Parser::parse_all_str(source)
}

// ============================================================================
// Tests
// ============================================================================
