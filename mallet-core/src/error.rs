// mallet-core - Error types for the mallet evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for mallet evaluation.
//!
//! Every failure aborts the top-level form being evaluated; nothing in the
//! evaluator recovers locally. The prompt loop reports the error and moves on.

use mallet_parser::{MalletVal, ParseError, ParseErrorKind, Symbol};
use std::fmt;

/// Result type for mallet evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or evaluating.
#[derive(Debug, Clone)]
pub enum Error {
    /// Reader failure (unbalanced input, odd map literal, ...)
    Parse(ParseError),
    /// Lookup exhausted the environment chain
    SymbolNotFound(Symbol),
    /// Argument count does not match the callee; `name` is set for primitives
    ArityError {
        expected: AritySpec,
        got: usize,
        name: Option<&'static str>,
    },
    /// A primitive received an operand of the wrong kind
    TypeError {
        op: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    /// Application head is not callable
    NotApplicable(String),
    /// Malformed special form
    InvalidSyntax { form: &'static str, message: String },
    DivisionByZero,
    /// Integer overflow in the named operation
    Overflow(&'static str),
    /// File read or output write failure
    Io { path: String, message: String },
    /// Nested evaluation went deeper than the configured limit
    RecursionLimit(usize),
    /// A frame handle outlived its frame
    StaleFrame,
    /// Broken interpreter invariant
    Internal(String),
}

/// How many arguments a callee accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{}", n),
            AritySpec::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::SymbolNotFound(sym) => write!(f, "'{}' not found", sym),
            Error::ArityError {
                expected,
                got,
                name,
            } => {
                write!(f, "Wrong number of arguments")?;
                if let Some(name) = name {
                    write!(f, " to '{}'", name)?;
                }
                write!(f, ": expected {}, got {}", expected, got)
            }
            Error::TypeError { op, expected, got } => {
                write!(f, "{}: expected {}, got {}", op, expected, got)
            }
            Error::NotApplicable(val) => write!(f, "Cannot apply value: {}", val),
            Error::InvalidSyntax { form, message } => {
                write!(f, "Invalid '{}' syntax: {}", form, message)
            }
            Error::DivisionByZero => write!(f, "Division by zero"),
            Error::Overflow(op) => write!(f, "Integer overflow in '{}'", op),
            Error::Io { path, message } => write!(f, "Cannot read '{}': {}", path, message),
            Error::RecursionLimit(depth) => {
                write!(f, "Evaluation nested deeper than {} levels", depth)
            }
            Error::StaleFrame => write!(f, "Environment frame no longer exists"),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl Error {
    /// Primitive `name` takes exactly `expected` arguments.
    pub fn arity_exact(name: &'static str, expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::Exact(expected),
            got,
            name: Some(name),
        }
    }

    /// Primitive `name` takes at least `expected` arguments.
    pub fn arity_at_least(name: &'static str, expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::AtLeast(expected),
            got,
            name: Some(name),
        }
    }

    /// Primitive `op` wanted `expected` but was given `got`.
    pub fn type_mismatch(op: &'static str, expected: &'static str, got: &MalletVal) -> Self {
        Error::TypeError {
            op,
            expected,
            got: got.type_name(),
        }
    }

    pub fn syntax(form: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidSyntax {
            form,
            message: message.into(),
        }
    }

    /// The reader error kind, if this is a reader failure.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse(e) => Some(e.kind),
            _ => None,
        }
    }
}
