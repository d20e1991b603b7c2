// mallet-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers and utilities for mallet integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`eval_str`] - Evaluate code in a fresh interpreter
//! - [`eval_str_with`] - Evaluate code in an existing interpreter
//! - [`new_interpreter`] - Create a fresh interpreter
//! - [`captured_interpreter`] - Interpreter whose output is captured
//! - [`MemReader`] - In-memory file reader for `slurp`
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that code evaluates to an expected value
//! - [`assert_eval_err!`] - Assert that code produces an error (optionally
//!   matching a pattern)

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

pub use mallet_core::{Error, Interpreter, InterpreterConfig, SourceReader};
#[allow(unused_imports)]
pub use mallet_parser::{Keyword, MalletVal, Parser, Symbol};

/// Evaluate a mallet source string in a fresh interpreter, returning the
/// value of the last form.
pub fn eval_str(s: &str) -> Result<MalletVal, Error> {
    eval_str_with(s, &mut new_interpreter())
}

/// Evaluate a mallet source string in the given interpreter.
pub fn eval_str_with(s: &str, interp: &mut Interpreter) -> Result<MalletVal, Error> {
    interp.eval_str(s)
}

/// Create a new interpreter with the default configuration.
///
/// # Panics
///
/// Panics if the session fails to start (should never happen).
#[must_use]
pub fn new_interpreter() -> Interpreter {
    Interpreter::new().expect("interpreter should start")
}

/// An output sink whose contents the test can read back.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Create an interpreter writing to a buffer the test can inspect.
#[must_use]
pub fn captured_interpreter() -> (Interpreter, SharedBuf) {
    let buf = SharedBuf::default();
    let interp = new_interpreter().with_output(buf.clone());
    (interp, buf)
}

/// Files served from memory.
#[derive(Default)]
pub struct MemReader {
    files: HashMap<String, String>,
}

impl MemReader {
    #[must_use]
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }
}

impl SourceReader for MemReader {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

/// Assert that evaluating `input` produces the expected value.
///
/// # Example
///
/// ```ignore
/// assert_eval!("(+ 1 2)", MalletVal::int(3));
/// ```
#[macro_export]
macro_rules! assert_eval {
    ($input:expr, $expected:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.as_ref().err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}

/// Assert that evaluating `input` produces an error, optionally matching a
/// pattern.
///
/// # Example
///
/// ```ignore
/// assert_eval_err!("(+ 1 :kw)");
/// assert_eval_err!("(nope)", Error::SymbolNotFound(_));
/// ```
#[macro_export]
macro_rules! assert_eval_err {
    ($input:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_err(),
            "Expected error for '{}' but got {:?}",
            $input,
            result.ok()
        );
    };
    ($input:expr, $pattern:pat) => {
        let result = $crate::common::eval_str($input);
        assert!(
            matches!(result, Err($pattern)),
            "Expected {} for '{}' but got {:?}",
            stringify!($pattern),
            $input,
            result
        );
    };
}
