// mallet-core - Runtime and evaluator for the mallet Lisp
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # mallet-core
//!
//! Runtime and evaluator for the mallet Lisp.
//! Provides a trampolined tree-walking interpreter for `MalletVal`
//! expressions, environments held in a collectable frame arena, and the
//! primitive library.

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod interpreter;
pub mod quasiquote;

pub use builtins::register_builtins;
pub use env::{EnvArena, Frame};
pub use error::{AritySpec, Error, Result};
pub use eval::{NativeFnImpl, make_native_fn};
pub use interpreter::{
    DEFAULT_GC_THRESHOLD, DEFAULT_MAX_EVAL_DEPTH, FsReader, Interpreter, InterpreterConfig,
    SourceReader,
};
pub use quasiquote::quasiquote;

// Re-export parser types for convenience
pub use mallet_parser::{FrameId, Keyword, MalletVal, Symbol};
