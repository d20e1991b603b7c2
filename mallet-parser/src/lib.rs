// mallet-parser - Reader and value model for the mallet Lisp
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # mallet-parser
//!
//! Value model, lexer, parser and printer for the mallet Lisp.
//! Produces `MalletVal` forms from source strings and renders them back.

pub mod keyword;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod symbol;
pub mod value;

pub use im::Vector;
pub use keyword::Keyword;
pub use lexer::{Lexer, Token};
pub use parser::{MAX_NESTING, ParseError, ParseErrorKind, Parser, read_all, read_str};
pub use printer::{Printed, escape_string, join_printed};
pub use symbol::Symbol;
pub use value::{FrameId, MalletAtom, MalletFn, MalletNativeFn, MalletVal, OddMapError};
