// mallet-core - I/O and reader built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Printing, reading and evaluation: pr-str, str, prn, println,
//! read-string, slurp, eval

use mallet_parser::{MalletVal, join_printed, read_str};

use crate::error::{Error, Result};
use crate::interpreter::Interpreter;

fn require_string<'a>(op: &'static str, val: &'a MalletVal) -> Result<&'a str> {
    match val {
        MalletVal::String(s) => Ok(s),
        other => Err(Error::type_mismatch(op, "string", other)),
    }
}

// ============================================================================
// Printing
// ============================================================================

/// (pr-str & args) - readable forms joined with spaces
pub(crate) fn builtin_pr_str(args: &[MalletVal]) -> Result<MalletVal> {
    Ok(MalletVal::string(join_printed(args, true, " ")))
}

/// (str & args) - display forms concatenated
pub(crate) fn builtin_str(args: &[MalletVal]) -> Result<MalletVal> {
    Ok(MalletVal::string(join_printed(args, false, "")))
}

/// (prn & args) - write readable forms and a newline
pub(crate) fn builtin_prn(interp: &mut Interpreter, args: &[MalletVal]) -> Result<MalletVal> {
    interp.write_line(&join_printed(args, true, " "))?;
    Ok(MalletVal::Nil)
}

/// (println & args) - write display forms and a newline
pub(crate) fn builtin_println(interp: &mut Interpreter, args: &[MalletVal]) -> Result<MalletVal> {
    interp.write_line(&join_printed(args, false, " "))?;
    Ok(MalletVal::Nil)
}

// ============================================================================
// Reading and evaluation
// ============================================================================

/// (read-string s) - first form in s, or nil
pub(crate) fn builtin_read_string(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("read-string", 1, args.len()));
    }
    Ok(read_str(require_string("read-string", &args[0])?)?)
}

/// (slurp path) - whole contents of a file
pub(crate) fn builtin_slurp(interp: &mut Interpreter, args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("slurp", 1, args.len()));
    }
    let path = require_string("slurp", &args[0])?;
    interp.read_source(path).map(MalletVal::string)
}

/// (eval form) - evaluate form in the root environment
pub(crate) fn builtin_eval(interp: &mut Interpreter, args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("eval", 1, args.len()));
    }
    let root = interp.root_env();
    interp.eval(&args[0], root)
}
