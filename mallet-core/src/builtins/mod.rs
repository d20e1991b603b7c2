// mallet-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Built-in functions for mallet.
//!
//! Most primitives are plain functions of their evaluated arguments. The few
//! that print, read files, evaluate or call back into user functions also
//! take the interpreter session.

mod arithmetic;
mod atoms;
mod comparison;
mod io;
mod logic;
mod predicates;
mod sequences;

use mallet_parser::MalletVal;

use crate::error::Result;
use crate::interpreter::Interpreter;

use arithmetic::{builtin_add, builtin_div, builtin_mul, builtin_sub};
use atoms::{builtin_atom, builtin_deref, builtin_reset, builtin_swap};
use comparison::{builtin_eq, builtin_ge, builtin_gt, builtin_le, builtin_lt};
use io::{
    builtin_eval, builtin_pr_str, builtin_println, builtin_prn, builtin_read_string,
    builtin_slurp, builtin_str,
};
use logic::builtin_not;
use predicates::{builtin_atom_p, builtin_list_p};
use sequences::{
    builtin_concat, builtin_cons, builtin_count, builtin_empty_p, builtin_list, builtin_vec,
};

type PureFn = fn(&[MalletVal]) -> Result<MalletVal>;

/// Adapt a primitive that does not need the session.
fn pure(f: PureFn) -> impl Fn(&mut Interpreter, &[MalletVal]) -> Result<MalletVal> {
    move |_, args| f(args)
}

/// Register all built-in functions in the session's root environment.
pub fn register_builtins(interp: &mut Interpreter) -> Result<()> {
    // Arithmetic
    interp.define_native("+", pure(builtin_add))?;
    interp.define_native("-", pure(builtin_sub))?;
    interp.define_native("*", pure(builtin_mul))?;
    interp.define_native("/", pure(builtin_div))?;

    // Comparison
    interp.define_native("=", pure(builtin_eq))?;
    interp.define_native("<", pure(builtin_lt))?;
    interp.define_native(">", pure(builtin_gt))?;
    interp.define_native("<=", pure(builtin_le))?;
    interp.define_native(">=", pure(builtin_ge))?;

    // Logic and predicates
    interp.define_native("not", pure(builtin_not))?;
    interp.define_native("list?", pure(builtin_list_p))?;
    interp.define_native("atom?", pure(builtin_atom_p))?;

    // Sequences
    interp.define_native("list", pure(builtin_list))?;
    interp.define_native("count", pure(builtin_count))?;
    interp.define_native("empty?", pure(builtin_empty_p))?;
    interp.define_native("cons", pure(builtin_cons))?;
    interp.define_native("concat", pure(builtin_concat))?;
    interp.define_native("vec", pure(builtin_vec))?;

    // Atoms
    interp.define_native("atom", pure(builtin_atom))?;
    interp.define_native("deref", pure(builtin_deref))?;
    interp.define_native("reset!", pure(builtin_reset))?;
    interp.define_native("swap!", builtin_swap)?;

    // Printing
    interp.define_native("pr-str", pure(builtin_pr_str))?;
    interp.define_native("str", pure(builtin_str))?;
    interp.define_native("prn", builtin_prn)?;
    interp.define_native("println", builtin_println)?;

    // Reading and evaluation
    interp.define_native("read-string", pure(builtin_read_string))?;
    interp.define_native("slurp", builtin_slurp)?;
    interp.define_native("eval", builtin_eval)?;

    Ok(())
}
