// mallet-core - Atom built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Atom operations: atom, deref, reset!, swap!

use mallet_parser::{MalletAtom, MalletVal};

use crate::error::{Error, Result};
use crate::interpreter::Interpreter;

fn require_atom<'a>(op: &'static str, val: &'a MalletVal) -> Result<&'a MalletAtom> {
    match val {
        MalletVal::Atom(a) => Ok(a),
        other => Err(Error::type_mismatch(op, "atom", other)),
    }
}

/// (atom x) - Create an atom with initial value x
pub(crate) fn builtin_atom(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("atom", 1, args.len()));
    }
    Ok(MalletVal::atom(args[0].clone()))
}

/// (deref atom) - Current value of the atom
pub(crate) fn builtin_deref(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("deref", 1, args.len()));
    }
    Ok(require_atom("deref", &args[0])?.deref())
}

/// (reset! atom newval) - Set atom value, returns newval
pub(crate) fn builtin_reset(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 2 {
        return Err(Error::arity_exact("reset!", 2, args.len()));
    }
    Ok(require_atom("reset!", &args[0])?.reset(args[1].clone()))
}

/// (swap! atom f & args) - Set atom value to (f current args...), returns it
pub(crate) fn builtin_swap(interp: &mut Interpreter, args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() < 2 {
        return Err(Error::arity_at_least("swap!", 2, args.len()));
    }
    let atom = require_atom("swap!", &args[0])?;

    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(atom.deref());
    call_args.extend(args[2..].iter().cloned());

    let new_val = interp.apply(&args[1], call_args)?;
    Ok(atom.reset(new_val))
}
