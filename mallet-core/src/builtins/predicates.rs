// mallet-core - Type predicate built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Type predicates: list?, atom?

use mallet_parser::MalletVal;

use crate::error::{Error, Result};

/// (list? x)
pub(crate) fn builtin_list_p(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("list?", 1, args.len()));
    }
    Ok(MalletVal::bool(matches!(args[0], MalletVal::List(_))))
}

/// (atom? x)
pub(crate) fn builtin_atom_p(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("atom?", 1, args.len()));
    }
    Ok(MalletVal::bool(matches!(args[0], MalletVal::Atom(_))))
}
