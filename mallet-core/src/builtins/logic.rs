// mallet-core - Logic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use mallet_parser::MalletVal;

use crate::error::{Error, Result};

/// (not x) - true for nil and false
pub(crate) fn builtin_not(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("not", 1, args.len()));
    }
    Ok(MalletVal::bool(!args[0].is_truthy()))
}
