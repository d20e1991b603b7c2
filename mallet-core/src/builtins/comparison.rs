// mallet-core - Comparison built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Comparison operations: =, <, >, <=, >=
//!
//! All comparisons chain over adjacent pairs: `(< 1 2 3)` holds only when
//! every neighbouring pair satisfies the relation.

use mallet_parser::MalletVal;

use crate::error::{Error, Result};

use super::arithmetic::require_int;

/// Check that `rel` holds for every adjacent pair of integer arguments.
fn chain(op: &'static str, args: &[MalletVal], rel: fn(i64, i64) -> bool) -> Result<MalletVal> {
    if args.is_empty() {
        return Err(Error::arity_at_least(op, 1, 0));
    }
    let nums = args
        .iter()
        .map(|a| require_int(op, a))
        .collect::<Result<Vec<i64>>>()?;
    Ok(MalletVal::bool(nums.windows(2).all(|w| rel(w[0], w[1]))))
}

/// (= x & more) - structural equality
pub(crate) fn builtin_eq(args: &[MalletVal]) -> Result<MalletVal> {
    if args.is_empty() {
        return Err(Error::arity_at_least("=", 1, 0));
    }
    Ok(MalletVal::bool(args.windows(2).all(|w| w[0] == w[1])))
}

/// (< x & more)
pub(crate) fn builtin_lt(args: &[MalletVal]) -> Result<MalletVal> {
    chain("<", args, |a, b| a < b)
}

/// (> x & more)
pub(crate) fn builtin_gt(args: &[MalletVal]) -> Result<MalletVal> {
    chain(">", args, |a, b| a > b)
}

/// (<= x & more)
pub(crate) fn builtin_le(args: &[MalletVal]) -> Result<MalletVal> {
    chain("<=", args, |a, b| a <= b)
}

/// (>= x & more)
pub(crate) fn builtin_ge(args: &[MalletVal]) -> Result<MalletVal> {
    chain(">=", args, |a, b| a >= b)
}
