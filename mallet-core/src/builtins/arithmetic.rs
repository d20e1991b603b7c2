// mallet-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic operations: +, -, *, /
//!
//! ## Integer Overflow Behaviour
//!
//! All arithmetic is on 64-bit signed integers and is checked: a result
//! outside the `i64` range is `Error::Overflow`, never a wrapped value.
//! Division truncates toward zero.

use mallet_parser::MalletVal;

use crate::error::{Error, Result};

/// Extract an integer operand.
pub(crate) fn require_int(op: &'static str, val: &MalletVal) -> Result<i64> {
    match val {
        MalletVal::Int(n) => Ok(*n),
        other => Err(Error::type_mismatch(op, "integer", other)),
    }
}

/// Fold `args` left to right with a checked operation, starting from the
/// first argument.
fn fold_checked(
    op: &'static str,
    args: &[MalletVal],
    apply: impl Fn(i64, i64) -> Result<i64>,
) -> Result<i64> {
    let Some((first, rest)) = args.split_first() else {
        return Err(Error::arity_at_least(op, 1, 0));
    };
    let mut acc = require_int(op, first)?;
    for arg in rest {
        acc = apply(acc, require_int(op, arg)?)?;
    }
    Ok(acc)
}

/// (+ & nums)
pub(crate) fn builtin_add(args: &[MalletVal]) -> Result<MalletVal> {
    if args.is_empty() {
        return Ok(MalletVal::int(0));
    }
    fold_checked("+", args, |a, b| a.checked_add(b).ok_or(Error::Overflow("+")))
        .map(MalletVal::int)
}

/// (- x & nums) - with one argument, negates it
pub(crate) fn builtin_sub(args: &[MalletVal]) -> Result<MalletVal> {
    if let [x] = args {
        let n = require_int("-", x)?;
        return n.checked_neg().map(MalletVal::int).ok_or(Error::Overflow("-"));
    }
    fold_checked("-", args, |a, b| a.checked_sub(b).ok_or(Error::Overflow("-")))
        .map(MalletVal::int)
}

/// (* & nums)
pub(crate) fn builtin_mul(args: &[MalletVal]) -> Result<MalletVal> {
    if args.is_empty() {
        return Ok(MalletVal::int(1));
    }
    fold_checked("*", args, |a, b| a.checked_mul(b).ok_or(Error::Overflow("*")))
        .map(MalletVal::int)
}

/// (/ x & nums)
pub(crate) fn builtin_div(args: &[MalletVal]) -> Result<MalletVal> {
    fold_checked("/", args, |a, b| {
        if b == 0 {
            return Err(Error::DivisionByZero);
        }
        a.checked_div(b).ok_or(Error::Overflow("/"))
    })
    .map(MalletVal::int)
}
