// mallet-core - Sequence built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequence operations: list, count, empty?, cons, concat, vec

use mallet_parser::{MalletVal, Vector};

use crate::error::{Error, Result};

/// Elements of a list, vector or nil (empty) argument.
fn seq_items(op: &'static str, val: &MalletVal) -> Result<Vector<MalletVal>> {
    match val {
        MalletVal::Nil => Ok(Vector::new()),
        MalletVal::List(items) | MalletVal::Vector(items) => Ok(items.clone()),
        other => Err(Error::type_mismatch(op, "list or vector", other)),
    }
}

/// (list & items)
pub(crate) fn builtin_list(args: &[MalletVal]) -> Result<MalletVal> {
    Ok(MalletVal::list(args.to_vec()))
}

/// (count coll) - element count of a list or vector; 0 for anything else
pub(crate) fn builtin_count(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("count", 1, args.len()));
    }
    let len = args[0].as_seq().map_or(0, |items| items.len());
    Ok(MalletVal::int(len as i64))
}

/// (empty? coll)
pub(crate) fn builtin_empty_p(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("empty?", 1, args.len()));
    }
    let empty = match &args[0] {
        MalletVal::Nil => true,
        MalletVal::List(items) | MalletVal::Vector(items) | MalletVal::Map(items) => {
            items.is_empty()
        }
        MalletVal::String(s) => s.is_empty(),
        other => {
            return Err(Error::type_mismatch("empty?", "collection or string", other));
        }
    };
    Ok(MalletVal::bool(empty))
}

/// (cons x coll) - always returns a list
pub(crate) fn builtin_cons(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 2 {
        return Err(Error::arity_exact("cons", 2, args.len()));
    }
    let mut items = seq_items("cons", &args[1])?;
    items.push_front(args[0].clone());
    Ok(MalletVal::List(items))
}

/// (concat & colls)
pub(crate) fn builtin_concat(args: &[MalletVal]) -> Result<MalletVal> {
    let mut result = Vector::new();
    for arg in args {
        result.append(seq_items("concat", arg)?);
    }
    Ok(MalletVal::List(result))
}

/// (vec coll)
pub(crate) fn builtin_vec(args: &[MalletVal]) -> Result<MalletVal> {
    if args.len() != 1 {
        return Err(Error::arity_exact("vec", 1, args.len()));
    }
    match &args[0] {
        MalletVal::List(items) | MalletVal::Vector(items) => Ok(MalletVal::Vector(items.clone())),
        other => Err(Error::type_mismatch("vec", "list or vector", other)),
    }
}
