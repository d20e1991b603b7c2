// mallet-core - Quasiquote expansion
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Quasiquote expansion.
//!
//! A pure syntax-to-syntax transform: the template is rewritten into calls to
//! `cons`, `concat` and `vec`, which are then evaluated like any other form.
//!
//! ```text
//! `(1 ~x ~@xs)  =>  (cons 1 (cons x (concat xs ())))
//! `[a]          =>  (vec (cons (quote a) ()))
//! ```

use mallet_parser::{MalletVal, Vector};

/// Expand a quasiquote template.
pub fn quasiquote(ast: &MalletVal) -> MalletVal {
    if let Some(inner) = unquoted(ast, "unquote") {
        return inner.clone();
    }

    match ast {
        MalletVal::List(items) => expand_seq(items),
        MalletVal::Vector(items) => call("vec", vec![expand_seq(items)]),
        MalletVal::Symbol(_) => call("quote", vec![ast.clone()]),
        _ => ast.clone(),
    }
}

/// Fold the elements right to left, seeded with the empty list.
fn expand_seq(items: &Vector<MalletVal>) -> MalletVal {
    items.iter().rev().fold(MalletVal::empty_list(), |acc, elt| {
        match unquoted(elt, "splice-unquote") {
            Some(spliced) => call("concat", vec![spliced.clone(), acc]),
            None => call("cons", vec![quasiquote(elt), acc]),
        }
    })
}

/// The operand of a `(name x ...)` list, if `ast` is one.
fn unquoted<'a>(ast: &'a MalletVal, name: &str) -> Option<&'a MalletVal> {
    match ast {
        MalletVal::List(items) if items.len() >= 2 && ast.is_list_headed_by(name) => items.get(1),
        _ => None,
    }
}

fn call(name: &str, args: Vec<MalletVal>) -> MalletVal {
    let mut form = Vector::new();
    form.push_back(MalletVal::symbol(name));
    form.extend(args);
    MalletVal::List(form)
}
