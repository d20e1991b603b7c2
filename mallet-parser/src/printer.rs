// mallet-parser - Printer for mallet values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Printed forms of values.
//!
//! Readable output can be fed back to the reader and yields an equal value
//! (functions excepted). Display output writes strings raw, for `str` and
//! `println`.

use std::fmt;

use im::Vector;

use crate::value::MalletVal;

/// A `Display` adapter selecting readable or display rendering.
pub struct Printed<'a> {
    value: &'a MalletVal,
    readably: bool,
}

impl<'a> Printed<'a> {
    pub fn new(value: &'a MalletVal, readably: bool) -> Self {
        Printed { value, readably }
    }

    fn nested<'b>(&self, value: &'b MalletVal) -> Printed<'b> {
        Printed::new(value, self.readably)
    }

    fn write_seq(&self, f: &mut fmt::Formatter<'_>, items: &Vector<MalletVal>) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", self.nested(item))?;
        }
        Ok(())
    }
}

impl fmt::Display for Printed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            MalletVal::Nil => write!(f, "nil"),
            MalletVal::Bool(b) => write!(f, "{}", b),
            MalletVal::Int(n) => write!(f, "{}", n),
            MalletVal::String(s) => {
                if self.readably {
                    write!(f, "\"{}\"", escape_string(s))
                } else {
                    write!(f, "{}", s)
                }
            }
            MalletVal::Symbol(sym) => write!(f, "{}", sym),
            MalletVal::Keyword(kw) => write!(f, "{}", kw),
            MalletVal::List(items) => {
                write!(f, "(")?;
                self.write_seq(f, items)?;
                write!(f, ")")
            }
            MalletVal::Vector(items) => {
                write!(f, "[")?;
                self.write_seq(f, items)?;
                write!(f, "]")
            }
            MalletVal::Map(flat) => {
                write!(f, "{{")?;
                for (i, item) in flat.iter().enumerate() {
                    if i > 0 {
                        // Pairs are separated by ", ", key from value by " "
                        write!(f, "{}", if i % 2 == 0 { ", " } else { " " })?;
                    }
                    write!(f, "{}", self.nested(item))?;
                }
                write!(f, "}}")
            }
            MalletVal::Atom(a) => write!(f, "(atom {})", self.nested(&a.deref())),
            MalletVal::Fn(_) => write!(f, "#<function>"),
            MalletVal::NativeFn(nf) => write!(f, "#<native-fn {}>", nf.name),
        }
    }
}

/// Escape a string for readable output: backslash, double quote and newline.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Render each value and join them with `sep`.
pub fn join_printed(values: &[MalletVal], readably: bool, sep: &str) -> String {
    values
        .iter()
        .map(|v| v.printed(readably).to_string())
        .collect::<Vec<_>>()
        .join(sep)
}
