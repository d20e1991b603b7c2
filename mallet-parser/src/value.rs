// mallet-parser - Value types for mallet
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for mallet.
//!
//! `MalletVal` is the closed set of runtime values. Every evaluator and
//! printer decision is an exhaustive `match` over it.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use im::Vector;

use crate::keyword::Keyword;
use crate::printer::Printed;
use crate::symbol::Symbol;

// ============================================================================
// Frame handles
// ============================================================================

/// Handle to an environment frame owned by the runtime's frame arena.
///
/// The parser crate never dereferences a `FrameId`; it only carries it inside
/// closures. The generation lets the arena detect handles to recycled slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId {
    index: u32,
    generation: u32,
}

impl FrameId {
    pub fn new(index: u32, generation: u32) -> Self {
        FrameId { index, generation }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.index, self.generation)
    }
}

// ============================================================================
// Function Types
// ============================================================================

/// A user-defined function (closure).
///
/// An immutable record of parameters, body forms and the captured frame.
/// Cloning shares the record; the captured frame may be aliased by any number
/// of closures.
#[derive(Clone)]
pub struct MalletFn {
    inner: Rc<FnInner>,
}

struct FnInner {
    params: Vec<Symbol>,
    /// Body forms, evaluated as an implicit `do`
    body: Vec<MalletVal>,
    env: FrameId,
}

impl MalletFn {
    /// Create a new closure over `env`.
    pub fn new(params: Vec<Symbol>, body: Vec<MalletVal>, env: FrameId) -> Self {
        MalletFn {
            inner: Rc::new(FnInner { params, body, env }),
        }
    }

    pub fn params(&self) -> &[Symbol] {
        &self.inner.params
    }

    pub fn body(&self) -> &[MalletVal] {
        &self.inner.body
    }

    /// The frame captured when the closure was created.
    pub fn env(&self) -> FrameId {
        self.inner.env
    }
}

impl fmt::Debug for MalletFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<function>")
    }
}

impl PartialEq for MalletFn {
    fn eq(&self, other: &Self) -> bool {
        // Identity only: two separately created closures are never equal
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A native (Rust) function.
///
/// The callable is type-erased here because its signature mentions the
/// interpreter session, which lives in `mallet-core`.
#[derive(Clone)]
pub struct MalletNativeFn {
    /// Function name for display
    pub name: &'static str,
    func: Rc<dyn Any>,
}

impl MalletNativeFn {
    /// Create a new native function with a type-erased callable.
    pub fn new(name: &'static str, func: Rc<dyn Any>) -> Self {
        MalletNativeFn { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn func(&self) -> &Rc<dyn Any> {
        &self.func
    }
}

impl fmt::Debug for MalletNativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}

impl PartialEq for MalletNativeFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

// ============================================================================
// Atom Type
// ============================================================================

/// A mutable cell holding one value.
///
/// Clones alias the same cell, so `reset!` through one binding is visible
/// through every other.
#[derive(Clone)]
pub struct MalletAtom {
    value: Rc<RefCell<MalletVal>>,
}

impl MalletAtom {
    /// Create a new atom with an initial value.
    pub fn new(value: MalletVal) -> Self {
        MalletAtom {
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Get the current value.
    pub fn deref(&self) -> MalletVal {
        self.value.borrow().clone()
    }

    /// Replace the content wholesale, returning the new value.
    pub fn reset(&self, new_val: MalletVal) -> MalletVal {
        *self.value.borrow_mut() = new_val.clone();
        new_val
    }

    /// Address of the shared cell, stable for the atom's lifetime.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.value) as usize
    }
}

impl fmt::Debug for MalletAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(atom {})", self.value.borrow())
    }
}

impl PartialEq for MalletAtom {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

// ============================================================================
// Value Type
// ============================================================================

/// The core value type for mallet.
///
/// Sequences are persistent `im::Vector`s, so "modifying" one always yields a
/// new value and clones are cheap.
#[derive(Clone)]
pub enum MalletVal {
    /// The nil value, representing absence
    Nil,
    /// Boolean true or false
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// Immutable string
    String(Rc<str>),
    /// Interned name, resolved through the environment when evaluated
    Symbol(Symbol),
    /// Self-evaluating name
    Keyword(Keyword),
    /// Parenthesised sequence
    List(Vector<MalletVal>),
    /// Bracketed sequence
    Vector(Vector<MalletVal>),
    /// Alternating keys and values; always an even number of elements
    Map(Vector<MalletVal>),
    /// Mutable cell
    Atom(MalletAtom),
    /// User-defined closure
    Fn(MalletFn),
    /// Native (Rust) function
    NativeFn(MalletNativeFn),
}

/// Returned when a map would be built from an odd number of elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OddMapError {
    pub len: usize,
}

impl fmt::Display for OddMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Map literal must contain an even number of forms, got {}",
            self.len
        )
    }
}

impl std::error::Error for OddMapError {}

impl MalletVal {
    /// Create a nil value
    pub fn nil() -> Self {
        MalletVal::Nil
    }

    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        MalletVal::Bool(b)
    }

    /// Create an integer value
    pub fn int(n: i64) -> Self {
        MalletVal::Int(n)
    }

    /// Create a string value
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        MalletVal::String(s.into())
    }

    /// Create a symbol value from its name
    pub fn symbol(name: &str) -> Self {
        MalletVal::Symbol(Symbol::new(name))
    }

    /// Create a keyword value from its bare name
    pub fn keyword(name: &str) -> Self {
        MalletVal::Keyword(Keyword::new(name))
    }

    pub fn empty_list() -> Self {
        MalletVal::List(Vector::new())
    }

    pub fn list(elements: Vec<MalletVal>) -> Self {
        MalletVal::List(Vector::from(elements))
    }

    pub fn vector(elements: Vec<MalletVal>) -> Self {
        MalletVal::Vector(Vector::from(elements))
    }

    /// Create a map from a flat key/value sequence.
    pub fn map(flat: Vec<MalletVal>) -> Result<Self, OddMapError> {
        if flat.len() % 2 != 0 {
            return Err(OddMapError { len: flat.len() });
        }
        Ok(MalletVal::Map(Vector::from(flat)))
    }

    /// Create an atom holding `value`
    pub fn atom(value: MalletVal) -> Self {
        MalletVal::Atom(MalletAtom::new(value))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, MalletVal::Nil)
    }

    /// Everything except nil and false is truthy, including 0 and `()`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, MalletVal::Nil | MalletVal::Bool(false))
    }

    /// Elements of a list or vector.
    pub fn as_seq(&self) -> Option<&Vector<MalletVal>> {
        match self {
            MalletVal::List(items) | MalletVal::Vector(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            MalletVal::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// True for a list whose first element is the symbol `name`.
    pub fn is_list_headed_by(&self, name: &str) -> bool {
        match self {
            MalletVal::List(items) => {
                matches!(items.front(), Some(MalletVal::Symbol(sym)) if sym.name() == name)
            }
            _ => false,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, MalletVal::Fn(_) | MalletVal::NativeFn(_))
    }

    /// Get the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            MalletVal::Nil => "nil",
            MalletVal::Bool(_) => "boolean",
            MalletVal::Int(_) => "integer",
            MalletVal::String(_) => "string",
            MalletVal::Symbol(_) => "symbol",
            MalletVal::Keyword(_) => "keyword",
            MalletVal::List(_) => "list",
            MalletVal::Vector(_) => "vector",
            MalletVal::Map(_) => "map",
            MalletVal::Atom(_) => "atom",
            MalletVal::Fn(_) | MalletVal::NativeFn(_) => "function",
        }
    }

    /// Render in readable (re-readable) or display (raw string) form.
    pub fn printed(&self, readably: bool) -> Printed<'_> {
        Printed::new(self, readably)
    }
}

// ============================================================================
// Equality
// ============================================================================

impl PartialEq for MalletVal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MalletVal::Nil, MalletVal::Nil) => true,
            (MalletVal::Bool(a), MalletVal::Bool(b)) => a == b,
            (MalletVal::Int(a), MalletVal::Int(b)) => a == b,
            (MalletVal::String(a), MalletVal::String(b)) => a == b,
            (MalletVal::Symbol(a), MalletVal::Symbol(b)) => a == b,
            (MalletVal::Keyword(a), MalletVal::Keyword(b)) => a == b,
            // Lists and vectors compare across kinds
            (
                MalletVal::List(a) | MalletVal::Vector(a),
                MalletVal::List(b) | MalletVal::Vector(b),
            ) => seq_eq(a, b),
            (MalletVal::Map(a), MalletVal::Map(b)) => seq_eq(a, b),
            (MalletVal::Atom(a), MalletVal::Atom(b)) => a == b,
            (MalletVal::Fn(a), MalletVal::Fn(b)) => a == b,
            (MalletVal::NativeFn(a), MalletVal::NativeFn(b)) => a == b,
            _ => false,
        }
    }
}

fn seq_eq(a: &Vector<MalletVal>, b: &Vector<MalletVal>) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

impl fmt::Display for MalletVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.printed(true))
    }
}

impl fmt::Debug for MalletVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<i64> for MalletVal {
    fn from(n: i64) -> Self {
        MalletVal::Int(n)
    }
}

impl From<bool> for MalletVal {
    fn from(b: bool) -> Self {
        MalletVal::Bool(b)
    }
}

impl From<&str> for MalletVal {
    fn from(s: &str) -> Self {
        MalletVal::string(s)
    }
}
