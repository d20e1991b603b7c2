// mallet-parser - Symbol type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are the names used for environment lookup and special-form
//! dispatch.
//!
//! # Interning
//!
//! Symbols are interned per thread, so two symbols with the same name share
//! one allocation:
//!
//! - **O(1) equality**: comparing symbols is a pointer comparison
//! - **O(1) hashing**: the hash is computed from the pointer address
//! - **Memory efficiency**: identical names share storage
//!
//! Interned names are never freed. The interpreter is single-threaded, so the
//! interner lives in a `thread_local!` and needs no lock.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// An interned identifier.
#[derive(Clone)]
pub struct Symbol {
    name: Rc<str>,
}

thread_local! {
    static SYMBOL_INTERNER: RefCell<HashSet<Rc<str>>> = RefCell::new(HashSet::new());
}

pub(crate) fn intern(
    table: &'static std::thread::LocalKey<RefCell<HashSet<Rc<str>>>>,
    name: &str,
) -> Rc<str> {
    table.with(|t| {
        let mut t = t.borrow_mut();
        if let Some(existing) = t.get(name) {
            Rc::clone(existing)
        } else {
            let interned: Rc<str> = Rc::from(name);
            t.insert(Rc::clone(&interned));
            interned
        }
    })
}

impl Symbol {
    /// Create (or look up) the symbol with the given name.
    pub fn new(name: &str) -> Self {
        Symbol {
            name: intern(&SYMBOL_INTERNER, name),
        }
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        // Interning makes pointer comparison sufficient
        Rc::ptr_eq(&self.name, &other.name)
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.name).cast::<u8>().hash(state);
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(sym: &Symbol) -> u64 {
        let mut hasher = DefaultHasher::new();
        sym.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_simple_symbol() {
        let sym = Symbol::new("foo");
        assert_eq!(sym.name(), "foo");
        assert_eq!(format!("{}", sym), "foo");
    }

    #[test]
    fn test_interning_shares_storage() {
        let a = Symbol::new("let*");
        let b = Symbol::new("let*");
        assert_eq!(a, b);
        assert!(Rc::ptr_eq(&a.name, &b.name));
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_distinct_names_differ() {
        assert_ne!(Symbol::new("a"), Symbol::new("b"));
    }

    #[test]
    fn test_ordering_by_name() {
        assert!(Symbol::new("apple") < Symbol::new("banana"));
    }
}
