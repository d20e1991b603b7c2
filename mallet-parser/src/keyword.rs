// mallet-parser - Keyword type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating names, printed with a leading colon.
//!
//! Keywords share the interning scheme used by [`Symbol`](crate::Symbol) but
//! live in their own table, so `:foo` and `foo` never compare equal.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::symbol::intern;

/// An interned, self-evaluating name.
#[derive(Clone)]
pub struct Keyword {
    name: Rc<str>,
}

thread_local! {
    static KEYWORD_INTERNER: RefCell<HashSet<Rc<str>>> = RefCell::new(HashSet::new());
}

impl Keyword {
    /// Create a keyword from its bare name (without the colon).
    pub fn new(name: &str) -> Self {
        Keyword {
            name: intern(&KEYWORD_INTERNER, name),
        }
    }

    /// Parse a keyword from a token like ":foo". The leading colon is optional.
    pub fn parse(s: &str) -> Self {
        Keyword::new(s.strip_prefix(':').unwrap_or(s))
    }

    /// Get the name without the leading colon.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name)
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword(:{})", self.name)
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.name, &other.name)
    }
}

impl Eq for Keyword {}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.name).cast::<u8>().hash(state);
    }
}
