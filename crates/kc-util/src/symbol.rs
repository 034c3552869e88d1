//! String interning for identifiers.
//!
//! A `Symbol` is a 4-byte handle into a thread-local string table, used in
//! place of `String` for AST names so that repeated identifiers compare in
//! O(1) instead of doing a byte-wise comparison every time a scope is
//! searched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

thread_local! {
    static TABLE: RefCell<Table> = RefCell::new(Table::new());
}

struct Table {
    strings: Vec<Box<str>>,
    lookup: HashMap<Box<str>, u32>,
}

impl Table {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = self.strings.len() as u32;
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        id
    }

    fn resolve(&self, id: u32) -> Box<str> {
        self.strings[id as usize].clone()
    }
}

/// An interned identifier.
///
/// Two `Symbol`s compare equal iff the strings they were interned from are
/// equal; comparison and hashing are both O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Interns `s`, returning a handle to it.
    pub fn intern(s: &str) -> Self {
        TABLE.with(|t| Symbol(t.borrow_mut().intern(s)))
    }

    /// Returns the original string this symbol was interned from.
    pub fn as_str(&self) -> Box<str> {
        TABLE.with(|t| t.borrow().resolve(self.0))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        assert_eq!(Symbol::intern("main"), Symbol::intern("main"));
    }

    #[test]
    fn different_strings_intern_to_different_symbols() {
        assert_ne!(Symbol::intern("a"), Symbol::intern("b"));
    }

    #[test]
    fn round_trips_through_as_str() {
        let sym = Symbol::intern("frobnicate");
        assert_eq!(&*sym.as_str(), "frobnicate");
    }
}
