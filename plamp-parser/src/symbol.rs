//! Symbol interning for identifiers
//!
//! Every word the tokenizer produces is interned once, so names in tokens,
//! AST nodes and scope frames are cheap `Copy` handles that compare in O(1).

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Interned string symbol
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern a string and return its symbol
    pub fn intern(s: &str) -> Self {
        with_interner(|interner| interner.intern(s))
    }

    /// Get the string representation of this symbol
    pub fn as_str(self) -> &'static str {
        with_interner(|interner| interner.resolve(self))
    }

    /// Get the raw symbol ID
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::intern(&s)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol::intern(&s))
    }
}

/// Interned strings are leaked: the set of identifiers in a build is small and
/// lives for the whole process.
#[derive(Default)]
struct SymbolInterner {
    symbols: Vec<&'static str>,
    indices: HashMap<&'static str, u32>,
}

impl SymbolInterner {
    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&index) = self.indices.get(s) {
            return Symbol(index);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = self.symbols.len() as u32;
        self.symbols.push(leaked);
        self.indices.insert(leaked, index);
        Symbol(index)
    }

    fn resolve(&self, symbol: Symbol) -> &'static str {
        self.symbols[symbol.0 as usize]
    }
}

static INTERNER: Lazy<Mutex<SymbolInterner>> = Lazy::new(|| Mutex::new(SymbolInterner::default()));

fn with_interner<R>(f: impl FnOnce(&mut SymbolInterner) -> R) -> R {
    // A poisoned lock still holds a consistent interner: every mutation is a
    // push followed by an insert of the same entry.
    let mut guard = match INTERNER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    f(&mut guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_interning() {
        let s1 = Symbol::intern("hello");
        let s2 = Symbol::intern("hello");
        let s3 = Symbol::intern("world");

        assert_eq!(s1, s2);
        assert_ne!(s1, s3);
        assert_eq!(s1.as_u32(), s2.as_u32());
    }

    #[test]
    fn test_symbol_round_trips_to_str() {
        let sym: Symbol = "total".into();
        assert_eq!(sym.as_str(), "total");
        assert_eq!(sym.to_string(), "total");
    }

    #[test]
    fn test_symbol_serde() {
        let sym = Symbol::intern("count");
        let json = serde_json::to_string(&sym).unwrap();
        assert_eq!(json, "\"count\"");
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sym);
    }
}
