// cellvm-data - Symbol type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are identifiers bound in environments.
//!
//! # Interning
//!
//! Symbols are interned using a global string interner, meaning that two
//! symbols with the same name share the same underlying storage:
//!
//! - **O(1) equality**: comparing symbols is a pointer comparison
//! - **Memory efficiency**: identical symbols share storage
//!
//! Ordering and hashing use the symbol name rather than the pointer, so that
//! maps keyed by symbols iterate in the same order on every node.
//!
//! # Memory Behaviour
//!
//! Interned symbols are never deallocated. The interner keeps an `Arc` to
//! every symbol created during the lifetime of the process.
//!
//! # Thread Safety
//!
//! The interner is protected by a `Mutex`. Symbol creation takes the lock;
//! lookup and comparison are lock-free after creation.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock};

/// An interned symbol.
#[derive(Clone)]
pub struct Symbol {
    name: Arc<str>,
}

/// Global symbol interner
static SYMBOL_INTERNER: OnceLock<Mutex<HashMap<Arc<str>, Arc<str>>>> = OnceLock::new();

fn get_interner() -> &'static Mutex<HashMap<Arc<str>, Arc<str>>> {
    SYMBOL_INTERNER.get_or_init(|| Mutex::new(HashMap::new()))
}

impl Symbol {
    /// Create (or fetch the interned) symbol with the given name.
    pub fn new(name: &str) -> Self {
        let mut interner = get_interner().lock().expect(
            "Symbol interner mutex poisoned: another thread panicked while holding the lock",
        );
        if let Some(existing) = interner.get(name) {
            return Symbol {
                name: Arc::clone(existing),
            };
        }
        let interned: Arc<str> = Arc::from(name);
        interner.insert(Arc::clone(&interned), Arc::clone(&interned));
        Symbol { name: interned }
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the name is wrapped in the reserved `*` sigil, e.g. `*address*`.
    #[must_use]
    pub fn is_starred(&self) -> bool {
        let name = self.name();
        name.len() > 2 && name.starts_with('*') && name.ends_with('*')
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        // Due to interning, pointer comparison is sufficient
        Arc::ptr_eq(&self.name, &other.name)
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
        if Arc::ptr_eq(&self.name, &other.name) {
            return std::cmp::Ordering::Equal;
        }
        self.name.cmp(&other.name)
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}
