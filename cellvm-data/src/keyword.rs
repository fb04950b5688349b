// cellvm-data - Keyword type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating identifiers, used for error codes and map keys.
//!
//! Keywords are interned like [`Symbol`](crate::Symbol)s: equality is a
//! pointer comparison, ordering and hashing use the name. They always print
//! with a leading colon.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock};

/// An interned keyword.
#[derive(Clone)]
pub struct Keyword {
    name: Arc<str>,
}

/// Global keyword interner
static KEYWORD_INTERNER: OnceLock<Mutex<HashMap<Arc<str>, Arc<str>>>> = OnceLock::new();

fn get_interner() -> &'static Mutex<HashMap<Arc<str>, Arc<str>>> {
    KEYWORD_INTERNER.get_or_init(|| Mutex::new(HashMap::new()))
}

impl Keyword {
    /// Create (or fetch the interned) keyword with the given name.
    ///
    /// The name is given without the leading colon.
    pub fn new(name: &str) -> Self {
        let mut interner = get_interner().lock().expect(
            "Keyword interner mutex poisoned: another thread panicked while holding the lock",
        );
        if let Some(existing) = interner.get(name) {
            return Keyword {
                name: Arc::clone(existing),
            };
        }
        let interned: Arc<str> = Arc::from(name);
        interner.insert(Arc::clone(&interned), Arc::clone(&interned));
        Keyword { name: interned }
    }

    /// Get the name (without the colon).
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
        write!(f, "Keyword({})", self)
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.name, &other.name)
    }
}

impl Eq for Keyword {}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if Arc::ptr_eq(&self.name, &other.name) {
            return std::cmp::Ordering::Equal;
        }
        self.name.cmp(&other.name)
    }
}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_colon() {
        assert_eq!(Keyword::new("JUICE").to_string(), ":JUICE");
    }

    #[test]
    fn test_interning() {
        let a = Keyword::new("ASSERT");
        let b = Keyword::new("ASSERT");
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.name, &b.name));
        assert_ne!(a, Keyword::new("BOUNDS"));
    }
}
