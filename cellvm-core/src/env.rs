// cellvm-core - Environment of definitions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Immutable environment of symbol bindings.

use cellvm_data::{Map, Symbol, Value};

/// An immutable binding table from [`Symbol`] to [`Value`].
///
/// Environments never change in place. `define` and `undefine` return a new
/// environment that shares all unaffected structure with the old one, so
/// forking a context never copies its bindings.
///
/// # Examples
///
/// ```
/// use cellvm_core::Environment;
/// use cellvm_data::{Symbol, Value};
///
/// let env = Environment::empty();
/// let defined = env.define(Symbol::new("x"), Value::from(42));
///
/// assert_eq!(defined.lookup(&Symbol::new("x")), Some(&Value::from(42)));
/// // the original is untouched
/// assert_eq!(env.lookup(&Symbol::new("x")), None);
///
/// // removing an unbound symbol hands back the same environment
/// assert!(defined.undefine(&Symbol::new("y")).ptr_eq(&defined));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment {
    bindings: Map,
}

impl Environment {
    /// The empty environment.
    pub fn empty() -> Self {
        Environment {
            bindings: Map::empty(),
        }
    }

    /// Wrap a map of persisted bindings without copying it.
    ///
    /// The map is expected to hold symbol keys only, as every map returned
    /// by [`as_map`](Self::as_map) does.
    pub fn from_map(map: Map) -> Self {
        Environment { bindings: map }
    }

    /// Bind `sym` to `val`, replacing any previous binding.
    #[must_use]
    pub fn define(&self, sym: Symbol, val: Value) -> Self {
        Environment {
            bindings: self.bindings.assoc(Value::Symbol(sym), val),
        }
    }

    /// Remove the binding for `sym`. Returns a handle to the same storage
    /// when `sym` is unbound.
    #[must_use]
    pub fn undefine(&self, sym: &Symbol) -> Self {
        Environment {
            bindings: self.bindings.dissoc(&Value::Symbol(sym.clone())),
        }
    }

    pub fn lookup(&self, sym: &Symbol) -> Option<&Value> {
        self.bindings.get(&Value::Symbol(sym.clone()))
    }

    #[must_use]
    pub fn is_defined(&self, sym: &Symbol) -> bool {
        self.bindings.contains_key(&Value::Symbol(sym.clone()))
    }

    pub fn len(&self) -> usize {
        self.bindings.count()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Value)> {
        self.bindings
            .iter()
            .filter_map(|(k, v)| k.as_symbol().map(|s| (s, v)))
    }

    /// The bindings as a map, for persisting into account state.
    pub fn as_map(&self) -> &Map {
        &self.bindings
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        self.bindings.ptr_eq(&other.bindings)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn test_define_and_lookup() {
        let env = Environment::empty().define(sym("x"), Value::from(42));
        assert_eq!(env.lookup(&sym("x")), Some(&Value::from(42)));
    }

    #[test]
    fn test_undefined_symbol() {
        assert_eq!(Environment::empty().lookup(&sym("x")), None);
    }

    #[test]
    fn test_redefine_shadows_without_mutating() {
        let outer = Environment::empty().define(sym("x"), Value::from(42));
        let inner = outer.define(sym("x"), Value::from(100));

        assert_eq!(inner.lookup(&sym("x")), Some(&Value::from(100)));
        assert_eq!(outer.lookup(&sym("x")), Some(&Value::from(42)));
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn test_is_defined() {
        let env = Environment::empty();
        assert!(!env.is_defined(&sym("x")));
        let env = env.define(sym("x"), Value::from(42));
        assert!(env.is_defined(&sym("x")));
    }

    #[test]
    fn test_undefine_unbound_shares_storage() {
        let env = Environment::empty().define(sym("x"), Value::from(1));
        assert!(env.undefine(&sym("y")).ptr_eq(&env));
        assert!(env.undefine(&sym("x")).is_empty());
    }

    #[test]
    fn test_from_map_shares_storage() {
        let map = Map::of([(Value::symbol("a"), Value::from(1))]);
        let env = Environment::from_map(map.clone());
        assert!(env.as_map().ptr_eq(&map));
        assert_eq!(env.lookup(&sym("a")), Some(&Value::from(1)));
    }

    #[test]
    fn test_iter_in_symbol_order() {
        let env = Environment::empty()
            .define(sym("b"), Value::from(2))
            .define(sym("a"), Value::from(1));
        let names: Vec<&str> = env.iter().map(|(s, _)| s.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
