//! String interner backing [`Name`] identifiers.
//!
//! Interned strings live for the lifetime of the process; lookup and
//! equality are O(1). The interner is internally locked so a single
//! instance can be shared across frontend and lowering passes.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct InternerInner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// String interner.
///
/// Index 0 is always the empty string, matching [`Name::EMPTY`].
pub struct StringInterner {
    inner: RwLock<InternerInner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        StringInterner {
            inner: RwLock::new(InternerInner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its [`Name`].
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned.
        {
            let guard = self.inner.read();
            if let Some(&index) = guard.map.get(s) {
                return Name::from_raw(index);
            }
        }

        let mut guard = self.inner.write();
        // Double-check after acquiring the write lock.
        if let Some(&index) = guard.map.get(s) {
            return Name::from_raw(index);
        }

        // Leak to get a 'static lifetime; interned strings are permanent.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = match u32::try_from(guard.strings.len()) {
            Ok(index) => index,
            Err(_) => panic!("interner overflow: {} strings", guard.strings.len()),
        };
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);
        Name::from_raw(index)
    }

    /// Resolve a [`Name`] back to its string.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn resolve(&self, name: Name) -> &'static str {
        let guard = self.inner.read();
        match guard.strings.get(name.index()) {
            Some(s) => s,
            None => panic!(
                "unknown {:?} (interner has {} strings)",
                name,
                guard.strings.len()
            ),
        }
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedup() {
        let interner = StringInterner::new();
        let a = interner.intern("push");
        let b = interner.intern("push");
        let c = interner.intern("pop");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "push");
        assert_eq!(interner.resolve(c), "pop");
    }

    #[test]
    fn empty_string_is_name_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.resolve(Name::EMPTY), "");
    }

    #[test]
    #[should_panic(expected = "unknown Name")]
    fn resolve_unknown_panics() {
        let interner = StringInterner::new();
        interner.resolve(Name::from_raw(999));
    }
}
