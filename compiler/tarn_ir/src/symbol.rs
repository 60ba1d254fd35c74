//! Symbols: identity handles for declarations.
//!
//! A symbol decouples a reference site from the declaration it names.
//! Call and access nodes hold [`SymbolId`]s that may be created before
//! the declaring node exists (forward references); the declaring node
//! binds the symbol exactly once when it is constructed.
//!
//! Binding is single-assignment. The state is a tagged cell
//! (`Unbound | Bound(owner)`) rather than an optional-with-convention,
//! so rebinding and premature owner access are checked failures, not
//! silent overwrites.

use std::fmt;

use crate::{DeclId, ExprId, Name};

/// Index into a [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        SymbolId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// What kind of declaration a symbol names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Function,
    Constructor,
    Class,
    Field,
    Property,
    Variable,
    /// Return target of a returnable block expression.
    ReturnableBlock,
}

/// The node that owns a bound symbol.
///
/// Almost always a declaration; returnable-block expressions are the one
/// expression kind that owns a symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolOwner {
    Decl(DeclId),
    Block(ExprId),
}

/// Binding state: a tagged cell, written exactly once.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum SymbolState {
    Unbound,
    Bound(SymbolOwner),
}

struct SymbolData {
    kind: SymbolKind,
    name: Name,
    state: SymbolState,
}

/// Arena of symbols with the bind/owner contract.
#[derive(Default)]
pub struct SymbolTable {
    symbols: Vec<SymbolData>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an unbound symbol.
    pub fn alloc(&mut self, kind: SymbolKind, name: Name) -> SymbolId {
        let id = SymbolId::new(self.symbols.len() as u32);
        self.symbols.push(SymbolData {
            kind,
            name,
            state: SymbolState::Unbound,
        });
        id
    }

    /// Bind `symbol` to its owning node.
    ///
    /// # Panics
    /// Panics if the symbol is already bound. Symbols are never rebound.
    #[track_caller]
    pub fn bind(&mut self, symbol: SymbolId, owner: SymbolOwner) {
        let data = self.data_mut(symbol);
        match data.state {
            SymbolState::Unbound => data.state = SymbolState::Bound(owner),
            SymbolState::Bound(existing) => panic!(
                "{:?} ({:?}) is already bound to {:?}",
                symbol, data.kind, existing
            ),
        }
    }

    /// The owner of a bound symbol.
    ///
    /// # Panics
    /// Panics if the symbol is still unbound.
    #[track_caller]
    pub fn owner(&self, symbol: SymbolId) -> SymbolOwner {
        let data = self.data(symbol);
        match data.state {
            SymbolState::Bound(owner) => owner,
            SymbolState::Unbound => panic!(
                "{:?} ({:?}) is not bound to an owner yet",
                symbol, data.kind
            ),
        }
    }

    /// Whether the symbol has been bound.
    pub fn is_bound(&self, symbol: SymbolId) -> bool {
        matches!(self.data(symbol).state, SymbolState::Bound(_))
    }

    /// The declared kind of the symbol.
    pub fn kind(&self, symbol: SymbolId) -> SymbolKind {
        self.data(symbol).kind
    }

    /// The declared name of the symbol.
    pub fn name(&self, symbol: SymbolId) -> Name {
        self.data(symbol).name
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[track_caller]
    fn data(&self, symbol: SymbolId) -> &SymbolData {
        &self.symbols[symbol.index()]
    }

    #[track_caller]
    fn data_mut(&mut self, symbol: SymbolId) -> &mut SymbolData {
        &mut self.symbols[symbol.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_once() {
        let mut table = SymbolTable::new();
        let sym = table.alloc(SymbolKind::Function, Name::EMPTY);
        assert!(!table.is_bound(sym));

        table.bind(sym, SymbolOwner::Decl(DeclId::new(0)));
        assert!(table.is_bound(sym));
        assert_eq!(table.owner(sym), SymbolOwner::Decl(DeclId::new(0)));
    }

    #[test]
    #[should_panic(expected = "already bound")]
    fn rebind_panics() {
        let mut table = SymbolTable::new();
        let sym = table.alloc(SymbolKind::Variable, Name::EMPTY);
        table.bind(sym, SymbolOwner::Decl(DeclId::new(0)));
        table.bind(sym, SymbolOwner::Decl(DeclId::new(1)));
    }

    #[test]
    #[should_panic(expected = "not bound")]
    fn owner_before_bind_panics() {
        let mut table = SymbolTable::new();
        let sym = table.alloc(SymbolKind::Field, Name::EMPTY);
        let _ = table.owner(sym);
    }

    #[test]
    fn forward_reference_then_bind() {
        let mut table = SymbolTable::new();
        // Reference sites can hold the symbol before the declaration exists.
        let sym = table.alloc(SymbolKind::Function, Name::EMPTY);
        assert_eq!(table.kind(sym), SymbolKind::Function);

        table.bind(sym, SymbolOwner::Decl(DeclId::new(4)));
        assert_eq!(table.owner(sym), SymbolOwner::Decl(DeclId::new(4)));
    }
}
