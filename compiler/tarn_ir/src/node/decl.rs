//! Declaration nodes.
//!
//! Declarations carry the symbol they own; the arena binds the symbol to
//! the declaration when the node is allocated, so a constructed
//! declaration's symbol is always bound.

use crate::{DeclOrigin, ExprId, Name, Span, SymbolId, TypeId};

/// A declaration node.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
    pub origin: DeclOrigin,
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Decl {
            kind,
            span,
            origin: DeclOrigin::Source,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: DeclOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// Declaration variants.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DeclKind {
    /// Function or method. `parent` is the owning class symbol for
    /// methods, `None` for top-level functions.
    Function {
        name: Name,
        symbol: SymbolId,
        parent: Option<SymbolId>,
        body: ExprId,
    },

    /// Class declaration.
    Class {
        name: Name,
        symbol: SymbolId,
        is_inline: bool,
    },

    /// Backing field.
    Field {
        name: Name,
        symbol: SymbolId,
        ty: TypeId,
        initializer: ExprId,
    },

    /// Property (accessor pair over an optional backing field).
    Property {
        name: Name,
        symbol: SymbolId,
        getter: Option<SymbolId>,
        setter: Option<SymbolId>,
    },

    /// Local variable (also used for catch parameters and the
    /// suspension-point id parameter).
    Variable {
        name: Name,
        symbol: SymbolId,
        ty: TypeId,
        initializer: ExprId,
    },
}

impl DeclKind {
    /// The symbol this declaration owns.
    pub fn symbol(&self) -> SymbolId {
        match *self {
            DeclKind::Function { symbol, .. }
            | DeclKind::Class { symbol, .. }
            | DeclKind::Field { symbol, .. }
            | DeclKind::Property { symbol, .. }
            | DeclKind::Variable { symbol, .. } => symbol,
        }
    }

    /// The declared name.
    pub fn name(&self) -> Name {
        match *self {
            DeclKind::Function { name, .. }
            | DeclKind::Class { name, .. }
            | DeclKind::Field { name, .. }
            | DeclKind::Property { name, .. }
            | DeclKind::Variable { name, .. } => name,
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DeclKind::Function { .. } => "Function",
            DeclKind::Class { .. } => "Class",
            DeclKind::Field { .. } => "Field",
            DeclKind::Property { .. } => "Property",
            DeclKind::Variable { .. } => "Variable",
        }
    }
}
