//! Tarn IR - the typed intermediate representation tree.
//!
//! This crate contains the middle-end's core data structures:
//! - Spans and interned names
//! - Symbols with the bind-once/owner contract
//! - Expression and declaration nodes, stored struct-of-arrays in an
//!   arena with id/range handles
//! - The visitor (read) and transformer (in-place rewrite) protocols
//! - Whole-tree structural validation
//!
//! # Design Philosophy
//!
//! - **Intern everything**: strings become `Name(u32)`, types `TypeId(u32)`
//! - **Flatten everything**: children are `ExprId(u32)` indices, never boxes
//! - **One owner per slot**: the tree is a tree; shared leaves (symbols)
//!   are referenced, not owned
//! - **Contract violations panic**: out-of-range slots, rebinding, and
//!   cardinality changes are lowering-pass bugs, not recoverable errors

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
mod ids;
mod interner;
mod name;
pub mod node;
mod origin;
mod span;
pub mod stack;
mod symbol;
pub mod transform;
mod ty;
pub mod validate;
pub mod visit;

pub use arena::IrArena;
pub use ids::{ArgRange, CatchId, CatchRange, DeclId, ElementRange, ExprId, StmtRange, TypeArgRange};
pub use interner::StringInterner;
pub use name::Name;
pub use node::{Catch, ConstValue, Decl, DeclKind, DynOperator, ExprKind, Stmt, TypeOp, VarargElement};
pub use origin::{DeclOrigin, NodeOrigin};
pub use span::Span;
pub use symbol::{SymbolId, SymbolKind, SymbolOwner, SymbolTable};
pub use transform::{transform, transform_children, transform_decl_children, Transformer};
pub use ty::{PrimitiveTy, TyKind, TypeId, TypeStore, WellKnown};
pub use validate::{validate, NodeRef, ValidationReport};
pub use visit::{accept, accept_children, walk_catch, walk_decl, walk_expr, Visitor};
