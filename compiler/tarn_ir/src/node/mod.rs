//! IR node kinds.
//!
//! - `expr`: expression variants and their slot payloads
//! - `decl`: declaration variants
//!
//! Nodes are stored struct-of-arrays in the [`IrArena`](crate::IrArena);
//! this module only defines the kind payloads.

mod decl;
mod expr;

pub use decl::{Decl, DeclKind};
pub use expr::{Catch, ConstValue, DynOperator, ExprKind, Stmt, TypeOp, VarargElement};

#[cfg(test)]
mod tests;
