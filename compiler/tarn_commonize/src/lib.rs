//! Tarn commonize - merging per-target declaration trees.
//!
//! The commonizer takes one declaration tree per compilation target,
//! merges them into an N-dimensional tree (one slot per target plus one
//! common slot per node), and builds a serializable metadata structure
//! per dimension. Declarations that are structurally identical across
//! every target surface in the common slot as expect declarations.
//!
//! Pipeline: [`merge`] -> [`RootNode`] -> [`build_metadata`] ->
//! [`DimensionMetadata`] (consumed by an external writer layer; byte
//! format out of scope).

pub mod decl;
mod error;
mod group;
mod merged;
pub mod metadata;
pub mod schema;

pub use decl::Target;
pub use error::CommonizeError;
pub use group::CommonizedGroup;
pub use merged::{
    merge, ClassNode, FunctionNode, ModuleInfo, ModuleNode, PackageInfo, PackageNode, RootNode,
    TargetDeclarations, TypeAliasNode,
};
pub use metadata::{build_metadata, AliasExpansion, BuildOptions, DimensionMetadata};
