//! Caller-facing errors at the merge boundary.
//!
//! Malformed *input* (the per-target declaration lists a build hands us)
//! is reported as a [`CommonizeError`]. Violations of merged-tree
//! invariants discovered later are lowering bugs and panic instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonizeError {
    /// A merge needs at least one target.
    #[error("cannot commonize an empty target list")]
    EmptyTargets,

    /// Two inputs claimed the same target name.
    #[error("duplicate target `{0}` in commonizer input")]
    DuplicateTarget(String),
}
