//! Tarn codegen - the promised-value materialization layer.
//!
//! Expression lowering produces [`Value`]s: results that may not occupy
//! their stack slot yet. Materialization, representation coercion, and
//! boolean branch fusion are decided at the consumption site, against an
//! opaque [`Emitter`] instruction sink.
//!
//! The layer is deliberately small:
//! - [`Repr`]: machine representations and slot widths
//! - [`Emitter`] / [`RecordingEmitter`]: the instruction sink contract
//! - [`Frame`]: per-function state and stack-depth accounting
//! - [`Value`]: the promised value itself, consumed by move exactly once

mod emitter;
mod frame;
mod repr;
mod value;

pub use emitter::{BranchCondition, Emitter, Insn, Label, RecordingEmitter};
pub use frame::{EnclosingContext, Frame};
pub use repr::{repr_of, Repr};
pub use value::{is_default_value_for_type, BooleanSource, Value};
