//! Stack growth for deep recursive traversal.
//!
//! Visitor and transformer walks recurse once per tree level; deeply
//! nested source (machine-generated code especially) can exceed the
//! default thread stack. [`ensure_sufficient_stack`] grows the stack on
//! demand on native targets and is a passthrough on WASM, which manages
//! its own stack.

/// Remaining stack below which we grow before recursing (128 KiB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Stack allocated per growth step (2 MiB).
#[cfg(not(target_arch = "wasm32"))]
const GROWTH_STEP: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if little space remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH_STEP, f)
}

/// WASM passthrough.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
