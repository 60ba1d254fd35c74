//! Promised values.
//!
//! A [`Value`] stands for an expression result that may not occupy its
//! stack slot yet. Materialization and coercion decisions are deferred
//! until the value is consumed, which lets callers fuse booleans into
//! branches and skip pushing constants that are about to be discarded.
//!
//! # Linear use
//!
//! Every consuming operation takes the value by move: a value is
//! materialized or discarded exactly once, and using it again after
//! either is a compile error. Values are strictly stack-scoped: they
//! borrow nothing and must not outlive the [`Frame`] interaction that
//! produced them; letting one drop unconsumed corrupts stack-depth
//! accounting.
//!
//! # Variants
//!
//! - `Material`: already on the stack; materialization only coerces.
//! - `Constant`: deferred constant; knows how to push each constant
//!   class and short-circuits branch fusion against default values.
//! - `Boolean`: branch-fusable value, either a native branch condition
//!   whose operands are already on the stack, or any other value lifted
//!   via [`Value::coerce_to_boolean`].

use tarn_ir::{ConstValue, DeclOrigin, Name, TypeId, TypeStore, WellKnown};

use crate::emitter::{const_repr, BranchCondition, Emitter, Label};
use crate::frame::Frame;
use crate::repr::{repr_of, Repr};

/// Coercion suppressions, keyed by (enclosing-declaration origin,
/// well-known type identity). Boxing or unboxing the result wrapper
/// inside continuation-resuming code produces casts that fail at run
/// time, so exactly these pairs skip inline-class coercion. This is a
/// closed table, not a policy.
const COERCION_EXEMPT: &[(DeclOrigin, WellKnown)] = &[
    (DeclOrigin::ContinuationClass, WellKnown::ResultWrapper),
    (DeclOrigin::SuspendLambda, WellKnown::ResultWrapper),
];

/// How a deferred boolean branches.
#[derive(Debug)]
pub enum BooleanSource {
    /// A native branch condition; its operands are already on the stack.
    Condition(BranchCondition),
    /// Any other value, lifted; defers to the wrapped value's own
    /// materialize/discard.
    Lifted(Box<Value>),
}

/// A value that may not have been materialized on the stack yet.
#[derive(Debug)]
pub enum Value {
    /// Fully constructed, sitting on the stack.
    Material { repr: Repr, ty: TypeId },
    /// Not yet pushed; pushed (or folded into a branch) on consumption.
    Constant { konst: ConstValue, ty: TypeId },
    /// Branch-fusable boolean.
    Boolean(BooleanSource),
}

impl Value {
    /// The pre-materialized unit value used for statement-position
    /// expressions. Occupies no stack slots.
    pub fn unit() -> Value {
        Value::Material {
            repr: Repr::Void,
            ty: TypeStore::UNIT,
        }
    }

    /// A deferred boolean over a native branch condition.
    pub fn condition(condition: BranchCondition) -> Value {
        Value::Boolean(BooleanSource::Condition(condition))
    }

    /// The semantic type of this value.
    pub fn ty(&self) -> TypeId {
        match self {
            Value::Material { ty, .. } | Value::Constant { ty, .. } => *ty,
            Value::Boolean(BooleanSource::Lifted(_) | BooleanSource::Condition(_)) => {
                TypeStore::BOOL
            }
        }
    }

    /// The representation this value has (or will have) on the stack.
    pub fn repr(&self, types: &TypeStore) -> Repr {
        match self {
            Value::Material { repr, .. } => *repr,
            Value::Constant { konst, ty } => {
                const_repr(*konst, types.class_name(*ty).unwrap_or(Name::EMPTY))
            }
            Value::Boolean(_) => Repr::Bool,
        }
    }

    /// Wrap this value as a branch-fusable boolean.
    ///
    /// Booleans and constants already know how to branch; anything else
    /// is lifted so its branch methods materialize it as a boolean and
    /// test it, and its discard defers to the original value.
    pub fn coerce_to_boolean(self) -> Value {
        match self {
            Value::Boolean(_) | Value::Constant { .. } => self,
            other => Value::Boolean(BooleanSource::Lifted(Box::new(other))),
        }
    }

    /// Make this value occupy the stack in its own representation.
    pub fn materialize<E: Emitter>(self, frame: &mut Frame<'_, E>) {
        let repr = self.repr(frame.types());
        let ty = self.ty();
        self.materialize_at(frame, repr, ty);
    }

    /// Make this value occupy the stack in the target representation,
    /// emitting a coercion if the representations differ.
    pub fn materialize_at<E: Emitter>(
        self,
        frame: &mut Frame<'_, E>,
        target: Repr,
        target_ty: TypeId,
    ) {
        match self {
            Value::Material { repr, ty } => coerce_on_stack(frame, repr, ty, target, target_ty),

            Value::Constant { konst, ty } => {
                let repr = const_repr(konst, frame.types().class_name(ty).unwrap_or(Name::EMPTY));
                match konst {
                    ConstValue::Bool(value) => frame.emit_iconst(i32::from(value)),
                    ConstValue::Char(value) => frame.emit_iconst(value as i32),
                    ConstValue::I8(value) => frame.emit_iconst(i32::from(value)),
                    ConstValue::I16(value) => frame.emit_iconst(i32::from(value)),
                    ConstValue::I32(value) => frame.emit_iconst(value),
                    ConstValue::I64(value) => frame.emit_lconst(value),
                    ConstValue::F32Bits(bits) => frame.emit_fconst(f32::from_bits(bits)),
                    ConstValue::F64Bits(bits) => frame.emit_dconst(f64::from_bits(bits)),
                    ConstValue::Str(name) => frame.emit_sconst(name),
                    ConstValue::Null => frame.emit_aconst_null(),
                }
                // `null` already is of any reference type; everything
                // else may still need a representation change.
                if konst != ConstValue::Null || target.is_primitive() {
                    coerce_on_stack(frame, repr, ty, target, target_ty);
                }
            }

            Value::Boolean(source) => {
                // The classic branch-to-constant pattern; only taken when
                // actual materialization (not branch fusion) is required.
                let const0 = frame.new_label();
                let end = frame.new_label();
                source.jump_if_false(frame, const0);
                frame.emit_iconst(1);
                frame.jump(end);
                frame.mark(const0);
                // Merge path: the push is already accounted by the
                // branch above.
                frame.emitter_mut().iconst(0);
                frame.mark(end);
                if target != Repr::Bool {
                    frame.emit_coerce(Repr::Bool, target);
                }
            }
        }
    }

    /// Consume this value without using its result.
    ///
    /// Discarding a materialized non-void value pops it; discarding a
    /// deferred constant emits only a position-marking `nop`.
    pub fn discard<E: Emitter>(self, frame: &mut Frame<'_, E>) {
        match self {
            Value::Material { repr, .. } => {
                if repr != Repr::Void {
                    frame.emit_pop(repr);
                }
            }
            // Nothing was pushed; give the source position something to
            // attach to.
            Value::Constant { .. } => frame.emit_nop(),
            Value::Boolean(BooleanSource::Condition(condition)) => {
                for operand in condition.operands() {
                    frame.emit_pop(*operand);
                }
            }
            Value::Boolean(BooleanSource::Lifted(inner)) => inner.discard(frame),
        }
    }

    /// Branch to `label` if this value is true.
    pub fn jump_if_true<E: Emitter>(self, frame: &mut Frame<'_, E>, label: Label) {
        match self {
            Value::Boolean(source) => source.jump_if_true(frame, label),
            Value::Constant { konst, ty } => {
                let repr = const_repr(konst, frame.types().class_name(ty).unwrap_or(Name::EMPTY));
                if is_default_value_for_type(repr, konst) {
                    frame.emit_nop();
                } else {
                    frame.jump(label);
                }
            }
            other => BooleanSource::Lifted(Box::new(other)).jump_if_true(frame, label),
        }
    }

    /// Branch to `label` if this value is false.
    pub fn jump_if_false<E: Emitter>(self, frame: &mut Frame<'_, E>, label: Label) {
        match self {
            Value::Boolean(source) => source.jump_if_false(frame, label),
            Value::Constant { konst, ty } => {
                let repr = const_repr(konst, frame.types().class_name(ty).unwrap_or(Name::EMPTY));
                if is_default_value_for_type(repr, konst) {
                    frame.jump(label);
                } else {
                    frame.emit_nop();
                }
            }
            other => BooleanSource::Lifted(Box::new(other)).jump_if_false(frame, label),
        }
    }
}

impl BooleanSource {
    fn jump_if_true<E: Emitter>(self, frame: &mut Frame<'_, E>, label: Label) {
        match self {
            BooleanSource::Condition(condition) => frame.jump_if(condition, label),
            BooleanSource::Lifted(inner) => {
                inner.materialize_at(frame, Repr::Bool, TypeStore::BOOL);
                frame.jump_if(BranchCondition::IfNe, label);
            }
        }
    }

    fn jump_if_false<E: Emitter>(self, frame: &mut Frame<'_, E>, label: Label) {
        match self {
            BooleanSource::Condition(condition) => frame.jump_if(condition.negate(), label),
            BooleanSource::Lifted(inner) => {
                inner.materialize_at(frame, Repr::Bool, TypeStore::BOOL);
                frame.jump_if(BranchCondition::IfEq, label);
            }
        }
    }
}

/// Coerce the stack top from one (representation, type) to another.
///
/// Inline value classes get box/unbox operations when exactly one side
/// is in unboxed form, unless the [`COERCION_EXEMPT`] table suppresses
/// the conversion for this frame's context.
fn coerce_on_stack<E: Emitter>(
    frame: &mut Frame<'_, E>,
    from: Repr,
    from_ty: TypeId,
    target: Repr,
    target_ty: TypeId,
) {
    let types = frame.types();
    let erased_source = types.erase(from_ty);
    let erased_target = types.erase(target_ty);
    let source_inline = types.inline_underlying(erased_source).is_some();
    let target_inline = types.inline_underlying(erased_target).is_some();

    if (source_inline || target_inline) && !coercion_exempt(frame, from_ty, target_ty) {
        // A side is "unboxed" when the value's representation equals the
        // erased type's own (underlying) representation.
        let from_unboxed = source_inline && repr_of(types, erased_source) == from;
        let to_unboxed = target_inline && repr_of(types, erased_target) == target;

        if from_unboxed && !to_unboxed {
            // The unboxed value's representation is `from` itself.
            let class = types.class_name(erased_source).unwrap_or(Name::EMPTY);
            tracing::trace!(?from, ?target, "boxing inline class value");
            frame.emit_box(from, class);
            return;
        }
        if !from_unboxed && to_unboxed {
            // The unboxed target representation is `target` itself.
            let class = types.class_name(erased_target).unwrap_or(Name::EMPTY);
            tracing::trace!(?from, ?target, "unboxing inline class value");
            frame.emit_unbox(class, target);
            return;
        }
    }

    if from != target {
        frame.emit_coerce(from, target);
    }
}

/// Whether the exemption table suppresses inline-class coercion for
/// these types in this frame's context.
fn coercion_exempt<E: Emitter>(frame: &Frame<'_, E>, from_ty: TypeId, target_ty: TypeId) -> bool {
    let types = frame.types();
    COERCION_EXEMPT.iter().any(|&(origin, well_known)| {
        frame.enclosing_origin() == origin
            && (types.is_well_known(from_ty, well_known)
                || types.is_well_known(target_ty, well_known))
    })
}

/// Whether `konst` is the target's default (zero) value for `repr`.
///
/// Bit-exact for floats: `-0.0` is *not* the default value, `+0.0` is.
pub fn is_default_value_for_type(repr: Repr, konst: ConstValue) -> bool {
    match repr {
        Repr::Bool => konst == ConstValue::Bool(false),
        Repr::Char => konst == ConstValue::Char('\0'),
        Repr::I8 | Repr::I16 | Repr::I32 | Repr::I64 => integer_value(konst) == Some(0),
        Repr::F32 => match konst {
            ConstValue::F32Bits(bits) => bits == 0.0f32.to_bits(),
            _ => integer_value(konst) == Some(0),
        },
        Repr::F64 => match konst {
            ConstValue::F64Bits(bits) => bits == 0.0f64.to_bits(),
            _ => integer_value(konst) == Some(0),
        },
        Repr::Ref(_) => konst == ConstValue::Null,
        Repr::Void => false,
    }
}

fn integer_value(konst: ConstValue) -> Option<i64> {
    match konst {
        ConstValue::I8(value) => Some(i64::from(value)),
        ConstValue::I16(value) => Some(i64::from(value)),
        ConstValue::I32(value) => Some(i64::from(value)),
        ConstValue::I64(value) => Some(value),
        _ => None,
    }
}
