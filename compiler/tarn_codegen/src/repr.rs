//! Machine representations.
//!
//! A [`Repr`] is the shape a value takes on the target's evaluation
//! stack, independent of its semantic [`TypeId`]. Wide representations
//! (`I64`, `F64`) occupy two stack slots; `Void` occupies none.

use tarn_ir::{Name, PrimitiveTy, TyKind, TypeId, TypeStore};

/// Stack representation of a value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Repr {
    Void,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Reference to an instance of the named class.
    Ref(Name),
}

impl Repr {
    /// Evaluation-stack slots this representation occupies.
    #[inline]
    pub fn slots(self) -> usize {
        match self {
            Repr::Void => 0,
            Repr::I64 | Repr::F64 => 2,
            _ => 1,
        }
    }

    /// Whether this is a primitive (non-reference, non-void) value.
    #[inline]
    pub fn is_primitive(self) -> bool {
        !matches!(self, Repr::Void | Repr::Ref(_))
    }
}

/// Map a semantic type to its stack representation.
///
/// Inline value classes map to their underlying (unboxed)
/// representation; use the class name for the boxed form.
pub fn repr_of(types: &TypeStore, ty: TypeId) -> Repr {
    let erased = types.erase(ty);
    match types.kind(erased) {
        TyKind::Primitive(prim) => match prim {
            PrimitiveTy::Unit => Repr::Void,
            PrimitiveTy::Bool => Repr::Bool,
            PrimitiveTy::Char => Repr::Char,
            PrimitiveTy::I8 => Repr::I8,
            PrimitiveTy::I16 => Repr::I16,
            PrimitiveTy::I32 => Repr::I32,
            PrimitiveTy::I64 => Repr::I64,
            PrimitiveTy::F32 => Repr::F32,
            PrimitiveTy::F64 => Repr::F64,
        },
        TyKind::Class {
            name,
            inline_underlying,
            ..
        } => match inline_underlying {
            Some(underlying) => repr_of(types, *underlying),
            None => Repr::Ref(*name),
        },
        // `erase` resolved parameters already.
        TyKind::Param { erasure, .. } => repr_of(types, *erasure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_ir::StringInterner;

    #[test]
    fn slot_widths() {
        assert_eq!(Repr::Void.slots(), 0);
        assert_eq!(Repr::I32.slots(), 1);
        assert_eq!(Repr::I64.slots(), 2);
        assert_eq!(Repr::F64.slots(), 2);
        assert_eq!(Repr::Ref(Name::EMPTY).slots(), 1);
    }

    #[test]
    fn primitives() {
        assert!(Repr::I32.is_primitive());
        assert!(!Repr::Void.is_primitive());
        assert!(!Repr::Ref(Name::EMPTY).is_primitive());
    }

    #[test]
    fn inline_class_maps_to_underlying() {
        let interner = StringInterner::new();
        let mut types = TypeStore::new();
        let meters = types.alloc_inline_class(interner.intern("Meters"), TypeStore::F64);
        let plain = types.alloc_class(interner.intern("Point"));

        assert_eq!(repr_of(&types, meters), Repr::F64);
        assert_eq!(repr_of(&types, TypeStore::BOOL), Repr::Bool);
        assert!(matches!(repr_of(&types, plain), Repr::Ref(_)));
    }
}
