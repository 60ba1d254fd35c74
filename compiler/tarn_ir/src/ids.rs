//! Id and range handles into the [`IrArena`](crate::IrArena).
//!
//! Nodes reference their children through `u32` indices rather than owned
//! boxes; child lists are `(start, len)` ranges into flat side tables.
//! `INVALID` (`u32::MAX`) marks an absent occupant in an optional slot.

use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Absent-slot sentinel.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($name), "::INVALID"))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

define_id! {
    /// Index of an expression node.
    ExprId
}

define_id! {
    /// Index of a declaration node.
    DeclId
}

define_id! {
    /// Index of a catch clause.
    CatchId
}

macro_rules! define_range {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        #[repr(C)]
        pub struct $name {
            pub start: u32,
            pub len: u16,
        }

        impl $name {
            /// Empty range.
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u16) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(self) -> usize {
                self.len as usize
            }

            /// Iterator over the flat-table indices covered by this range.
            #[inline]
            pub fn indices(self) -> impl Iterator<Item = usize> {
                (self.start as usize)..(self.start as usize + self.len as usize)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "({}..{})"),
                    self.start,
                    self.start + u32::from(self.len)
                )
            }
        }
    };
}

define_range! {
    /// Range of statement slots.
    StmtRange
}

define_range! {
    /// Range of value-argument slots. Slot count is fixed at allocation;
    /// occupants may be `ExprId::INVALID` (argument not yet supplied).
    ArgRange
}

define_range! {
    /// Range of type-argument slots. Occupants are `Option<TypeId>`.
    TypeArgRange
}

define_range! {
    /// Range of vararg element slots.
    ElementRange
}

define_range! {
    /// Range of catch clauses.
    CatchRange
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_validity() {
        let id = ExprId::new(7);
        assert!(id.is_valid());
        assert_eq!(id.index(), 7);
        assert!(!ExprId::INVALID.is_valid());
        assert!(!DeclId::default().is_valid());
    }

    #[test]
    fn range_indices() {
        let range = ArgRange::new(10, 3);
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert!(ArgRange::EMPTY.is_empty());
    }

    #[test]
    fn id_size() {
        assert_eq!(std::mem::size_of::<ExprId>(), 4);
        assert_eq!(std::mem::size_of::<StmtRange>(), 8);
    }
}
