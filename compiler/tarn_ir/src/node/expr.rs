//! Expression node kinds.
//!
//! Every expression is an [`ExprKind`] stored in the arena alongside its
//! span, semantic type, and optional origin tag. Children are id/range
//! handles; no variant owns heap storage, so kinds stay `Copy` and
//! transformation passes can read a kind, rewrite its slots, and store it
//! back without borrow gymnastics.

use crate::{
    ArgRange, CatchRange, DeclId, ElementRange, ExprId, Name, StmtRange, SymbolId, TypeArgRange,
    TypeId,
};

/// A compile-time constant.
///
/// Floats are stored as raw bits so constants stay `Eq`/`Hash`; this also
/// preserves the `+0.0`/`-0.0` distinction codegen relies on.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstValue {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32Bits(u32),
    F64Bits(u64),
    Str(Name),
}

impl ConstValue {
    #[inline]
    pub fn f32(value: f32) -> Self {
        ConstValue::F32Bits(value.to_bits())
    }

    #[inline]
    pub fn f64(value: f64) -> Self {
        ConstValue::F64Bits(value.to_bits())
    }

    /// Decoded f32 payload, if this is a float constant.
    #[inline]
    pub fn as_f32(self) -> Option<f32> {
        match self {
            ConstValue::F32Bits(bits) => Some(f32::from_bits(bits)),
            _ => None,
        }
    }

    /// Decoded f64 payload, if this is a double constant.
    #[inline]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            ConstValue::F64Bits(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }
}

/// Operators on duck-typed (dynamic) receivers.
///
/// Carries the source token image and whether the operator is an
/// assignment form; compound-assignment codegen branches on the latter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DynOperator {
    UnaryPlus,
    UnaryMinus,
    Not,
    PrefixIncrement,
    PostfixIncrement,
    PrefixDecrement,
    PostfixDecrement,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Ge,
    Le,
    EqEq,
    NotEq,
    Identity,
    NotIdentity,
    AndAnd,
    OrOr,
    Assign,
    PlusAssign,
    MinusAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    IndexAccess,
    Invoke,
}

impl DynOperator {
    /// The source token for this operator.
    pub fn image(self) -> &'static str {
        match self {
            DynOperator::UnaryPlus | DynOperator::Plus => "+",
            DynOperator::UnaryMinus | DynOperator::Minus => "-",
            DynOperator::Not => "!",
            DynOperator::PrefixIncrement | DynOperator::PostfixIncrement => "++",
            DynOperator::PrefixDecrement | DynOperator::PostfixDecrement => "--",
            DynOperator::Mul => "*",
            DynOperator::Div => "/",
            DynOperator::Mod => "%",
            DynOperator::Gt => ">",
            DynOperator::Lt => "<",
            DynOperator::Ge => ">=",
            DynOperator::Le => "<=",
            DynOperator::EqEq => "==",
            DynOperator::NotEq => "!=",
            DynOperator::Identity => "===",
            DynOperator::NotIdentity => "!==",
            DynOperator::AndAnd => "&&",
            DynOperator::OrOr => "||",
            DynOperator::Assign => "=",
            DynOperator::PlusAssign => "+=",
            DynOperator::MinusAssign => "-=",
            DynOperator::MulAssign => "*=",
            DynOperator::DivAssign => "/=",
            DynOperator::ModAssign => "%=",
            DynOperator::IndexAccess => "[]",
            DynOperator::Invoke => "()",
        }
    }

    /// Whether this operator writes to its receiver.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            DynOperator::PrefixIncrement
                | DynOperator::PostfixIncrement
                | DynOperator::PrefixDecrement
                | DynOperator::PostfixDecrement
                | DynOperator::Assign
                | DynOperator::PlusAssign
                | DynOperator::MinusAssign
                | DynOperator::MulAssign
                | DynOperator::DivAssign
                | DynOperator::ModAssign
        )
    }
}

/// Type-level operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeOp {
    /// Checked cast.
    Cast,
    /// Coercion inserted by the type checker.
    ImplicitCast,
    /// `is` check.
    InstanceOf,
    /// `!is` check.
    NotInstanceOf,
}

/// One element of a vararg: a plain expression or a spread that flattens
/// another collection into the vararg at codegen time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarargElement {
    Expr(ExprId),
    Spread(ExprId),
}

impl VarargElement {
    /// The wrapped expression, spread or not.
    #[inline]
    pub fn expr(self) -> ExprId {
        match self {
            VarargElement::Expr(id) | VarargElement::Spread(id) => id,
        }
    }
}

/// One statement slot in a block: an expression evaluated for effect or a
/// local declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Stmt {
    Expr(ExprId),
    Decl(DeclId),
}

/// Catch clause of a `Try`: a variable declaration for the caught value
/// and a handler result expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Catch {
    pub parameter: DeclId,
    pub result: ExprId,
}

/// Expression variants.
///
/// Slot conventions: `ExprId::INVALID` marks an absent optional child
/// (e.g. a static field access has no receiver); argument ranges have a
/// cardinality fixed at allocation and only their occupants change.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum ExprKind {
    /// Literal constant.
    Const(ConstValue),

    /// Read of a local variable or parameter.
    GetValue { symbol: SymbolId },

    /// Write of a local variable.
    SetValue { symbol: SymbolId, value: ExprId },

    /// Field read. `receiver` is INVALID for static fields.
    GetField {
        field: SymbolId,
        receiver: ExprId,
        super_qualifier: Option<SymbolId>,
    },

    /// Field write. Children: receiver, then value.
    SetField {
        field: SymbolId,
        receiver: ExprId,
        value: ExprId,
        super_qualifier: Option<SymbolId>,
    },

    /// Function call. Argument slot counts are fixed at construction.
    /// `super_qualifier` names the class whose implementation a
    /// super-call dispatches to.
    Call {
        callee: SymbolId,
        type_args: TypeArgRange,
        args: ArgRange,
        dispatch_receiver: ExprId,
        extension_receiver: ExprId,
        super_qualifier: Option<SymbolId>,
    },

    /// Constructor call. The flat type-argument range is partitioned:
    /// the first `total - ctor_type_args` slots belong to the
    /// constructed classifier, the trailing `ctor_type_args` slots to
    /// the constructor itself. The split is fixed at construction.
    ConstructorCall {
        ctor: SymbolId,
        type_args: TypeArgRange,
        ctor_type_args: u16,
        args: ArgRange,
        dispatch_receiver: ExprId,
    },

    /// Callable reference to a function, with argument slots for
    /// partially-applied (bound) arguments.
    FunctionReference {
        function: SymbolId,
        type_args: TypeArgRange,
        args: ArgRange,
        reflection_target: Option<SymbolId>,
    },

    /// Callable reference to a property. No value-argument slots.
    PropertyReference {
        property: SymbolId,
        type_args: TypeArgRange,
        field: Option<SymbolId>,
        getter: Option<SymbolId>,
        setter: Option<SymbolId>,
    },

    /// Reference to a function as a raw code pointer, without a
    /// reflection wrapper.
    RawFunctionReference { function: SymbolId },

    /// Statement block; the last statement's value is the block's value.
    Block { statements: StmtRange },

    /// Block that is a return target. Owns its symbol, which is bound
    /// when the block is allocated. `inline_function` records which
    /// inlined function body produced this block, if any.
    ReturnableBlock {
        symbol: SymbolId,
        statements: StmtRange,
        inline_function: Option<SymbolId>,
    },

    /// Return to the function or returnable block named by `target`.
    Return { target: SymbolId, value: ExprId },

    /// `while` loop.
    While {
        condition: ExprId,
        body: ExprId,
        label: Option<Name>,
    },

    /// `do`/`while` loop. The condition is still the first child in
    /// traversal order.
    DoWhile {
        condition: ExprId,
        body: ExprId,
        label: Option<Name>,
    },

    /// Break out of `loop_target`. The loop is an ancestor, not a child:
    /// the handle is a non-owning back-reference that traversal never
    /// follows.
    Break {
        loop_target: ExprId,
        label: Option<Name>,
    },

    /// Continue `loop_target`. Same back-reference rules as `Break`.
    Continue {
        loop_target: ExprId,
        label: Option<Name>,
    },

    /// Try expression. Child order: body, catches in source order,
    /// then the optional finally (INVALID when absent).
    Try {
        body: ExprId,
        catches: CatchRange,
        finally: ExprId,
    },

    /// Variable-arity argument pack.
    Vararg {
        element_type: TypeId,
        elements: ElementRange,
    },

    /// Operator applied to a duck-typed receiver. Children: receiver,
    /// then arguments left to right.
    DynamicOperator {
        operator: DynOperator,
        receiver: ExprId,
        arguments: ArgRange,
    },

    /// Member access on a duck-typed receiver.
    DynamicMember { member: Name, receiver: ExprId },

    /// Coroutine suspension point. Child order is contractual: the id
    /// parameter must be visited before either result branch so
    /// variable scopes nest correctly in emitted code.
    SuspensionPoint {
        id_parameter: DeclId,
        result: ExprId,
        resume_result: ExprId,
    },

    /// Region of a coroutine body that may suspend at the point named by
    /// `suspension_point_id`.
    SuspendableExpression {
        suspension_point_id: ExprId,
        result: ExprId,
    },

    /// Cast / instance-of.
    TypeOperator {
        op: TypeOp,
        operand: ExprId,
        operand_type: TypeId,
    },
}

impl ExprKind {
    /// Short kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprKind::Const(_) => "Const",
            ExprKind::GetValue { .. } => "GetValue",
            ExprKind::SetValue { .. } => "SetValue",
            ExprKind::GetField { .. } => "GetField",
            ExprKind::SetField { .. } => "SetField",
            ExprKind::Call { .. } => "Call",
            ExprKind::ConstructorCall { .. } => "ConstructorCall",
            ExprKind::FunctionReference { .. } => "FunctionReference",
            ExprKind::PropertyReference { .. } => "PropertyReference",
            ExprKind::RawFunctionReference { .. } => "RawFunctionReference",
            ExprKind::Block { .. } => "Block",
            ExprKind::ReturnableBlock { .. } => "ReturnableBlock",
            ExprKind::Return { .. } => "Return",
            ExprKind::While { .. } => "While",
            ExprKind::DoWhile { .. } => "DoWhile",
            ExprKind::Break { .. } => "Break",
            ExprKind::Continue { .. } => "Continue",
            ExprKind::Try { .. } => "Try",
            ExprKind::Vararg { .. } => "Vararg",
            ExprKind::DynamicOperator { .. } => "DynamicOperator",
            ExprKind::DynamicMember { .. } => "DynamicMember",
            ExprKind::SuspensionPoint { .. } => "SuspensionPoint",
            ExprKind::SuspendableExpression { .. } => "SuspendableExpression",
            ExprKind::TypeOperator { .. } => "TypeOperator",
        }
    }

    /// Whether this kind is a loop (a valid break/continue target).
    pub fn is_loop(&self) -> bool {
        matches!(self, ExprKind::While { .. } | ExprKind::DoWhile { .. })
    }
}

impl std::fmt::Debug for ExprKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprKind::Const(value) => write!(f, "Const({value:?})"),
            other => f.write_str(other.kind_name()),
        }
    }
}
