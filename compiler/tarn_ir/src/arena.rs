//! Arena storage for the IR tree.
//!
//! Struct-of-arrays layout: parallel `kinds`/`spans`/`types`/`origins`
//! vectors indexed by [`ExprId`], a declaration table indexed by
//! [`DeclId`], and flat side tables for statement lists, argument slots,
//! type-argument slots, vararg elements, and catch clauses, addressed by
//! range handles.
//!
//! # Ownership
//!
//! Every node is owned by exactly one parent slot (the tree is a tree,
//! not a DAG); symbols are shared and referenced, never owned, by nodes.
//! Replacing a slot's occupant never changes the slot's cardinality.
//!
//! # Contract violations
//!
//! Out-of-range ids and slot indices panic immediately: they indicate a
//! lowering-pass bug, not bad user input.

use crate::node::{Catch, Decl, ExprKind, Stmt, VarargElement};
use crate::{
    ArgRange, CatchId, CatchRange, DeclId, ElementRange, ExprId, NodeOrigin, Span, StmtRange,
    SymbolId, SymbolOwner, SymbolTable, TypeArgRange, TypeId,
};

/// Storage for all IR nodes of one compilation unit.
#[derive(Default)]
pub struct IrArena {
    /// Expression kinds (parallel with spans, types, origins).
    kinds: Vec<ExprKind>,
    /// Source spans (parallel with kinds).
    spans: Vec<Span>,
    /// Semantic types from the frontend (parallel with kinds).
    types: Vec<TypeId>,
    /// Origin tags; `None` for user-written nodes (parallel with kinds).
    origins: Vec<Option<NodeOrigin>>,

    /// Declarations (indexed by `DeclId`).
    decls: Vec<Decl>,

    /// Flattened statement lists (indexed by `StmtRange`).
    stmts: Vec<Stmt>,
    /// Value-argument slots (indexed by `ArgRange`); `INVALID` = absent.
    args: Vec<ExprId>,
    /// Type-argument slots (indexed by `TypeArgRange`).
    type_args: Vec<Option<TypeId>>,
    /// Vararg element slots (indexed by `ElementRange`).
    elements: Vec<VarargElement>,
    /// Catch clauses (indexed by `CatchRange` / `CatchId`).
    catches: Vec<Catch>,
}

impl IrArena {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Expressions =====

    /// Allocate an expression node.
    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span, ty: TypeId) -> ExprId {
        let id = ExprId::new(self.kinds.len() as u32);
        self.kinds.push(kind);
        self.spans.push(span);
        self.types.push(ty);
        self.origins.push(None);
        id
    }

    /// Allocate an expression node with an origin tag.
    pub fn alloc_expr_with_origin(
        &mut self,
        kind: ExprKind,
        span: Span,
        ty: TypeId,
        origin: NodeOrigin,
    ) -> ExprId {
        let id = self.alloc_expr(kind, span, ty);
        self.origins[id.index()] = Some(origin);
        id
    }

    /// Allocate a returnable block, binding `symbol` to the new node.
    ///
    /// # Panics
    /// Panics if `symbol` is already bound.
    pub fn alloc_returnable_block(
        &mut self,
        symbols: &mut SymbolTable,
        symbol: SymbolId,
        span: Span,
        ty: TypeId,
        statements: StmtRange,
        inline_function: Option<SymbolId>,
    ) -> ExprId {
        let id = self.alloc_expr(
            ExprKind::ReturnableBlock {
                symbol,
                statements,
                inline_function,
            },
            span,
            ty,
        );
        symbols.bind(symbol, SymbolOwner::Block(id));
        id
    }

    /// Get an expression's kind.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.kinds[id.index()]
    }

    /// Replace an expression's kind in place.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn set_kind(&mut self, id: ExprId, kind: ExprKind) {
        self.kinds[id.index()] = kind;
    }

    #[inline]
    #[track_caller]
    pub fn span(&self, id: ExprId) -> Span {
        self.spans[id.index()]
    }

    #[inline]
    #[track_caller]
    pub fn ty(&self, id: ExprId) -> TypeId {
        self.types[id.index()]
    }

    #[inline]
    #[track_caller]
    pub fn set_ty(&mut self, id: ExprId, ty: TypeId) {
        self.types[id.index()] = ty;
    }

    #[inline]
    #[track_caller]
    pub fn origin(&self, id: ExprId) -> Option<NodeOrigin> {
        self.origins[id.index()]
    }

    #[inline]
    #[track_caller]
    pub fn set_origin(&mut self, id: ExprId, origin: Option<NodeOrigin>) {
        self.origins[id.index()] = origin;
    }

    /// Whether `id` indexes an allocated expression.
    #[inline]
    pub fn contains_expr(&self, id: ExprId) -> bool {
        id.index() < self.kinds.len()
    }

    pub fn expr_count(&self) -> usize {
        self.kinds.len()
    }

    /// Iterator over all allocated expression ids.
    pub fn expr_ids(&self) -> impl Iterator<Item = ExprId> {
        (0..self.kinds.len() as u32).map(ExprId::new)
    }

    // ===== Declarations =====

    /// Allocate a declaration, binding its symbol to the new node.
    ///
    /// # Panics
    /// Panics if the declaration's symbol is already bound.
    pub fn alloc_decl(&mut self, symbols: &mut SymbolTable, decl: Decl) -> DeclId {
        let id = DeclId::new(self.decls.len() as u32);
        symbols.bind(decl.kind.symbol(), SymbolOwner::Decl(id));
        self.decls.push(decl);
        id
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    #[inline]
    pub fn contains_decl(&self, id: DeclId) -> bool {
        id.index() < self.decls.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    // ===== Statement lists =====

    /// Allocate a statement list.
    pub fn alloc_stmts(&mut self, statements: impl IntoIterator<Item = Stmt>) -> StmtRange {
        let start = self.stmts.len() as u32;
        self.stmts.extend(statements);
        let len = to_u16(self.stmts.len() - start as usize);
        StmtRange::new(start, len)
    }

    /// Statements in declaration order.
    #[inline]
    #[track_caller]
    pub fn stmts(&self, range: StmtRange) -> &[Stmt] {
        &self.stmts[range.start as usize..range.start as usize + range.len()]
    }

    /// Replace one statement slot.
    ///
    /// # Panics
    /// Panics if `index` is outside the range.
    #[track_caller]
    pub fn set_stmt(&mut self, range: StmtRange, index: usize, stmt: Stmt) {
        assert!(
            index < range.len(),
            "no such statement slot: {index} (slot count {})",
            range.len()
        );
        self.stmts[range.start as usize + index] = stmt;
    }

    // ===== Value-argument slots =====

    /// Allocate `count` empty value-argument slots. The count is the
    /// node's argument cardinality and never changes.
    pub fn alloc_args(&mut self, count: u16) -> ArgRange {
        let start = self.args.len() as u32;
        self.args
            .extend(std::iter::repeat(ExprId::INVALID).take(count as usize));
        ArgRange::new(start, count)
    }

    /// Allocate value-argument slots from supplied occupants.
    pub fn alloc_args_from(&mut self, args: impl IntoIterator<Item = ExprId>) -> ArgRange {
        let start = self.args.len() as u32;
        self.args.extend(args);
        let len = to_u16(self.args.len() - start as usize);
        ArgRange::new(start, len)
    }

    /// Occupant of value-argument slot `index`; `INVALID` when absent.
    ///
    /// # Panics
    /// Panics if `index` is outside the range.
    #[track_caller]
    pub fn value_argument(&self, range: ArgRange, index: usize) -> ExprId {
        assert!(
            index < range.len(),
            "no such value argument slot: {index} (slot count {})",
            range.len()
        );
        self.args[range.start as usize + index]
    }

    /// Replace the occupant of value-argument slot `index`.
    ///
    /// # Panics
    /// Panics if `index` is outside the range.
    #[track_caller]
    pub fn put_value_argument(&mut self, range: ArgRange, index: usize, arg: ExprId) {
        assert!(
            index < range.len(),
            "no such value argument slot: {index} (slot count {})",
            range.len()
        );
        self.args[range.start as usize + index] = arg;
    }

    /// All value-argument slots of a range, in order.
    #[inline]
    #[track_caller]
    pub fn value_arguments(&self, range: ArgRange) -> &[ExprId] {
        &self.args[range.start as usize..range.start as usize + range.len()]
    }

    // ===== Type-argument slots =====

    /// Allocate `count` empty type-argument slots.
    pub fn alloc_type_args(&mut self, count: u16) -> TypeArgRange {
        let start = self.type_args.len() as u32;
        self.type_args
            .extend(std::iter::repeat(None).take(count as usize));
        TypeArgRange::new(start, count)
    }

    /// Occupant of type-argument slot `index`.
    ///
    /// # Panics
    /// Panics if `index` is outside the range.
    #[track_caller]
    pub fn type_argument(&self, range: TypeArgRange, index: usize) -> Option<TypeId> {
        assert!(
            index < range.len(),
            "no such type argument slot: {index} (slot count {})",
            range.len()
        );
        self.type_args[range.start as usize + index]
    }

    /// Replace the occupant of type-argument slot `index`.
    ///
    /// # Panics
    /// Panics if `index` is outside the range.
    #[track_caller]
    pub fn put_type_argument(&mut self, range: TypeArgRange, index: usize, ty: Option<TypeId>) {
        assert!(
            index < range.len(),
            "no such type argument slot: {index} (slot count {})",
            range.len()
        );
        self.type_args[range.start as usize + index] = ty;
    }

    // ===== Constructor-call argument partition =====
    //
    // A constructor call's flat type-argument range is split at a fixed
    // point: leading slots belong to the constructed classifier, trailing
    // slots to the constructor itself. The two views partition the flat
    // range with no overlap and no gap.

    /// The constructor-call partition `(type_args, ctor_count)`.
    ///
    /// # Panics
    /// Panics if `expr` is not a `ConstructorCall`.
    #[track_caller]
    fn constructor_call_partition(&self, expr: ExprId) -> (TypeArgRange, usize) {
        match self.kind(expr) {
            ExprKind::ConstructorCall {
                type_args,
                ctor_type_args,
                ..
            } => (type_args, ctor_type_args as usize),
            other => panic!(
                "expected ConstructorCall, found {} ({expr:?})",
                other.kind_name()
            ),
        }
    }

    /// Number of type-argument slots belonging to the constructed
    /// classifier.
    #[track_caller]
    pub fn classifier_type_args_count(&self, expr: ExprId) -> usize {
        let (type_args, ctor_count) = self.constructor_call_partition(expr);
        type_args.len() - ctor_count
    }

    /// Number of type-argument slots belonging to the constructor only.
    #[track_caller]
    pub fn constructor_type_args_count(&self, expr: ExprId) -> usize {
        self.constructor_call_partition(expr).1
    }

    /// Classifier-view type argument `index`.
    ///
    /// # Panics
    /// Panics if `index` is outside the classifier view.
    #[track_caller]
    pub fn classifier_type_argument(&self, expr: ExprId, index: usize) -> Option<TypeId> {
        let (type_args, ctor_count) = self.constructor_call_partition(expr);
        let size = type_args.len() - ctor_count;
        assert!(
            index < size,
            "no such classifier type argument slot: {index} (slot count {size})"
        );
        self.type_argument(type_args, index)
    }

    /// Replace classifier-view type argument `index`.
    #[track_caller]
    pub fn put_classifier_type_argument(&mut self, expr: ExprId, index: usize, ty: Option<TypeId>) {
        let (type_args, ctor_count) = self.constructor_call_partition(expr);
        let size = type_args.len() - ctor_count;
        assert!(
            index < size,
            "no such classifier type argument slot: {index} (slot count {size})"
        );
        self.put_type_argument(type_args, index, ty);
    }

    /// Constructor-view type argument `index`. The flat slot is
    /// `total - ctor_count + index`.
    ///
    /// # Panics
    /// Panics if `index` is outside the constructor view.
    #[track_caller]
    pub fn constructor_type_argument(&self, expr: ExprId, index: usize) -> Option<TypeId> {
        let (type_args, ctor_count) = self.constructor_call_partition(expr);
        assert!(
            index < ctor_count,
            "no such constructor type argument slot: {index} (slot count {ctor_count})"
        );
        self.type_argument(type_args, type_args.len() - ctor_count + index)
    }

    /// Replace constructor-view type argument `index`.
    #[track_caller]
    pub fn put_constructor_type_argument(
        &mut self,
        expr: ExprId,
        index: usize,
        ty: Option<TypeId>,
    ) {
        let (type_args, ctor_count) = self.constructor_call_partition(expr);
        assert!(
            index < ctor_count,
            "no such constructor type argument slot: {index} (slot count {ctor_count})"
        );
        self.put_type_argument(type_args, type_args.len() - ctor_count + index, ty);
    }

    // ===== Vararg elements =====

    /// Allocate vararg element slots.
    pub fn alloc_elements(
        &mut self,
        elements: impl IntoIterator<Item = VarargElement>,
    ) -> ElementRange {
        let start = self.elements.len() as u32;
        self.elements.extend(elements);
        let len = to_u16(self.elements.len() - start as usize);
        ElementRange::new(start, len)
    }

    /// Elements of a vararg, in argument order.
    #[inline]
    #[track_caller]
    pub fn elements(&self, range: ElementRange) -> &[VarargElement] {
        &self.elements[range.start as usize..range.start as usize + range.len()]
    }

    /// Replace element `index` of a vararg node in place.
    ///
    /// # Panics
    /// Panics if `expr` is not a `Vararg` or `index` exceeds the current
    /// element count.
    #[track_caller]
    pub fn put_element(&mut self, expr: ExprId, index: usize, element: VarargElement) {
        let range = match self.kind(expr) {
            ExprKind::Vararg { elements, .. } => elements,
            other => panic!("expected Vararg, found {} ({expr:?})", other.kind_name()),
        };
        assert!(
            index < range.len(),
            "no such vararg element slot: {index} (slot count {})",
            range.len()
        );
        self.elements[range.start as usize + index] = element;
    }

    /// Replace one element slot through its range (transform passes).
    #[track_caller]
    pub fn set_element(&mut self, range: ElementRange, index: usize, element: VarargElement) {
        assert!(
            index < range.len(),
            "no such vararg element slot: {index} (slot count {})",
            range.len()
        );
        self.elements[range.start as usize + index] = element;
    }

    // ===== Catch clauses =====

    /// Allocate catch clauses in source order.
    pub fn alloc_catches(&mut self, catches: impl IntoIterator<Item = Catch>) -> CatchRange {
        let start = self.catches.len() as u32;
        self.catches.extend(catches);
        let len = to_u16(self.catches.len() - start as usize);
        CatchRange::new(start, len)
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn catch(&self, id: CatchId) -> Catch {
        self.catches[id.index()]
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn set_catch(&mut self, id: CatchId, catch: Catch) {
        self.catches[id.index()] = catch;
    }

    /// Catch-clause ids covered by a range, in source order.
    pub fn catch_ids(&self, range: CatchRange) -> impl Iterator<Item = CatchId> {
        range.indices().map(|i| CatchId::new(i as u32))
    }
}

#[track_caller]
fn to_u16(len: usize) -> u16 {
    match u16::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("slot list too long: {len} (max {})", u16::MAX),
    }
}
