//! Structural validation of a built tree.
//!
//! Checks the single-owner invariant: every node must be reachable
//! through exactly one owning parent slot. Violations are collected into
//! a batch [`ValidationReport`] (not fail-fast) so one test run surfaces
//! every structural defect a lowering pass introduced at once.
//!
//! Out-of-range slot accesses during normal arena use still panic at the
//! access site; this pass exists for whole-tree audits in tests and
//! debug builds.

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::node::{DeclKind, ExprKind, Stmt, VarargElement};
use crate::{CatchId, DeclId, ExprId, IrArena};

/// A node reference, expression or declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeRef {
    Expr(ExprId),
    Decl(DeclId),
}

/// One owning slot: the parent node (None for a root) and a slot label.
#[derive(Clone, Debug)]
pub struct OwnerSlot {
    pub parent: Option<NodeRef>,
    pub slot: String,
}

/// A node owned by more than one parent slot.
#[derive(Clone, Debug)]
pub struct DuplicateOwnership {
    pub node: NodeRef,
    pub owners: SmallVec<[OwnerSlot; 2]>,
}

/// A slot holding an id that does not index an allocated node.
#[derive(Clone, Debug)]
pub struct InvalidRef {
    pub owner: OwnerSlot,
    pub target: NodeRef,
}

/// Batch result of a structural validation pass.
#[derive(Default, Debug)]
pub struct ValidationReport {
    pub duplicates: Vec<DuplicateOwnership>,
    pub invalid_refs: Vec<InvalidRef>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty() && self.invalid_refs.is_empty()
    }

    /// Panic with the rendered report if any defect was found.
    #[track_caller]
    pub fn assert_valid(&self) {
        assert!(self.is_empty(), "{self}");
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.duplicates.is_empty() {
            writeln!(f, "the following nodes are owned by more than one parent slot:")?;
            for dup in &self.duplicates {
                writeln!(f, "  {:?}:", dup.node)?;
                for owner in &dup.owners {
                    match &owner.parent {
                        Some(parent) => writeln!(f, "    {:?} slot `{}`", parent, owner.slot)?,
                        None => writeln!(f, "    <root> `{}`", owner.slot)?,
                    }
                }
            }
        }
        if !self.invalid_refs.is_empty() {
            writeln!(f, "the following slots reference unallocated nodes:")?;
            for inv in &self.invalid_refs {
                match &inv.owner.parent {
                    Some(parent) => writeln!(
                        f,
                        "  {:?} slot `{}` -> {:?}",
                        parent, inv.owner.slot, inv.target
                    )?,
                    None => writeln!(f, "  <root> `{}` -> {:?}", inv.owner.slot, inv.target)?,
                }
            }
        }
        Ok(())
    }
}

/// Validate the trees rooted at `roots`.
pub fn validate(ir: &IrArena, roots: &[ExprId]) -> ValidationReport {
    let mut walker = OwnershipWalker {
        ir,
        owners: FxHashMap::default(),
        invalid_refs: Vec::new(),
    };
    for (i, &root) in roots.iter().enumerate() {
        walker.visit_expr(root, None, format!("root[{i}]"));
    }

    let mut duplicates: Vec<DuplicateOwnership> = walker
        .owners
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(node, owners)| DuplicateOwnership { node, owners })
        .collect();
    // Deterministic report order regardless of map iteration.
    duplicates.sort_by_key(|dup| match dup.node {
        NodeRef::Expr(id) => (0u8, id.raw()),
        NodeRef::Decl(id) => (1u8, id.raw()),
    });

    ValidationReport {
        duplicates,
        invalid_refs: walker.invalid_refs,
    }
}

struct OwnershipWalker<'a> {
    ir: &'a IrArena,
    owners: FxHashMap<NodeRef, SmallVec<[OwnerSlot; 2]>>,
    invalid_refs: Vec<InvalidRef>,
}

impl OwnershipWalker<'_> {
    /// Record ownership of `node`; returns true if this is the first
    /// owner (children should be walked).
    fn record(&mut self, node: NodeRef, parent: Option<NodeRef>, slot: String) -> bool {
        let owners = self.owners.entry(node).or_default();
        owners.push(OwnerSlot { parent, slot });
        owners.len() == 1
    }

    fn visit_expr(&mut self, id: ExprId, parent: Option<NodeRef>, slot: String) {
        if !self.ir.contains_expr(id) {
            self.invalid_refs.push(InvalidRef {
                owner: OwnerSlot { parent, slot },
                target: NodeRef::Expr(id),
            });
            return;
        }
        let node = NodeRef::Expr(id);
        // Walking the children of a multiply-owned node once is enough;
        // this also keeps accidental cycles from looping forever.
        if !self.record(node, parent, slot) {
            return;
        }
        self.walk_expr_children(id, node);
    }

    fn visit_opt_expr(&mut self, id: ExprId, parent: NodeRef, slot: String) {
        if id.is_valid() {
            self.visit_expr(id, Some(parent), slot);
        }
    }

    fn visit_decl(&mut self, id: DeclId, parent: Option<NodeRef>, slot: String) {
        if !self.ir.contains_decl(id) {
            self.invalid_refs.push(InvalidRef {
                owner: OwnerSlot { parent, slot },
                target: NodeRef::Decl(id),
            });
            return;
        }
        let node = NodeRef::Decl(id);
        if !self.record(node, parent, slot) {
            return;
        }
        match self.ir.decl(id).kind {
            DeclKind::Function { body, .. } => {
                if body.is_valid() {
                    self.visit_expr(body, Some(node), "body".to_owned());
                }
            }
            DeclKind::Field { initializer, .. } | DeclKind::Variable { initializer, .. } => {
                if initializer.is_valid() {
                    self.visit_expr(initializer, Some(node), "initializer".to_owned());
                }
            }
            DeclKind::Class { .. } | DeclKind::Property { .. } => {}
        }
    }

    fn visit_stmts(&mut self, stmts: crate::StmtRange, parent: NodeRef) {
        for (i, stmt) in self.ir.stmts(stmts).iter().enumerate() {
            match *stmt {
                Stmt::Expr(expr) => self.visit_expr(expr, Some(parent), format!("statements[{i}]")),
                Stmt::Decl(decl) => self.visit_decl(decl, Some(parent), format!("statements[{i}]")),
            }
        }
    }

    fn visit_args(&mut self, args: crate::ArgRange, parent: NodeRef) {
        for i in 0..args.len() {
            let arg = self.ir.value_argument(args, i);
            self.visit_opt_expr(arg, parent, format!("args[{i}]"));
        }
    }

    fn walk_expr_children(&mut self, id: ExprId, node: NodeRef) {
        match self.ir.kind(id) {
            // Break/continue hold a non-owning loop back-reference, which
            // deliberately does not count as ownership.
            ExprKind::Const(_)
            | ExprKind::GetValue { .. }
            | ExprKind::RawFunctionReference { .. }
            | ExprKind::PropertyReference { .. }
            | ExprKind::Break { .. }
            | ExprKind::Continue { .. } => {}

            ExprKind::SetValue { value, .. } => {
                self.visit_expr(value, Some(node), "value".to_owned());
            }

            ExprKind::GetField { receiver, .. } => {
                self.visit_opt_expr(receiver, node, "receiver".to_owned());
            }

            ExprKind::SetField {
                receiver, value, ..
            } => {
                self.visit_opt_expr(receiver, node, "receiver".to_owned());
                self.visit_expr(value, Some(node), "value".to_owned());
            }

            ExprKind::Call {
                dispatch_receiver,
                extension_receiver,
                args,
                ..
            } => {
                self.visit_opt_expr(dispatch_receiver, node, "dispatch_receiver".to_owned());
                self.visit_opt_expr(extension_receiver, node, "extension_receiver".to_owned());
                self.visit_args(args, node);
            }

            ExprKind::ConstructorCall {
                dispatch_receiver,
                args,
                ..
            } => {
                self.visit_opt_expr(dispatch_receiver, node, "dispatch_receiver".to_owned());
                self.visit_args(args, node);
            }

            ExprKind::FunctionReference { args, .. } => self.visit_args(args, node),

            ExprKind::Block { statements } | ExprKind::ReturnableBlock { statements, .. } => {
                self.visit_stmts(statements, node);
            }

            ExprKind::Return { value, .. } => {
                self.visit_expr(value, Some(node), "value".to_owned());
            }

            ExprKind::While {
                condition, body, ..
            }
            | ExprKind::DoWhile {
                condition, body, ..
            } => {
                self.visit_expr(condition, Some(node), "condition".to_owned());
                self.visit_opt_expr(body, node, "body".to_owned());
            }

            ExprKind::Try {
                body,
                catches,
                finally,
            } => {
                self.visit_expr(body, Some(node), "body".to_owned());
                for (i, catch_id) in self.ir.catch_ids(catches).enumerate() {
                    self.visit_catch(catch_id, node, i);
                }
                self.visit_opt_expr(finally, node, "finally".to_owned());
            }

            ExprKind::Vararg { elements, .. } => {
                for (i, element) in self.ir.elements(elements).iter().enumerate() {
                    let expr = match element {
                        VarargElement::Expr(expr) | VarargElement::Spread(expr) => *expr,
                    };
                    self.visit_expr(expr, Some(node), format!("elements[{i}]"));
                }
            }

            ExprKind::DynamicOperator {
                receiver,
                arguments,
                ..
            } => {
                self.visit_expr(receiver, Some(node), "receiver".to_owned());
                self.visit_args(arguments, node);
            }

            ExprKind::DynamicMember { receiver, .. } => {
                self.visit_expr(receiver, Some(node), "receiver".to_owned());
            }

            ExprKind::SuspensionPoint {
                id_parameter,
                result,
                resume_result,
            } => {
                self.visit_decl(id_parameter, Some(node), "id_parameter".to_owned());
                self.visit_expr(result, Some(node), "result".to_owned());
                self.visit_expr(resume_result, Some(node), "resume_result".to_owned());
            }

            ExprKind::SuspendableExpression {
                suspension_point_id,
                result,
            } => {
                self.visit_expr(
                    suspension_point_id,
                    Some(node),
                    "suspension_point_id".to_owned(),
                );
                self.visit_expr(result, Some(node), "result".to_owned());
            }

            ExprKind::TypeOperator { operand, .. } => {
                self.visit_expr(operand, Some(node), "operand".to_owned());
            }
        }
    }

    fn visit_catch(&mut self, id: CatchId, parent: NodeRef, index: usize) {
        let catch = self.ir.catch(id);
        self.visit_decl(catch.parameter, Some(parent), format!("catches[{index}].parameter"));
        self.visit_expr(catch.result, Some(parent), format!("catches[{index}].result"));
    }
}
