//! Tree traversal.
//!
//! Double dispatch over the closed node-kind set: [`accept`] matches a
//! node's concrete kind and invokes the corresponding `visit_*` method.
//! Per-kind methods default through [`Visitor::visit_expr`] /
//! [`Visitor::visit_decl`], whose defaults call the `walk_*` functions
//! that enumerate owned children.
//!
//! # Child order
//!
//! Traversal order is a contract, not an implementation detail; lowering
//! output is only reproducible if children are enumerated exactly as
//! documented on each kind:
//!
//! - call: dispatch receiver, extension receiver, value arguments in order
//! - try: body, catch clauses in source order, optional finally
//! - catch: parameter declaration, result
//! - loop: condition, body (also for do/while)
//! - vararg: elements in argument order (spread wrappers via
//!   [`Visitor::visit_spread_element`])
//! - dynamic operator: receiver, then arguments left to right
//! - suspension point: id parameter, result, resume result (the id
//!   parameter must come first so variable scopes nest correctly in
//!   emitted code)
//!
//! Break/continue hold a back-reference to their enclosing loop; the loop
//! is an ancestor, not a child, and is never visited from here.

use crate::node::{ExprKind, Stmt, VarargElement};
use crate::stack::ensure_sufficient_stack;
use crate::{CatchId, DeclId, ExprId, IrArena};

/// IR visitor.
///
/// Override per-kind methods for custom behavior; unoverridden kinds fall
/// through to [`Visitor::visit_expr`], whose default walks children. The
/// visitor mutates its own state; the tree is not modified (use
/// [`Transformer`](crate::Transformer) for rewriting).
pub trait Visitor {
    /// Fallback for all expression kinds.
    fn visit_expr(&mut self, id: ExprId, ir: &IrArena) {
        walk_expr(self, id, ir);
    }

    /// Fallback for all declaration kinds.
    fn visit_decl(&mut self, id: DeclId, ir: &IrArena) {
        walk_decl(self, id, ir);
    }

    /// Catch clause of a try.
    fn visit_catch(&mut self, id: CatchId, ir: &IrArena) {
        walk_catch(self, id, ir);
    }

    /// Spread wrapper inside a vararg. Defaults to visiting the wrapped
    /// expression.
    fn visit_spread_element(&mut self, expr: ExprId, ir: &IrArena) {
        accept(self, expr, ir);
    }

    fn visit_const(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_get_value(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_set_value(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_get_field(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_set_field(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_call(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_constructor_call(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_function_reference(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_property_reference(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_raw_function_reference(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_block(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_returnable_block(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_return(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_while(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_do_while(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_break(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_continue(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_try(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_vararg(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_dynamic_operator(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_dynamic_member(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_suspension_point(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_suspendable_expression(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }

    fn visit_type_operator(&mut self, id: ExprId, ir: &IrArena) {
        self.visit_expr(id, ir);
    }
}

/// Dispatch on the node's concrete kind.
pub fn accept<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, ir: &IrArena) {
    match ir.kind(id) {
        ExprKind::Const(_) => visitor.visit_const(id, ir),
        ExprKind::GetValue { .. } => visitor.visit_get_value(id, ir),
        ExprKind::SetValue { .. } => visitor.visit_set_value(id, ir),
        ExprKind::GetField { .. } => visitor.visit_get_field(id, ir),
        ExprKind::SetField { .. } => visitor.visit_set_field(id, ir),
        ExprKind::Call { .. } => visitor.visit_call(id, ir),
        ExprKind::ConstructorCall { .. } => visitor.visit_constructor_call(id, ir),
        ExprKind::FunctionReference { .. } => visitor.visit_function_reference(id, ir),
        ExprKind::PropertyReference { .. } => visitor.visit_property_reference(id, ir),
        ExprKind::RawFunctionReference { .. } => visitor.visit_raw_function_reference(id, ir),
        ExprKind::Block { .. } => visitor.visit_block(id, ir),
        ExprKind::ReturnableBlock { .. } => visitor.visit_returnable_block(id, ir),
        ExprKind::Return { .. } => visitor.visit_return(id, ir),
        ExprKind::While { .. } => visitor.visit_while(id, ir),
        ExprKind::DoWhile { .. } => visitor.visit_do_while(id, ir),
        ExprKind::Break { .. } => visitor.visit_break(id, ir),
        ExprKind::Continue { .. } => visitor.visit_continue(id, ir),
        ExprKind::Try { .. } => visitor.visit_try(id, ir),
        ExprKind::Vararg { .. } => visitor.visit_vararg(id, ir),
        ExprKind::DynamicOperator { .. } => visitor.visit_dynamic_operator(id, ir),
        ExprKind::DynamicMember { .. } => visitor.visit_dynamic_member(id, ir),
        ExprKind::SuspensionPoint { .. } => visitor.visit_suspension_point(id, ir),
        ExprKind::SuspendableExpression { .. } => visitor.visit_suspendable_expression(id, ir),
        ExprKind::TypeOperator { .. } => visitor.visit_type_operator(id, ir),
    }
}

/// Visit the owned children of `id` in the documented order.
pub fn accept_children<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, ir: &IrArena) {
    walk_expr(visitor, id, ir);
}

fn accept_opt<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, ir: &IrArena) {
    if id.is_valid() {
        accept(visitor, id, ir);
    }
}

fn accept_args<V: Visitor + ?Sized>(visitor: &mut V, args: crate::ArgRange, ir: &IrArena) {
    for i in 0..args.len() {
        accept_opt(visitor, ir.value_argument(args, i), ir);
    }
}

fn accept_stmts<V: Visitor + ?Sized>(visitor: &mut V, stmts: crate::StmtRange, ir: &IrArena) {
    for i in 0..stmts.len() {
        match ir.stmts(stmts)[i] {
            Stmt::Expr(expr) => accept(visitor, expr, ir),
            Stmt::Decl(decl) => visitor.visit_decl(decl, ir),
        }
    }
}

/// Enumerate the owned children of an expression.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, ir: &IrArena) {
    ensure_sufficient_stack(|| match ir.kind(id) {
        ExprKind::Const(_)
        | ExprKind::GetValue { .. }
        | ExprKind::RawFunctionReference { .. }
        | ExprKind::PropertyReference { .. }
        | ExprKind::Break { .. }
        | ExprKind::Continue { .. } => {}

        ExprKind::SetValue { value, .. } => accept(visitor, value, ir),

        ExprKind::GetField { receiver, .. } => accept_opt(visitor, receiver, ir),

        ExprKind::SetField {
            receiver, value, ..
        } => {
            accept_opt(visitor, receiver, ir);
            accept(visitor, value, ir);
        }

        ExprKind::Call {
            dispatch_receiver,
            extension_receiver,
            args,
            ..
        } => {
            accept_opt(visitor, dispatch_receiver, ir);
            accept_opt(visitor, extension_receiver, ir);
            accept_args(visitor, args, ir);
        }

        ExprKind::ConstructorCall {
            dispatch_receiver,
            args,
            ..
        } => {
            accept_opt(visitor, dispatch_receiver, ir);
            accept_args(visitor, args, ir);
        }

        ExprKind::FunctionReference { args, .. } => accept_args(visitor, args, ir),

        ExprKind::Block { statements } => accept_stmts(visitor, statements, ir),

        ExprKind::ReturnableBlock { statements, .. } => accept_stmts(visitor, statements, ir),

        ExprKind::Return { value, .. } => accept(visitor, value, ir),

        ExprKind::While {
            condition, body, ..
        }
        | ExprKind::DoWhile {
            condition, body, ..
        } => {
            accept(visitor, condition, ir);
            accept_opt(visitor, body, ir);
        }

        ExprKind::Try {
            body,
            catches,
            finally,
        } => {
            accept(visitor, body, ir);
            for catch_id in ir.catch_ids(catches) {
                visitor.visit_catch(catch_id, ir);
            }
            accept_opt(visitor, finally, ir);
        }

        ExprKind::Vararg { elements, .. } => {
            for i in 0..elements.len() {
                match ir.elements(elements)[i] {
                    VarargElement::Expr(expr) => accept(visitor, expr, ir),
                    VarargElement::Spread(expr) => visitor.visit_spread_element(expr, ir),
                }
            }
        }

        ExprKind::DynamicOperator {
            receiver,
            arguments,
            ..
        } => {
            accept(visitor, receiver, ir);
            accept_args(visitor, arguments, ir);
        }

        ExprKind::DynamicMember { receiver, .. } => accept(visitor, receiver, ir),

        ExprKind::SuspensionPoint {
            id_parameter,
            result,
            resume_result,
        } => {
            visitor.visit_decl(id_parameter, ir);
            accept(visitor, result, ir);
            accept(visitor, resume_result, ir);
        }

        ExprKind::SuspendableExpression {
            suspension_point_id,
            result,
        } => {
            accept(visitor, suspension_point_id, ir);
            accept(visitor, result, ir);
        }

        ExprKind::TypeOperator { operand, .. } => accept(visitor, operand, ir),
    });
}

/// Enumerate the owned children of a declaration.
pub fn walk_decl<V: Visitor + ?Sized>(visitor: &mut V, id: DeclId, ir: &IrArena) {
    use crate::node::DeclKind;
    match ir.decl(id).kind {
        DeclKind::Function { body, .. } => accept_opt(visitor, body, ir),
        DeclKind::Field { initializer, .. } | DeclKind::Variable { initializer, .. } => {
            accept_opt(visitor, initializer, ir);
        }
        DeclKind::Class { .. } | DeclKind::Property { .. } => {}
    }
}

/// Enumerate the owned children of a catch clause: the parameter
/// declaration, then the handler result.
pub fn walk_catch<V: Visitor + ?Sized>(visitor: &mut V, id: CatchId, ir: &IrArena) {
    let catch = ir.catch(id);
    visitor.visit_decl(catch.parameter, ir);
    accept(visitor, catch.result, ir);
}
