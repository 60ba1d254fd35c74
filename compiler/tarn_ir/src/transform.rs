//! In-place tree rewriting.
//!
//! [`transform`] dispatches on a node's concrete kind; per-kind methods
//! default through [`Transformer::transform_expr`], whose default
//! rewrites children and returns the node unchanged.
//! [`transform_children`] replaces each owned child slot with the
//! transformer's return value for that slot; the slot's cardinality
//! never changes, only its occupant.
//!
//! Child order matches [`visit`](crate::visit) exactly.

use crate::node::{Catch, DeclKind, ExprKind, Stmt, VarargElement};
use crate::stack::ensure_sufficient_stack;
use crate::{ArgRange, DeclId, ExprId, IrArena, StmtRange};

/// IR transformer.
///
/// Override per-kind methods to replace nodes; return the id that should
/// occupy the parent slot (commonly a freshly allocated node, or the
/// original id after mutating it in place).
pub trait Transformer {
    /// Fallback for all expression kinds: transform children, keep the
    /// node.
    fn transform_expr(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        transform_children(self, id, ir);
        id
    }

    /// Fallback for all declaration kinds.
    fn transform_decl(&mut self, id: DeclId, ir: &mut IrArena) -> DeclId {
        transform_decl_children(self, id, ir);
        id
    }

    fn transform_const(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_get_value(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_set_value(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_get_field(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_set_field(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_call(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_constructor_call(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_function_reference(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_property_reference(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_raw_function_reference(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_block(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_returnable_block(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_return(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_while(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_do_while(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_break(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_continue(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_try(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_vararg(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_dynamic_operator(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_dynamic_member(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_suspension_point(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_suspendable_expression(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }

    fn transform_type_operator(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        self.transform_expr(id, ir)
    }
}

/// Dispatch on the node's concrete kind; returns the replacement id for
/// the slot that held `id`.
pub fn transform<T: Transformer + ?Sized>(
    transformer: &mut T,
    id: ExprId,
    ir: &mut IrArena,
) -> ExprId {
    match ir.kind(id) {
        ExprKind::Const(_) => transformer.transform_const(id, ir),
        ExprKind::GetValue { .. } => transformer.transform_get_value(id, ir),
        ExprKind::SetValue { .. } => transformer.transform_set_value(id, ir),
        ExprKind::GetField { .. } => transformer.transform_get_field(id, ir),
        ExprKind::SetField { .. } => transformer.transform_set_field(id, ir),
        ExprKind::Call { .. } => transformer.transform_call(id, ir),
        ExprKind::ConstructorCall { .. } => transformer.transform_constructor_call(id, ir),
        ExprKind::FunctionReference { .. } => transformer.transform_function_reference(id, ir),
        ExprKind::PropertyReference { .. } => transformer.transform_property_reference(id, ir),
        ExprKind::RawFunctionReference { .. } => {
            transformer.transform_raw_function_reference(id, ir)
        }
        ExprKind::Block { .. } => transformer.transform_block(id, ir),
        ExprKind::ReturnableBlock { .. } => transformer.transform_returnable_block(id, ir),
        ExprKind::Return { .. } => transformer.transform_return(id, ir),
        ExprKind::While { .. } => transformer.transform_while(id, ir),
        ExprKind::DoWhile { .. } => transformer.transform_do_while(id, ir),
        ExprKind::Break { .. } => transformer.transform_break(id, ir),
        ExprKind::Continue { .. } => transformer.transform_continue(id, ir),
        ExprKind::Try { .. } => transformer.transform_try(id, ir),
        ExprKind::Vararg { .. } => transformer.transform_vararg(id, ir),
        ExprKind::DynamicOperator { .. } => transformer.transform_dynamic_operator(id, ir),
        ExprKind::DynamicMember { .. } => transformer.transform_dynamic_member(id, ir),
        ExprKind::SuspensionPoint { .. } => transformer.transform_suspension_point(id, ir),
        ExprKind::SuspendableExpression { .. } => {
            transformer.transform_suspendable_expression(id, ir)
        }
        ExprKind::TypeOperator { .. } => transformer.transform_type_operator(id, ir),
    }
}

fn transform_slot<T: Transformer + ?Sized>(
    transformer: &mut T,
    slot: ExprId,
    ir: &mut IrArena,
) -> ExprId {
    if slot.is_valid() {
        transform(transformer, slot, ir)
    } else {
        slot
    }
}

fn transform_args<T: Transformer + ?Sized>(transformer: &mut T, args: ArgRange, ir: &mut IrArena) {
    for i in 0..args.len() {
        let current = ir.value_argument(args, i);
        if current.is_valid() {
            let replacement = transform(transformer, current, ir);
            if replacement != current {
                ir.put_value_argument(args, i, replacement);
            }
        }
    }
}

fn transform_stmts<T: Transformer + ?Sized>(
    transformer: &mut T,
    stmts: StmtRange,
    ir: &mut IrArena,
) {
    for i in 0..stmts.len() {
        let current = ir.stmts(stmts)[i];
        let replacement = match current {
            Stmt::Expr(expr) => Stmt::Expr(transform(transformer, expr, ir)),
            Stmt::Decl(decl) => Stmt::Decl(transformer.transform_decl(decl, ir)),
        };
        ir.set_stmt(stmts, i, replacement);
    }
}

/// Replace each owned child slot of `id` with the transformer's return
/// value for that slot.
pub fn transform_children<T: Transformer + ?Sized>(
    transformer: &mut T,
    id: ExprId,
    ir: &mut IrArena,
) {
    ensure_sufficient_stack(|| match ir.kind(id) {
        ExprKind::Const(_)
        | ExprKind::GetValue { .. }
        | ExprKind::RawFunctionReference { .. }
        | ExprKind::PropertyReference { .. }
        | ExprKind::Break { .. }
        | ExprKind::Continue { .. } => {}

        ExprKind::SetValue { symbol, value } => {
            let value = transform(transformer, value, ir);
            ir.set_kind(id, ExprKind::SetValue { symbol, value });
        }

        ExprKind::GetField {
            field,
            receiver,
            super_qualifier,
        } => {
            let receiver = transform_slot(transformer, receiver, ir);
            ir.set_kind(
                id,
                ExprKind::GetField {
                    field,
                    receiver,
                    super_qualifier,
                },
            );
        }

        ExprKind::SetField {
            field,
            receiver,
            value,
            super_qualifier,
        } => {
            let receiver = transform_slot(transformer, receiver, ir);
            let value = transform(transformer, value, ir);
            ir.set_kind(
                id,
                ExprKind::SetField {
                    field,
                    receiver,
                    value,
                    super_qualifier,
                },
            );
        }

        ExprKind::Call {
            callee,
            type_args,
            args,
            dispatch_receiver,
            extension_receiver,
            super_qualifier,
        } => {
            let dispatch_receiver = transform_slot(transformer, dispatch_receiver, ir);
            let extension_receiver = transform_slot(transformer, extension_receiver, ir);
            transform_args(transformer, args, ir);
            ir.set_kind(
                id,
                ExprKind::Call {
                    callee,
                    type_args,
                    args,
                    dispatch_receiver,
                    extension_receiver,
                    super_qualifier,
                },
            );
        }

        ExprKind::ConstructorCall {
            ctor,
            type_args,
            ctor_type_args,
            args,
            dispatch_receiver,
        } => {
            let dispatch_receiver = transform_slot(transformer, dispatch_receiver, ir);
            transform_args(transformer, args, ir);
            ir.set_kind(
                id,
                ExprKind::ConstructorCall {
                    ctor,
                    type_args,
                    ctor_type_args,
                    args,
                    dispatch_receiver,
                },
            );
        }

        ExprKind::FunctionReference { args, .. } => transform_args(transformer, args, ir),

        ExprKind::Block { statements } | ExprKind::ReturnableBlock { statements, .. } => {
            transform_stmts(transformer, statements, ir);
        }

        ExprKind::Return { target, value } => {
            let value = transform(transformer, value, ir);
            ir.set_kind(id, ExprKind::Return { target, value });
        }

        ExprKind::While {
            condition,
            body,
            label,
        } => {
            let condition = transform(transformer, condition, ir);
            let body = transform_slot(transformer, body, ir);
            ir.set_kind(
                id,
                ExprKind::While {
                    condition,
                    body,
                    label,
                },
            );
        }

        ExprKind::DoWhile {
            condition,
            body,
            label,
        } => {
            let condition = transform(transformer, condition, ir);
            let body = transform_slot(transformer, body, ir);
            ir.set_kind(
                id,
                ExprKind::DoWhile {
                    condition,
                    body,
                    label,
                },
            );
        }

        ExprKind::Try {
            body,
            catches,
            finally,
        } => {
            let body = transform(transformer, body, ir);
            for catch_id in ir.catch_ids(catches) {
                let Catch { parameter, result } = ir.catch(catch_id);
                let parameter = transformer.transform_decl(parameter, ir);
                let result = transform(transformer, result, ir);
                ir.set_catch(catch_id, Catch { parameter, result });
            }
            let finally = transform_slot(transformer, finally, ir);
            ir.set_kind(
                id,
                ExprKind::Try {
                    body,
                    catches,
                    finally,
                },
            );
        }

        ExprKind::Vararg { elements, .. } => {
            for i in 0..elements.len() {
                let current = ir.elements(elements)[i];
                let replacement = match current {
                    VarargElement::Expr(expr) => {
                        VarargElement::Expr(transform(transformer, expr, ir))
                    }
                    VarargElement::Spread(expr) => {
                        VarargElement::Spread(transform(transformer, expr, ir))
                    }
                };
                ir.set_element(elements, i, replacement);
            }
        }

        ExprKind::DynamicOperator {
            operator,
            receiver,
            arguments,
        } => {
            let receiver = transform(transformer, receiver, ir);
            transform_args(transformer, arguments, ir);
            ir.set_kind(
                id,
                ExprKind::DynamicOperator {
                    operator,
                    receiver,
                    arguments,
                },
            );
        }

        ExprKind::DynamicMember { member, receiver } => {
            let receiver = transform(transformer, receiver, ir);
            ir.set_kind(id, ExprKind::DynamicMember { member, receiver });
        }

        ExprKind::SuspensionPoint {
            id_parameter,
            result,
            resume_result,
        } => {
            // Id parameter first: its scope must be established before
            // either result branch.
            let id_parameter = transformer.transform_decl(id_parameter, ir);
            let result = transform(transformer, result, ir);
            let resume_result = transform(transformer, resume_result, ir);
            ir.set_kind(
                id,
                ExprKind::SuspensionPoint {
                    id_parameter,
                    result,
                    resume_result,
                },
            );
        }

        ExprKind::SuspendableExpression {
            suspension_point_id,
            result,
        } => {
            let suspension_point_id = transform(transformer, suspension_point_id, ir);
            let result = transform(transformer, result, ir);
            ir.set_kind(
                id,
                ExprKind::SuspendableExpression {
                    suspension_point_id,
                    result,
                },
            );
        }

        ExprKind::TypeOperator {
            op,
            operand,
            operand_type,
        } => {
            let operand = transform(transformer, operand, ir);
            ir.set_kind(
                id,
                ExprKind::TypeOperator {
                    op,
                    operand,
                    operand_type,
                },
            );
        }
    });
}

/// Replace each owned child slot of a declaration.
pub fn transform_decl_children<T: Transformer + ?Sized>(
    transformer: &mut T,
    id: DeclId,
    ir: &mut IrArena,
) {
    match ir.decl(id).kind {
        DeclKind::Function {
            name,
            symbol,
            parent,
            body,
        } => {
            let body = transform_slot(transformer, body, ir);
            ir.decl_mut(id).kind = DeclKind::Function {
                name,
                symbol,
                parent,
                body,
            };
        }
        DeclKind::Field {
            name,
            symbol,
            ty,
            initializer,
        } => {
            let initializer = transform_slot(transformer, initializer, ir);
            ir.decl_mut(id).kind = DeclKind::Field {
                name,
                symbol,
                ty,
                initializer,
            };
        }
        DeclKind::Variable {
            name,
            symbol,
            ty,
            initializer,
        } => {
            let initializer = transform_slot(transformer, initializer, ir);
            ir.decl_mut(id).kind = DeclKind::Variable {
                name,
                symbol,
                ty,
                initializer,
            };
        }
        DeclKind::Class { .. } | DeclKind::Property { .. } => {}
    }
}
