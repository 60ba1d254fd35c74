use pretty_assertions::assert_eq;

use crate::node::{Catch, ConstValue, DynOperator, ExprKind, Stmt, VarargElement};
use crate::visit::{accept, walk_expr};
use crate::{
    transform, CatchId, Decl, DeclId, DeclKind, ExprId, IrArena, Name, Span, SymbolKind,
    SymbolOwner, SymbolTable, Transformer, TypeStore, Visitor,
};

/// What a traversal saw, in order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Event {
    Expr(ExprId),
    Decl(DeclId),
    Catch(CatchId),
    Spread(ExprId),
}

#[derive(Default)]
struct OrderVisitor {
    events: Vec<Event>,
}

impl Visitor for OrderVisitor {
    fn visit_expr(&mut self, id: ExprId, ir: &IrArena) {
        self.events.push(Event::Expr(id));
        walk_expr(self, id, ir);
    }

    fn visit_decl(&mut self, id: DeclId, ir: &IrArena) {
        self.events.push(Event::Decl(id));
        crate::walk_decl(self, id, ir);
    }

    fn visit_catch(&mut self, id: CatchId, ir: &IrArena) {
        self.events.push(Event::Catch(id));
        crate::walk_catch(self, id, ir);
    }

    fn visit_spread_element(&mut self, expr: ExprId, ir: &IrArena) {
        self.events.push(Event::Spread(expr));
        accept(self, expr, ir);
    }
}

fn int_const(ir: &mut IrArena, value: i32) -> ExprId {
    ir.alloc_expr(
        ExprKind::Const(ConstValue::I32(value)),
        Span::UNDEFINED,
        TypeStore::I32,
    )
}

fn variable_decl(ir: &mut IrArena, symbols: &mut SymbolTable) -> DeclId {
    let symbol = symbols.alloc(SymbolKind::Variable, Name::EMPTY);
    ir.alloc_decl(
        symbols,
        Decl::new(
            DeclKind::Variable {
                name: Name::EMPTY,
                symbol,
                ty: TypeStore::I32,
                initializer: ExprId::INVALID,
            },
            Span::UNDEFINED,
        ),
    )
}

#[test]
fn try_children_in_declared_order() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();

    let body = int_const(&mut ir, 1);
    let param_a = variable_decl(&mut ir, &mut symbols);
    let result_a = int_const(&mut ir, 2);
    let param_b = variable_decl(&mut ir, &mut symbols);
    let result_b = int_const(&mut ir, 3);
    let finally = int_const(&mut ir, 4);

    let catches = ir.alloc_catches([
        Catch {
            parameter: param_a,
            result: result_a,
        },
        Catch {
            parameter: param_b,
            result: result_b,
        },
    ]);
    let try_expr = ir.alloc_expr(
        ExprKind::Try {
            body,
            catches,
            finally,
        },
        Span::UNDEFINED,
        TypeStore::I32,
    );

    let mut visitor = OrderVisitor::default();
    accept(&mut visitor, try_expr, &ir);

    assert_eq!(
        visitor.events,
        vec![
            Event::Expr(try_expr),
            Event::Expr(body),
            Event::Catch(CatchId::new(0)),
            Event::Decl(param_a),
            Event::Expr(result_a),
            Event::Catch(CatchId::new(1)),
            Event::Decl(param_b),
            Event::Expr(result_b),
            Event::Expr(finally),
        ]
    );
}

#[test]
fn vararg_visits_elements_in_order_and_replaces_in_place() {
    let mut ir = IrArena::new();

    let e1 = int_const(&mut ir, 1);
    let e2 = int_const(&mut ir, 2);
    let e3 = int_const(&mut ir, 3);
    let elements = ir.alloc_elements([
        VarargElement::Expr(e1),
        VarargElement::Spread(e2),
        VarargElement::Expr(e3),
    ]);
    let vararg = ir.alloc_expr(
        ExprKind::Vararg {
            element_type: TypeStore::I32,
            elements,
        },
        Span::UNDEFINED,
        TypeStore::I32,
    );

    let mut visitor = OrderVisitor::default();
    accept(&mut visitor, vararg, &ir);
    assert_eq!(
        visitor.events,
        vec![
            Event::Expr(vararg),
            Event::Expr(e1),
            Event::Spread(e2),
            Event::Expr(e2),
            Event::Expr(e3),
        ]
    );

    // Replacement changes the occupant, never the cardinality.
    let e4 = int_const(&mut ir, 4);
    ir.put_element(vararg, 1, VarargElement::Expr(e4));
    let ExprKind::Vararg { elements, .. } = ir.kind(vararg) else {
        panic!("vararg kind changed");
    };
    assert_eq!(
        ir.elements(elements),
        &[
            VarargElement::Expr(e1),
            VarargElement::Expr(e4),
            VarargElement::Expr(e3),
        ]
    );
}

#[test]
#[should_panic(expected = "no such vararg element slot: 3")]
fn vararg_put_element_out_of_bounds_panics() {
    let mut ir = IrArena::new();
    let e1 = int_const(&mut ir, 1);
    let elements = ir.alloc_elements([VarargElement::Expr(e1)]);
    let vararg = ir.alloc_expr(
        ExprKind::Vararg {
            element_type: TypeStore::I32,
            elements,
        },
        Span::UNDEFINED,
        TypeStore::I32,
    );

    let e2 = int_const(&mut ir, 2);
    ir.put_element(vararg, 3, VarargElement::Expr(e2));
}

fn constructor_call(ir: &mut IrArena, symbols: &mut SymbolTable, total: u16, ctor: u16) -> ExprId {
    let ctor_symbol = symbols.alloc(SymbolKind::Constructor, Name::EMPTY);
    let type_args = ir.alloc_type_args(total);
    let args = ir.alloc_args(0);
    ir.alloc_expr(
        ExprKind::ConstructorCall {
            ctor: ctor_symbol,
            type_args,
            ctor_type_args: ctor,
            args,
            dispatch_receiver: ExprId::INVALID,
        },
        Span::UNDEFINED,
        TypeStore::UNIT,
    )
}

#[test]
fn constructor_call_partitions_type_arguments() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();
    let mut types = TypeStore::new();
    let interner = crate::StringInterner::new();

    let t0 = types.alloc_class(interner.intern("A"));
    let t1 = types.alloc_class(interner.intern("B"));
    let t2 = types.alloc_class(interner.intern("C"));

    // 3 total slots, 1 constructor-only: classifier view is [0, 1],
    // constructor view is [2].
    let call = constructor_call(&mut ir, &mut symbols, 3, 1);
    assert_eq!(ir.classifier_type_args_count(call), 2);
    assert_eq!(ir.constructor_type_args_count(call), 1);

    ir.put_classifier_type_argument(call, 0, Some(t0));
    ir.put_classifier_type_argument(call, 1, Some(t1));
    ir.put_constructor_type_argument(call, 0, Some(t2));

    assert_eq!(ir.classifier_type_argument(call, 0), Some(t0));
    assert_eq!(ir.classifier_type_argument(call, 1), Some(t1));
    assert_eq!(ir.constructor_type_argument(call, 0), Some(t2));

    // The views partition the flat array: together they cover every slot
    // exactly once.
    let ExprKind::ConstructorCall { type_args, .. } = ir.kind(call) else {
        panic!("not a constructor call");
    };
    assert_eq!(ir.type_argument(type_args, 0), Some(t0));
    assert_eq!(ir.type_argument(type_args, 1), Some(t1));
    assert_eq!(ir.type_argument(type_args, 2), Some(t2));
}

#[test]
#[should_panic(expected = "no such classifier type argument slot: 2")]
fn classifier_view_bounds_checked() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();
    let call = constructor_call(&mut ir, &mut symbols, 3, 1);
    let _ = ir.classifier_type_argument(call, 2);
}

#[test]
#[should_panic(expected = "no such constructor type argument slot: 1")]
fn constructor_view_bounds_checked() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();
    let call = constructor_call(&mut ir, &mut symbols, 3, 1);
    let _ = ir.constructor_type_argument(call, 1);
}

#[test]
#[should_panic(expected = "no such value argument slot: 2")]
fn value_argument_slots_bounds_checked() {
    let mut ir = IrArena::new();
    let args = ir.alloc_args(2);
    let e = int_const(&mut ir, 1);
    ir.put_value_argument(args, 0, e);
    let _ = ir.value_argument(args, 2);
}

#[test]
fn call_children_receivers_then_arguments() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();

    let dispatch = int_const(&mut ir, 1);
    let extension = int_const(&mut ir, 2);
    let a0 = int_const(&mut ir, 3);
    let a1 = int_const(&mut ir, 4);

    let callee = symbols.alloc(SymbolKind::Function, Name::EMPTY);
    let type_args = ir.alloc_type_args(0);
    let args = ir.alloc_args_from([a0, a1]);
    let call = ir.alloc_expr(
        ExprKind::Call {
            callee,
            type_args,
            args,
            dispatch_receiver: dispatch,
            extension_receiver: extension,
            super_qualifier: None,
        },
        Span::UNDEFINED,
        TypeStore::UNIT,
    );

    let mut visitor = OrderVisitor::default();
    accept(&mut visitor, call, &ir);
    assert_eq!(
        visitor.events,
        vec![
            Event::Expr(call),
            Event::Expr(dispatch),
            Event::Expr(extension),
            Event::Expr(a0),
            Event::Expr(a1),
        ]
    );
}

#[test]
fn suspension_point_visits_id_parameter_first() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();

    let id_parameter = variable_decl(&mut ir, &mut symbols);
    let result = int_const(&mut ir, 1);
    let resume_result = int_const(&mut ir, 2);
    let point = ir.alloc_expr(
        ExprKind::SuspensionPoint {
            id_parameter,
            result,
            resume_result,
        },
        Span::UNDEFINED,
        TypeStore::I32,
    );

    let mut visitor = OrderVisitor::default();
    accept(&mut visitor, point, &ir);
    assert_eq!(
        visitor.events,
        vec![
            Event::Expr(point),
            Event::Decl(id_parameter),
            Event::Expr(result),
            Event::Expr(resume_result),
        ]
    );
}

#[test]
fn dynamic_operator_visits_receiver_then_arguments() {
    let mut ir = IrArena::new();

    let receiver = int_const(&mut ir, 1);
    let a0 = int_const(&mut ir, 2);
    let a1 = int_const(&mut ir, 3);
    let arguments = ir.alloc_args_from([a0, a1]);
    let op = ir.alloc_expr(
        ExprKind::DynamicOperator {
            operator: DynOperator::IndexAccess,
            receiver,
            arguments,
        },
        Span::UNDEFINED,
        TypeStore::I32,
    );

    let mut visitor = OrderVisitor::default();
    accept(&mut visitor, op, &ir);
    assert_eq!(
        visitor.events,
        vec![
            Event::Expr(op),
            Event::Expr(receiver),
            Event::Expr(a0),
            Event::Expr(a1),
        ]
    );

    assert_eq!(DynOperator::IndexAccess.image(), "[]");
    assert!(DynOperator::PlusAssign.is_assignment());
    assert!(!DynOperator::Plus.is_assignment());
}

#[test]
fn break_does_not_own_its_loop() {
    let mut ir = IrArena::new();

    let condition = ir.alloc_expr(
        ExprKind::Const(ConstValue::Bool(true)),
        Span::UNDEFINED,
        TypeStore::BOOL,
    );
    // Loop allocated first; the break inside refers back to it.
    let loop_expr = ir.alloc_expr(
        ExprKind::While {
            condition,
            body: ExprId::INVALID,
            label: None,
        },
        Span::UNDEFINED,
        TypeStore::UNIT,
    );
    let break_expr = ir.alloc_expr(
        ExprKind::Break {
            loop_target: loop_expr,
            label: None,
        },
        Span::UNDEFINED,
        TypeStore::UNIT,
    );
    let statements = ir.alloc_stmts([Stmt::Expr(break_expr)]);
    let body = ir.alloc_expr(ExprKind::Block { statements }, Span::UNDEFINED, TypeStore::UNIT);
    let ExprKind::While { condition, label, .. } = ir.kind(loop_expr) else {
        panic!("not a loop");
    };
    ir.set_kind(
        loop_expr,
        ExprKind::While {
            condition,
            body,
            label,
        },
    );

    // The back-reference is not a child: traversal from the loop reaches
    // the break but never re-enters the loop through it.
    let mut visitor = OrderVisitor::default();
    accept(&mut visitor, loop_expr, &ir);
    assert_eq!(
        visitor.events,
        vec![
            Event::Expr(loop_expr),
            Event::Expr(condition),
            Event::Expr(body),
            Event::Expr(break_expr),
        ]
    );

    // And ownership validation stays clean.
    let report = crate::validate(&ir, &[loop_expr]);
    assert!(report.is_empty(), "{report}");
}

#[test]
fn returnable_block_binds_symbol_on_allocation() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();

    let symbol = symbols.alloc(SymbolKind::ReturnableBlock, Name::EMPTY);
    assert!(!symbols.is_bound(symbol));

    let statements = ir.alloc_stmts(std::iter::empty());
    let block = ir.alloc_returnable_block(
        &mut symbols,
        symbol,
        Span::UNDEFINED,
        TypeStore::UNIT,
        statements,
        None,
    );

    assert_eq!(symbols.owner(symbol), SymbolOwner::Block(block));
}

/// Doubles every i32 constant by allocating a replacement node; parents
/// must pick up the returned id.
struct DoubleConstants;

impl Transformer for DoubleConstants {
    fn transform_const(&mut self, id: ExprId, ir: &mut IrArena) -> ExprId {
        if let ExprKind::Const(ConstValue::I32(value)) = ir.kind(id) {
            let span = ir.span(id);
            ir.alloc_expr(ExprKind::Const(ConstValue::I32(value * 2)), span, TypeStore::I32)
        } else {
            id
        }
    }
}

#[test]
fn transform_children_replaces_slot_occupants() {
    let mut ir = IrArena::new();
    let mut symbols = SymbolTable::new();

    let value = int_const(&mut ir, 21);
    let symbol = symbols.alloc(SymbolKind::Variable, Name::EMPTY);
    let set = ir.alloc_expr(
        ExprKind::SetValue { symbol, value },
        Span::UNDEFINED,
        TypeStore::UNIT,
    );

    let a0 = int_const(&mut ir, 1);
    let args = ir.alloc_args_from([a0]);
    let callee = symbols.alloc(SymbolKind::Function, Name::EMPTY);
    let type_args = ir.alloc_type_args(0);
    let call = ir.alloc_expr(
        ExprKind::Call {
            callee,
            type_args,
            args,
            dispatch_receiver: ExprId::INVALID,
            extension_receiver: ExprId::INVALID,
            super_qualifier: None,
        },
        Span::UNDEFINED,
        TypeStore::UNIT,
    );

    let statements = ir.alloc_stmts([Stmt::Expr(set), Stmt::Expr(call)]);
    let block = ir.alloc_expr(ExprKind::Block { statements }, Span::UNDEFINED, TypeStore::UNIT);

    let root = transform(&mut DoubleConstants, block, &mut ir);
    assert_eq!(root, block, "default transform keeps non-constant nodes");

    let ExprKind::SetValue { value: new_value, .. } = ir.kind(set) else {
        panic!("kind changed");
    };
    assert_ne!(new_value, value, "slot occupant must be the new node");
    assert_eq!(ir.kind(new_value), ExprKind::Const(ConstValue::I32(42)));

    let new_a0 = ir.value_argument(args, 0);
    assert_ne!(new_a0, a0);
    assert_eq!(ir.kind(new_a0), ExprKind::Const(ConstValue::I32(2)));

    // Cardinality is untouched.
    assert_eq!(args.len(), 1);
    let report = crate::validate(&ir, &[root]);
    assert!(report.is_empty(), "{report}");
}

#[test]
fn validation_reports_all_duplicates_at_once() {
    let mut ir = IrArena::new();

    let shared_a = int_const(&mut ir, 1);
    let shared_b = int_const(&mut ir, 2);
    // Two statement slots own `shared_a`, and two blocks own `shared_b`.
    let statements = ir.alloc_stmts([
        Stmt::Expr(shared_a),
        Stmt::Expr(shared_a),
        Stmt::Expr(shared_b),
    ]);
    let block = ir.alloc_expr(ExprKind::Block { statements }, Span::UNDEFINED, TypeStore::UNIT);
    let inner_statements = ir.alloc_stmts([Stmt::Expr(shared_b)]);
    let inner = ir.alloc_expr(
        ExprKind::Block {
            statements: inner_statements,
        },
        Span::UNDEFINED,
        TypeStore::UNIT,
    );
    let outer_statements = ir.alloc_stmts([Stmt::Expr(block), Stmt::Expr(inner)]);
    let outer = ir.alloc_expr(
        ExprKind::Block {
            statements: outer_statements,
        },
        Span::UNDEFINED,
        TypeStore::UNIT,
    );

    let report = crate::validate(&ir, &[outer]);
    assert_eq!(report.duplicates.len(), 2, "both defects in one report");
    assert_eq!(report.duplicates[0].node, crate::NodeRef::Expr(shared_a));
    assert_eq!(report.duplicates[0].owners.len(), 2);
    assert_eq!(report.duplicates[1].node, crate::NodeRef::Expr(shared_b));

    let rendered = report.to_string();
    assert!(rendered.contains("owned by more than one parent slot"));
}

#[test]
fn const_float_payloads_are_bit_exact() {
    let pos = ConstValue::f32(0.0);
    let neg = ConstValue::f32(-0.0);
    assert_ne!(pos, neg, "+0.0 and -0.0 are distinct constants");
    assert_eq!(pos.as_f32(), Some(0.0));
    assert_eq!(ConstValue::f64(2.5).as_f64(), Some(2.5));
}
