// Shape tests for the transformer output: operators come out
// type-specific and widening assignments gain explicit coercion nodes.

use cinder_ast::ast::{Expression, Statement, TypedExpression, TypedStatement};
use cinder_ast::ops::TypedOp;
use cinder_ast::value::Value;
use cinder_eval::state::Slot;
use pretty_assertions::assert_eq;
use tests::{compile, interpret};

/// The source expression of the first assignment in `main`.
fn first_assignment_source(source: &str) -> TypedExpression {
    let program = compile(source);
    let main = program.function("main").expect("main exists");
    for s in &main.body.statements {
        if let Statement::Assignment(a) = s {
            return a.source.clone();
        }
    }
    panic!("no assignment in main");
}

fn first_statement(source: &str) -> TypedStatement {
    let program = compile(source);
    program.function("main").expect("main exists").body.statements[0].clone()
}

#[test]
fn int_addition_specializes() {
    let source = first_assignment_source("int x; int main() { x = 1 + 2; }");
    match source {
        Expression::Binary(b) => assert_eq!(b.op, TypedOp::IntAdd),
        other => panic!("expected binary node, got {other:?}"),
    }
}

#[test]
fn float_comparison_specializes() {
    let source = first_assignment_source("bool b; int main() { b = 1.5 < 2.0; }");
    match source {
        Expression::Binary(b) => assert_eq!(b.op, TypedOp::FloatLt),
        other => panic!("expected binary node, got {other:?}"),
    }
}

#[test]
fn boolean_connectives_specialize() {
    let source = first_assignment_source("bool b; int main() { b = true && !false; }");
    let b = match source {
        Expression::Binary(b) => b,
        other => panic!("expected binary node, got {other:?}"),
    };
    assert_eq!(b.op, TypedOp::BoolAnd);
    match &b.right {
        Expression::Unary(u) => assert_eq!(u.op, TypedOp::BoolNot),
        other => panic!("expected unary node, got {other:?}"),
    }
}

#[test]
fn widening_int_to_float_is_materialized() {
    let stmt = first_statement("float f; int main() { f = 3; }");
    assert_eq!(
        stmt,
        Statement::Assignment(Box::new(cinder_ast::ast::AssignmentNode {
            target: "f".into(),
            source: Expression::Unary(Box::new(cinder_ast::ast::UnaryNode {
                op: TypedOp::IntToFloat,
                term: Expression::Literal(Value::Int(3)),
            })),
        }))
    );
}

#[test]
fn widening_char_to_int_is_materialized() {
    let source = first_assignment_source("int i; int main() { i = 'a'; }");
    match source {
        Expression::Unary(u) => {
            assert_eq!(u.op, TypedOp::CharToInt);
            assert_eq!(u.term, Expression::Literal(Value::Char('a')));
        }
        other => panic!("expected coercion node, got {other:?}"),
    }
}

#[test]
fn exact_assignment_gets_no_coercion() {
    let source = first_assignment_source("int i; int main() { i = 3; }");
    assert_eq!(source, Expression::Literal(Value::Int(3)));
}

#[test]
fn source_casts_specialize_to_coercions() {
    let source = first_assignment_source("int i; float f; int main() { i = int(2.5); }");
    match source {
        Expression::Unary(u) => assert_eq!(u.op, TypedOp::FloatToInt),
        other => panic!("expected unary node, got {other:?}"),
    }
}

#[test]
fn coerced_assignment_evaluates_to_an_equal_float() {
    let state = interpret("float f; int main() { f = 7; }");
    assert_eq!(state.global("f"), Some(&Slot::Defined(Value::Float(7.0))));
}

#[test]
fn negation_specializes_per_operand_type() {
    let int_neg = first_assignment_source("int i; int main() { i = -3; }");
    match int_neg {
        Expression::Unary(u) => assert_eq!(u.op, TypedOp::IntNeg),
        other => panic!("expected unary node, got {other:?}"),
    }
    let float_neg = first_assignment_source("float f; int main() { f = -3.5; }");
    match float_neg {
        Expression::Unary(u) => assert_eq!(u.op, TypedOp::FloatNeg),
        other => panic!("expected unary node, got {other:?}"),
    }
}

#[test]
fn call_arguments_are_transformed_in_place() {
    let source =
        first_assignment_source("int y; int sq(int n) { return n * n; } int main() { y = sq(1 + 2); }");
    let call = match source {
        Expression::Call(c) => c,
        other => panic!("expected call node, got {other:?}"),
    };
    match &call.args[0] {
        Expression::Binary(b) => assert_eq!(b.op, TypedOp::IntAdd),
        other => panic!("expected binary argument, got {other:?}"),
    }
}
