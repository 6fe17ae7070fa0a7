// Evaluator semantics over full source programs.

use cinder_ast::value::Value;
use cinder_eval::state::Slot;
use cinder_eval::EvalError;
use cinder_type::types::Type;
use pretty_assertions::assert_eq;
use tests::{interpret, interpret_err};

fn defined(v: Value) -> Option<Slot> {
    Some(Slot::Defined(v))
}

#[test]
fn integer_arithmetic() {
    let state = interpret("int x, y; int main() { x = 2 + 3; y = 7 / 2; }");
    assert_eq!(state.global("x").cloned(), defined(Value::Int(5)));
    assert_eq!(state.global("y").cloned(), defined(Value::Int(3)));
}

#[test]
fn integer_division_by_zero_faults() {
    assert_eq!(
        interpret_err("int x; int main() { x = 1 / 0; }"),
        EvalError::ArithmeticFault
    );
}

#[test]
fn modulo_by_zero_faults() {
    assert_eq!(
        interpret_err("int x; int main() { x = 5 % 0; }"),
        EvalError::ArithmeticFault
    );
}

#[test]
fn float_division_by_zero_is_not_a_fault() {
    let state = interpret("float f; int main() { f = 1.0 / 0.0; }");
    assert_eq!(state.global("f").cloned(), defined(Value::Float(f32::INFINITY)));
}

#[test]
fn while_loop_counts_to_three() {
    let state = interpret("int x; int main() { x = 0; while (x < 3) { x = x + 1; } }");
    assert_eq!(state.global("x").cloned(), defined(Value::Int(3)));
}

#[test]
fn conditional_picks_the_matching_branch() {
    let state = interpret(
        "int x, y; int main() { x = 5; if (x > 3) y = 1; else y = 2; if (x > 9) x = 0; }",
    );
    assert_eq!(state.global("y").cloned(), defined(Value::Int(1)));
    assert_eq!(state.global("x").cloned(), defined(Value::Int(5)));
}

#[test]
fn reading_an_undefined_variable_is_a_fault() {
    assert_eq!(
        interpret_err("int x, y; int main() { y = x + 1; }"),
        EvalError::UndefinedReference { name: "x".into() }
    );
}

#[test]
fn uninitialized_globals_stay_undefined() {
    let state = interpret("int x; float f; int main() { x = 1; }");
    assert_eq!(state.global("x").cloned(), defined(Value::Int(1)));
    assert_eq!(state.global("f").cloned(), Some(Slot::Undefined(Type::Float)));
}

#[test]
fn both_operands_of_and_are_evaluated() {
    // mark() bumps a global, so short-circuiting would leave hits at 0
    let state = interpret(
        "int hits; bool b;\n\
         int mark() { hits = hits + 1; return 1; }\n\
         int main() { hits = 0; b = false && mark() == 1; }",
    );
    assert_eq!(state.global("hits").cloned(), defined(Value::Int(1)));
    assert_eq!(state.global("b").cloned(), defined(Value::Bool(false)));
}

#[test]
fn both_operands_of_or_are_evaluated() {
    let state = interpret(
        "int hits; bool b;\n\
         int mark() { hits = hits + 1; return 1; }\n\
         int main() { hits = 0; b = true || mark() == 1; }",
    );
    assert_eq!(state.global("hits").cloned(), defined(Value::Int(1)));
    assert_eq!(state.global("b").cloned(), defined(Value::Bool(true)));
}

#[test]
fn char_comparisons_use_the_character_order() {
    let state = interpret("bool b, c; int main() { b = 'a' < 'b'; c = 'z' <= 'a'; }");
    assert_eq!(state.global("b").cloned(), defined(Value::Bool(true)));
    assert_eq!(state.global("c").cloned(), defined(Value::Bool(false)));
}

#[test]
fn casts_at_runtime() {
    let state = interpret(
        "int i, o; char c; float f;\n\
         int main() { i = int(3.9); c = char(66); o = int('A'); f = float(4); }",
    );
    assert_eq!(state.global("i").cloned(), defined(Value::Int(3)));
    assert_eq!(state.global("c").cloned(), defined(Value::Char('B')));
    assert_eq!(state.global("o").cloned(), defined(Value::Int(65)));
    assert_eq!(state.global("f").cloned(), defined(Value::Float(4.0)));
}

#[test]
fn square_call_yields_sixteen_without_touching_the_callers_n() {
    let state = interpret(
        "int n, y;\n\
         int square(int n) { return n * n; }\n\
         int main() { n = 7; y = square(4); }",
    );
    assert_eq!(state.global("y").cloned(), defined(Value::Int(16)));
    // pass-by-value isolation: the global n is not the parameter n
    assert_eq!(state.global("n").cloned(), defined(Value::Int(7)));
}

#[test]
fn parameter_assignment_does_not_leak_to_the_caller() {
    let state = interpret(
        "int a, r;\n\
         int bump(int a) { a = a + 1; return a; }\n\
         int main() { a = 10; r = bump(a); }",
    );
    assert_eq!(state.global("a").cloned(), defined(Value::Int(10)));
    assert_eq!(state.global("r").cloned(), defined(Value::Int(11)));
}

#[test]
fn falling_off_a_non_void_function_in_expression_position_faults() {
    // the lexical return check passes, but the branch never runs
    assert_eq!(
        interpret_err("int f() { if (false) return 1; } int main() { int x; x = f(); }"),
        EvalError::MissingReturnValue {
            function: "f".into()
        }
    );
}

#[test]
fn return_exits_a_loop_body_immediately() {
    let state = interpret(
        "int r;\n\
         int first_multiple(int step) {\n\
             int k;\n\
             k = step;\n\
             while (true) {\n\
                 if (k % 7 == 0) return k;\n\
                 k = k + step;\n\
             }\n\
         }\n\
         int main() { r = first_multiple(3); }",
    );
    assert_eq!(state.global("r").cloned(), defined(Value::Int(21)));
}

#[test]
fn negation_and_not() {
    let state = interpret("int x; bool b; int main() { x = -(2 + 3); b = !(1 < 2); }");
    assert_eq!(state.global("x").cloned(), defined(Value::Int(-5)));
    assert_eq!(state.global("b").cloned(), defined(Value::Bool(false)));
}
