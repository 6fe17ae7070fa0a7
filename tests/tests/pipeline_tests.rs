// Whole-pipeline tests: realistic programs from source text to final state.

use cinder_ast::value::Value;
use cinder_eval::state::Slot;
use cinder_type::types::Type;
use pretty_assertions::assert_eq;
use tests::interpret;

fn defined(v: Value) -> Option<Slot> {
    Some(Slot::Defined(v))
}

#[test]
fn gcd_by_iteration() {
    let state = interpret(
        "int result;\n\
         int gcd(int a, int b) {\n\
             int t;\n\
             while (b != 0) {\n\
                 t = b;\n\
                 b = a % b;\n\
                 a = t;\n\
             }\n\
             return a;\n\
         }\n\
         int main() { result = gcd(54, 24); }",
    );
    assert_eq!(state.global("result").cloned(), defined(Value::Int(6)));
}

#[test]
fn factorial_by_recursion() {
    let state = interpret(
        "int result;\n\
         int fact(int n) {\n\
             if (n < 2) return 1;\n\
             return n * fact(n - 1);\n\
         }\n\
         int main() { result = fact(6); }",
    );
    assert_eq!(state.global("result").cloned(), defined(Value::Int(720)));
}

#[test]
fn mutual_recursion_resolves_by_name() {
    let state = interpret(
        "bool answer;\n\
         bool is_even(int n) { if (n == 0) return true; return is_odd(n - 1); }\n\
         bool is_odd(int n) { if (n == 0) return false; return is_even(n - 1); }\n\
         int main() { answer = is_even(10); }",
    );
    assert_eq!(state.global("answer").cloned(), defined(Value::Bool(true)));
}

#[test]
fn void_function_mutates_globals_through_a_statement_call() {
    let state = interpret(
        "int h, i;\n\
         void swap() { int t; t = h; h = i; i = t; }\n\
         int main() { h = 1; i = 2; swap(); }",
    );
    assert_eq!(state.global("h").cloned(), defined(Value::Int(2)));
    assert_eq!(state.global("i").cloned(), defined(Value::Int(1)));
}

#[test]
fn single_body_program_is_the_main_only_case() {
    let state = interpret("int x; float y; int main() { x = 3; y = float(x) / 2.0; }");
    assert_eq!(state.global("x").cloned(), defined(Value::Int(3)));
    assert_eq!(state.global("y").cloned(), defined(Value::Float(1.5)));
}

#[test]
fn a_program_without_functions_yields_initialized_globals() {
    let state = interpret("int x; bool flag;");
    assert_eq!(state.global("x").cloned(), Some(Slot::Undefined(Type::Int)));
    assert_eq!(
        state.global("flag").cloned(),
        Some(Slot::Undefined(Type::Bool))
    );
}

#[test]
fn mixed_numeric_program_with_widening() {
    let state = interpret(
        "float total; int k;\n\
         int main() {\n\
             total = 0;\n\
             k = 1;\n\
             while (k <= 4) {\n\
                 total = total + float(k);\n\
                 k = k + 1;\n\
             }\n\
         }",
    );
    assert_eq!(state.global("total").cloned(), defined(Value::Float(10.0)));
    assert_eq!(state.global("k").cloned(), defined(Value::Int(5)));
}

#[test]
fn final_state_display_is_sorted() {
    let state = interpret("int b, a; int main() { b = 2; }");
    assert_eq!(state.to_string(), "a = undef\nb = 2\n");
}

#[test]
fn character_processing_round_trip() {
    let state = interpret(
        "char c; int code;\n\
         int main() {\n\
             c = 'a';\n\
             code = c;\n\
             code = code + 1;\n\
             c = char(code);\n\
         }",
    );
    assert_eq!(state.global("c").cloned(), defined(Value::Char('b')));
    assert_eq!(state.global("code").cloned(), defined(Value::Int(98)));
}
