// Shared helpers for the Cinder integration tests: drive the whole
// pipeline from source text through the public entry points.

use cinder_ast::ast::{RawProgram, TypedProgram};
use cinder_eval::state::State;
use cinder_eval::EvalError;
use cinder_typeck::TypeError;

pub fn parse(source: &str) -> RawProgram {
    cinder_parser::parser::parse_program(source).expect("program should parse")
}

/// Parse and type-check, returning the checker verdict.
pub fn check(source: &str) -> Result<(), TypeError> {
    cinder_typeck::check(&parse(source))
}

/// Parse, check and transform a program that is expected to be valid.
pub fn compile(source: &str) -> TypedProgram {
    let program = parse(source);
    cinder_typeck::check(&program).expect("program should type-check");
    cinder_typeck::transform(&program).expect("checked program should transform")
}

/// Run the full pipeline, returning the final state.
pub fn interpret(source: &str) -> State {
    cinder_eval::run(&compile(source)).expect("program should run")
}

/// Run the full pipeline on a program expected to fail at runtime.
pub fn interpret_err(source: &str) -> EvalError {
    cinder_eval::run(&compile(source)).expect_err("program should fail at runtime")
}
