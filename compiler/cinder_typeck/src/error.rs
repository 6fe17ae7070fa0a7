// Semantic error taxonomy. Every checker failure is fatal: the first
// violation is reported and nothing downstream runs.

use cinder_ast::ops::Op;
use cinder_env::env::EnvError;
use cinder_type::types::Type;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("duplicate declaration: {name}")]
    DuplicateDeclaration { name: String },

    #[error("undeclared variable: {name}")]
    UndeclaredVariable { name: String },

    #[error("undeclared function: {name}")]
    UndeclaredFunction { name: String },

    #[error("type mismatch in {place}: expected {expected}, found {found}")]
    TypeMismatch {
        place: String,
        expected: Type,
        found: Type,
    },

    #[error("non-bool test in {construct}: found {found}")]
    NonBooleanTest {
        construct: &'static str,
        found: Type,
    },

    #[error("operator {op} cannot combine {left} and {right}")]
    InvalidOperandTypes { op: Op, left: Type, right: Type },

    #[error("operator {op} cannot apply to {operand}")]
    InvalidUnaryOperand { op: Op, operand: Type },

    #[error("call to {function}: expected {expected} arguments, found {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of call to {function}: expected {expected}, found {found}")]
    ArgumentTypeMismatch {
        function: String,
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("{function} is a non-void function with no return statement")]
    MissingReturn { function: String },

    #[error("return statement in void function {function}")]
    ReturnInVoidFunction { function: String },

    #[error("call to void function {function} in expression position")]
    VoidCallInExpression { function: String },

    #[error("statement call to non-void function {function}")]
    NonVoidCallStatement { function: String },
}

impl From<EnvError> for TypeError {
    fn from(err: EnvError) -> Self {
        match err {
            EnvError::DuplicateDeclaration { name } => TypeError::DuplicateDeclaration { name },
        }
    }
}
