// Literal values of the Cinder language.

use std::fmt;

use cinder_type::types::Type;

/// A defined value of one of the four value types. Undefinedness is not a
/// state of `Value`; the evaluator's environment models uninitialized
/// variables separately, so a `Value` in an expression is always usable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i32),
    Bool(bool),
    Char(char),
    Float(f32),
}

impl Value {
    /// The type of the value, recoverable without a symbol table.
    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Bool(_) => Type::Bool,
            Value::Char(_) => Type::Char,
            Value::Float(_) => Type::Float,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'{v}'"),
            Value::Float(v) => write!(f, "{v:?}"),
        }
    }
}
