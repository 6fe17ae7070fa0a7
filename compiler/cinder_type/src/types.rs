// Type definitions for the Cinder language.

use std::fmt;

/// The primitive types of the language. `Void` is only legal as a function
/// return type; every variable has one of the four value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Type {
    Int,
    Bool,
    Char,
    Float,
    Void,
}

impl Type {
    /// Checks if the type is numeric (`Int` or `Float`).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Bool => "bool",
            Type::Char => "char",
            Type::Float => "float",
            Type::Void => "void",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A function's declared signature: parameter types in order plus the
/// return type. Functions are not first-class values, so the signature
/// lives in its own table rather than in `Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionSig {
    pub params: Vec<Type>,
    pub ret: Type,
}
