// Operator strata. The parser produces generic `Op` tokens; the type
// transformer replaces every one of them with a `TypedOp` bound to a single
// operand type. The evaluator only ever sees `TypedOp`.

use std::fmt;

use cinder_type::types::Type;

/// Generic operator tokens as they appear in source text. One enum covers
/// binary and unary positions; the checker validates the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    // boolean
    Or,
    And,
    // relational
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // unary
    Not,
    Neg,
    // casts, written `int(..)`, `float(..)`, `char(..)`
    IntCast,
    FloatCast,
    CharCast,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Op::Or => "||",
            Op::And => "&&",
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Not => "!",
            Op::Neg => "-",
            Op::IntCast => "int",
            Op::FloatCast => "float",
            Op::CharCast => "char",
        };
        f.write_str(s)
    }
}

/// Type-specific operator tokens, produced only by the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypedOp {
    IntAdd,
    IntSub,
    IntMul,
    IntDiv,
    IntMod,
    IntEq,
    IntNe,
    IntLt,
    IntLe,
    IntGt,
    IntGe,
    IntNeg,
    FloatAdd,
    FloatSub,
    FloatMul,
    FloatDiv,
    FloatEq,
    FloatNe,
    FloatLt,
    FloatLe,
    FloatGt,
    FloatGe,
    FloatNeg,
    CharEq,
    CharNe,
    CharLt,
    CharLe,
    CharGt,
    CharGe,
    BoolAnd,
    BoolOr,
    BoolEq,
    BoolNe,
    BoolLt,
    BoolLe,
    BoolGt,
    BoolGe,
    BoolNot,
    // widening and narrowing coercions
    IntToFloat,
    FloatToInt,
    CharToInt,
    IntToChar,
}

impl fmt::Display for TypedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypedOp::IntAdd => "int+",
            TypedOp::IntSub => "int-",
            TypedOp::IntMul => "int*",
            TypedOp::IntDiv => "int/",
            TypedOp::IntMod => "int%",
            TypedOp::IntEq => "int==",
            TypedOp::IntNe => "int!=",
            TypedOp::IntLt => "int<",
            TypedOp::IntLe => "int<=",
            TypedOp::IntGt => "int>",
            TypedOp::IntGe => "int>=",
            TypedOp::IntNeg => "int neg",
            TypedOp::FloatAdd => "float+",
            TypedOp::FloatSub => "float-",
            TypedOp::FloatMul => "float*",
            TypedOp::FloatDiv => "float/",
            TypedOp::FloatEq => "float==",
            TypedOp::FloatNe => "float!=",
            TypedOp::FloatLt => "float<",
            TypedOp::FloatLe => "float<=",
            TypedOp::FloatGt => "float>",
            TypedOp::FloatGe => "float>=",
            TypedOp::FloatNeg => "float neg",
            TypedOp::CharEq => "char==",
            TypedOp::CharNe => "char!=",
            TypedOp::CharLt => "char<",
            TypedOp::CharLe => "char<=",
            TypedOp::CharGt => "char>",
            TypedOp::CharGe => "char>=",
            TypedOp::BoolAnd => "bool&&",
            TypedOp::BoolOr => "bool||",
            TypedOp::BoolEq => "bool==",
            TypedOp::BoolNe => "bool!=",
            TypedOp::BoolLt => "bool<",
            TypedOp::BoolLe => "bool<=",
            TypedOp::BoolGt => "bool>",
            TypedOp::BoolGe => "bool>=",
            TypedOp::BoolNot => "bool!",
            TypedOp::IntToFloat => "i2f",
            TypedOp::FloatToInt => "f2i",
            TypedOp::CharToInt => "c2i",
            TypedOp::IntToChar => "i2c",
        };
        f.write_str(s)
    }
}

/// Maps a generic operator to its type-specific counterpart for the given
/// operand type. Returns `None` for pairs outside the per-type tables; once
/// a program has passed the checker every lookup made by the transformer is
/// `Some`.
pub fn specialize(op: Op, operand: Type) -> Option<TypedOp> {
    let typed = match (operand, op) {
        (Type::Int, Op::Add) => TypedOp::IntAdd,
        (Type::Int, Op::Sub) => TypedOp::IntSub,
        (Type::Int, Op::Mul) => TypedOp::IntMul,
        (Type::Int, Op::Div) => TypedOp::IntDiv,
        (Type::Int, Op::Mod) => TypedOp::IntMod,
        (Type::Int, Op::Eq) => TypedOp::IntEq,
        (Type::Int, Op::Ne) => TypedOp::IntNe,
        (Type::Int, Op::Lt) => TypedOp::IntLt,
        (Type::Int, Op::Le) => TypedOp::IntLe,
        (Type::Int, Op::Gt) => TypedOp::IntGt,
        (Type::Int, Op::Ge) => TypedOp::IntGe,
        (Type::Int, Op::Neg) => TypedOp::IntNeg,
        (Type::Int, Op::FloatCast) => TypedOp::IntToFloat,
        (Type::Int, Op::CharCast) => TypedOp::IntToChar,

        (Type::Float, Op::Add) => TypedOp::FloatAdd,
        (Type::Float, Op::Sub) => TypedOp::FloatSub,
        (Type::Float, Op::Mul) => TypedOp::FloatMul,
        (Type::Float, Op::Div) => TypedOp::FloatDiv,
        (Type::Float, Op::Eq) => TypedOp::FloatEq,
        (Type::Float, Op::Ne) => TypedOp::FloatNe,
        (Type::Float, Op::Lt) => TypedOp::FloatLt,
        (Type::Float, Op::Le) => TypedOp::FloatLe,
        (Type::Float, Op::Gt) => TypedOp::FloatGt,
        (Type::Float, Op::Ge) => TypedOp::FloatGe,
        (Type::Float, Op::Neg) => TypedOp::FloatNeg,
        (Type::Float, Op::IntCast) => TypedOp::FloatToInt,

        (Type::Char, Op::Eq) => TypedOp::CharEq,
        (Type::Char, Op::Ne) => TypedOp::CharNe,
        (Type::Char, Op::Lt) => TypedOp::CharLt,
        (Type::Char, Op::Le) => TypedOp::CharLe,
        (Type::Char, Op::Gt) => TypedOp::CharGt,
        (Type::Char, Op::Ge) => TypedOp::CharGe,
        (Type::Char, Op::IntCast) => TypedOp::CharToInt,

        (Type::Bool, Op::And) => TypedOp::BoolAnd,
        (Type::Bool, Op::Or) => TypedOp::BoolOr,
        (Type::Bool, Op::Eq) => TypedOp::BoolEq,
        (Type::Bool, Op::Ne) => TypedOp::BoolNe,
        (Type::Bool, Op::Lt) => TypedOp::BoolLt,
        (Type::Bool, Op::Le) => TypedOp::BoolLe,
        (Type::Bool, Op::Gt) => TypedOp::BoolGt,
        (Type::Bool, Op::Ge) => TypedOp::BoolGe,
        (Type::Bool, Op::Not) => TypedOp::BoolNot,

        _ => return None,
    };
    Some(typed)
}
