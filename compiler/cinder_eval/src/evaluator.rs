// Big-step evaluator. Statements transform the state in place; expressions
// produce values. Only transformed programs are legal input: a generic
// operator cannot appear here by construction, and a type-confused typed
// tree fails with a panic rather than a diagnostic.

use std::collections::HashMap;

use cinder_ast::ast::{
    BlockNode, Expression, Statement, TypedExpression, TypedFunction, TypedProgram, TypedStatement,
};
use cinder_ast::ops::TypedOp;
use cinder_ast::value::Value;
use thiserror::Error;

use crate::state::{Slot, State};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("reference to undefined value: {name}")]
    UndefinedReference { name: String },

    #[error("integer division by zero")]
    ArithmeticFault,

    #[error("function {function} finished without returning a value")]
    MissingReturnValue { function: String },
}

/// How a statement finished: fell through, or hit a return statement
/// carrying the function result.
enum Flow {
    Normal,
    Return(Value),
}

/// Executes a transformed program. Globals are initialized to undefined,
/// then the body of `main` runs (a program without `main` just yields the
/// initialized globals). The final global state is the program's meaning.
pub fn run(program: &TypedProgram) -> Result<State, EvalError> {
    let mut state = State::from_globals(&program.globals);
    if let Some(main) = program.function("main") {
        log::debug!("entering main");
        state.push_frame(frame_for(main, Vec::new()));
        let result = exec_block(&main.body, program, &mut state);
        state.pop_frame();
        // a return in main ends the program; its value is not observable
        result?;
    }
    Ok(state)
}

/// A fresh call frame: parameters bound to argument values in order,
/// remaining parameters and all locals undefined.
fn frame_for(f: &TypedFunction, args: Vec<Value>) -> HashMap<String, Slot> {
    let mut frame: HashMap<String, Slot> = f
        .params
        .iter()
        .chain(f.locals.iter())
        .map(|d| (d.name.clone(), Slot::Undefined(d.ty)))
        .collect();
    for (param, value) in f.params.iter().zip(args) {
        frame.insert(param.name.clone(), Slot::Defined(value));
    }
    frame
}

fn call(
    name: &str,
    args: &[TypedExpression],
    program: &TypedProgram,
    state: &mut State,
) -> Result<Flow, EvalError> {
    // arguments are evaluated in the caller's scope, before the frame swap
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(eval_expr(arg, program, state)?);
    }
    let callee = program
        .function(name)
        .unwrap_or_else(|| panic!("call to unknown function {name}"));
    log::trace!("call {name}({values:?})");
    state.push_frame(frame_for(callee, values));
    let flow = exec_block(&callee.body, program, state);
    state.pop_frame();
    flow
}

fn exec_block(
    b: &BlockNode<TypedOp>,
    program: &TypedProgram,
    state: &mut State,
) -> Result<Flow, EvalError> {
    for s in &b.statements {
        if let Flow::Return(v) = exec_stmt(s, program, state)? {
            return Ok(Flow::Return(v));
        }
    }
    Ok(Flow::Normal)
}

fn exec_stmt(
    s: &TypedStatement,
    program: &TypedProgram,
    state: &mut State,
) -> Result<Flow, EvalError> {
    match s {
        Statement::Skip => Ok(Flow::Normal),
        Statement::Block(b) => exec_block(b, program, state),
        Statement::Assignment(a) => {
            let value = eval_expr(&a.source, program, state)?;
            state.write(&a.target, value);
            Ok(Flow::Normal)
        }
        Statement::Conditional(c) => {
            if as_bool(eval_expr(&c.test, program, state)?) {
                exec_stmt(&c.then_branch, program, state)
            } else {
                exec_stmt(&c.else_branch, program, state)
            }
        }
        // iterative on purpose: the stack must not grow with the iteration
        // count
        Statement::Loop(l) => loop {
            if !as_bool(eval_expr(&l.test, program, state)?) {
                return Ok(Flow::Normal);
            }
            if let Flow::Return(v) = exec_stmt(&l.body, program, state)? {
                return Ok(Flow::Return(v));
            }
        },
        Statement::Return(r) => Ok(Flow::Return(eval_expr(&r.value, program, state)?)),
        Statement::Call(c) => {
            call(&c.name, &c.args, program, state)?;
            Ok(Flow::Normal)
        }
    }
}

fn eval_expr(
    e: &TypedExpression,
    program: &TypedProgram,
    state: &mut State,
) -> Result<Value, EvalError> {
    match e {
        Expression::Literal(v) => Ok(*v),
        Expression::Variable(name) => match state.read(name) {
            Some(Slot::Defined(v)) => Ok(*v),
            Some(Slot::Undefined(_)) => Err(EvalError::UndefinedReference { name: name.clone() }),
            None => panic!("unbound variable {name}"),
        },
        Expression::Binary(b) => {
            // both operands are always evaluated, there is no short circuit
            let left = eval_expr(&b.left, program, state)?;
            let right = eval_expr(&b.right, program, state)?;
            apply_binary(b.op, left, right)
        }
        Expression::Unary(u) => {
            let operand = eval_expr(&u.term, program, state)?;
            Ok(apply_unary(u.op, operand))
        }
        Expression::Call(c) => match call(&c.name, &c.args, program, state)? {
            Flow::Return(v) => Ok(v),
            Flow::Normal => Err(EvalError::MissingReturnValue {
                function: c.name.clone(),
            }),
        },
    }
}

fn apply_binary(op: TypedOp, left: Value, right: Value) -> Result<Value, EvalError> {
    use TypedOp::*;
    let v = match op {
        IntAdd => Value::Int(as_int(left).wrapping_add(as_int(right))),
        IntSub => Value::Int(as_int(left).wrapping_sub(as_int(right))),
        IntMul => Value::Int(as_int(left).wrapping_mul(as_int(right))),
        IntDiv => {
            let d = as_int(right);
            if d == 0 {
                return Err(EvalError::ArithmeticFault);
            }
            Value::Int(as_int(left).wrapping_div(d))
        }
        IntMod => {
            let d = as_int(right);
            if d == 0 {
                return Err(EvalError::ArithmeticFault);
            }
            Value::Int(as_int(left).wrapping_rem(d))
        }
        IntEq => Value::Bool(as_int(left) == as_int(right)),
        IntNe => Value::Bool(as_int(left) != as_int(right)),
        IntLt => Value::Bool(as_int(left) < as_int(right)),
        IntLe => Value::Bool(as_int(left) <= as_int(right)),
        IntGt => Value::Bool(as_int(left) > as_int(right)),
        IntGe => Value::Bool(as_int(left) >= as_int(right)),

        // float division by zero follows IEEE, it is not a fault
        FloatAdd => Value::Float(as_float(left) + as_float(right)),
        FloatSub => Value::Float(as_float(left) - as_float(right)),
        FloatMul => Value::Float(as_float(left) * as_float(right)),
        FloatDiv => Value::Float(as_float(left) / as_float(right)),
        FloatEq => Value::Bool(as_float(left) == as_float(right)),
        FloatNe => Value::Bool(as_float(left) != as_float(right)),
        FloatLt => Value::Bool(as_float(left) < as_float(right)),
        FloatLe => Value::Bool(as_float(left) <= as_float(right)),
        FloatGt => Value::Bool(as_float(left) > as_float(right)),
        FloatGe => Value::Bool(as_float(left) >= as_float(right)),

        CharEq => Value::Bool(as_char(left) == as_char(right)),
        CharNe => Value::Bool(as_char(left) != as_char(right)),
        CharLt => Value::Bool(as_char(left) < as_char(right)),
        CharLe => Value::Bool(as_char(left) <= as_char(right)),
        CharGt => Value::Bool(as_char(left) > as_char(right)),
        CharGe => Value::Bool(as_char(left) >= as_char(right)),

        BoolAnd => Value::Bool(as_bool(left) && as_bool(right)),
        BoolOr => Value::Bool(as_bool(left) || as_bool(right)),
        BoolEq => Value::Bool(as_bool(left) == as_bool(right)),
        BoolNe => Value::Bool(as_bool(left) != as_bool(right)),
        // false < true, matching the int ordering of the two values
        BoolLt => Value::Bool(!as_bool(left) && as_bool(right)),
        BoolLe => Value::Bool(!as_bool(left) || as_bool(right)),
        BoolGt => Value::Bool(as_bool(left) && !as_bool(right)),
        BoolGe => Value::Bool(as_bool(left) || !as_bool(right)),

        BoolNot | IntNeg | FloatNeg | IntToFloat | FloatToInt | CharToInt | IntToChar => {
            panic!("unary operator {op} in binary position")
        }
    };
    Ok(v)
}

fn apply_unary(op: TypedOp, operand: Value) -> Value {
    use TypedOp::*;
    match op {
        BoolNot => Value::Bool(!as_bool(operand)),
        IntNeg => Value::Int(as_int(operand).wrapping_neg()),
        FloatNeg => Value::Float(-as_float(operand)),
        IntToFloat => Value::Float(as_int(operand) as f32),
        // truncation toward zero, saturating at the i32 bounds
        FloatToInt => Value::Int(as_float(operand) as i32),
        CharToInt => Value::Int(as_char(operand) as i32),
        // truncation to the 8-bit range keeps the result a valid char
        IntToChar => Value::Char((as_int(operand) as u8) as char),
        _ => panic!("binary operator {op} in unary position"),
    }
}

fn as_int(v: Value) -> i32 {
    match v {
        Value::Int(i) => i,
        other => panic!("expected int value, found {other}"),
    }
}

fn as_float(v: Value) -> f32 {
    match v {
        Value::Float(f) => f,
        other => panic!("expected float value, found {other}"),
    }
}

fn as_char(v: Value) -> char {
    match v {
        Value::Char(c) => c,
        other => panic!("expected char value, found {other}"),
    }
}

fn as_bool(v: Value) -> bool {
    match v {
        Value::Bool(b) => b,
        other => panic!("expected bool value, found {other}"),
    }
}
