// Static type checking for Cinder programs. The pass is a pure validation:
// it either accepts the program unchanged or stops at the first violation.

use cinder_ast::ast::{CallNode, Expression, Function, Program, RawExpression, RawStatement};
use cinder_ast::ops::Op;
use cinder_env::env::{FunctionEnv, TypeEnv};
use cinder_type::types::{FunctionSig, Type};

use crate::error::TypeError;

/// Everything a checking rule needs to know about its surroundings: the
/// variable scope in effect, the program's function table, and the
/// enclosing function's name and declared return type.
pub struct Context<'a> {
    pub scope: &'a TypeEnv,
    pub functions: &'a FunctionEnv,
    pub ret: Type,
    pub function: &'a str,
}

/// Validates a whole program. Fail-fast: the first rule violation is
/// returned and no further checking happens.
pub fn check(program: &Program<Op>) -> Result<(), TypeError> {
    let globals = TypeEnv::from_declarations(&program.globals)?;
    let functions = FunctionEnv::from_program(program)?;
    log::debug!(
        "checking {} globals, {} functions",
        program.globals.len(),
        program.functions.len()
    );
    for f in &program.functions {
        check_function(f, &globals, &functions)?;
    }
    Ok(())
}

fn check_function(
    f: &Function<Op>,
    globals: &TypeEnv,
    functions: &FunctionEnv,
) -> Result<(), TypeError> {
    // params and locals form one declaration set; either may shadow a global
    let frame = TypeEnv::from_declarations(f.params.iter().chain(f.locals.iter()))?;
    let scope = globals.overlay(&frame);
    let ctx = Context {
        scope: &scope,
        functions,
        ret: f.ty,
        function: &f.name,
    };
    let mut found_return = false;
    for s in &f.body.statements {
        found_return |= check_stmt(s, &ctx)?;
    }
    // textual presence only, not a reachability proof; main is exempt
    if f.ty != Type::Void && f.name != "main" && !found_return {
        return Err(TypeError::MissingReturn {
            function: f.name.clone(),
        });
    }
    Ok(())
}

/// Checks one statement and reports whether a return statement occurs
/// lexically within it.
pub fn check_stmt(s: &RawStatement, ctx: &Context) -> Result<bool, TypeError> {
    match s {
        RawStatement::Skip => Ok(false),
        RawStatement::Block(b) => {
            let mut found = false;
            for s in &b.statements {
                found |= check_stmt(s, ctx)?;
            }
            Ok(found)
        }
        RawStatement::Assignment(a) => {
            let target_ty =
                ctx.scope
                    .get(&a.target)
                    .ok_or_else(|| TypeError::UndeclaredVariable {
                        name: a.target.clone(),
                    })?;
            check_expr(&a.source, ctx)?;
            let source_ty = type_of(&a.source, ctx)?;
            let widening = (target_ty == Type::Float && source_ty == Type::Int)
                || (target_ty == Type::Int && source_ty == Type::Char);
            if target_ty != source_ty && !widening {
                return Err(TypeError::TypeMismatch {
                    place: format!("assignment to {}", a.target),
                    expected: target_ty,
                    found: source_ty,
                });
            }
            Ok(false)
        }
        RawStatement::Conditional(c) => {
            check_expr(&c.test, ctx)?;
            let test_ty = type_of(&c.test, ctx)?;
            if test_ty != Type::Bool {
                return Err(TypeError::NonBooleanTest {
                    construct: "conditional",
                    found: test_ty,
                });
            }
            let in_then = check_stmt(&c.then_branch, ctx)?;
            let in_else = check_stmt(&c.else_branch, ctx)?;
            Ok(in_then | in_else)
        }
        RawStatement::Loop(l) => {
            check_expr(&l.test, ctx)?;
            let test_ty = type_of(&l.test, ctx)?;
            if test_ty != Type::Bool {
                return Err(TypeError::NonBooleanTest {
                    construct: "loop",
                    found: test_ty,
                });
            }
            check_stmt(&l.body, ctx)
        }
        RawStatement::Return(r) => {
            if ctx.ret == Type::Void {
                return Err(TypeError::ReturnInVoidFunction {
                    function: ctx.function.to_string(),
                });
            }
            check_expr(&r.value, ctx)?;
            let value_ty = type_of(&r.value, ctx)?;
            // no coercion on return, the types must agree exactly
            if value_ty != ctx.ret {
                return Err(TypeError::TypeMismatch {
                    place: format!("return in {}", ctx.function),
                    expected: ctx.ret,
                    found: value_ty,
                });
            }
            Ok(true)
        }
        RawStatement::Call(c) => {
            let sig = lookup_function(&c.name, ctx)?;
            if sig.ret != Type::Void {
                return Err(TypeError::NonVoidCallStatement {
                    function: c.name.clone(),
                });
            }
            check_call_args(c, &sig, ctx)?;
            Ok(false)
        }
    }
}

fn lookup_function(name: &str, ctx: &Context) -> Result<FunctionSig, TypeError> {
    ctx.functions
        .get(name)
        .cloned()
        .ok_or_else(|| TypeError::UndeclaredFunction {
            name: name.to_string(),
        })
}

fn check_call_args(c: &CallNode<Op>, sig: &FunctionSig, ctx: &Context) -> Result<(), TypeError> {
    if c.args.len() != sig.params.len() {
        return Err(TypeError::ArityMismatch {
            function: c.name.clone(),
            expected: sig.params.len(),
            found: c.args.len(),
        });
    }
    for (index, (arg, expected)) in c.args.iter().zip(&sig.params).enumerate() {
        check_expr(arg, ctx)?;
        let found = type_of(arg, ctx)?;
        // arguments must match exactly, coercion does not apply here
        if found != *expected {
            return Err(TypeError::ArgumentTypeMismatch {
                function: c.name.clone(),
                index,
                expected: *expected,
                found,
            });
        }
    }
    Ok(())
}

pub fn check_expr(e: &RawExpression, ctx: &Context) -> Result<(), TypeError> {
    match e {
        Expression::Literal(_) => Ok(()),
        Expression::Variable(name) => {
            if ctx.scope.contains(name) {
                Ok(())
            } else {
                Err(TypeError::UndeclaredVariable { name: name.clone() })
            }
        }
        Expression::Call(c) => {
            let sig = lookup_function(&c.name, ctx)?;
            if sig.ret == Type::Void {
                return Err(TypeError::VoidCallInExpression {
                    function: c.name.clone(),
                });
            }
            check_call_args(c, &sig, ctx)
        }
        Expression::Binary(b) => {
            check_expr(&b.left, ctx)?;
            check_expr(&b.right, ctx)?;
            let left = type_of(&b.left, ctx)?;
            let right = type_of(&b.right, ctx)?;
            let ok = match b.op {
                Op::Mod => left == right && left == Type::Int,
                Op::Add | Op::Sub | Op::Mul | Op::Div => left == right && left.is_numeric(),
                Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge => left == right,
                Op::And | Op::Or => left == Type::Bool && right == Type::Bool,
                // unary-only tokens in binary position never parse, but a
                // hand-built tree still gets a diagnostic
                Op::Not | Op::Neg | Op::IntCast | Op::FloatCast | Op::CharCast => false,
            };
            if ok {
                Ok(())
            } else {
                Err(TypeError::InvalidOperandTypes {
                    op: b.op,
                    left,
                    right,
                })
            }
        }
        Expression::Unary(u) => {
            check_expr(&u.term, ctx)?;
            let operand = type_of(&u.term, ctx)?;
            let ok = match u.op {
                Op::Not => operand == Type::Bool,
                Op::Neg => operand.is_numeric(),
                Op::FloatCast | Op::CharCast => operand == Type::Int,
                Op::IntCast => operand == Type::Float || operand == Type::Char,
                _ => false,
            };
            if ok {
                Ok(())
            } else {
                Err(TypeError::InvalidUnaryOperand {
                    op: u.op,
                    operand,
                })
            }
        }
    }
}

/// The static type of an expression. Pure and deterministic; used both by
/// the checking rules and by the transformer.
pub fn type_of(e: &RawExpression, ctx: &Context) -> Result<Type, TypeError> {
    match e {
        Expression::Literal(v) => Ok(v.ty()),
        Expression::Variable(name) => {
            ctx.scope
                .get(name)
                .ok_or_else(|| TypeError::UndeclaredVariable { name: name.clone() })
        }
        Expression::Call(c) => lookup_function(&c.name, ctx).map(|sig| sig.ret),
        Expression::Binary(b) => match b.op {
            // the checker guarantees equal operand types, so the left
            // operand decides
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => type_of(&b.left, ctx),
            Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge | Op::And | Op::Or => {
                Ok(Type::Bool)
            }
            Op::Not | Op::Neg | Op::IntCast | Op::FloatCast | Op::CharCast => {
                Err(TypeError::InvalidOperandTypes {
                    op: b.op,
                    left: type_of(&b.left, ctx)?,
                    right: type_of(&b.right, ctx)?,
                })
            }
        },
        Expression::Unary(u) => match u.op {
            Op::Not => Ok(Type::Bool),
            Op::Neg => type_of(&u.term, ctx),
            Op::IntCast => Ok(Type::Int),
            Op::FloatCast => Ok(Type::Float),
            Op::CharCast => Ok(Type::Char),
            _ => Err(TypeError::InvalidUnaryOperand {
                op: u.op,
                operand: type_of(&u.term, ctx)?,
            }),
        },
    }
}
