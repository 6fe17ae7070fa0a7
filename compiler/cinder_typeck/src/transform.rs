// Type-directed rewrite of a checked program: every generic operator is
// replaced by its type-specific form and every widening accepted by the
// checker becomes an explicit coercion node. The result is the only tree
// shape the evaluator accepts.

use cinder_ast::ast::{
    AssignmentNode, BinaryNode, BlockNode, CallNode, ConditionalNode, Expression, Function,
    LoopNode, Program, RawExpression, RawStatement, ReturnNode, Statement, TypedExpression,
    TypedProgram, TypedStatement, UnaryNode,
};
use cinder_ast::ops::{specialize, Op, TypedOp};
use cinder_env::env::{FunctionEnv, TypeEnv};
use cinder_type::types::Type;

use crate::error::TypeError;
use crate::type_checker::{type_of, Context};

/// Rewrites a program that has already passed `check`. Calling it on an
/// unchecked program is undefined: an operator/type pair outside the
/// specialization tables panics.
pub fn transform(program: &Program<Op>) -> Result<TypedProgram, TypeError> {
    let globals = TypeEnv::from_declarations(&program.globals)?;
    let functions = FunctionEnv::from_program(program)?;
    log::debug!("transforming {} functions", program.functions.len());
    let mut out = Vec::with_capacity(program.functions.len());
    for f in &program.functions {
        let frame = TypeEnv::from_declarations(f.params.iter().chain(f.locals.iter()))?;
        let scope = globals.overlay(&frame);
        let ctx = Context {
            scope: &scope,
            functions: &functions,
            ret: f.ty,
            function: &f.name,
        };
        out.push(Function {
            ty: f.ty,
            name: f.name.clone(),
            params: f.params.clone(),
            locals: f.locals.clone(),
            body: transform_block(&f.body, &ctx)?,
        });
    }
    Ok(Program {
        globals: program.globals.clone(),
        functions: out,
    })
}

fn transform_block(b: &BlockNode<Op>, ctx: &Context) -> Result<BlockNode<TypedOp>, TypeError> {
    let statements = b
        .statements
        .iter()
        .map(|s| transform_stmt(s, ctx))
        .collect::<Result<_, _>>()?;
    Ok(BlockNode { statements })
}

pub fn transform_stmt(s: &RawStatement, ctx: &Context) -> Result<TypedStatement, TypeError> {
    Ok(match s {
        RawStatement::Skip => Statement::Skip,
        RawStatement::Block(b) => Statement::Block(transform_block(b, ctx)?),
        RawStatement::Assignment(a) => {
            let target_ty =
                ctx.scope
                    .get(&a.target)
                    .ok_or_else(|| TypeError::UndeclaredVariable {
                        name: a.target.clone(),
                    })?;
            let source_ty = type_of(&a.source, ctx)?;
            let mut source = transform_expr(&a.source, ctx)?;
            if target_ty == Type::Float && source_ty == Type::Int {
                source = coerce(TypedOp::IntToFloat, source);
            } else if target_ty == Type::Int && source_ty == Type::Char {
                source = coerce(TypedOp::CharToInt, source);
            }
            Statement::Assignment(Box::new(AssignmentNode {
                target: a.target.clone(),
                source,
            }))
        }
        RawStatement::Conditional(c) => Statement::Conditional(Box::new(ConditionalNode {
            test: transform_expr(&c.test, ctx)?,
            then_branch: transform_stmt(&c.then_branch, ctx)?,
            else_branch: transform_stmt(&c.else_branch, ctx)?,
        })),
        RawStatement::Loop(l) => Statement::Loop(Box::new(LoopNode {
            test: transform_expr(&l.test, ctx)?,
            body: transform_stmt(&l.body, ctx)?,
        })),
        RawStatement::Return(r) => Statement::Return(Box::new(ReturnNode {
            value: transform_expr(&r.value, ctx)?,
        })),
        RawStatement::Call(c) => Statement::Call(Box::new(transform_call(c, ctx)?)),
    })
}

fn coerce(op: TypedOp, term: TypedExpression) -> TypedExpression {
    Expression::Unary(Box::new(UnaryNode { op, term }))
}

fn transform_call(c: &CallNode<Op>, ctx: &Context) -> Result<CallNode<TypedOp>, TypeError> {
    let args = c
        .args
        .iter()
        .map(|a| transform_expr(a, ctx))
        .collect::<Result<_, _>>()?;
    Ok(CallNode {
        name: c.name.clone(),
        args,
    })
}

pub fn transform_expr(e: &RawExpression, ctx: &Context) -> Result<TypedExpression, TypeError> {
    Ok(match e {
        Expression::Variable(name) => Expression::Variable(name.clone()),
        Expression::Literal(v) => Expression::Literal(*v),
        Expression::Binary(b) => {
            let operand_ty = type_of(&b.left, ctx)?;
            let op = specialize(b.op, operand_ty)
                .expect("checked program has a typed form for every operator");
            Expression::Binary(Box::new(BinaryNode {
                op,
                left: transform_expr(&b.left, ctx)?,
                right: transform_expr(&b.right, ctx)?,
            }))
        }
        Expression::Unary(u) => {
            let operand_ty = type_of(&u.term, ctx)?;
            let op = specialize(u.op, operand_ty)
                .expect("checked program has a typed form for every operator");
            Expression::Unary(Box::new(UnaryNode {
                op,
                term: transform_expr(&u.term, ctx)?,
            }))
        }
        Expression::Call(c) => Expression::Call(Box::new(transform_call(c, ctx)?)),
    })
}
