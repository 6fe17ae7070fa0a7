// Recursive descent parser for Cinder source text, written with nom
// combinators. Binary expressions use precedence climbing; everything else
// follows the concrete grammar rule named on each parser.

use cinder_ast::ast::{
    AssignmentNode, BinaryNode, BlockNode, CallNode, ConditionalNode, Declaration, Expression,
    Function, LoopNode, Program, RawExpression, RawProgram, RawStatement, ReturnNode, Statement,
    UnaryNode,
};
use cinder_ast::ops::Op;
use cinder_ast::value::Value;
use cinder_type::types::Type;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, digit1, multispace1, none_of, satisfy};
use nom::combinator::{map, map_res, not, opt, recognize, value, verify};
use nom::multi::{many0, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error near {fragment:?}")]
    Syntax { fragment: String },
    #[error("unexpected trailing input near {fragment:?}")]
    TrailingInput { fragment: String },
}

const KEYWORDS: [&str; 11] = [
    "int", "bool", "float", "char", "void", "if", "else", "while", "return", "true", "false",
];

/// Whitespace, including `//` line comments.
fn ws(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(tag("//"), take_while(|c| c != '\n'))),
        ))),
    )(input)
}

fn sym<'a>(t: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(ws, tag(t))
}

/// A reserved word, not merely a prefix of an identifier.
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(
        ws,
        terminated(
            tag(kw),
            not(satisfy(|c: char| c.is_ascii_alphanumeric() || c == '_')),
        ),
    )
}

fn identifier(input: &str) -> IResult<&str, String> {
    let ident = recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ));
    map(
        preceded(ws, verify(ident, |s: &&str| !KEYWORDS.contains(s))),
        |s: &str| s.to_string(),
    )(input)
}

// Type --> int | bool | float | char
fn type_name(input: &str) -> IResult<&str, Type> {
    alt((
        value(Type::Int, keyword("int")),
        value(Type::Bool, keyword("bool")),
        value(Type::Float, keyword("float")),
        value(Type::Char, keyword("char")),
    ))(input)
}

fn float_literal(input: &str) -> IResult<&str, Value> {
    preceded(
        ws,
        map_res(
            recognize(tuple((digit1, char('.'), digit1))),
            |s: &str| s.parse::<f32>().map(Value::Float),
        ),
    )(input)
}

fn int_literal(input: &str) -> IResult<&str, Value> {
    preceded(ws, map_res(digit1, |s: &str| s.parse::<i32>().map(Value::Int)))(input)
}

fn char_literal(input: &str) -> IResult<&str, Value> {
    preceded(
        ws,
        map(delimited(char('\''), none_of("'"), char('\'')), Value::Char),
    )(input)
}

fn bool_literal(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), keyword("true")),
        value(Value::Bool(false), keyword("false")),
    ))(input)
}

// Literal --> IntLit | FloatLit | CharLit | true | false
fn literal(input: &str) -> IResult<&str, Value> {
    alt((float_literal, int_literal, char_literal, bool_literal))(input)
}

fn call_args(input: &str) -> IResult<&str, Vec<RawExpression>> {
    delimited(
        sym("("),
        separated_list0(sym(","), parse_expression),
        sym(")"),
    )(input)
}

// Primary --> Type ( Expression ), a cast written like a call
fn cast_expr(input: &str) -> IResult<&str, RawExpression> {
    let cast_op = alt((
        value(Op::IntCast, keyword("int")),
        value(Op::FloatCast, keyword("float")),
        value(Op::CharCast, keyword("char")),
    ));
    map(
        pair(cast_op, delimited(sym("("), parse_expression, sym(")"))),
        |(op, term)| Expression::Unary(Box::new(UnaryNode { op, term })),
    )(input)
}

fn call_or_variable(input: &str) -> IResult<&str, RawExpression> {
    let (input, name) = identifier(input)?;
    let (input, args) = opt(call_args)(input)?;
    let expr = match args {
        Some(args) => Expression::Call(Box::new(CallNode { name, args })),
        None => Expression::Variable(name),
    };
    Ok((input, expr))
}

// Primary --> Identifier [ ( Args ) ] | Literal | ( Expression ) | Cast
fn primary(input: &str) -> IResult<&str, RawExpression> {
    alt((
        cast_expr,
        map(literal, Expression::Literal),
        call_or_variable,
        delimited(sym("("), parse_expression, sym(")")),
    ))(input)
}

// Factor --> [ ! | - ] Factor | Primary
fn unary_expr(input: &str) -> IResult<&str, RawExpression> {
    alt((
        map(preceded(sym("!"), unary_expr), |term| {
            Expression::Unary(Box::new(UnaryNode { op: Op::Not, term }))
        }),
        map(preceded(sym("-"), unary_expr), |term| {
            Expression::Unary(Box::new(UnaryNode { op: Op::Neg, term }))
        }),
        primary,
    ))(input)
}

fn binary_op(input: &str) -> IResult<&str, Op> {
    preceded(
        ws,
        alt((
            value(Op::Or, tag("||")),
            value(Op::And, tag("&&")),
            value(Op::Eq, tag("==")),
            value(Op::Ne, tag("!=")),
            value(Op::Le, tag("<=")),
            value(Op::Ge, tag(">=")),
            value(Op::Lt, tag("<")),
            value(Op::Gt, tag(">")),
            value(Op::Add, tag("+")),
            value(Op::Sub, tag("-")),
            value(Op::Mul, tag("*")),
            value(Op::Div, tag("/")),
            value(Op::Mod, tag("%")),
        )),
    )(input)
}

fn precedence(op: Op) -> u8 {
    match op {
        Op::Or => 1,
        Op::And => 2,
        Op::Eq | Op::Ne => 3,
        Op::Lt | Op::Le | Op::Gt | Op::Ge => 4,
        Op::Add | Op::Sub => 5,
        Op::Mul | Op::Div | Op::Mod => 6,
        // never produced by binary_op
        _ => 0,
    }
}

// Precedence climbing over the binary operator table. The operator is only
// consumed once its precedence clears the current minimum.
fn binary_expr(input: &str, min_prec: u8) -> IResult<&str, RawExpression> {
    let (mut input, mut lhs) = unary_expr(input)?;
    while let Ok((next, op)) = binary_op(input) {
        let prec = precedence(op);
        if prec < min_prec {
            break;
        }
        let (next, rhs) = binary_expr(next, prec + 1)?;
        lhs = Expression::Binary(Box::new(BinaryNode {
            op,
            left: lhs,
            right: rhs,
        }));
        input = next;
    }
    Ok((input, lhs))
}

// Expression --> || < && < (== !=) < (< <= > >=) < (+ -) < (* / %)
pub fn parse_expression(input: &str) -> IResult<&str, RawExpression> {
    binary_expr(input, 1)
}

// Block --> { Statement* }
fn block(input: &str) -> IResult<&str, BlockNode<Op>> {
    map(
        delimited(sym("{"), many0(parse_statement), sym("}")),
        |statements| BlockNode { statements },
    )(input)
}

// IfStatement --> if ( Expression ) Statement [ else Statement ]
fn if_statement(input: &str) -> IResult<&str, RawStatement> {
    let (input, _) = keyword("if")(input)?;
    let (input, test) = delimited(sym("("), parse_expression, sym(")"))(input)?;
    let (input, then_branch) = parse_statement(input)?;
    let (input, else_branch) = opt(preceded(keyword("else"), parse_statement))(input)?;
    Ok((
        input,
        Statement::Conditional(Box::new(ConditionalNode {
            test,
            then_branch,
            else_branch: else_branch.unwrap_or(Statement::Skip),
        })),
    ))
}

// WhileStatement --> while ( Expression ) Statement
fn while_statement(input: &str) -> IResult<&str, RawStatement> {
    let (input, _) = keyword("while")(input)?;
    let (input, test) = delimited(sym("("), parse_expression, sym(")"))(input)?;
    let (input, body) = parse_statement(input)?;
    Ok((input, Statement::Loop(Box::new(LoopNode { test, body }))))
}

// ReturnStatement --> return Expression ;
fn return_statement(input: &str) -> IResult<&str, RawStatement> {
    let (input, _) = keyword("return")(input)?;
    let (input, value) = parse_expression(input)?;
    let (input, _) = sym(";")(input)?;
    Ok((input, Statement::Return(Box::new(ReturnNode { value }))))
}

// CallStatement --> Identifier ( Args ) ;
fn call_statement(input: &str) -> IResult<&str, RawStatement> {
    map(
        terminated(pair(identifier, call_args), sym(";")),
        |(name, args)| Statement::Call(Box::new(CallNode { name, args })),
    )(input)
}

// Assignment --> Identifier = Expression ;
fn assignment(input: &str) -> IResult<&str, RawStatement> {
    map(
        tuple((identifier, sym("="), parse_expression, sym(";"))),
        |(target, _, source, _)| Statement::Assignment(Box::new(AssignmentNode { target, source })),
    )(input)
}

// Statement --> ; | Block | IfStatement | WhileStatement | ReturnStatement
//             | CallStatement | Assignment
pub fn parse_statement(input: &str) -> IResult<&str, RawStatement> {
    alt((
        value(Statement::Skip, sym(";")),
        map(block, Statement::Block),
        if_statement,
        while_statement,
        return_statement,
        call_statement,
        assignment,
    ))(input)
}

// Declaration --> Type Identifier { , Identifier } ;
fn declaration_group(input: &str) -> IResult<&str, Vec<Declaration>> {
    let (input, ty) = type_name(input)?;
    let (input, names) = separated_list1(sym(","), identifier)(input)?;
    let (input, _) = sym(";")(input)?;
    let decls = names
        .into_iter()
        .map(|name| Declaration { name, ty })
        .collect();
    Ok((input, decls))
}

fn declarations(input: &str) -> IResult<&str, Vec<Declaration>> {
    map(many0(declaration_group), |groups| {
        groups.into_iter().flatten().collect()
    })(input)
}

fn param(input: &str) -> IResult<&str, Declaration> {
    map(pair(type_name, identifier), |(ty, name)| Declaration {
        name,
        ty,
    })(input)
}

// Function --> ( Type | void ) Identifier ( Params ) { Declarations Statement* }
fn function_item(input: &str) -> IResult<&str, Function<Op>> {
    let (input, ty) = alt((value(Type::Void, keyword("void")), type_name))(input)?;
    let (input, name) = identifier(input)?;
    let (input, params) = delimited(sym("("), separated_list0(sym(","), param), sym(")"))(input)?;
    let (input, _) = sym("{")(input)?;
    let (input, locals) = declarations(input)?;
    let (input, statements) = many0(parse_statement)(input)?;
    let (input, _) = sym("}")(input)?;
    Ok((
        input,
        Function {
            ty,
            name,
            params,
            locals,
            body: BlockNode { statements },
        },
    ))
}

enum TopItem {
    Globals(Vec<Declaration>),
    Function(Function<Op>),
}

// A top-level item is a function iff `(` follows the first identifier;
// alt backtracks to a global declaration group otherwise.
fn top_item(input: &str) -> IResult<&str, TopItem> {
    alt((
        map(function_item, TopItem::Function),
        map(declaration_group, TopItem::Globals),
    ))(input)
}

fn program_items(input: &str) -> IResult<&str, RawProgram> {
    let (input, items) = many0(top_item)(input)?;
    let mut globals = Vec::new();
    let mut functions = Vec::new();
    for item in items {
        match item {
            TopItem::Globals(mut ds) => globals.append(&mut ds),
            TopItem::Function(f) => functions.push(f),
        }
    }
    Ok((input, Program { globals, functions }))
}

fn snippet(input: &str) -> String {
    input.trim_start().chars().take(40).collect()
}

/// Parses a whole source file into the raw AST.
pub fn parse_program(source: &str) -> Result<RawProgram, ParseError> {
    match program_items(source) {
        Ok((rest, program)) => {
            let rest = match ws(rest) {
                Ok((rest, ())) => rest,
                Err(_) => rest,
            };
            if rest.is_empty() {
                Ok(program)
            } else {
                Err(ParseError::TrailingInput {
                    fragment: snippet(rest),
                })
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::Syntax {
            fragment: snippet(e.input),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Syntax {
            fragment: String::new(),
        }),
    }
}
