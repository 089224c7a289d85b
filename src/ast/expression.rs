use std::fmt::Display;

use serde::Serialize;

use crate::lexer::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expression {
    Integer(Integer),
    Ident(Ident),
    Binary(BinaryExpr),
    Negation(Negation),
    Call(Call),
}

impl Expression {
    pub fn position(&self) -> Position {
        match self {
            Expression::Integer(Integer { position, .. })
            | Expression::Ident(Ident { position, .. })
            | Expression::Binary(BinaryExpr { position, .. })
            | Expression::Negation(Negation { position, .. })
            | Expression::Call(Call { position, .. }) => *position,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Integer(Integer { value, .. }) => f.write_fmt(format_args!("{value}")),
            Expression::Ident(Ident { value, .. }) => f.write_str(value),
            Expression::Binary(BinaryExpr { op, lhs, rhs, .. }) => {
                f.write_fmt(format_args!("({lhs} {op} {rhs})"))
            }
            Expression::Negation(Negation { inner, .. }) => f.write_fmt(format_args!("(-{inner})")),
            Expression::Call(Call { ident, args, .. }) => {
                f.write_fmt(format_args!("{}(", ident.value))?;
                let mut args = args.iter().peekable();
                while let Some(arg) = args.next() {
                    arg.fmt(f)?;
                    if args.peek().is_some() {
                        f.write_str("، ")?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    DividedBy,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::DividedBy => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Integer {
    pub value: i64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Negation {
    pub inner: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Call {
    pub ident: Ident,
    pub args: Vec<Expression>,
    pub position: Position,
}
