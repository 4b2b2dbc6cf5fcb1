//! Constrained arithmetic evaluator for symbol parameters
//!
//!     Parameters in a phrase such as `F(len*0.5, -angle)` are arithmetic expressions over
//!     numeric literals and define names. Evaluation is deliberately closed: the grammar only
//!     knows `+ - * /`, unary signs and parentheses, so a phrase can never execute anything.
//!
//! Grammar:
//!
//!     sum     = product (("+" | "-") product)*
//!     product = unary (("*" | "/") unary)*
//!     unary   = ("+" | "-")* atom
//!     atom    = number | define | "(" sum ")"
//!
//!     Lexing is done by logos ([tokens]), parsing by chumsky. Results must be finite, so a
//!     division by zero is reported instead of silently producing infinity.

pub mod tokens;

use crate::lsystem::defines::DefineLookup;
use crate::lsystem::error::ExpressionError;
use chumsky::error::SimpleReason;
use chumsky::{prelude::*, Stream};
use logos::Logos;
use std::ops::Range;
pub use tokens::ExprToken;

type ParserError = Simple<ExprToken>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Define(String),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval<D: DefineLookup + ?Sized>(&self, defines: &D) -> Result<f64, ExpressionError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Define(name) => defines
                .lookup(name)
                .ok_or_else(|| ExpressionError::UnknownDefine(name.clone())),
            Expr::Neg(operand) => Ok(-operand.eval(defines)?),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.eval(defines)?;
                let rhs = rhs.eval(defines)?;
                Ok(match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div => lhs / rhs,
                })
            }
        }
    }
}

fn expression_parser() -> impl Parser<ExprToken, Expr, Error = ParserError> {
    recursive(|sum| {
        let number = select! { ExprToken::Number(text) => text }.try_map(|text: String, span| {
            text.parse::<f64>()
                .map(Expr::Number)
                .map_err(|e| Simple::custom(span, e.to_string()))
        });
        let define = select! { ExprToken::Ident(name) => Expr::Define(name) };
        let atom = number.or(define).or(sum.delimited_by(
            just(ExprToken::OpenParen),
            just(ExprToken::CloseParen),
        ));

        let unary = just(ExprToken::Minus)
            .to(true)
            .or(just(ExprToken::Plus).to(false))
            .repeated()
            .then(atom)
            .foldr(|negate, operand| {
                if negate {
                    Expr::Neg(Box::new(operand))
                } else {
                    operand
                }
            })
            .boxed();

        let product = unary
            .clone()
            .then(
                just(ExprToken::Star)
                    .to(BinaryOp::Mul)
                    .or(just(ExprToken::Slash).to(BinaryOp::Div))
                    .then(unary)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
            .boxed();

        product
            .clone()
            .then(
                just(ExprToken::Plus)
                    .to(BinaryOp::Add)
                    .or(just(ExprToken::Minus).to(BinaryOp::Sub))
                    .then(product)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    })
    .then_ignore(end())
}

fn describe(error: &ParserError) -> String {
    match error.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { .. } => "unclosed parenthesis".to_string(),
        SimpleReason::Unexpected => match error.found() {
            Some(token) => format!("unexpected {:?}", token),
            None => "unexpected end of expression".to_string(),
        },
    }
}

/// Parse an expression without evaluating it
pub fn parse_expression(source: &str) -> Result<Expr, ExpressionError> {
    let mut lexer = ExprToken::lexer(source);
    let mut tokens: Vec<(ExprToken, Range<usize>)> = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(ExpressionError::Lexical {
                    input: source.to_string(),
                    position: lexer.span().start,
                })
            }
        }
    }

    let len = source.len();
    let stream = Stream::from_iter(len..len + 1, tokens.into_iter());
    expression_parser().parse(stream).map_err(|errors| {
        let message = errors
            .first()
            .map(describe)
            .unwrap_or_else(|| "empty expression".to_string());
        ExpressionError::Syntax {
            input: source.to_string(),
            message,
        }
    })
}

/// Evaluate an expression to a finite number
pub fn evaluate<D: DefineLookup + ?Sized>(
    source: &str,
    defines: &D,
) -> Result<f64, ExpressionError> {
    let value = parse_expression(source)?.eval(defines)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExpressionError::NonFinite(source.to_string()))
    }
}
