//! Filter expression parser using nom
//!
//! Grammar:
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr ('||' and_expr)*
//! and_expr   := unary ('&&' unary)*
//! unary      := '!' unary | primary
//! primary    := '(' expr ')' | comparison | operand
//! comparison := operand op operand
//! op         := '<=' | '>=' | '==' | '!=' | '<' | '>'
//! operand    := 'true' | 'false' | identifier | number | string
//! ```

use crate::ast::*;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, recognize, value},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded},
    IResult,
};
use thiserror::Error;

/// Parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty expression")]
    Empty,

    #[error("Unexpected characters at end: '{0}'")]
    TrailingInput(String),
}

/// Parse a filter expression from a string
pub fn parse_filter(input: &str) -> Result<FilterExpr, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    match expr(input) {
        Ok(("", result)) => Ok(result),
        Ok((remaining, _)) => Err(ParseError::TrailingInput(remaining.to_string())),
        Err(e) => Err(ParseError::Parse(format!("{:?}", e))),
    }
}

/// Parse whitespace
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse an expression (entry point)
fn expr(input: &str) -> IResult<&str, FilterExpr> {
    or_expr(input)
}

/// Parse OR expressions
fn or_expr(input: &str) -> IResult<&str, FilterExpr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(tag("||")), and_expr))(input)?;

    let result = rest.into_iter().fold(first, FilterExpr::or);
    Ok((input, result))
}

/// Parse AND expressions
fn and_expr(input: &str) -> IResult<&str, FilterExpr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(ws(tag("&&")), unary))(input)?;

    let result = rest.into_iter().fold(first, FilterExpr::and);
    Ok((input, result))
}

/// Parse NOT expressions
fn unary(input: &str) -> IResult<&str, FilterExpr> {
    alt((map(preceded(ws(char('!')), unary), FilterExpr::not), primary))(input)
}

/// Parse atomic expressions
fn primary(input: &str) -> IResult<&str, FilterExpr> {
    ws(alt((
        delimited(ws(char('(')), expr, ws(char(')'))),
        map(comparison, FilterExpr::Comparison),
        map(operand, FilterExpr::Truthy),
    )))(input)
}

/// Parse a comparison
fn comparison(input: &str) -> IResult<&str, Comparison> {
    let (input, lhs) = operand(input)?;
    let (input, op) = ws(comparison_op)(input)?;
    let (input, rhs) = operand(input)?;
    Ok((input, Comparison::new(lhs, op, rhs)))
}

/// Parse a comparison operator
fn comparison_op(input: &str) -> IResult<&str, ComparisonOp> {
    alt((
        value(ComparisonOp::Le, tag("<=")),
        value(ComparisonOp::Ge, tag(">=")),
        value(ComparisonOp::Eq, tag("==")),
        value(ComparisonOp::Ne, tag("!=")),
        value(ComparisonOp::Lt, tag("<")),
        value(ComparisonOp::Gt, tag(">")),
    ))(input)
}

/// Parse an operand
fn operand(input: &str) -> IResult<&str, Operand> {
    ws(alt((
        // Identifiers come before numbers so names like `inf` stay variables
        map(identifier, |s| match s {
            "true" => Operand::Literal(Scalar::Bool(true)),
            "false" => Operand::Literal(Scalar::Bool(false)),
            _ => Operand::Variable(s.to_string()),
        }),
        map(double, |n| Operand::Literal(Scalar::Number(n))),
        map(string_literal, |s| Operand::Literal(Scalar::Text(s.to_string()))),
    )))(input)
}

/// Parse an identifier (starts with letter or underscore, followed by alphanumeric or underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse a string literal
fn string_literal(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
    ))(input)
}
