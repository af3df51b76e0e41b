//! a module turns a String expression into a symbolic expression
//!
//! Recursive-descent parser built from `nom` combinators. One function per
//! precedence level, lowest binding first:
//!
//! ```text
//!   expr    := term (('+' | '-') term)*
//!   term    := unary (('*' | '/') unary)*
//!   unary   := sign* primary (('**' | '^') sign* primary)*   powers are right associative
//!   primary := number | name | name '(' args ')' | '(' expr ')'
//! ```
//! so `-x**2` is `-(x**2)`, `2**3**2` is `2**(3**2)` and `2**-1` is accepted.
use crate::error::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, opt, recognize},
    error::ErrorKind,
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded},
};

/// deepest bracket nesting accepted before parsing starts
pub const MAX_NESTING: usize = 64;
/// longest accepted formula, in bytes
pub const MAX_LENGTH: usize = 1000;

/// wraps a parser so that it skips surrounding whitespace
fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// numeric literal: `2`, `2.`, `2.5`, `.5`, `1e-3`, `2.5E+4`
///
/// A literal that does not fit in an `f64` (`1e999`) is a hard failure, reported at its start.
fn number(input: &str) -> IResult<&str, Expr> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ));
    let exponent = (one_of("eE"), opt(one_of("+-")), digit1);
    let (rest, literal) = recognize((mantissa, opt(exponent))).parse(input)?;
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok((rest, Expr::Const(value))),
        _ => Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::Float,
        ))),
    }
}

/// identifier: letter or underscore followed by letters, digits, underscores
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn name_or_call(input: &str) -> IResult<&str, Expr> {
    let (input, name) = ws(identifier).parse(input)?;
    let (input, args) = opt(delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expr),
        ws(char(')')),
    ))
    .parse(input)?;
    let node = match args {
        Some(args) => Expr::Call(name.to_string(), args),
        None => Expr::Name(name.to_string()),
    };
    Ok((input, node))
}

fn parens(input: &str) -> IResult<&str, Expr> {
    delimited(ws(char('(')), expr, ws(char(')'))).parse(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    alt((ws(number), name_or_call, parens)).parse(input)
}

/// optional run of prefix signs, e.g. `-`, `+`, `- -`
fn signs(input: &str) -> IResult<&str, Vec<char>> {
    many0(ws(one_of("+-"))).parse(input)
}

fn apply_signs(signs: Vec<char>, operand: Expr) -> Expr {
    signs.into_iter().rev().fold(operand, |acc, sign| match sign {
        '-' => Expr::Neg(Box::new(acc)),
        _ => acc,
    })
}

fn raise(base: Expr, exponent: Option<Expr>) -> Expr {
    match exponent {
        Some(exponent) => Expr::Pow(Box::new(base), Box::new(exponent)),
        None => base,
    }
}

/// Prefix signs and a chain of powers, folded from the right without recursion:
/// `s0 p0 ** s1 p1 ** s2 p2` is `s0 (p0 ** (s1 (p1 ** (s2 p2))))`.
fn unary(input: &str) -> IResult<&str, Expr> {
    let (input, (first_signs, first)) = pair(signs, primary).parse(input)?;
    let (input, tail) =
        many0(preceded(ws(alt((tag("**"), tag("^")))), pair(signs, primary))).parse(input)?;
    let exponent = tail
        .into_iter()
        .rev()
        .fold(None, |acc, (signs, operand)| Some(apply_signs(signs, raise(operand, acc))));
    Ok((input, apply_signs(first_signs, raise(first, exponent))))
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(ws(one_of("*/")), unary)).parse(input)?;
    let node = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => Expr::Mul(Box::new(acc), Box::new(rhs)),
        _ => Expr::Div(Box::new(acc), Box::new(rhs)),
    });
    Ok((input, node))
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), term)).parse(input)?;
    let node = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => Expr::Add(Box::new(acc), Box::new(rhs)),
        _ => Expr::Sub(Box::new(acc), Box::new(rhs)),
    });
    Ok((input, node))
}

/// Checks bracket balance and nesting depth before the recursive parser runs,
/// so malformed brackets get a precise message and deep nesting cannot exhaust the stack.
fn check_brackets(input: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut opened_at = Vec::new();
    for (i, c) in input.char_indices() {
        match c {
            '(' => {
                depth += 1;
                opened_at.push(i);
                if depth > MAX_NESTING {
                    return Err(ParseError::Syntax {
                        position: i,
                        message: "too many nested parentheses".to_string(),
                    });
                }
            }
            ')' => {
                if depth == 0 {
                    return Err(ParseError::Syntax {
                        position: i,
                        message: "unmatched ')'".to_string(),
                    });
                }
                depth -= 1;
                opened_at.pop();
            }
            _ => {}
        }
    }
    match opened_at.last() {
        Some(&position) => Err(ParseError::Syntax {
            position,
            message: "'(' was never closed".to_string(),
        }),
        None => Ok(()),
    }
}

fn describe_leftover(leftover: &str) -> String {
    if leftover.is_empty() {
        "unexpected end of input".to_string()
    } else {
        let snippet: String = leftover.chars().take(12).collect();
        format!("unexpected input '{}'", snippet)
    }
}

/// Parses a formula into an expression tree.
///
/// Positions in syntax errors are byte offsets into the trimmed input.
pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    if input.len() > MAX_LENGTH {
        return Err(ParseError::Syntax {
            position: MAX_LENGTH,
            message: format!("formula longer than {} bytes", MAX_LENGTH),
        });
    }
    check_brackets(input)?;
    match all_consuming(expr).parse(input) {
        Ok((_, tree)) => Ok(tree),
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::Float => Err(ParseError::Syntax {
            position: input.len() - e.input.len(),
            message: "numeric literal out of range".to_string(),
        }),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::Syntax {
            position: input.len() - e.input.len(),
            message: describe_leftover(e.input),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Syntax {
            position: input.len(),
            message: describe_leftover(""),
        }),
    }
}

impl Expr {
    /// parse a formula such as `"sin(x) + x**2"` into an expression tree
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input)
    }
}
