//! Compiled formula: the parsed tree together with its lambdified closure.
use crate::error::{EvaluationError, IntegrationError, ParseError};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::Lambda;
use std::fmt;
use std::str::FromStr;

/// point at which every freshly compiled formula is evaluated once
const SANITY_POINT: f64 = 0.0;

/// An immutable, sandboxed function of `x`.
///
/// Clones share the same closure, and the value can be sent across threads.
#[derive(Clone)]
pub struct Expression {
    source: String,
    tree: Expr,
    func: Lambda,
}

impl Expression {
    /// Parses, lambdifies and sanity-checks a formula.
    ///
    /// The formula is evaluated once at `x = 0`. A division by zero there rejects the
    /// formula with [`ParseError::SanityCheck`]; a domain error or an overflow at that point
    /// is passed on unchanged as [`IntegrationError::Evaluation`].
    pub fn compile(input: &str) -> Result<Expression, IntegrationError> {
        let source = input.trim();
        let tree = Expr::parse_expression(source)?;
        let func = tree.lambdify()?;
        match func(SANITY_POINT) {
            Ok(_) => {}
            Err(EvaluationError::DivisionByZero) => {
                return Err(ParseError::SanityCheck(EvaluationError::DivisionByZero).into());
            }
            Err(err) => return Err(err.into()),
        }
        Ok(Expression {
            source: source.to_string(),
            tree,
            func,
        })
    }

    pub fn eval(&self, x: f64) -> Result<f64, EvaluationError> {
        (self.func)(x)
    }

    /// the trimmed formula text this expression was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Expr {
        &self.tree
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Expression")
            .field("source", &self.source)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl FromStr for Expression {
    type Err = IntegrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::compile(s)
    }
}

/// shorthand for [`Expression::compile`]
pub fn compile(expr: &str) -> Result<Expression, IntegrationError> {
    Expression::compile(expr)
}
