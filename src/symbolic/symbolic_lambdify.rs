use crate::error::{EvaluationError, ParseError};
use crate::symbolic::builtins::{self, Builtin, Function, checked};
use crate::symbolic::symbolic_engine::{Expr, VARIABLE};
use std::sync::Arc;

/// compiled formula: a thread safe closure of the free variable
pub type Lambda = Arc<dyn Fn(f64) -> Result<f64, EvaluationError> + Send + Sync>;

fn lambda<F>(f: F) -> Lambda
where
    F: Fn(f64) -> Result<f64, EvaluationError> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn add(lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
    checked("addition", lhs + rhs, false)
}

fn sub(lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
    checked("subtraction", lhs - rhs, false)
}

fn mul(lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
    checked("multiplication", lhs * rhs, false)
}

fn div(lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
    if rhs == 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    checked("division", lhs / rhs, false)
}

/// the `**` operator: zero to a negative power divides by zero,
/// a negative base with a fractional exponent has no real value
fn power(base: f64, exponent: f64) -> Result<f64, EvaluationError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvaluationError::Domain("power".to_string()));
    }
    checked("power", base.powf(exponent), false)
}

impl Expr {
    /// LAMBDIFICATION - Converting the expression tree to an executable closure
    ///
    /// Every name is resolved here, once: `x` becomes the closure argument, allowed constants
    /// become literals and allowed functions become direct calls. Anything else is rejected,
    /// so the closure can only ever do arithmetic.
    ///
    /// # Errors
    /// - `UnknownName` for identifiers outside the allowed-name table
    /// - `NotAValue` for a function used without a call, e.g. `sin + 1`
    /// - `NotCallable` for a call of the variable or of a constant, e.g. `pi(2)`
    /// - `Arity` for a wrong number of arguments
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x**2 + 1")?.lambdify()?;
    /// assert_eq!(f(3.0)?, 10.0);
    /// ```
    pub fn lambdify(&self) -> Result<Lambda, ParseError> {
        match self {
            Expr::Const(val) => {
                let val = *val;
                Ok(lambda(move |_| Ok(val)))
            }
            Expr::Name(name) if name == VARIABLE => Ok(lambda(Ok)),
            Expr::Name(name) => match builtins::lookup(name) {
                Some(Builtin::Constant(constant)) => {
                    let val = constant.value();
                    Ok(lambda(move |_| Ok(val)))
                }
                Some(Builtin::Function(_)) => Err(ParseError::NotAValue(name.clone())),
                None => Err(ParseError::UnknownName(name.clone())),
            },
            Expr::Neg(expr) => {
                let f = expr.lambdify()?;
                Ok(lambda(move |x| Ok(-f(x)?)))
            }
            Expr::Add(lhs, rhs) => {
                let (lf, rf) = (lhs.lambdify()?, rhs.lambdify()?);
                Ok(lambda(move |x| add(lf(x)?, rf(x)?)))
            }
            Expr::Sub(lhs, rhs) => {
                let (lf, rf) = (lhs.lambdify()?, rhs.lambdify()?);
                Ok(lambda(move |x| sub(lf(x)?, rf(x)?)))
            }
            Expr::Mul(lhs, rhs) => {
                let (lf, rf) = (lhs.lambdify()?, rhs.lambdify()?);
                Ok(lambda(move |x| mul(lf(x)?, rf(x)?)))
            }
            Expr::Div(lhs, rhs) => {
                let (lf, rf) = (lhs.lambdify()?, rhs.lambdify()?);
                Ok(lambda(move |x| div(lf(x)?, rf(x)?)))
            }
            Expr::Pow(base, exp) => {
                let (bf, ef) = (base.lambdify()?, exp.lambdify()?);
                Ok(lambda(move |x| power(bf(x)?, ef(x)?)))
            }
            Expr::Call(name, args) => lambdify_call(name, args),
        }
    }
}

fn lambdify_call(name: &str, args: &[Expr]) -> Result<Lambda, ParseError> {
    let function: Function = match builtins::lookup(name) {
        Some(Builtin::Function(function)) => function,
        Some(Builtin::Constant(_)) => return Err(ParseError::NotCallable(name.to_string())),
        None if name == VARIABLE => return Err(ParseError::NotCallable(name.to_string())),
        None => return Err(ParseError::UnknownName(name.to_string())),
    };
    let arity = function.arity();
    if !arity.accepts(args.len()) {
        return Err(ParseError::Arity {
            name: name.to_string(),
            expected: arity.to_string(),
            got: args.len(),
        });
    }
    let mut arg_fns = args
        .iter()
        .map(Expr::lambdify)
        .collect::<Result<Vec<Lambda>, ParseError>>()?;
    // one and two argument calls are the common case and skip the argument buffer
    match arg_fns.len() {
        1 => {
            let f = arg_fns.remove(0);
            Ok(lambda(move |x| function.apply(&[f(x)?])))
        }
        2 => {
            let g = arg_fns.remove(1);
            let f = arg_fns.remove(0);
            Ok(lambda(move |x| function.apply(&[f(x)?, g(x)?])))
        }
        _ => Ok(lambda(move |x| {
            let values = arg_fns
                .iter()
                .map(|f| f(x))
                .collect::<Result<Vec<f64>, EvaluationError>>()?;
            function.apply(&values)
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn lambdify(input: &str) -> Result<Lambda, ParseError> {
        Expr::parse_expression(input)?.lambdify()
    }

    fn eval(input: &str, x: f64) -> Result<f64, EvaluationError> {
        lambdify(input).unwrap()(x)
    }

    #[test]
    fn test_lambdify_arithmetic() {
        assert_eq!(eval("x**2", 3.0).unwrap(), 9.0);
        assert_eq!(eval("x ^ 3", 2.0).unwrap(), 8.0);
        assert_eq!(eval("2*x + 1", 4.0).unwrap(), 9.0);
        assert_eq!(eval("-x**2", 3.0).unwrap(), -9.0);
        assert_eq!(eval("(-x)**2", 3.0).unwrap(), 9.0);
        assert_eq!(eval("2**-1", 0.0).unwrap(), 0.5);
        assert_eq!(eval("2**3**2", 0.0).unwrap(), 512.0);
        assert_eq!(eval("1/(1+x**2)", 1.0).unwrap(), 0.5);
        assert_eq!(eval("10 - 4 - 3", 0.0).unwrap(), 3.0);
        assert_eq!(eval("0**0", 0.0).unwrap(), 1.0);
        assert_eq!(eval("(-2)**3", 0.0).unwrap(), -8.0);
    }

    #[test]
    fn test_lambdify_functions_and_constants() {
        assert_relative_eq!(eval("sin(x)", PI / 2.0).unwrap(), 1.0);
        assert_relative_eq!(eval("cos(pi)", 0.0).unwrap(), -1.0);
        assert_relative_eq!(eval("exp(1) - e", 0.0).unwrap(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(eval("ln(e**2)", 0.0).unwrap(), 2.0, epsilon = 1e-15);
        assert_relative_eq!(eval("log(100, 10)", 0.0).unwrap(), 2.0, epsilon = 1e-15);
        assert_eq!(eval("max(x, 1, 2)", 5.0).unwrap(), 5.0);
        assert_eq!(eval("min(x, 1, 2)", 5.0).unwrap(), 1.0);
        assert_eq!(eval("abs(x)", -2.0).unwrap(), 2.0);
        assert_eq!(eval("pow(x, 2)", 3.0).unwrap(), 9.0);
        assert_relative_eq!(eval("tau / 2", 0.0).unwrap(), PI);
    }

    #[test]
    fn test_lambdify_rejects_unknown_names() {
        assert_eq!(
            lambdify("y + 1").err(),
            Some(ParseError::UnknownName("y".to_string()))
        );
        assert_eq!(
            lambdify("__import__(x)").err(),
            Some(ParseError::UnknownName("__import__".to_string()))
        );
        assert_eq!(
            lambdify("exec(x)").err(),
            Some(ParseError::UnknownName("exec".to_string()))
        );
        assert_eq!(
            lambdify("inf").err(),
            Some(ParseError::UnknownName("inf".to_string()))
        );
    }

    #[test]
    fn test_lambdify_type_errors() {
        assert_eq!(
            lambdify("sin + 1").err(),
            Some(ParseError::NotAValue("sin".to_string()))
        );
        assert_eq!(
            lambdify("pi(2)").err(),
            Some(ParseError::NotCallable("pi".to_string()))
        );
        assert_eq!(
            lambdify("x(2)").err(),
            Some(ParseError::NotCallable("x".to_string()))
        );
        assert_eq!(
            lambdify("sin(x, 1)").err(),
            Some(ParseError::Arity {
                name: "sin".to_string(),
                expected: "1".to_string(),
                got: 2
            })
        );
        assert!(matches!(
            lambdify("max(x)").err(),
            Some(ParseError::Arity { got: 1, .. })
        ));
    }

    #[test]
    fn test_evaluation_errors() {
        assert_eq!(eval("1/x", 0.0), Err(EvaluationError::DivisionByZero));
        assert_eq!(eval("x**-1", 0.0), Err(EvaluationError::DivisionByZero));
        assert_eq!(
            eval("x**0.5", -1.0),
            Err(EvaluationError::Domain("power".to_string()))
        );
        assert_eq!(
            eval("log(x)", -1.0),
            Err(EvaluationError::Domain("log".to_string()))
        );
        assert_eq!(
            eval("10**x", 400.0),
            Err(EvaluationError::Overflow("power".to_string()))
        );
        assert_eq!(
            eval("x * 1e308 * 10", 1.0),
            Err(EvaluationError::Overflow("multiplication".to_string()))
        );
    }

    #[test]
    fn test_left_operand_fails_first() {
        assert_eq!(
            eval("sqrt(x) + 1/0", -1.0),
            Err(EvaluationError::Domain("sqrt".to_string()))
        );
    }
}
