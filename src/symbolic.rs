#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String formula into an expression tree
///
///# Example
/// ```
/// use RustedQuad::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 + sin(x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// the expression tree: leaves are numbers and names, nodes are arithmetic operations and calls
/// of allowed functions. Display prints it back fully parenthesized.
pub mod symbolic_engine;
///____________________________________________________________________________________________________________________________
/// # Allowed names
/// the only identifiers besides `x` a formula may reference: real functions of the standard
/// numeric library, `abs`, `min`, `max` and the constants `pi`, `e`, `tau`
pub mod builtins;
///____________________________________________________________________________________________________________________________
/// # Lambdify
/// turns an expression tree into a thread safe Rust closure `f64 -> Result<f64, EvaluationError>`
///# Example
/// ```
/// use RustedQuad::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x**2").unwrap().lambdify().unwrap();
/// assert_eq!(f(3.0).unwrap(), 9.0);
/// ```
pub mod symbolic_lambdify;
///____________________________________________________________________________________________________________________________
/// # Expression
/// parse + lambdify + sanity check at x = 0 in one call
///# Example
/// ```
/// use RustedQuad::symbolic::expression::compile;
/// let f = compile("1/(1+x**2)").unwrap();
/// assert_eq!(f.eval(1.0).unwrap(), 0.5);
/// assert!(compile("1/x").is_err());
/// ```
pub mod expression;
