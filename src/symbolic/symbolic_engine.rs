//! # Symbolic Engine Module
//!
//! Expression tree produced by the formula parser and consumed by the lambdifier.
//!
//! ## Main Structures
//!
//! ### `Expr` Enum
//! - **Leaves**: `Const(f64)` numeric literals and `Name(String)` - the free variable `x`
//!   or one of the allowed constants (`pi`, `e`, `tau`)
//! - **Operations**: `Neg`, `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Calls**: `Call(name, args)` - a call of one of the allowed functions
//!
//! Names are kept as plain strings in the tree. They are resolved against the
//! allowed-name table only when the tree is lambdified, so the tree itself can
//! describe formulas that will be rejected later (`foo(x)`, `pi(2)`).
//!
//! Operator overloading (`std::ops::{Add, Sub, Mul, Div, Neg}`) lets tests and callers
//! build trees with natural syntax: `x.clone() * x + Expr::Const(1.0)`.
use std::fmt;

/// name of the only free variable a formula may contain
pub const VARIABLE: &str = "x";

/// Abstract syntax tree of a single-variable arithmetic formula.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::var();
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "(x + 2)");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numerical constant value
    Const(f64),
    /// Bare identifier: the variable or an allowed constant
    Name(String),
    /// Unary minus: -expr
    Neg(Box<Expr>),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ** exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Function call: name(arg1, arg2, ...)
    Call(String, Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Name(name) => write!(f, "{}", name),
            Expr::Neg(expr) => write!(f, "(-{})", expr),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ** {})", base, exp),
            Expr::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// the free variable `x`
    pub fn var() -> Expr {
        Expr::Name(VARIABLE.to_string())
    }

    pub fn name(name: &str) -> Expr {
        Expr::Name(name.to_string())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Call(name.to_string(), args)
    }

    /// all identifiers used in the tree (variables, constants and called functions), sorted and deduplicated
    pub fn identifiers(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_identifiers(&self, names: &mut Vec<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Name(name) => names.push(name.clone()),
            Expr::Neg(expr) => expr.collect_identifiers(names),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_identifiers(names);
                rhs.collect_identifiers(names);
            }
            Expr::Call(name, args) => {
                names.push(name.clone());
                for arg in args {
                    arg.collect_identifiers(names);
                }
            }
        }
    }

    /// true if the formula depends on `x`
    pub fn contains_variable(&self) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Name(name) => name == VARIABLE,
            Expr::Neg(expr) => expr.contains_variable(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.contains_variable() || rhs.contains_variable(),
            Expr::Call(_, args) => args.iter().any(Expr::contains_variable),
        }
    }
}
