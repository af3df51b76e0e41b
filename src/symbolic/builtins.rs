//! The allowed-name table: every identifier a formula may reference besides `x`.
//!
//! Names outside this table cannot be resolved by the lambdifier, so a compiled
//! formula has no way to reach anything except these pure numeric functions.
use crate::error::EvaluationError;
use std::collections::HashMap;
use std::f64::consts::{E, PI, TAU};
use std::fmt;
use std::sync::LazyLock;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Constant {
    Pi,
    E,
    Tau,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => PI,
            Constant::E => E,
            Constant::Tau => TAU,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Expm1,
    Exp2,
    /// natural logarithm, or logarithm to a given base with two arguments
    Log,
    Log2,
    Log10,
    Log1p,
    Sqrt,
    Cbrt,
    Floor,
    Ceil,
    Trunc,
    Fabs,
    Abs,
    Degrees,
    Radians,
    Pow,
    Atan2,
    Hypot,
    Fmod,
    Copysign,
    Min,
    Max,
}

/// number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Between(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Between(lo, hi) => write!(f, "{} to {}", lo, hi),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

impl Function {
    pub fn arity(self) -> Arity {
        match self {
            Function::Log => Arity::Between(1, 2),
            Function::Pow
            | Function::Atan2
            | Function::Hypot
            | Function::Fmod
            | Function::Copysign => Arity::Exact(2),
            Function::Min | Function::Max => Arity::AtLeast(2),
            _ => Arity::Exact(1),
        }
    }

    /// functions with a pole inside their domain: an infinite result is a domain error, not an overflow
    fn has_pole(self) -> bool {
        matches!(
            self,
            Function::Log | Function::Log2 | Function::Log10 | Function::Log1p | Function::Atanh
        )
    }

    /// Applies the function to already evaluated arguments.
    ///
    /// The argument count must satisfy [`Function::arity`]; the lambdifier checks it
    /// once at compile time so it is not checked again here.
    pub(crate) fn apply(self, args: &[f64]) -> Result<f64, EvaluationError> {
        debug_assert!(self.arity().accepts(args.len()));
        let x = args[0];
        let value = match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin => x.asin(),
            Function::Acos => x.acos(),
            Function::Atan => x.atan(),
            Function::Sinh => x.sinh(),
            Function::Cosh => x.cosh(),
            Function::Tanh => x.tanh(),
            Function::Asinh => x.asinh(),
            Function::Acosh => x.acosh(),
            Function::Atanh => x.atanh(),
            Function::Exp => x.exp(),
            Function::Expm1 => x.exp_m1(),
            Function::Exp2 => x.exp2(),
            Function::Log if args.len() == 2 => return log_base(x, args[1]),
            Function::Log => x.ln(),
            Function::Log2 => x.log2(),
            Function::Log10 => x.log10(),
            Function::Log1p => x.ln_1p(),
            Function::Sqrt => x.sqrt(),
            Function::Cbrt => x.cbrt(),
            Function::Floor => x.floor(),
            Function::Ceil => x.ceil(),
            Function::Trunc => x.trunc(),
            Function::Fabs | Function::Abs => x.abs(),
            Function::Degrees => x.to_degrees(),
            Function::Radians => x.to_radians(),
            Function::Pow => {
                let y = args[1];
                if x == 0.0 && y < 0.0 {
                    return Err(EvaluationError::Domain(self.to_string()));
                }
                x.powf(y)
            }
            Function::Atan2 => x.atan2(args[1]),
            Function::Hypot => x.hypot(args[1]),
            Function::Fmod => x % args[1],
            Function::Copysign => x.copysign(args[1]),
            Function::Min => args.iter().copied().fold(x, f64::min),
            Function::Max => args.iter().copied().fold(x, f64::max),
        };
        checked(&self.to_string(), value, self.has_pole())
    }
}

fn log_base(x: f64, base: f64) -> Result<f64, EvaluationError> {
    let num = checked("log", x.ln(), true)?;
    let den = checked("log", base.ln(), true)?;
    if den == 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    checked("log", num / den, true)
}

/// Classifies a non-finite result: NaN is a domain error, infinity an overflow
/// (or a domain error at a pole).
pub(crate) fn checked(operation: &str, value: f64, pole: bool) -> Result<f64, EvaluationError> {
    if value.is_nan() || (value.is_infinite() && pole) {
        Err(EvaluationError::Domain(operation.to_string()))
    } else if value.is_infinite() {
        Err(EvaluationError::Overflow(operation.to_string()))
    } else {
        Ok(value)
    }
}

/// an entry of the allowed-name table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Constant(Constant),
    Function(Function),
}

static ALLOWED_NAMES: LazyLock<HashMap<&'static str, Builtin>> = LazyLock::new(|| {
    let mut table: HashMap<&'static str, Builtin> = HashMap::new();
    for constant in Constant::iter() {
        table.insert(constant.into(), Builtin::Constant(constant));
    }
    for function in Function::iter() {
        table.insert(function.into(), Builtin::Function(function));
    }
    table.insert("ln", Builtin::Function(Function::Log));
    table
});

/// Resolves a name against the allowed-name table.
pub fn lookup(name: &str) -> Option<Builtin> {
    ALLOWED_NAMES.get(name).copied()
}

/// all names a formula may reference besides `x`, sorted
pub fn allowed_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = ALLOWED_NAMES.keys().copied().collect();
    names.sort_unstable();
    names
}
