//! Error taxonomy of the integration engine.
//!
//! - [`ParseError`] - the formula could not be compiled (always raised by `compile`)
//! - [`InputError`] - request parameters are out of range
//! - [`EvaluationError`] - a compiled formula failed at some point of the interval
//!
//! [`IntegrationError`] wraps all three so that the dispatcher has a single error type.
//! [`ConfigError`] belongs to the task-file layer and never reaches the numerical core.
use thiserror::Error;

/// Arithmetic failure while evaluating a compiled formula.
///
/// Carries the failing operation but not the abscissa it was evaluated at.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("math domain error in {0}")]
    Domain(String),
    #[error("numerical result out of range in {0}")]
    Overflow(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty function expression")]
    Empty,
    #[error("invalid syntax at position {position}: {message}")]
    Syntax { position: usize, message: String },
    #[error("name '{0}' is not defined")]
    UnknownName(String),
    #[error("{name}() takes {expected} argument(s) ({got} given)")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
    #[error("'{0}' is not callable")]
    NotCallable(String),
    #[error("function '{0}' used as a value")]
    NotAValue(String),
    #[error("invalid function: {0}")]
    SanityCheck(EvaluationError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("trapezoid: n must be >= 1, got {0}")]
    TrapezoidSubdivisions(usize),
    #[error("simpson: n must be >= 2 (even), got {0}")]
    SimpsonSubdivisions(usize),
    #[error("riemann sum: n must be >= 1, got {0}")]
    RiemannSubdivisions(usize),
    #[error("unknown method '{0}'; use 'trapezoid', 'simpson', or 'adaptive'")]
    UnknownMethod(String),
    #[error("eps must be a positive finite number, got {0}")]
    Tolerance(f64),
    #[error("max_depth must be positive, got {0}")]
    MaxDepth(u32),
    #[error("integration bounds and interval width must be finite, got [{0}, {1}]")]
    Bounds(f64, f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

/// Failure to load a task file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("task file not found: {path}")]
    FileNotFound { path: String },
    #[error("cannot read task file {path}: {message}")]
    Io { path: String, message: String },
    #[error("failed to parse {path}: {message}")]
    ParseError { path: String, message: String },
    #[error("invalid value for '{field}': {message}")]
    ValidationFailed { field: String, message: String },
}
