//! # Integration dispatcher
//!
//! Single entry point over the three quadrature strategies:
//! - `"trapezoid"` - composite trapezoid rule, `n` subintervals (default 100)
//! - `"simpson"` - composite Simpson rule, `n` subintervals (default 100, odd `n` is evened)
//! - `"adaptive"` / `"adaptive_simpson"` - adaptive Simpson with tolerance `eps` (default 1e-6)
//!   and depth bound `max_depth` (default 20)
//!
//! Every call returns an [`IntegrationResult`] with the value, the number of integrand
//! evaluations spent and a short human-readable description of what was done.
//! Parameters are validated here, before anything is evaluated.
//!
//! # Examples
//! ```
//! use RustedQuad::numerical::integrate_api::integrate;
//! use RustedQuad::symbolic::expression::compile;
//! let f = compile("x**2").unwrap();
//! let res = integrate(&f, 0.0, 1.0, "trapezoid", Some(2), None, None).unwrap();
//! assert_eq!(res.value, 0.375);
//! assert_eq!(res.evaluation_count, 3);
//! assert_eq!(res.description, "trapezoid with n=2");
//! ```
use crate::error::{InputError, IntegrationError};
use crate::numerical::adaptive_simpson::adaptive_simpson;
use crate::numerical::integrand::Integrand;
use crate::numerical::quadrature::{RiemannRule, riemann_sum, simpson, trapezoid};
use crate::symbolic::expression::Expression;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// quadrature strategy selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    Trapezoid,
    Simpson,
    Adaptive,
}

impl FromStr for Method {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trapezoid" => Ok(Method::Trapezoid),
            "simpson" => Ok(Method::Simpson),
            "adaptive" | "adaptive_simpson" => Ok(Method::Adaptive),
            other => Err(InputError::UnknownMethod(other.to_string())),
        }
    }
}

/// Defaults used when a request leaves a parameter unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    /// subintervals for the trapezoid and Simpson rules
    pub n: usize,
    /// absolute tolerance of the adaptive rule
    pub eps: f64,
    /// depth bound of the adaptive rule
    pub max_depth: u32,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        IntegrationSettings {
            n: 100,
            eps: 1e-6,
            max_depth: 20,
        }
    }
}

impl IntegrationSettings {
    pub fn validate(&self) -> Result<(), InputError> {
        validate_eps(self.eps)?;
        validate_max_depth(self.max_depth)
    }
}

fn validate_eps(eps: f64) -> Result<(), InputError> {
    if eps.is_finite() && eps > 0.0 {
        Ok(())
    } else {
        Err(InputError::Tolerance(eps))
    }
}

fn validate_max_depth(max_depth: u32) -> Result<(), InputError> {
    if max_depth == 0 {
        Err(InputError::MaxDepth(max_depth))
    } else {
        Ok(())
    }
}

/// both bounds and the width `b - a` must be finite
fn validate_bounds(a: f64, b: f64) -> Result<(), InputError> {
    if a.is_finite() && b.is_finite() && (b - a).is_finite() {
        Ok(())
    } else {
        Err(InputError::Bounds(a, b))
    }
}

/// optional per-request parameters; `None` falls back to [`IntegrationSettings`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadratureOptions {
    pub n: Option<usize>,
    pub eps: Option<f64>,
    pub max_depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    pub value: f64,
    pub evaluation_count: usize,
    pub description: String,
}

impl IntegrationResult {
    fn zero_length() -> IntegrationResult {
        IntegrationResult {
            value: 0.0,
            evaluation_count: 1,
            description: "zero-length interval".to_string(),
        }
    }
}

impl fmt::Display for IntegrationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({} evaluations, {})",
            self.value, self.evaluation_count, self.description
        )
    }
}

/// Integrates `f` over `[a, b]` with the method given by name.
///
/// Unset parameters take the default values of [`IntegrationSettings`].
///
/// # Errors
/// - `Input` for an unknown method, non-finite bounds or out-of-range parameters
/// - `Evaluation` if `f` fails at any point the rule samples
pub fn integrate<F>(
    f: &F,
    a: f64,
    b: f64,
    method: &str,
    n: Option<usize>,
    eps: Option<f64>,
    max_depth: Option<u32>,
) -> Result<IntegrationResult, IntegrationError>
where
    F: Integrand + ?Sized,
{
    let method: Method = method.parse()?;
    let options = QuadratureOptions { n, eps, max_depth };
    integrate_with(f, a, b, method, &options, &IntegrationSettings::default())
}

/// Checks the parameters `method` uses once defaults are applied: the bounds, `n` for the
/// fixed-partition rules, `eps` and `max_depth` for the adaptive rule.
pub fn validate_parameters(
    a: f64,
    b: f64,
    method: Method,
    options: &QuadratureOptions,
    settings: &IntegrationSettings,
) -> Result<(), InputError> {
    validate_bounds(a, b)?;
    match method {
        Method::Trapezoid => {
            let n = options.n.unwrap_or(settings.n);
            if n < 1 {
                return Err(InputError::TrapezoidSubdivisions(n));
            }
        }
        Method::Simpson => {
            let n = options.n.unwrap_or(settings.n);
            if n < 2 {
                return Err(InputError::SimpsonSubdivisions(n));
            }
        }
        Method::Adaptive => {
            validate_eps(options.eps.unwrap_or(settings.eps))?;
            validate_max_depth(options.max_depth.unwrap_or(settings.max_depth))?;
        }
    }
    Ok(())
}

/// Same as [`integrate`] with an already parsed method and explicit defaults.
///
/// Parameters are validated before the zero-length shortcut, so `[5, 5]` with `n = 0`
/// is still an error.
pub fn integrate_with<F>(
    f: &F,
    a: f64,
    b: f64,
    method: Method,
    options: &QuadratureOptions,
    settings: &IntegrationSettings,
) -> Result<IntegrationResult, IntegrationError>
where
    F: Integrand + ?Sized,
{
    validate_parameters(a, b, method, options, settings)?;
    if a == b {
        return Ok(IntegrationResult::zero_length());
    }
    match method {
        Method::Trapezoid => {
            let est = trapezoid(f, a, b, options.n.unwrap_or(settings.n))?;
            Ok(IntegrationResult {
                value: est.value,
                evaluation_count: est.evaluations,
                description: format!("trapezoid with n={}", est.subdivisions),
            })
        }
        Method::Simpson => {
            let est = simpson(f, a, b, options.n.unwrap_or(settings.n))?;
            Ok(IntegrationResult {
                value: est.value,
                evaluation_count: est.evaluations,
                description: format!("simpson with n={}", est.subdivisions),
            })
        }
        Method::Adaptive => {
            let eps = options.eps.unwrap_or(settings.eps);
            let max_depth = options.max_depth.unwrap_or(settings.max_depth);
            let outcome = adaptive_simpson(f, a, b, eps, max_depth)?;
            Ok(IntegrationResult {
                value: outcome.value,
                evaluation_count: outcome.evaluations,
                description: format!("adaptive_simpson: {}, eps={:e}", outcome.reason(), eps),
            })
        }
    }
}

/// A compiled expression together with everything needed to integrate it.
#[derive(Debug, Clone)]
pub struct IntegrationRequest {
    pub expression: Expression,
    pub a: f64,
    pub b: f64,
    pub method: Method,
    pub options: QuadratureOptions,
}

impl IntegrationRequest {
    pub fn new(expression: Expression, a: f64, b: f64, method: Method) -> Self {
        IntegrationRequest {
            expression,
            a,
            b,
            method,
            options: QuadratureOptions::default(),
        }
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.options.n = Some(n);
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.options.eps = Some(eps);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.options.max_depth = Some(max_depth);
        self
    }

    /// integrates with the default settings
    pub fn integrate(&self) -> Result<IntegrationResult, IntegrationError> {
        self.integrate_with(&IntegrationSettings::default())
    }

    pub fn integrate_with(
        &self,
        settings: &IntegrationSettings,
    ) -> Result<IntegrationResult, IntegrationError> {
        integrate_with(
            &self.expression,
            self.a,
            self.b,
            self.method,
            &self.options,
            settings,
        )
    }
}

/// Integrates independent requests in parallel. Results are returned in request order.
pub fn integrate_batch(
    requests: &[IntegrationRequest],
    settings: &IntegrationSettings,
) -> Vec<Result<IntegrationResult, IntegrationError>> {
    requests
        .par_iter()
        .map(|request| request.integrate_with(settings))
        .collect()
}

fn riemann_result<F>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
    rule: RiemannRule,
) -> Result<IntegrationResult, IntegrationError>
where
    F: Integrand + ?Sized,
{
    validate_bounds(a, b)?;
    if n < 1 {
        return Err(InputError::RiemannSubdivisions(n).into());
    }
    if a == b {
        return Ok(IntegrationResult::zero_length());
    }
    let est = riemann_sum(f, a, b, n, rule)?;
    Ok(IntegrationResult {
        value: est.value,
        evaluation_count: est.evaluations,
        description: format!("{} riemann sum with n={}", rule, n),
    })
}

/// Runs every rule on the same integrand: left, right and midpoint Riemann sums with `n`
/// subintervals, trapezoid and Simpson with `n`, and adaptive Simpson with the default
/// tolerance. A failing rule is reported in its row and does not stop the others.
pub fn compare_methods<F>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> Vec<(String, Result<IntegrationResult, IntegrationError>)>
where
    F: Integrand + ?Sized,
{
    let settings = IntegrationSettings::default();
    let options = QuadratureOptions {
        n: Some(n),
        ..QuadratureOptions::default()
    };
    let mut rows: Vec<(String, Result<IntegrationResult, IntegrationError>)> = RiemannRule::iter()
        .map(|rule| (rule.to_string(), riemann_result(f, a, b, n, rule)))
        .collect();
    for method in Method::iter() {
        rows.push((
            method.to_string(),
            integrate_with(f, a, b, method, &options, &settings),
        ));
    }
    rows
}
