//! numerical integration of real functions of one variable
//!
/// # Integrand
/// the trait every quadrature rule samples: compiled expressions, fallible closures
/// `f64 -> Result<f64, EvaluationError>` and plain closures wrapped in `ClosureIntegrand`
pub mod integrand;
/// # Quadrature
/// fixed-partition rules: composite trapezoid, composite Simpson, left/right/midpoint Riemann sums
/// Example#1
/// ```
/// use RustedQuad::numerical::quadrature::simpson;
/// use RustedQuad::symbolic::expression::compile;
/// let f = compile("x**3").unwrap();
/// let est = simpson(&f, 0.0, 2.0, 4).unwrap();
/// assert!((est.value - 4.0).abs() < 1e-12);
/// assert_eq!(est.evaluations, 5);
/// ```
pub mod quadrature;
/// # Adaptive Simpson
/// recursive Simpson refinement with Richardson correction, tolerance halving and a depth bound
pub mod adaptive_simpson;
/// # Integration API
/// the dispatcher: method by name, defaults, validation, uniform (value, evaluation count,
/// description) result, method comparison and parallel batches
/// Example#1
/// ```
/// use RustedQuad::numerical::integrate_api::integrate;
/// use RustedQuad::symbolic::expression::compile;
/// let f = compile("1/(1+x**2)").unwrap();
/// let res = integrate(&f, 0.0, 1.0, "adaptive", None, None, None).unwrap();
/// assert!((res.value - std::f64::consts::FRAC_PI_4).abs() < 1e-5);
/// println!("{}", res);
/// ```
pub mod integrate_api;
mod integrate_api_tests;
