//! # Fixed-partition quadrature rules
//!
//! Non-recursive rules over a uniform partition of `[a, b]` into `n` subintervals:
//! - composite trapezoid rule (exact for polynomials of degree <= 1), `n + 1` evaluations
//! - composite Simpson rule (exact for polynomials of degree <= 3), odd `n` is raised to the
//!   next even number, `n + 1` evaluations of the evened `n`
//! - left, right and midpoint Riemann sums, `n` evaluations
//!
//! Every rule stops at the first failing evaluation and returns its error; there are no
//! partial sums. `b < a` is allowed and gives the negated integral.
use crate::error::{IntegrationError, InputError};
use crate::numerical::integrand::Integrand;
use strum_macros::{Display, EnumIter};

/// value of a fixed-partition rule together with the work spent on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleEstimate {
    pub value: f64,
    /// number of integrand evaluations
    pub evaluations: usize,
    /// number of subintervals actually used (Simpson may even it out)
    pub subdivisions: usize,
}

/// sample point of a Riemann sum inside each subinterval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RiemannRule {
    Left,
    Right,
    Midpoint,
}

impl RiemannRule {
    /// offset of the sample point from the left end, in units of the step
    fn offset(self) -> f64 {
        match self {
            RiemannRule::Left => 0.0,
            RiemannRule::Right => 1.0,
            RiemannRule::Midpoint => 0.5,
        }
    }
}

/// Composite trapezoid rule: h * (f(a)/2 + f(b)/2 + sum f(a + i*h), i = 1..n-1)
pub fn trapezoid<F>(f: &F, a: f64, b: f64, n: usize) -> Result<RuleEstimate, IntegrationError>
where
    F: Integrand + ?Sized,
{
    if n < 1 {
        return Err(InputError::TrapezoidSubdivisions(n).into());
    }
    let h = (b - a) / n as f64;
    let mut sum = 0.5 * (f.evaluate(a)? + f.evaluate(b)?);
    for i in 1..n {
        sum += f.evaluate(a + i as f64 * h)?;
    }
    Ok(RuleEstimate {
        value: h * sum,
        evaluations: n + 1,
        subdivisions: n,
    })
}

/// Composite Simpson rule: (h/3) * (f(a) + f(b) + 4 * sum over odd nodes + 2 * sum over even inner nodes)
pub fn simpson<F>(f: &F, a: f64, b: f64, n: usize) -> Result<RuleEstimate, IntegrationError>
where
    F: Integrand + ?Sized,
{
    if n < 2 {
        return Err(InputError::SimpsonSubdivisions(n).into());
    }
    let n = if n % 2 == 1 { n + 1 } else { n };
    let h = (b - a) / n as f64;
    let mut sum = f.evaluate(a)? + f.evaluate(b)?;
    for i in 1..n {
        let x = a + i as f64 * h;
        if i % 2 == 0 {
            sum += 2.0 * f.evaluate(x)?;
        } else {
            sum += 4.0 * f.evaluate(x)?;
        }
    }
    Ok(RuleEstimate {
        value: sum * h / 3.0,
        evaluations: n + 1,
        subdivisions: n,
    })
}

/// Riemann sum dx * sum f(a + (i + offset)*dx), i = 0..n-1
pub fn riemann_sum<F>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
    rule: RiemannRule,
) -> Result<RuleEstimate, IntegrationError>
where
    F: Integrand + ?Sized,
{
    if n < 1 {
        return Err(InputError::RiemannSubdivisions(n).into());
    }
    let dx = (b - a) / n as f64;
    let offset = rule.offset();
    let mut sum = 0.0;
    for i in 0..n {
        sum += f.evaluate(a + (i as f64 + offset) * dx)?;
    }
    Ok(RuleEstimate {
        value: dx * sum,
        evaluations: n,
        subdivisions: n,
    })
}
