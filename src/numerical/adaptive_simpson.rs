//! # Adaptive Simpson quadrature
//!
//! Recursive refinement of a single Simpson panel. Each panel over `[lo, hi]` is split at its
//! midpoint; the two half-panels need only two new evaluations (the quarter points) because
//! the ends and the midpoint are carried down from the parent.
//!
//! A panel is accepted when `|S_left + S_right - S| <= 15 * eps` or when the depth budget is
//! spent. The accepted value carries the Richardson correction `(S_left + S_right - S) / 15`.
//! Otherwise both halves are refined with `eps / 2` and `depth - 1`.
//!
//! The evaluation counter is returned up the recursion rather than shared, so two calls
//! never see each other's work:
//! - 3 evaluations for the root panel
//! - 2 evaluations for every refined panel
use crate::error::IntegrationError;
use crate::numerical::integrand::Integrand;

/// result of one top-level adaptive integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveOutcome {
    pub value: f64,
    /// integrand evaluations spent by this call only
    pub evaluations: usize,
    /// false if at least one panel was accepted only because the depth budget ran out
    pub converged: bool,
}

impl AdaptiveOutcome {
    pub fn reason(&self) -> &'static str {
        if self.converged {
            "tolerance reached"
        } else {
            "max depth reached"
        }
    }
}

/// Simpson panel over [lo, hi] with the three function values it was built from
#[derive(Debug, Clone, Copy)]
struct Panel {
    lo: f64,
    hi: f64,
    f_lo: f64,
    f_mid: f64,
    f_hi: f64,
    /// Simpson estimate over the panel
    whole: f64,
}

impl Panel {
    fn new(lo: f64, hi: f64, f_lo: f64, f_mid: f64, f_hi: f64) -> Panel {
        Panel {
            lo,
            hi,
            f_lo,
            f_mid,
            f_hi,
            whole: simpson_panel(lo, hi, f_lo, f_mid, f_hi),
        }
    }

    fn mid(&self) -> f64 {
        midpoint(self.lo, self.hi)
    }
}

/// midpoint that does not overflow when `lo + hi` would
fn midpoint(lo: f64, hi: f64) -> f64 {
    lo + 0.5 * (hi - lo)
}

/// three-point Simpson rule (hi - lo) * (f(lo) + 4 f(mid) + f(hi)) / 6
fn simpson_panel(lo: f64, hi: f64, f_lo: f64, f_mid: f64, f_hi: f64) -> f64 {
    (hi - lo) * (f_lo + 4.0 * f_mid + f_hi) / 6.0
}

/// Integrates `f` over `[a, b]` by adaptive Simpson refinement.
///
/// `eps` is the absolute tolerance of the whole interval and `max_depth` the number of
/// times a panel may be halved. Both are taken as given: range checks belong to the caller.
/// The first failing evaluation aborts the integration and its error is returned.
///
/// # Examples
/// ```
/// use RustedQuad::numerical::adaptive_simpson::adaptive_simpson;
/// use RustedQuad::symbolic::expression::compile;
/// let f = compile("sin(x)").unwrap();
/// let outcome = adaptive_simpson(&f, 0.0, std::f64::consts::PI, 1e-8, 20).unwrap();
/// assert!((outcome.value - 2.0).abs() < 1e-7);
/// assert_eq!(outcome.reason(), "tolerance reached");
/// ```
pub fn adaptive_simpson<F>(
    f: &F,
    a: f64,
    b: f64,
    eps: f64,
    max_depth: u32,
) -> Result<AdaptiveOutcome, IntegrationError>
where
    F: Integrand + ?Sized,
{
    let f_a = f.evaluate(a)?;
    let f_b = f.evaluate(b)?;
    let f_c = f.evaluate(midpoint(a, b))?;
    let root = Panel::new(a, b, f_a, f_c, f_b);
    let refined = refine(f, &root, eps, max_depth)?;
    Ok(AdaptiveOutcome {
        value: refined.value,
        evaluations: 3 + refined.evaluations,
        converged: refined.converged,
    })
}

fn refine<F>(f: &F, panel: &Panel, eps: f64, depth: u32) -> Result<AdaptiveOutcome, IntegrationError>
where
    F: Integrand + ?Sized,
{
    let c = panel.mid();
    let f_left_mid = f.evaluate(midpoint(panel.lo, c))?;
    let f_right_mid = f.evaluate(midpoint(c, panel.hi))?;
    let left = Panel::new(panel.lo, c, panel.f_lo, f_left_mid, panel.f_mid);
    let right = Panel::new(c, panel.hi, panel.f_mid, f_right_mid, panel.f_hi);
    let delta = left.whole + right.whole - panel.whole;

    let within_tolerance = delta.abs() <= 15.0 * eps;
    if within_tolerance || depth == 0 {
        return Ok(AdaptiveOutcome {
            value: left.whole + right.whole + delta / 15.0,
            evaluations: 2,
            converged: within_tolerance,
        });
    }

    let half_eps = 0.5 * eps;
    let left_outcome = refine(f, &left, half_eps, depth - 1)?;
    let right_outcome = refine(f, &right, half_eps, depth - 1)?;
    Ok(AdaptiveOutcome {
        value: left_outcome.value + right_outcome.value,
        evaluations: 2 + left_outcome.evaluations + right_outcome.evaluations,
        converged: left_outcome.converged && right_outcome.converged,
    })
}
