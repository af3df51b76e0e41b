use crate::error::EvaluationError;
use crate::symbolic::builtins::checked;
use crate::symbolic::expression::Expression;

//////////////////////////////////TRAITS AND IMPLEMENTATIONS/////////////////////////////////

/// Trait for representing a real function of one variable that can be integrated
pub trait Integrand {
    /// Evaluate the function at point x
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError>;

    /// Get function name for debugging/logging
    fn name(&self) -> &str {
        "unnamed_function"
    }
}

impl<F> Integrand for F
where
    F: Fn(f64) -> Result<f64, EvaluationError>,
{
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        self(x)
    }
}

impl Integrand for Expression {
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        self.eval(x)
    }

    fn name(&self) -> &str {
        self.source()
    }
}

/// Simple wrapper for plain closures `f64 -> f64`: a non-finite value is reported
/// as an evaluation error like it is for compiled expressions
pub struct ClosureIntegrand<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
    name: String,
}

impl<F> ClosureIntegrand<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F, name: String) -> Self {
        Self { func, name }
    }
}

impl<F> Integrand for ClosureIntegrand<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        checked(&self.name, (self.func)(x), false)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::expression::compile;

    #[test]
    fn test_closure_integrand() {
        let f = ClosureIntegrand::new(|x| x * x, "x^2".to_string());
        assert_eq!(f.evaluate(3.0).unwrap(), 9.0);
        assert_eq!(f.name(), "x^2");
        let g = ClosureIntegrand::new(|x: f64| x.ln(), "ln".to_string());
        assert_eq!(g.evaluate(-1.0), Err(EvaluationError::Domain("ln".to_string())));
        let h = ClosureIntegrand::new(|x| 1.0 / x, "1/x".to_string());
        assert_eq!(h.evaluate(0.0), Err(EvaluationError::Overflow("1/x".to_string())));
    }

    #[test]
    fn test_fallible_closure_and_expression() {
        let f = |x: f64| -> Result<f64, EvaluationError> { Ok(2.0 * x) };
        assert_eq!(f.evaluate(1.5).unwrap(), 3.0);
        assert_eq!(f.name(), "unnamed_function");
        let e = compile("x + 1").unwrap();
        assert_eq!(Integrand::evaluate(&e, 1.0).unwrap(), 2.0);
        assert_eq!(Integrand::name(&e), "x + 1");
    }
}
