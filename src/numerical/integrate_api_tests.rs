/////////////////////////////TESTS////////////////////////////////////////////////////
/*
end-to-end tests of the dispatcher:
documented scenarios (formula string -> value, evaluation count, description)
zero-length interval for every method
parameter validation
method comparison
parallel batch
*/

#[cfg(test)]
mod tests {
    use crate::error::{EvaluationError, InputError, IntegrationError, ParseError};
    use crate::numerical::integrate_api::{
        IntegrationRequest, IntegrationResult, IntegrationSettings, Method, QuadratureOptions,
        compare_methods, integrate, integrate_batch, integrate_with,
    };
    use crate::symbolic::expression::compile;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_simpson_quadratic() {
        let f = compile("x**2").unwrap();
        let res = integrate(&f, 0.0, 1.0, "simpson", Some(100), None, None).unwrap();
        assert_relative_eq!(res.value, 1.0 / 3.0, epsilon = 1e-6);
        assert_eq!(res.evaluation_count, 101);
        assert_eq!(res.description, "simpson with n=100");
    }

    #[test]
    fn test_adaptive_sin() {
        let f = compile("sin(x)").unwrap();
        let res = integrate(&f, 0.0, 3.14159265, "adaptive", None, Some(1e-6), None).unwrap();
        assert_relative_eq!(res.value, 2.0, epsilon = 1e-4);
        assert_eq!(res.description, "adaptive_simpson: tolerance reached, eps=1e-6");
        assert_eq!(res.evaluation_count % 2, 1);
    }

    #[test]
    fn test_trapezoid_two_panels() {
        let f = compile("x**2").unwrap();
        let res = integrate(&f, 0.0, 1.0, "trapezoid", Some(2), None, None).unwrap();
        assert_eq!(
            res,
            IntegrationResult {
                value: 0.375,
                evaluation_count: 3,
                description: "trapezoid with n=2".to_string(),
            }
        );
        assert_eq!(res.to_string(), "0.375 (3 evaluations, trapezoid with n=2)");
    }

    #[test]
    fn test_zero_length_interval() {
        let f = compile("x**2").unwrap();
        let expected = IntegrationResult {
            value: 0.0,
            evaluation_count: 1,
            description: "zero-length interval".to_string(),
        };
        let res = integrate(&f, 2.0, 2.0, "simpson", None, None, None).unwrap();
        assert_eq!(res, expected);
        for method in ["trapezoid", "simpson", "adaptive", "adaptive_simpson"] {
            let res = integrate(&f, 5.0, 5.0, method, None, None, None).unwrap();
            assert_eq!(res, expected, "method {}", method);
        }
    }

    #[test]
    fn test_zero_length_does_not_evaluate() {
        // log(x) is undefined at -1, the interval [-1, -1] must not sample it
        let f = |x: f64| -> Result<f64, EvaluationError> {
            if x < 0.0 {
                Err(EvaluationError::Domain("log".to_string()))
            } else {
                Ok(x.ln())
            }
        };
        let res = integrate(&f, -1.0, -1.0, "adaptive", None, None, None).unwrap();
        assert_eq!(res.value, 0.0);
        assert_eq!(res.evaluation_count, 1);
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(
            compile("").unwrap_err(),
            IntegrationError::Parse(ParseError::Empty)
        );
    }

    #[test]
    fn test_adaptive_arctan() {
        let f = compile("1/(1+x**2)").unwrap();
        let res = integrate(&f, 0.0, 1.0, "adaptive", None, None, None).unwrap();
        assert_relative_eq!(res.value, PI / 4.0, epsilon = 1e-5);
        assert_eq!(res.description, "adaptive_simpson: tolerance reached, eps=1e-6");
    }

    #[test]
    fn test_adaptive_alias_and_tolerance_in_description() {
        let f = compile("exp(x)").unwrap();
        let res = integrate(&f, 0.0, 1.0, "adaptive_simpson", None, Some(1e-8), Some(30)).unwrap();
        assert_relative_eq!(res.value, 1.0_f64.exp() - 1.0, epsilon = 1e-8);
        assert_eq!(res.description, "adaptive_simpson: tolerance reached, eps=1e-8");
    }

    #[test]
    fn test_adaptive_depth_limit() {
        let f = compile("sin(x)").unwrap();
        let res = integrate(&f, 0.0, PI, "adaptive", None, None, Some(1)).unwrap();
        assert_eq!(res.description, "adaptive_simpson: max depth reached, eps=1e-6");
        // root panel, one refinement, two refinements at depth 0
        assert_eq!(res.evaluation_count, 9);
    }

    #[test]
    fn test_simpson_odd_n_reports_evened_n() {
        let f = compile("cos(x)").unwrap();
        let odd = integrate(&f, 0.0, 1.0, "simpson", Some(5), None, None).unwrap();
        let even = integrate(&f, 0.0, 1.0, "simpson", Some(6), None, None).unwrap();
        assert_eq!(odd, even);
        assert_eq!(odd.description, "simpson with n=6");
        assert_eq!(odd.evaluation_count, 7);
    }

    #[test]
    fn test_reversed_bounds() {
        let f = compile("x**2").unwrap();
        let res = integrate(&f, 1.0, 0.0, "simpson", None, None, None).unwrap();
        assert_relative_eq!(res.value, -1.0 / 3.0, epsilon = 1e-10);
        let res = integrate(&f, 1.0, 0.0, "adaptive", None, None, None).unwrap();
        assert_relative_eq!(res.value, -1.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_unknown_method() {
        let f = compile("x").unwrap();
        let err = integrate(&f, 0.0, 1.0, "gauss", None, None, None).unwrap_err();
        assert_eq!(
            err,
            IntegrationError::Input(InputError::UnknownMethod("gauss".to_string()))
        );
        assert_eq!(
            err.to_string(),
            "input error: unknown method 'gauss'; use 'trapezoid', 'simpson', or 'adaptive'"
        );
        // method names are case sensitive
        assert!(integrate(&f, 0.0, 1.0, "Simpson", None, None, None).is_err());
        // even a zero-length interval needs a known method
        assert!(integrate(&f, 1.0, 1.0, "romberg", None, None, None).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        let f = compile("x").unwrap();
        assert_eq!(
            integrate(&f, 0.0, 1.0, "trapezoid", Some(0), None, None).unwrap_err(),
            IntegrationError::Input(InputError::TrapezoidSubdivisions(0))
        );
        assert_eq!(
            integrate(&f, 0.0, 1.0, "simpson", Some(1), None, None).unwrap_err(),
            IntegrationError::Input(InputError::SimpsonSubdivisions(1))
        );
        assert_eq!(
            integrate(&f, 3.0, 3.0, "trapezoid", Some(0), None, None).unwrap_err(),
            IntegrationError::Input(InputError::TrapezoidSubdivisions(0))
        );
        assert_eq!(
            integrate(&f, 0.0, 1.0, "adaptive", None, None, Some(0)).unwrap_err(),
            IntegrationError::Input(InputError::MaxDepth(0))
        );
        for eps in [0.0, -1e-6, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                integrate(&f, 0.0, 1.0, "adaptive", None, Some(eps), None),
                Err(IntegrationError::Input(InputError::Tolerance(_)))
            ));
        }
        for (a, b) in [(f64::NEG_INFINITY, 1.0), (0.0, f64::INFINITY), (f64::NAN, 1.0)] {
            assert!(matches!(
                integrate(&f, a, b, "simpson", None, None, None),
                Err(IntegrationError::Input(InputError::Bounds(_, _)))
            ));
        }
    }

    #[test]
    fn test_interval_width_must_be_finite() {
        let f = compile("x").unwrap();
        for method in ["trapezoid", "simpson", "adaptive"] {
            assert_eq!(
                integrate(&f, -1e308, 1e308, method, Some(4), None, None).unwrap_err(),
                IntegrationError::Input(InputError::Bounds(-1e308, 1e308)),
                "method {}",
                method
            );
            assert!(integrate(&f, f64::MAX, -f64::MAX, method, None, None, None).is_err());
        }
        // a + b overflows here, the width does not
        let one = compile("1").unwrap();
        for method in ["trapezoid", "simpson", "adaptive"] {
            let res = integrate(&one, 1e308, 1.5e308, method, None, None, None).unwrap();
            assert_relative_eq!(res.value, 0.5e308, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_evaluation_error_propagates() {
        let f = compile("sqrt(1 - x)").unwrap();
        for method in ["trapezoid", "simpson", "adaptive"] {
            assert_eq!(
                integrate(&f, 0.0, 2.0, method, None, None, None).unwrap_err(),
                IntegrationError::Evaluation(EvaluationError::Domain("sqrt".to_string())),
                "method {}",
                method
            );
        }
        let g = compile("1/(x - 0.5)").unwrap();
        assert_eq!(
            integrate(&g, 0.0, 1.0, "trapezoid", Some(2), None, None).unwrap_err(),
            IntegrationError::Evaluation(EvaluationError::DivisionByZero)
        );
    }

    #[test]
    fn test_custom_settings() {
        let f = compile("x**3").unwrap();
        let settings = IntegrationSettings {
            n: 10,
            eps: 1e-9,
            max_depth: 25,
        };
        assert!(settings.validate().is_ok());
        let res = integrate_with(
            &f,
            0.0,
            1.0,
            Method::Trapezoid,
            &QuadratureOptions::default(),
            &settings,
        )
        .unwrap();
        assert_eq!(res.description, "trapezoid with n=10");
        assert_eq!(res.evaluation_count, 11);
        let options = QuadratureOptions {
            n: Some(4),
            ..QuadratureOptions::default()
        };
        let res = integrate_with(&f, 0.0, 1.0, Method::Simpson, &options, &settings).unwrap();
        assert_relative_eq!(res.value, 0.25, epsilon = 1e-14);
        assert_eq!(res.description, "simpson with n=4");
        let bad = IntegrationSettings {
            eps: 0.0,
            ..IntegrationSettings::default()
        };
        assert_eq!(bad.validate(), Err(InputError::Tolerance(0.0)));
    }

    #[test]
    fn test_method_names() {
        assert_eq!("adaptive_simpson".parse::<Method>(), Ok(Method::Adaptive));
        assert_eq!("trapezoid".parse::<Method>(), Ok(Method::Trapezoid));
        assert_eq!(Method::Simpson.to_string(), "simpson");
        assert_eq!(
            "midpoint".parse::<Method>(),
            Err(InputError::UnknownMethod("midpoint".to_string()))
        );
    }

    #[test]
    fn test_request_builder() {
        let request = IntegrationRequest::new(compile("x**2").unwrap(), 0.0, 1.0, Method::Trapezoid)
            .with_n(2)
            .with_eps(1e-3)
            .with_max_depth(5);
        assert_eq!(request.options.n, Some(2));
        let res = request.integrate().unwrap();
        assert_eq!(res.value, 0.375);
    }

    #[test]
    fn test_compare_methods() {
        let f = compile("x**2").unwrap();
        let rows = compare_methods(&f, 0.0, 1.0, 10);
        let labels: Vec<&str> = rows.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["left", "right", "midpoint", "trapezoid", "simpson", "adaptive"]
        );
        let values: Vec<f64> = rows
            .iter()
            .map(|(_, res)| res.as_ref().unwrap().value)
            .collect();
        assert_relative_eq!(values[0], 0.285, epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.385, epsilon = 1e-12);
        assert_relative_eq!(values[2], 0.3325, epsilon = 1e-12);
        assert_relative_eq!(values[3], 0.335, epsilon = 1e-12);
        assert_relative_eq!(values[4], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(values[5], 1.0 / 3.0, epsilon = 1e-12);
        let (_, left) = &rows[0];
        assert_eq!(
            left.as_ref().unwrap().description,
            "left riemann sum with n=10"
        );
        assert_eq!(left.as_ref().unwrap().evaluation_count, 10);
    }

    #[test]
    fn test_compare_methods_keeps_going_after_a_failure() {
        let f = compile("x").unwrap();
        let rows = compare_methods(&f, 0.0, 1.0, 1);
        assert_eq!(rows.len(), 6);
        let (label, simpson) = &rows[4];
        assert_eq!(label, "simpson");
        assert_eq!(
            simpson.as_ref().unwrap_err(),
            &IntegrationError::Input(InputError::SimpsonSubdivisions(1))
        );
        assert!(rows[3].1.is_ok());
        assert!(rows[5].1.is_ok());
    }

    #[test]
    fn test_integrate_batch_keeps_order() {
        let requests = vec![
            IntegrationRequest::new(compile("x**2").unwrap(), 0.0, 1.0, Method::Trapezoid).with_n(2),
            IntegrationRequest::new(compile("sin(x)").unwrap(), 0.0, PI, Method::Adaptive),
            IntegrationRequest::new(compile("x").unwrap(), 4.0, 4.0, Method::Simpson),
            IntegrationRequest::new(compile("sqrt(1 - x)").unwrap(), 0.0, 2.0, Method::Simpson),
        ];
        let settings = IntegrationSettings::default();
        let results = integrate_batch(&requests, &settings);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().value, 0.375);
        assert_relative_eq!(results[1].as_ref().unwrap().value, 2.0, epsilon = 1e-6);
        assert_eq!(
            results[1].as_ref().unwrap().evaluation_count,
            requests[1].integrate().unwrap().evaluation_count
        );
        assert_eq!(
            results[2].as_ref().unwrap().description,
            "zero-length interval"
        );
        assert!(results[3].is_err());
    }
}
