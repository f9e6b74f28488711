//! Expression evaluation and result formatting.
//!
//! Wraps fasteval behind an isolated, configuration-built instance. The
//! functions fasteval lacks as builtins (sqrt, cbrt, ln, exp, pow,
//! factorial, permutations, combinations, plus `pi`/`e` as bare names) are
//! supplied through the instance's namespace, restricted to the function
//! set the configuration enables.

mod radix;

pub use radix::{BaseConversion, dec_to_bin};

use crate::error::CalcError;
use crate::mode::CalculatorMode;

/// Functions the namespace serves in every mode.
const STANDARD_FUNCTIONS: &[&str] = &["pi", "e"];

/// Additional namespace functions unlocked in Scientific mode.
const SCIENTIFIC_FUNCTIONS: &[&str] = &[
    "pi", "e", "sqrt", "cbrt", "ln", "exp", "log10", "pow", "factorial", "permutations",
    "combinations",
];

/// Everything needed to build an evaluator instance. A value object: two
/// sessions with equal configs get interchangeable evaluators, and nothing
/// is shared between instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluatorConfig {
    pub mode: CalculatorMode,
    /// Decimal places the formatter rounds to.
    pub precision: usize,
}

impl EvaluatorConfig {
    fn enabled_functions(&self) -> &'static [&'static str] {
        match self.mode {
            CalculatorMode::Standard => STANDARD_FUNCTIONS,
            CalculatorMode::Scientific => SCIENTIFIC_FUNCTIONS,
        }
    }
}

/// An isolated evaluator built from an [`EvaluatorConfig`].
#[derive(Clone, Debug)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Evaluate a repaired, normalized, mode-authorized expression.
    ///
    /// A syntactic success is not enough: NaN and ±infinity are rejected as
    /// `InvalidResult`, since they must never reach the display.
    pub fn evaluate(&self, expr: &str) -> Result<f64, CalcError> {
        let enabled = self.config.enabled_functions();
        let mut namespace = |name: &str, args: Vec<f64>| -> Option<f64> {
            if !enabled.contains(&name) {
                return None;
            }
            call_function(name, &args)
        };

        let value = fasteval::ez_eval(expr, &mut namespace)
            .map_err(|e| CalcError::Evaluator(format!("{e:?}")))?;

        if !value.is_finite() {
            return Err(CalcError::InvalidResult);
        }
        Ok(value)
    }

    /// Evaluate and render the canonical display string.
    pub fn evaluate_and_format(&self, expr: &str) -> Result<String, CalcError> {
        Ok(format_value(self.evaluate(expr)?, self.config.precision))
    }
}

/// Round to `precision` decimal places, re-parse, and render the minimal
/// string form: `"2"` rather than `"2.0000000000"`, while still bounding
/// floating-point noise.
pub fn format_value(value: f64, precision: usize) -> String {
    let fixed = format!("{value:.precision$}");
    let reparsed: f64 = fixed.parse().unwrap_or(value);
    if reparsed == 0.0 {
        // Also normalizes the "-0" that rounding tiny negatives produces.
        return "0".to_string();
    }
    if reparsed.fract() == 0.0 && reparsed.abs() < 1e15 {
        return format!("{}", reparsed as i64);
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Namespace dispatch for the non-builtin functions.
fn call_function(name: &str, args: &[f64]) -> Option<f64> {
    match (name, args) {
        ("pi", []) => Some(std::f64::consts::PI),
        ("e", []) => Some(std::f64::consts::E),
        ("sqrt", [x]) => Some(x.sqrt()),
        ("cbrt", [x]) => Some(x.cbrt()),
        ("ln", [x]) => Some(x.ln()),
        ("exp", [x]) => Some(x.exp()),
        ("log10", [x]) => Some(x.log10()),
        ("pow", [base, exp]) => Some(base.powf(*exp)),
        ("factorial", [n]) => factorial(*n),
        ("permutations", [n, r]) => falling_product(*n, *r),
        ("combinations", [n, r]) => {
            let numerator = falling_product(*n, *r)?;
            Some(numerator / factorial(*r)?)
        }
        _ => None,
    }
}

/// n! for non-negative integer n; None otherwise. Overflows to infinity,
/// which the finite check upstream rejects.
fn factorial(n: f64) -> Option<f64> {
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return None;
    }
    let mut acc = 1.0_f64;
    let mut k = 2.0;
    while k <= n {
        acc *= k;
        k += 1.0;
    }
    Some(acc)
}

/// n * (n-1) * ... * (n-r+1), i.e. nPr for integer n >= r >= 0.
fn falling_product(n: f64, r: f64) -> Option<f64> {
    if n < 0.0 || r < 0.0 || n.fract() != 0.0 || r.fract() != 0.0 || r > n {
        return None;
    }
    let mut acc = 1.0_f64;
    let mut k = 0.0;
    while k < r {
        acc *= n - k;
        k += 1.0;
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scientific() -> Evaluator {
        Evaluator::new(EvaluatorConfig {
            mode: CalculatorMode::Scientific,
            precision: 10,
        })
    }

    fn standard() -> Evaluator {
        Evaluator::new(EvaluatorConfig {
            mode: CalculatorMode::Standard,
            precision: 10,
        })
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(standard().evaluate_and_format("2+2").unwrap(), "4");
        assert_eq!(standard().evaluate_and_format("2*(3+4)").unwrap(), "14");
    }

    #[test]
    fn test_division_by_zero_is_invalid_result() {
        assert_eq!(standard().evaluate("1/0"), Err(CalcError::InvalidResult));
        assert_eq!(standard().evaluate("0/0"), Err(CalcError::InvalidResult));
    }

    #[test]
    fn test_syntax_error_is_evaluator_failure() {
        assert!(matches!(
            standard().evaluate("2+*2"),
            Err(CalcError::Evaluator(_))
        ));
    }

    #[test]
    fn test_namespace_functions() {
        let eval = scientific();
        assert_eq!(eval.evaluate_and_format("sqrt(16)").unwrap(), "4");
        assert_eq!(eval.evaluate_and_format("cbrt(27)").unwrap(), "3");
        assert_eq!(eval.evaluate_and_format("factorial(5)").unwrap(), "120");
        assert_eq!(eval.evaluate_and_format("pow(2,10)").unwrap(), "1024");
        assert_eq!(eval.evaluate_and_format("permutations(5,2)").unwrap(), "20");
        assert_eq!(eval.evaluate_and_format("combinations(5,2)").unwrap(), "10");
        assert_eq!(eval.evaluate_and_format("ln(e)").unwrap(), "1");
    }

    #[test]
    fn test_constants_available_in_standard() {
        let value = standard().evaluate("pi").unwrap();
        assert!((value - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_standard_namespace_excludes_advanced() {
        // The gate refuses these earlier; the instance itself is also
        // restricted, so there is no shared-singleton loophole.
        assert!(standard().evaluate("sqrt(16)").is_err());
        assert!(standard().evaluate("factorial(5)").is_err());
    }

    #[test]
    fn test_factorial_of_non_integer_fails() {
        assert!(scientific().evaluate("factorial(2.5)").is_err());
        assert!(scientific().evaluate("factorial(0-3)").is_err());
    }

    #[test]
    fn test_format_strips_insignificant_zeros() {
        assert_eq!(format_value(2.0, 10), "2");
        assert_eq!(format_value(2.5, 10), "2.5");
        assert_eq!(format_value(1.0 / 3.0, 10), "0.3333333333");
        assert_eq!(format_value(-4.0, 10), "-4");
        assert_eq!(format_value(-1e-13, 10), "0");
    }

    #[test]
    fn test_format_round_trip_within_tolerance() {
        for &v in &[0.1 + 0.2, 123.456789, -7.25, 1e12 + 0.5, 2.0f64.sqrt()] {
            let rendered = format_value(v, 10);
            let parsed: f64 = rendered.parse().unwrap();
            assert!((parsed - v).abs() < 1e-10, "{v} rendered as {rendered}");
        }
    }
}
