//! The mode policy gate.
//!
//! Standard mode must refuse advanced functions *before* the evaluator is
//! invoked, so a policy refusal is never mistaken for a genuine evaluation
//! error.

use std::collections::BTreeSet;

use crate::error::CalcError;
use crate::mode::CalculatorMode;

/// Function names that require Scientific mode. Includes the meta-operations
/// (`parse`, `simplify`, `derivative`) some front ends expose.
pub const ADVANCED_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh", "acosh",
    "atanh", "log", "log10", "ln", "exp", "sqrt", "cbrt", "pow", "factorial", "permutations",
    "combinations", "parse", "simplify", "derivative",
];

/// Check that every token in the expression is legal under `mode`.
///
/// Scientific authorizes everything. Standard fails with `Forbidden` on the
/// first advanced token (tokens are ordered, so the refusal is
/// deterministic). An empty token set is always authorized.
pub fn authorize(tokens: &BTreeSet<String>, mode: CalculatorMode) -> Result<(), CalcError> {
    if mode == CalculatorMode::Scientific {
        return Ok(());
    }
    for token in tokens {
        if ADVANCED_FUNCTIONS.contains(&token.as_str()) {
            return Err(CalcError::Forbidden(token.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_every_advanced_token_gated() {
        for token in ADVANCED_FUNCTIONS {
            let tokens = set(&[token]);
            assert_eq!(
                authorize(&tokens, CalculatorMode::Standard),
                Err(CalcError::Forbidden(token.to_string()))
            );
            assert_eq!(authorize(&tokens, CalculatorMode::Scientific), Ok(()));
        }
    }

    #[test]
    fn test_constants_allowed_in_standard() {
        assert_eq!(authorize(&set(&["pi", "e"]), CalculatorMode::Standard), Ok(()));
    }

    #[test]
    fn test_empty_always_authorized() {
        assert_eq!(authorize(&BTreeSet::new(), CalculatorMode::Standard), Ok(()));
    }
}
