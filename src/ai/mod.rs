//! Boundaries to the AI-backed collaborators: the mode classifier and the
//! step-by-step solver behind Teacher Mode.
//!
//! Both are consumed as black boxes behind object-safe async traits. The
//! crate bundles only `RuleBasedClassifier`, a local best-effort stand-in
//! that reproduces the prefilter the remote classifier sits behind; real
//! LLM backends plug in from outside.

use futures::future::BoxFuture;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::function_tokens;
use crate::mode::{ADVANCED_FUNCTIONS, CalculatorMode};

/// The classifier collaborator was unreachable or returned garbage.
/// Callers must degrade to Standard mode, never surface this to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("mode classification failed: {0}")]
pub struct ClassifierError(pub String);

/// The step solver was unreachable or returned garbage. Callers fall back
/// to the plain evaluation path with a visible notification.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("step solver failed: {0}")]
pub struct SolverError(pub String);

/// Decides which mode an expression needs. Best-effort and asynchronous.
pub trait ModeClassifier: Send + Sync {
    fn classify<'a>(
        &'a self,
        expression: &'a str,
    ) -> BoxFuture<'a, Result<CalculatorMode, ClassifierError>>;
}

/// Produces a stepwise explanation of an expression for Teacher Mode.
pub trait StepSolver: Send + Sync {
    fn solve<'a>(&'a self, expression: &'a str) -> BoxFuture<'a, Result<Solution, SolverError>>;
}

/// One step of a worked solution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionStep {
    /// The operation performed, e.g. "evaluate the parentheses".
    pub step: String,
    /// Why this step comes now.
    pub explanation: String,
    /// The expression after the step.
    pub result: String,
}

/// A complete worked solution as returned by the solver collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub steps: Vec<SolutionStep>,
    pub final_answer: String,
}

impl Solution {
    /// Parse the solver's JSON payload.
    pub fn from_json(payload: &str) -> Result<Self, SolverError> {
        serde_json::from_str(payload).map_err(|e| SolverError(e.to_string()))
    }
}

lazy_static! {
    /// Characters that can only appear in scientific input: letters (function
    /// names and constants), the root glyph, exponent, factorial.
    static ref SCIENTIFIC_HINT: Regex = Regex::new(r"[A-Za-z√^!]").unwrap();
}

/// Local rule-based classifier.
///
/// Plain arithmetic is answered without any remote call: an expression with
/// no scientific-looking characters is Standard by construction. Otherwise
/// the decision is made from the advanced-function token set.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    fn classify_sync(expression: &str) -> CalculatorMode {
        let trimmed = expression.trim();
        if trimmed.is_empty() || !SCIENTIFIC_HINT.is_match(trimmed) {
            return CalculatorMode::Standard;
        }
        if trimmed.contains('^') || trimmed.contains('!') || trimmed.contains('√') {
            return CalculatorMode::Scientific;
        }
        let tokens = function_tokens(trimmed);
        if tokens.iter().any(|t| ADVANCED_FUNCTIONS.contains(&t.as_str())) {
            CalculatorMode::Scientific
        } else {
            CalculatorMode::Standard
        }
    }
}

impl ModeClassifier for RuleBasedClassifier {
    fn classify<'a>(
        &'a self,
        expression: &'a str,
    ) -> BoxFuture<'a, Result<CalculatorMode, ClassifierError>> {
        Box::pin(async move { Ok(Self::classify_sync(expression)) })
    }
}

/// Solver stand-in for deployments without an LLM backend: always fails, so
/// the session exercises its documented fallback path.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableSolver;

impl StepSolver for UnavailableSolver {
    fn solve<'a>(&'a self, _expression: &'a str) -> BoxFuture<'a, Result<Solution, SolverError>> {
        Box::pin(async { Err(SolverError("no solver backend configured".into())) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_arithmetic_is_standard() {
        assert_eq!(RuleBasedClassifier::classify_sync("2+2"), CalculatorMode::Standard);
        assert_eq!(RuleBasedClassifier::classify_sync("(1+2)*3"), CalculatorMode::Standard);
        assert_eq!(RuleBasedClassifier::classify_sync(""), CalculatorMode::Standard);
    }

    #[test]
    fn test_advanced_functions_are_scientific() {
        assert_eq!(RuleBasedClassifier::classify_sync("sin(90)"), CalculatorMode::Scientific);
        assert_eq!(RuleBasedClassifier::classify_sync("2^8"), CalculatorMode::Scientific);
        assert_eq!(
            RuleBasedClassifier::classify_sync("factorial(5)"),
            CalculatorMode::Scientific
        );
    }

    #[test]
    fn test_unknown_letters_stay_standard() {
        // Letters alone are only a hint; without an advanced token the
        // expression does not force a mode switch.
        assert_eq!(RuleBasedClassifier::classify_sync("abs(2)"), CalculatorMode::Standard);
    }

    #[test]
    fn test_solution_parses_solver_payload() {
        let payload = r#"{
            "steps": [
                {"step": "evaluate the parentheses", "explanation": "innermost first", "result": "2*7"},
                {"step": "perform the multiplication", "explanation": "multiplication before addition", "result": "14"}
            ],
            "finalAnswer": "14"
        }"#;
        let solution = Solution::from_json(payload).unwrap();
        assert_eq!(solution.steps.len(), 2);
        assert_eq!(solution.final_answer, "14");
    }

    #[test]
    fn test_malformed_payload_is_solver_error() {
        assert!(Solution::from_json("not json").is_err());
    }
}
