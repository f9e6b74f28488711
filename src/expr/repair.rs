//! Heuristic pre-evaluation repair.
//!
//! Fixes the malformations a keypad naturally produces: double-pressed
//! operator keys and functions left unclosed at the end of input. This is a
//! UX heuristic, not general syntax repair; anything else is left for the
//! evaluator to reject.

use thiserror::Error;

use super::KNOWN_FUNCTIONS;
use crate::error::CalcError;

/// Repair refused to forward the expression to the evaluator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RepairError {
    /// Expression ends with `name(` and nothing else, e.g. `sin(`.
    #[error("incomplete function call: {0}(")]
    IncompleteFunction(String),
}

impl From<RepairError> for CalcError {
    fn from(err: RepairError) -> Self {
        match err {
            RepairError::IncompleteFunction(name) => CalcError::IncompleteFunction(name),
        }
    }
}

/// Repair a normalized expression.
///
/// In order: collapse repeated-operator runs, reject dangling function
/// calls, then append the closing parentheses the user never typed. Excess
/// closing parentheses are deliberately left in place.
///
/// Idempotent: repairing an already-repaired expression is a no-op.
pub fn repair(expr: &str) -> Result<String, RepairError> {
    let collapsed = collapse_operator_runs(expr);

    if let Some(name) = dangling_function(&collapsed) {
        return Err(RepairError::IncompleteFunction(name));
    }

    Ok(balance_parentheses(collapsed))
}

/// Collapse each maximal run of two or more identical `+ - * /` characters
/// into a single occurrence. Mixed runs like `+-` are left alone.
fn collapse_operator_runs(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut prev = None;
    for c in expr.chars() {
        if matches!(c, '+' | '-' | '*' | '/') && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// If the expression ends with a recognized function name immediately
/// followed by a lone `(`, return that name.
fn dangling_function(expr: &str) -> Option<String> {
    let head = expr.strip_suffix('(')?;
    let tail: String = head
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let name: String = tail.chars().rev().collect();
    KNOWN_FUNCTIONS.contains(&name.as_str()).then_some(name)
}

/// Append closing parentheses until opens and closes match. Never strips an
/// excess close.
fn balance_parentheses(mut expr: String) -> String {
    let opens = expr.chars().filter(|&c| c == '(').count();
    let closes = expr.chars().filter(|&c| c == ')').count();
    for _ in closes..opens {
        expr.push(')');
    }
    expr
}
