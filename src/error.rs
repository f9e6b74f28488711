//! Error taxonomy for the evaluation pipeline.
//!
//! Every variant is recovered at the input-session boundary and collapsed
//! into the single display string `"Error"`; the variants exist so that
//! telemetry and tests can tell the stages apart.

use thiserror::Error;

/// A failure somewhere in the repair → authorize → evaluate pipeline.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    /// The expression ends with an unclosed function call like `sin(`.
    #[error("incomplete function call: {0}(")]
    IncompleteFunction(String),

    /// An advanced function was referenced while in Standard mode.
    #[error("function {0} is not available in Standard mode")]
    Forbidden(String),

    /// The evaluator returned NaN or ±infinity.
    #[error("result is not a finite number")]
    InvalidResult,

    /// The evaluator rejected the expression (syntax or runtime).
    #[error("evaluation failed: {0}")]
    Evaluator(String),

    /// Base conversion was attempted on a non-integer or out-of-range value.
    #[error("cannot convert to binary: {0}")]
    Conversion(String),
}

impl CalcError {
    /// Short stable label used as a tracing field.
    pub fn category(&self) -> &'static str {
        match self {
            Self::IncompleteFunction(_) => "incomplete_function",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidResult => "invalid_result",
            Self::Evaluator(_) => "evaluator_failure",
            Self::Conversion(_) => "conversion_error",
        }
    }
}
