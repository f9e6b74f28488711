//! Expression text handling: normalization, heuristic repair, tokenization.
//!
//! These stages run, in order, between raw keypad/voice text and the
//! evaluator. They never evaluate anything themselves.

mod normalize;
mod repair;
mod tokens;

pub use normalize::normalize;
pub use repair::{RepairError, repair};
pub use tokens::function_tokens;

/// Function names the pipeline recognizes, whether built into the evaluator
/// or supplied through the evaluator namespace. Used by the repair stage to
/// detect dangling calls like `sin(`.
pub const KNOWN_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "asinh", "acosh",
    "atanh", "log", "log10", "ln", "exp", "sqrt", "cbrt", "pow", "factorial", "permutations",
    "combinations", "abs", "ceil", "floor", "round", "min", "max",
];
