//! omnicalc: the evaluation-orchestration core of an all-in-one calculator.
//!
//! Raw keypad/voice/keyboard input flows through the input session state
//! machine; on equals it is normalized, heuristically repaired, checked
//! against the Standard/Scientific mode policy, evaluated, formatted, and
//! optionally persisted. Mode switching combines manual selection (with a
//! cool-down suppressing the classifier) and debounced automatic
//! classification. Auth, persistence, and the AI collaborators are
//! consumed through trait boundaries.

pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod history;
pub mod mode;
pub mod session;

pub use config::CalculatorConfig;
pub use error::CalcError;
pub use mode::CalculatorMode;
pub use session::{InputSession, Key, SessionState};
