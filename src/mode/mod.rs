//! Calculator modes: the Standard/Scientific authorization tiers, the
//! policy gate, and manual/automatic mode switching.

mod auto;
mod policy;
mod switching;

pub use auto::{next_outcome, run_classifier};
pub use policy::{ADVANCED_FUNCTIONS, authorize};
pub use switching::{ClassificationTicket, ModeController};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two authorization tiers. Standard restricts evaluation to plain
/// arithmetic; Scientific unlocks the advanced function set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculatorMode {
    #[default]
    Standard,
    Scientific,
}

impl fmt::Display for CalculatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard"),
            Self::Scientific => write!(f, "Scientific"),
        }
    }
}
