//! Policy configuration.
//!
//! Loaded from `<config dir>/omnicalc/config.toml`; every field has a
//! default, so a missing or partial file is fine and a malformed one only
//! logs a warning.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Decimal places results are rounded to before display.
    pub display_precision: usize,
    /// Cool-down after a manual mode switch during which automatic
    /// classification is ignored.
    pub mode_cooldown_ms: u64,
    /// Quiescence interval before an edited expression is classified.
    pub classify_debounce_ms: u64,
    /// Whether clearing the expression reverts Scientific back to Standard.
    pub revert_to_standard_on_clear: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            display_precision: 10,
            mode_cooldown_ms: 1000,
            classify_debounce_ms: 500,
            revert_to_standard_on_clear: false,
        }
    }
}

impl CalculatorConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.mode_cooldown_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.classify_debounce_ms)
    }

    /// Load from the default location.
    pub fn load() -> Self {
        match default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path; absent file means defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed config; using defaults");
                Self::default()
            }
        }
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("omnicalc").join("config.toml"))
}
