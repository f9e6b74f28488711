//! Manual/automatic mode switching with a cool-down window.
//!
//! A manual switch suppresses automatic classification for a fixed interval
//! so the classifier cannot immediately fight the user. Automatic results
//! are additionally dropped when stale: each result carries the expression
//! snapshot it was computed for, and it only applies while that snapshot
//! still matches the live expression (the underlying call may be
//! non-cancelable, so staleness is checked here rather than by canceling).

use std::time::{Duration, Instant};

use tracing::debug;

use crate::mode::CalculatorMode;

/// Snapshot handed to the asynchronous classifier; carries the expression
/// text at scheduling time so the outcome can be staleness-checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationTicket {
    pub expression: String,
}

/// Owns the current mode and the switching policy.
#[derive(Debug)]
pub struct ModeController {
    mode: CalculatorMode,
    cooldown: Duration,
    suppress_until: Option<Instant>,
    revert_on_clear: bool,
}

impl ModeController {
    pub fn new(mode: CalculatorMode, cooldown: Duration, revert_on_clear: bool) -> Self {
        Self {
            mode,
            cooldown,
            suppress_until: None,
            revert_on_clear,
        }
    }

    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    /// Manual switch (tab/toggle). Arms the suppression window on an actual
    /// change; re-selecting the current mode is a no-op.
    pub fn select(&mut self, mode: CalculatorMode) {
        self.select_at(mode, Instant::now());
    }

    /// Mint a classification ticket for the current expression. Empty input
    /// never triggers a mode change, so no ticket is produced for it.
    pub fn ticket(&self, expression: &str) -> Option<ClassificationTicket> {
        let trimmed = expression.trim();
        (!trimmed.is_empty()).then(|| ClassificationTicket {
            expression: expression.to_string(),
        })
    }

    /// Apply an automatic classification outcome. Returns whether the mode
    /// actually changed. Dropped when the ticket is stale (the live
    /// expression moved on) or while manual suppression is active.
    pub fn apply_classification(
        &mut self,
        ticket: &ClassificationTicket,
        current_expression: &str,
        mode: CalculatorMode,
    ) -> bool {
        self.apply_classification_at(ticket, current_expression, mode, Instant::now())
    }

    /// Expression cleared; optionally fall back to Standard. The fallback is
    /// a policy flag because it is not universally wanted, and it still
    /// honors the suppression window.
    pub fn note_clear(&mut self) {
        self.note_clear_at(Instant::now());
    }

    fn select_at(&mut self, mode: CalculatorMode, now: Instant) {
        if self.mode != mode {
            self.mode = mode;
            self.suppress_until = Some(now + self.cooldown);
        }
    }

    fn apply_classification_at(
        &mut self,
        ticket: &ClassificationTicket,
        current_expression: &str,
        mode: CalculatorMode,
        now: Instant,
    ) -> bool {
        if ticket.expression != current_expression {
            debug!(ticket = %ticket.expression, "dropping stale classification");
            return false;
        }
        if self.suppressed_at(now) {
            debug!("dropping classification inside suppression window");
            return false;
        }
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    fn note_clear_at(&mut self, now: Instant) {
        if self.revert_on_clear && !self.suppressed_at(now) {
            self.mode = CalculatorMode::Standard;
        }
    }

    fn suppressed_at(&self, now: Instant) -> bool {
        self.suppress_until.is_some_and(|until| now < until)
    }
}
