//! The per-calculation input session.
//!
//! Owns the pending expression and the displayed result, and is the single
//! place where pipeline failures are recovered: whatever stage failed, the
//! display layer only ever sees the literal string `"Error"` plus a
//! notification, while the precise category is kept for telemetry.

mod keys;

pub use keys::UnaryFunc;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::ai::{Solution, StepSolver};
use crate::auth::{Anonymous, Identity};
use crate::config::CalculatorConfig;
use crate::error::CalcError;
use crate::eval::{Evaluator, EvaluatorConfig, dec_to_bin, format_value};
use crate::expr::{function_tokens, normalize, repair};
use crate::history::HistoryRecorder;
use crate::mode::{CalculatorMode, ClassificationTicket, ModeController, authorize};

/// Display text shown for any recovered pipeline failure.
pub const ERROR_DISPLAY: &str = "Error";

/// A keypad/voice/keyboard action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// Digits, ASCII or glyph operators, parentheses, named constants.
    Literal(String),
    /// A unary function key with a fixed expansion template.
    Func(UnaryFunc),
    Percent,
    ToBinary,
    Clear,
    Backspace,
    Equals,
}

/// Lifecycle of one calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Expression is empty.
    Empty,
    /// Expression non-empty, no result shown.
    Editing,
    /// Last action was an evaluation; the expression is preserved alongside
    /// the result (or `"Error"`).
    ResultShown,
}

/// A user-facing toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

pub struct InputSession {
    expression: String,
    display: Option<String>,
    state: SessionState,
    controller: ModeController,
    precision: usize,
    identity: Arc<dyn Identity>,
    recorder: Option<HistoryRecorder>,
    last_error: Option<CalcError>,
    notice: Option<Notice>,
}

impl InputSession {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            expression: String::new(),
            display: None,
            state: SessionState::Empty,
            controller: ModeController::new(
                CalculatorMode::Standard,
                config.cooldown(),
                config.revert_to_standard_on_clear,
            ),
            precision: config.display_precision,
            identity: Arc::new(Anonymous),
            recorder: None,
            last_error: None,
            notice: None,
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn Identity>) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_recorder(mut self, recorder: HistoryRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> CalculatorMode {
        self.controller.mode()
    }

    /// Category of the most recent failure, for telemetry and tests. The
    /// display layer must not use this.
    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    /// Take the pending notification, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Handle one keypad action.
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Clear => self.clear(),
            Key::Backspace => self.backspace(),
            Key::Equals => self.calculate(),
            Key::Percent => self.percent(),
            Key::ToBinary => self.to_binary(),
            Key::Func(func) => {
                self.display = None;
                self.expression = func.apply(&self.expression);
                self.state = SessionState::Editing;
            }
            Key::Literal(text) => {
                // Typing after a result continues the same expression text.
                self.display = None;
                self.expression.push_str(&text);
                self.state = SessionState::Editing;
            }
        }
    }

    /// Replace the whole expression (voice transcript path).
    pub fn set_expression(&mut self, text: &str) {
        self.display = None;
        self.expression = text.to_string();
        self.state = if self.expression.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Editing
        };
    }

    /// Manual mode switch. Resets the calculation, as a tab change starts a
    /// fresh context, and arms the classifier suppression window.
    pub fn select_mode(&mut self, mode: CalculatorMode) {
        self.controller.select(mode);
        self.expression.clear();
        self.display = None;
        self.state = SessionState::Empty;
    }

    /// Mint a classification ticket for the current expression, if any.
    pub fn classification_ticket(&self) -> Option<ClassificationTicket> {
        self.controller.ticket(&self.expression)
    }

    /// Feed back an automatic classification outcome; stale and suppressed
    /// results are dropped. Returns whether the mode changed.
    pub fn apply_classification(
        &mut self,
        ticket: &ClassificationTicket,
        mode: CalculatorMode,
    ) -> bool {
        self.controller
            .apply_classification(ticket, &self.expression, mode)
    }

    /// The normalized, repaired, mode-authorized expression, as Teacher
    /// Mode hands it to the step solver.
    pub fn prepared_expression(&self) -> Result<String, CalcError> {
        let repaired = repair(&normalize(&self.expression))?;
        authorize(&function_tokens(&repaired), self.controller.mode())?;
        Ok(repaired)
    }

    /// Show a solver result (Teacher Mode success path).
    pub fn show_solution(&mut self, solution: &Solution) {
        self.display = Some(solution.final_answer.clone());
        self.state = SessionState::ResultShown;
        self.last_error = None;
    }

    /// Teacher Mode equals: ask the step solver first. On any solver
    /// failure, fall back to the plain evaluation path with a visible
    /// notification, since the user explicitly opted in and should know the
    /// explanation did not run. Returns the solution when there is one.
    pub async fn calculate_with_steps(&mut self, solver: &dyn StepSolver) -> Option<Solution> {
        if self.expression.is_empty() {
            return None;
        }
        let prepared = match self.prepared_expression() {
            Ok(prepared) => prepared,
            Err(err) => {
                self.fail(err);
                return None;
            }
        };

        match solver.solve(&prepared).await {
            Ok(solution) => {
                self.show_solution(&solution);
                Some(solution)
            }
            Err(err) => {
                warn!(%err, "step solver failed; falling back to direct evaluation");
                self.notice = Some(Notice {
                    title: "Teacher Mode unavailable".to_string(),
                    description: "Showing the direct result instead.".to_string(),
                });
                self.calculate();
                None
            }
        }
    }

    fn clear(&mut self) {
        self.expression.clear();
        self.display = None;
        self.state = SessionState::Empty;
        self.controller.note_clear();
    }

    fn backspace(&mut self) {
        self.display = None;
        self.expression.pop();
        self.state = if self.expression.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Editing
        };
    }

    fn calculate(&mut self) {
        if self.expression.is_empty() {
            return;
        }
        match self.evaluate_current() {
            Ok(value) => {
                let formatted = format_value(value, self.precision);
                self.succeed(formatted.clone());
                self.persist(&formatted);
            }
            Err(err) => self.fail(err),
        }
    }

    /// The recommended percent policy: evaluate the current expression,
    /// divide by 100, and replace the expression with the literal result.
    fn percent(&mut self) {
        if self.expression.is_empty() {
            return;
        }
        match self.evaluate_current() {
            Ok(value) => {
                self.expression = format_value(value / 100.0, self.precision);
                self.display = None;
                self.state = SessionState::Editing;
            }
            Err(err) => self.fail(err),
        }
    }

    /// Terminal base conversion: the expression becomes the conversion
    /// record and the display its binary result. Not chainable.
    fn to_binary(&mut self) {
        let value = if !self.expression.is_empty() {
            self.evaluate_current()
        } else if let Some(shown) = &self.display {
            shown
                .parse::<f64>()
                .map_err(|_| CalcError::Conversion("no numeric value to convert".into()))
        } else {
            Err(CalcError::Conversion("nothing to convert".into()))
        };

        match value.and_then(dec_to_bin) {
            Ok(conversion) => {
                self.expression = conversion.record;
                self.succeed(conversion.result);
            }
            Err(err) => self.fail(err),
        }
    }

    /// normalize → repair → authorize → evaluate. Never mutates the
    /// expression, so it survives any failure for further editing.
    fn evaluate_current(&self) -> Result<f64, CalcError> {
        let repaired = repair(&normalize(&self.expression))?;
        let mode = self.controller.mode();
        authorize(&function_tokens(&repaired), mode)?;
        Evaluator::new(EvaluatorConfig {
            mode,
            precision: self.precision,
        })
        .evaluate(&repaired)
    }

    fn succeed(&mut self, display: String) {
        self.display = Some(display);
        self.state = SessionState::ResultShown;
        self.last_error = None;
    }

    fn fail(&mut self, err: CalcError) {
        warn!(category = err.category(), %err, "calculation failed");
        self.notice = Some(Notice {
            title: "Invalid Expression".to_string(),
            description: "Please check your calculation.".to_string(),
        });
        self.last_error = Some(err);
        self.display = Some(ERROR_DISPLAY.to_string());
        self.state = SessionState::ResultShown;
    }

    fn persist(&self, result: &str) {
        let Some(recorder) = &self.recorder else {
            return;
        };
        match self.identity.current_user() {
            Some(user) => recorder.record(&user, &self.expression, result),
            None => debug!("no signed-in user; skipping history record"),
        }
    }
}
