//! Expression engine: the calculator's state machine
//!
//! The engine owns the input buffer, the memory register, the bounded history
//! and the error flag. Every operation runs to completion synchronously; the
//! presentation layer re-renders afterwards from [`ExpressionEngine::display`],
//! [`ExpressionEngine::pending`] and [`ExpressionEngine::memory_display`].
//!
//! Evaluation failures of any kind put the engine in the error state: the
//! display shows [`ERROR_MARKER`] and the buffer is discarded, so the next digit
//! starts a fresh expression. Memory add/subtract are the exception and swallow
//! their failures silently.

use tracing::{debug, trace, warn};

use crate::core::evaluator::Evaluator;
use crate::core::format::{format_memory, format_number};
use crate::core::functions::UnaryFunction;
use crate::core::history::History;
use crate::core::{CalcError, CalcResult, Calculator, Operation};

/// Text shown on the display while the engine is in the error state
pub const ERROR_MARKER: &str = "Error";

/// Text shown on the display for an empty buffer
pub const EMPTY_DISPLAY: &str = "0";

/// Constants that can be inserted into the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    E,
}

impl Constant {
    /// Returns the numeric value
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    /// Returns the decimal expansion inserted into the buffer
    #[must_use]
    pub fn literal(&self) -> String {
        format_number(self.value())
    }
}

/// Calculator state machine
#[derive(Debug, Clone)]
pub struct ExpressionEngine {
    buffer: String,
    memory: f64,
    history: History,
    error: bool,
    last_error: Option<CalcError>,
    pending: String,
    evaluator: Evaluator,
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEngine {
    /// Creates an engine with an empty buffer, zero memory and empty history
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            memory: 0.0,
            history: History::new(),
            error: false,
            last_error: None,
            pending: String::new(),
            evaluator: Evaluator::new(),
        }
    }

    // ===== Accessors =====

    /// Returns the raw input buffer
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Returns the main display text: the error marker, `"0"` or the buffer
    #[must_use]
    pub fn display(&self) -> &str {
        if self.error {
            ERROR_MARKER
        } else if self.buffer.is_empty() {
            EMPTY_DISPLAY
        } else {
            &self.buffer
        }
    }

    /// Returns true while the engine is in the error state
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Returns the failure behind the current error state
    #[must_use]
    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref().filter(|_| self.error)
    }

    /// Returns the memory register
    #[must_use]
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// Returns the memory indicator text (`"M: 1.235e+04"`)
    #[must_use]
    pub fn memory_display(&self) -> String {
        format_memory(self.memory)
    }

    /// Returns the `"<expression> ="` label of the last evaluation
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Returns the history log
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    // ===== Buffer editing =====

    /// Appends a digit, `00` or `.`.
    ///
    /// Replaces the buffer instead when it is empty, reads `"0"`, or the engine
    /// is in the error state. Repeated decimal points are not rejected here;
    /// the parser reports them on evaluation.
    pub fn append_digit_or_dot(&mut self, token: &str) {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit() || c == '.') {
            warn!(token, "ignoring non-numeric token");
            return;
        }

        if self.error || self.display() == EMPTY_DISPLAY {
            self.buffer.clear();
        }
        self.buffer.push_str(token);
        self.error = false;
        trace!(buffer = %self.buffer, "digit appended");
    }

    /// Appends a binary operator.
    ///
    /// `+ - * /` are rejected when the buffer is empty or already ends with one
    /// of them. `%` and `**` are appended unconditionally, matching the `mod`
    /// and `x^y` keys.
    pub fn append_operator(&mut self, op: Operation) {
        match op {
            Operation::Modulo => self.append_modulo(),
            Operation::Power => self.append_power(),
            Operation::Add | Operation::Subtract | Operation::Multiply | Operation::Divide => {
                if self.buffer.is_empty() || self.ends_with_operator() {
                    trace!(op = op.symbol(), "operator rejected");
                    return;
                }
                self.buffer.push_str(op.symbol());
                trace!(buffer = %self.buffer, "operator appended");
            }
        }
    }

    /// Appends `**`
    pub fn append_power(&mut self) {
        self.append_raw(Operation::Power.symbol());
    }

    /// Appends `%`
    pub fn append_modulo(&mut self) {
        self.append_raw(Operation::Modulo.symbol());
    }

    /// Appends `(` or `)` without balance checking; other characters are ignored
    pub fn insert_bracket(&mut self, bracket: char) {
        if matches!(bracket, '(' | ')') {
            let mut text = [0u8; 4];
            self.append_raw(bracket.encode_utf8(&mut text));
        } else {
            warn!(%bracket, "ignoring non-bracket character");
        }
    }

    /// Inserts the decimal expansion of a constant.
    ///
    /// Replaces the buffer when the display reads `"0"`, otherwise appends.
    pub fn insert_constant(&mut self, constant: Constant) {
        if self.buffer.is_empty() || self.buffer == EMPTY_DISPLAY {
            self.buffer.clear();
        }
        self.append_raw(&constant.literal());
    }

    /// Removes the last character
    pub fn backspace(&mut self) {
        if self.buffer.pop().is_some() {
            trace!(buffer = %self.buffer, "backspace");
        }
    }

    /// Clears the buffer, the error flag and the pending label.
    ///
    /// Memory and history are kept.
    pub fn clear_all(&mut self) {
        self.buffer.clear();
        self.error = false;
        self.pending.clear();
        trace!("cleared");
    }

    /// Flips the sign of the whole buffer by adding or stripping one leading `-`
    pub fn toggle_sign(&mut self) {
        if self.buffer.is_empty() || self.buffer == EMPTY_DISPLAY {
            return;
        }
        if self.buffer.starts_with('-') {
            self.buffer.remove(0);
        } else {
            self.buffer.insert(0, '-');
        }
        trace!(buffer = %self.buffer, "sign toggled");
    }

    /// Replaces the buffer wholesale, leaving the error state
    pub fn set_buffer(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.error = false;
    }

    // ===== Evaluation =====

    /// Evaluates the buffer.
    ///
    /// On success the expression and result are recorded in history, the
    /// pending label becomes `"<expression> ="` and the buffer holds the
    /// result. On failure the engine enters the error state.
    pub fn evaluate(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        match self.evaluator.evaluate_str(&self.buffer) {
            Ok(value) => {
                let expression = std::mem::take(&mut self.buffer);
                debug!(%expression, value, "evaluated");
                self.history.record(&expression, value);
                self.pending = format!("{expression} =");
                self.set_result(value);
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Evaluates the buffer, applies `function` and stores the result
    pub fn apply_unary(&mut self, function: UnaryFunction) {
        if self.buffer.is_empty() {
            return;
        }

        let outcome = self
            .evaluator
            .evaluate_str(&self.buffer)
            .and_then(|value| function.apply(value));

        match outcome {
            Ok(value) => {
                debug!(function = function.name(), value, "function applied");
                self.set_result(value);
            }
            Err(err) => self.fail(&err),
        }
    }

    // ===== Memory register =====

    /// Resets the memory register to zero
    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    /// Replaces the buffer with the memory register
    pub fn memory_recall(&mut self) {
        self.set_result(self.memory);
    }

    /// Adds the evaluated buffer to memory; failures are ignored
    pub fn memory_add(&mut self) {
        self.accumulate(Calculator::add);
    }

    /// Subtracts the evaluated buffer from memory; failures are ignored
    pub fn memory_subtract(&mut self) {
        self.accumulate(Calculator::subtract);
    }

    fn accumulate(&mut self, combine: fn(f64, f64) -> CalcResult<f64>) {
        if self.buffer.is_empty() {
            return;
        }

        let outcome = self
            .evaluator
            .evaluate_str(&self.buffer)
            .and_then(|value| combine(self.memory, value));

        match outcome {
            Ok(memory) => {
                self.memory = memory;
                debug!(memory, "memory updated");
            }
            Err(err) => debug!(%err, "memory update skipped"),
        }
    }

    // ===== Internals =====

    fn append_raw(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.error = false;
        trace!(buffer = %self.buffer, "appended");
    }

    fn ends_with_operator(&self) -> bool {
        self.buffer.ends_with(['+', '-', '*', '/'])
    }

    fn set_result(&mut self, value: f64) {
        self.buffer = format_number(value);
        self.error = false;
    }

    fn fail(&mut self, err: &CalcError) {
        debug!(%err, buffer = %self.buffer, "evaluation failed");
        self.buffer.clear();
        self.error = true;
        self.last_error = Some(err.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn engine_with(buffer: &str) -> ExpressionEngine {
        let mut engine = ExpressionEngine::new();
        engine.set_buffer(buffer);
        engine
    }

    fn type_keys(engine: &mut ExpressionEngine, keys: &str) {
        for c in keys.chars() {
            match c {
                '0'..='9' | '.' => engine.append_digit_or_dot(&c.to_string()),
                '(' | ')' => engine.insert_bracket(c),
                _ => engine.append_operator(Operation::from_char(c).unwrap()),
            }
        }
    }

    // ===== Construction =====

    #[test]
    fn test_new_engine() {
        let engine = ExpressionEngine::new();
        assert_eq!(engine.buffer(), "");
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.memory(), 0.0);
        assert_eq!(engine.memory_display(), "M: 0");
        assert_eq!(engine.pending(), "");
        assert!(!engine.is_error());
        assert!(engine.history().is_empty());
    }

    // ===== Digits =====

    #[test]
    fn test_digits_append() {
        let mut engine = ExpressionEngine::new();
        type_keys(&mut engine, "12.5");
        assert_eq!(engine.buffer(), "12.5");
        assert_eq!(engine.display(), "12.5");
    }

    #[test]
    fn test_digit_replaces_lone_zero() {
        let mut engine = ExpressionEngine::new();
        engine.append_digit_or_dot("0");
        engine.append_digit_or_dot("7");
        assert_eq!(engine.buffer(), "7");
    }

    #[test]
    fn test_double_zero_token() {
        let mut engine = engine_with("5");
        engine.append_digit_or_dot("00");
        assert_eq!(engine.buffer(), "500");
    }

    #[test]
    fn test_multiple_decimal_points_are_accepted_while_typing() {
        let mut engine = ExpressionEngine::new();
        type_keys(&mut engine, "1.2.3");
        assert_eq!(engine.buffer(), "1.2.3");
        engine.evaluate();
        assert!(engine.is_error());
    }

    #[test]
    fn test_non_numeric_token_is_ignored() {
        let mut engine = engine_with("1");
        engine.append_digit_or_dot("x");
        engine.append_digit_or_dot("");
        assert_eq!(engine.buffer(), "1");
    }

    // ===== Operators =====

    #[test]
    fn test_operator_rejected_on_empty_buffer() {
        let mut engine = ExpressionEngine::new();
        engine.append_operator(Operation::Add);
        assert_eq!(engine.buffer(), "");
    }

    #[test]
    fn test_double_operator_rejected() {
        let mut engine = engine_with("5");
        engine.append_operator(Operation::Add);
        engine.append_operator(Operation::Add);
        assert_eq!(engine.buffer(), "5+");
        engine.append_operator(Operation::Multiply);
        assert_eq!(engine.buffer(), "5+");
    }

    #[test]
    fn test_power_and_modulo_append_unconditionally() {
        let mut engine = engine_with("2");
        engine.append_power();
        assert_eq!(engine.buffer(), "2**");
        engine.append_operator(Operation::Add);
        assert_eq!(engine.buffer(), "2**");
        engine.append_digit_or_dot("3");
        engine.append_operator(Operation::Modulo);
        assert_eq!(engine.buffer(), "2**3%");
        engine.append_operator(Operation::Subtract);
        assert_eq!(engine.buffer(), "2**3%-");
    }

    // ===== Evaluation =====

    #[test]
    fn test_evaluate_two_plus_two() {
        let mut engine = engine_with("2+2");
        engine.evaluate();
        assert_eq!(engine.buffer(), "4");
        assert_eq!(engine.display(), "4");
        assert_eq!(engine.pending(), "2+2 =");
        let entries: Vec<_> = engine
            .history()
            .iter()
            .map(|e| (e.expression.clone(), e.result))
            .collect();
        assert_eq!(entries, vec![("2+2".to_string(), 4.0)]);
    }

    #[test]
    fn test_evaluate_empty_is_noop() {
        let mut engine = ExpressionEngine::new();
        engine.evaluate();
        assert!(!engine.is_error());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_result_can_be_extended() {
        let mut engine = engine_with("6*7");
        engine.evaluate();
        type_keys(&mut engine, "+8");
        engine.evaluate();
        assert_eq!(engine.buffer(), "50");
    }

    #[test]
    fn test_division_by_zero_enters_error_state() {
        let mut engine = engine_with("5/0");
        engine.evaluate();
        assert!(engine.is_error());
        assert_eq!(engine.display(), ERROR_MARKER);
        assert_eq!(engine.buffer(), "");
        assert!(engine.history().is_empty());
        assert_eq!(engine.last_error(), Some(&CalcError::DivisionByZero));

        engine.append_digit_or_dot("7");
        assert!(!engine.is_error());
        assert_eq!(engine.last_error(), None);
        assert_eq!(engine.buffer(), "7");
    }

    #[test]
    fn test_error_state_rejects_operators() {
        let mut engine = engine_with("(");
        engine.evaluate();
        assert!(engine.is_error());
        engine.append_operator(Operation::Add);
        assert!(engine.is_error());
        assert_eq!(engine.display(), ERROR_MARKER);
    }

    #[test]
    fn test_failed_evaluation_keeps_pending_label() {
        let mut engine = engine_with("1+1");
        engine.evaluate();
        engine.set_buffer("1/0");
        engine.evaluate();
        assert_eq!(engine.pending(), "1+1 =");
    }

    #[test]
    fn test_deeply_nested_buffer_is_error() {
        let depth = 10_000;
        let mut engine = engine_with(&format!("{}1{}", "(".repeat(depth), ")".repeat(depth)));
        engine.evaluate();
        assert!(engine.is_error());
        assert_eq!(engine.display(), ERROR_MARKER);
        assert!(matches!(engine.last_error(), Some(CalcError::ParseError(_))));

        let mut engine = engine_with(&format!("{}1", "-".repeat(10_000)));
        engine.apply_unary(UnaryFunction::Abs);
        assert!(engine.is_error());
    }

    #[test]
    fn test_history_keeps_five_most_recent() {
        let mut engine = ExpressionEngine::new();
        for i in 1..=6 {
            engine.set_buffer(&format!("{i}*1"));
            engine.evaluate();
        }
        let expressions: Vec<&str> = engine
            .history()
            .iter()
            .map(|e| e.expression.as_str())
            .collect();
        assert_eq!(expressions, vec!["2*1", "3*1", "4*1", "5*1", "6*1"]);
    }

    // ===== Unary functions =====

    #[test]
    fn test_sqrt_of_sixteen() {
        let mut engine = engine_with("16");
        engine.apply_unary(UnaryFunction::Sqrt);
        assert_eq!(engine.buffer(), "4");
    }

    #[test]
    fn test_unary_evaluates_whole_buffer() {
        let mut engine = engine_with("3+2");
        engine.apply_unary(UnaryFunction::Square);
        assert_eq!(engine.buffer(), "25");
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_negative_factorial_is_error() {
        let mut engine = engine_with("-3");
        engine.apply_unary(UnaryFunction::Factorial);
        assert!(engine.is_error());
        assert_eq!(engine.display(), ERROR_MARKER);
    }

    #[test]
    fn test_factorial_truncates() {
        let mut engine = engine_with("5.5");
        engine.apply_unary(UnaryFunction::Factorial);
        assert_eq!(engine.buffer(), "120");
    }

    #[test]
    fn test_percent_and_reciprocal() {
        let mut engine = engine_with("50");
        engine.apply_unary(UnaryFunction::Percent);
        assert_eq!(engine.buffer(), "0.5");
        engine.apply_unary(UnaryFunction::Reciprocal);
        assert_eq!(engine.buffer(), "2");
    }

    #[test]
    fn test_trig_in_degrees() {
        let mut engine = engine_with("90");
        engine.apply_unary(UnaryFunction::Sin);
        assert_eq!(engine.buffer(), "1");
    }

    #[test]
    fn test_unary_on_empty_buffer_is_noop() {
        let mut engine = ExpressionEngine::new();
        engine.apply_unary(UnaryFunction::Sqrt);
        assert_eq!(engine.display(), "0");
        assert!(!engine.is_error());
    }

    #[test]
    fn test_unary_on_malformed_buffer_is_error() {
        let mut engine = engine_with("2+");
        engine.apply_unary(UnaryFunction::Abs);
        assert!(engine.is_error());
    }

    #[test]
    fn test_log_of_zero_is_error() {
        let mut engine = engine_with("0");
        engine.apply_unary(UnaryFunction::Ln);
        assert!(engine.is_error());
    }

    // ===== Constants and brackets =====

    #[test]
    fn test_constant_replaces_zero_display() {
        let mut engine = ExpressionEngine::new();
        engine.insert_constant(Constant::Pi);
        assert_eq!(engine.buffer(), "3.141592653589793");
    }

    #[test]
    fn test_constant_appends_literal_digits() {
        let mut engine = engine_with("2*");
        engine.insert_constant(Constant::E);
        assert_eq!(engine.buffer(), "2*2.718281828459045");

        let mut engine = engine_with("2");
        engine.insert_constant(Constant::Pi);
        assert_eq!(engine.buffer(), "23.141592653589793");
    }

    #[test]
    fn test_constant_after_error_starts_fresh() {
        let mut engine = engine_with("1/0");
        engine.evaluate();
        engine.insert_constant(Constant::Pi);
        assert!(!engine.is_error());
        assert_eq!(engine.buffer(), "3.141592653589793");
    }

    #[test]
    fn test_brackets_unbalanced_allowed() {
        let mut engine = ExpressionEngine::new();
        engine.insert_bracket('(');
        engine.insert_bracket('(');
        engine.insert_bracket(')');
        engine.insert_bracket('[');
        assert_eq!(engine.buffer(), "(()");
    }

    #[test]
    fn test_bracketed_expression_evaluates() {
        let mut engine = ExpressionEngine::new();
        type_keys(&mut engine, "(2+3)*4");
        engine.evaluate();
        assert_eq!(engine.buffer(), "20");
    }

    // ===== Backspace, clear, sign =====

    #[test]
    fn test_backspace_to_empty_shows_zero() {
        let mut engine = engine_with("12");
        engine.backspace();
        assert_eq!(engine.display(), "1");
        engine.backspace();
        assert_eq!(engine.display(), "0");
        engine.backspace();
        assert_eq!(engine.display(), "0");
    }

    #[test]
    fn test_backspace_in_error_state_keeps_marker() {
        let mut engine = engine_with("1/0");
        engine.evaluate();
        engine.backspace();
        assert_eq!(engine.display(), ERROR_MARKER);
    }

    #[test]
    fn test_clear_all_keeps_memory_and_history() {
        let mut engine = engine_with("9");
        engine.memory_add();
        engine.set_buffer("1+1");
        engine.evaluate();
        engine.set_buffer("1/0");
        engine.evaluate();

        engine.clear_all();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.pending(), "");
        assert!(!engine.is_error());
        assert_eq!(engine.history().len(), 1);

        engine.memory_recall();
        assert_eq!(engine.buffer(), "9");
    }

    #[test]
    fn test_toggle_sign() {
        let mut engine = engine_with("5");
        engine.toggle_sign();
        assert_eq!(engine.buffer(), "-5");
        engine.toggle_sign();
        assert_eq!(engine.buffer(), "5");
    }

    #[test]
    fn test_toggle_sign_whole_buffer() {
        let mut engine = engine_with("2-3");
        engine.toggle_sign();
        assert_eq!(engine.buffer(), "-2-3");
    }

    #[test]
    fn test_toggle_sign_ignores_zero_and_empty() {
        let mut engine = engine_with("0");
        engine.toggle_sign();
        assert_eq!(engine.buffer(), "0");

        let mut engine = ExpressionEngine::new();
        engine.toggle_sign();
        assert_eq!(engine.buffer(), "");
    }

    #[test]
    fn test_toggle_sign_is_not_an_involution_on_bare_sign() {
        // 5 ± ⌫ leaves a lone "-": stripping it empties the buffer for good
        let mut engine = engine_with("5");
        engine.toggle_sign();
        engine.backspace();
        assert_eq!(engine.buffer(), "-");
        engine.toggle_sign();
        engine.toggle_sign();
        assert_eq!(engine.buffer(), "");

        // "-0" strips to "0", which the toggle leaves alone
        let mut engine = engine_with("-0");
        engine.toggle_sign();
        engine.toggle_sign();
        assert_eq!(engine.buffer(), "0");
    }

    // ===== Memory =====

    #[test]
    fn test_memory_add_and_subtract() {
        let mut engine = engine_with("10");
        engine.memory_add();
        engine.memory_add();
        engine.set_buffer("2*2");
        engine.memory_subtract();
        assert_eq!(engine.memory(), 16.0);
        // the buffer is left alone
        assert_eq!(engine.buffer(), "2*2");
    }

    #[test]
    fn test_memory_failure_is_swallowed() {
        let mut engine = engine_with("5");
        engine.memory_add();
        engine.set_buffer("1/0");
        engine.memory_add();
        engine.memory_subtract();
        assert_eq!(engine.memory(), 5.0);
        assert!(!engine.is_error());
        assert_eq!(engine.display(), "1/0");
    }

    #[test]
    fn test_memory_clear_and_recall() {
        let mut engine = engine_with("2.5");
        engine.memory_add();
        engine.memory_recall();
        assert_eq!(engine.buffer(), "2.5");
        engine.memory_clear();
        engine.memory_recall();
        assert_eq!(engine.buffer(), "0");
        assert_eq!(engine.display(), "0");
    }

    #[test]
    fn test_memory_display_uses_four_significant_digits() {
        let mut engine = engine_with("12345.6");
        engine.memory_add();
        assert_eq!(engine.memory_display(), "M: 1.235e+04");
    }

    #[test]
    fn test_memory_recall_leaves_error_state() {
        let mut engine = engine_with("1/0");
        engine.evaluate();
        engine.memory_recall();
        assert!(!engine.is_error());
        assert_eq!(engine.display(), "0");
    }

    // ===== Constant tests =====

    #[test]
    fn test_constant_literals() {
        assert_eq!(Constant::Pi.literal(), "3.141592653589793");
        assert_eq!(Constant::E.literal(), "2.718281828459045");
    }
}
