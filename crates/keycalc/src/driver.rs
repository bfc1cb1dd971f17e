//! Presentation glue between an input surface and the engine
//!
//! A [`Session`] owns an [`ExpressionEngine`] and a [`RenderSink`]. Each
//! `on_*` handler maps one button press or keystroke onto one engine operation
//! and then pushes a fresh [`RenderFrame`] to the sink. Frontends never touch
//! the engine directly, so the terminal UI, the scripted CLI and tests all see
//! the same behavior.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::core::functions::UnaryFunction;
use crate::core::Operation;
use crate::engine::{Constant, ExpressionEngine};

/// Errors raised at the presentation seam
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// A label that no button carries
    #[error("Unknown button: {0}")]
    UnknownButton(String),
}

/// Keypad layout selector; never affects engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Digits, four operators, memory keys and a few functions
    #[default]
    Standard,
    /// Adds trigonometry, logarithms, powers, factorial and constants
    Scientific,
}

impl Mode {
    /// Returns the other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Scientific,
            Self::Scientific => Self::Standard,
        }
    }

    /// Returns the display name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Scientific => "Scientific",
        }
    }
}

/// A single engine operation, as triggered by one button or key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Digit `0`-`9` or the decimal point
    Digit(char),
    /// The `00` key
    DoubleZero,
    /// Binary operator
    Operator(Operation),
    /// Evaluate the buffer
    Equals,
    /// Clear buffer, error state and pending label
    Clear,
    /// Remove the last character
    Backspace,
    /// Flip the sign of the whole buffer
    ToggleSign,
    /// Apply a unary function to the evaluated buffer
    Function(UnaryFunction),
    /// Insert π or e
    Constant(Constant),
    /// Insert `(` or `)`
    Bracket(char),
    /// Reset the memory register
    MemoryClear,
    /// Replace the buffer with the memory register
    MemoryRecall,
    /// Add the evaluated buffer to memory
    MemoryAdd,
    /// Subtract the evaluated buffer from memory
    MemorySubtract,
}

/// Every button label and the command it triggers
pub const BUTTONS: &[(&str, Command)] = &[
    ("0", Command::Digit('0')),
    ("1", Command::Digit('1')),
    ("2", Command::Digit('2')),
    ("3", Command::Digit('3')),
    ("4", Command::Digit('4')),
    ("5", Command::Digit('5')),
    ("6", Command::Digit('6')),
    ("7", Command::Digit('7')),
    ("8", Command::Digit('8')),
    ("9", Command::Digit('9')),
    ("00", Command::DoubleZero),
    (".", Command::Digit('.')),
    ("+", Command::Operator(Operation::Add)),
    ("−", Command::Operator(Operation::Subtract)),
    ("×", Command::Operator(Operation::Multiply)),
    ("÷", Command::Operator(Operation::Divide)),
    ("mod", Command::Operator(Operation::Modulo)),
    ("x^y", Command::Operator(Operation::Power)),
    ("=", Command::Equals),
    ("AC", Command::Clear),
    ("⌫", Command::Backspace),
    ("±", Command::ToggleSign),
    ("%", Command::Function(UnaryFunction::Percent)),
    ("√", Command::Function(UnaryFunction::Sqrt)),
    ("x²", Command::Function(UnaryFunction::Square)),
    ("x³", Command::Function(UnaryFunction::Cube)),
    ("1/x", Command::Function(UnaryFunction::Reciprocal)),
    ("!", Command::Function(UnaryFunction::Factorial)),
    ("sin", Command::Function(UnaryFunction::Sin)),
    ("cos", Command::Function(UnaryFunction::Cos)),
    ("tan", Command::Function(UnaryFunction::Tan)),
    ("ln", Command::Function(UnaryFunction::Ln)),
    ("log", Command::Function(UnaryFunction::Log10)),
    ("abs", Command::Function(UnaryFunction::Abs)),
    ("π", Command::Constant(Constant::Pi)),
    ("e", Command::Constant(Constant::E)),
    ("(", Command::Bracket('(')),
    (")", Command::Bracket(')')),
    ("MC", Command::MemoryClear),
    ("MR", Command::MemoryRecall),
    ("M+", Command::MemoryAdd),
    ("M-", Command::MemorySubtract),
];

impl Command {
    /// Resolves a button label.
    ///
    /// ASCII operator spellings (`- * /`) are accepted alongside the keypad
    /// glyphs so labels can be typed on a plain keyboard.
    pub fn from_label(label: &str) -> Result<Self, DriverError> {
        let label = match label {
            "-" => "−",
            "*" => "×",
            "/" => "÷",
            other => other,
        };
        BUTTONS
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, command)| *command)
            .ok_or_else(|| DriverError::UnknownButton(label.to_string()))
    }

    /// Returns the keypad label of this command, if a button carries it
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        BUTTONS
            .iter()
            .find(|(_, command)| command == self)
            .map(|(name, _)| *name)
    }

    /// Runs the command against an engine
    pub fn apply(self, engine: &mut ExpressionEngine) {
        match self {
            Self::Digit(c) => {
                let mut text = [0u8; 4];
                engine.append_digit_or_dot(c.encode_utf8(&mut text));
            }
            Self::DoubleZero => engine.append_digit_or_dot("00"),
            Self::Operator(op) => engine.append_operator(op),
            Self::Equals => engine.evaluate(),
            Self::Clear => engine.clear_all(),
            Self::Backspace => engine.backspace(),
            Self::ToggleSign => engine.toggle_sign(),
            Self::Function(function) => engine.apply_unary(function),
            Self::Constant(constant) => engine.insert_constant(constant),
            Self::Bracket(c) => engine.insert_bracket(c),
            Self::MemoryClear => engine.memory_clear(),
            Self::MemoryRecall => engine.memory_recall(),
            Self::MemoryAdd => engine.memory_add(),
            Self::MemorySubtract => engine.memory_subtract(),
        }
    }
}

/// Toolkit-agnostic keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Return / Enter
    Enter,
    /// Backspace
    Backspace,
    /// Escape
    Escape,
}

/// Maps a keystroke to a command; unbound keys yield `None`
#[must_use]
pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::Enter | Key::Char('=') => Some(Command::Equals),
        Key::Backspace => Some(Command::Backspace),
        Key::Escape => Some(Command::Clear),
        Key::Char(c @ ('0'..='9' | '.')) => Some(Command::Digit(c)),
        Key::Char(c @ ('(' | ')')) => Some(Command::Bracket(c)),
        Key::Char(c @ ('+' | '-' | '*' | '/')) => Operation::from_char(c).map(Command::Operator),
        Key::Char(_) => None,
    }
}

/// Substitutes display glyphs for ASCII operators (`*`→`×`, `/`→`÷`, `-`→`−`)
#[must_use]
pub fn present(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '*' => '×',
            '/' => '÷',
            '-' => '−',
            other => other,
        })
        .collect()
}

/// Everything a frontend shows after a mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderFrame {
    /// Main display text
    pub display: String,
    /// `"<expression> ="` label above the display, as typed
    pub pending: String,
    /// Memory indicator
    pub memory: String,
}

impl RenderFrame {
    /// Builds the frame for the engine's current state
    #[must_use]
    pub fn from_engine(engine: &ExpressionEngine) -> Self {
        Self {
            display: present(engine.display()),
            pending: engine.pending().to_string(),
            memory: engine.memory_display(),
        }
    }
}

/// Receives a frame after every engine mutation
pub trait RenderSink {
    /// Shows the frame
    fn render(&mut self, frame: &RenderFrame);
}

impl<F: FnMut(&RenderFrame)> RenderSink for F {
    fn render(&mut self, frame: &RenderFrame) {
        self(frame);
    }
}

/// Sink that keeps the most recent frame in memory
#[derive(Debug, Clone, Default)]
pub struct FrameCapture {
    last: RenderFrame,
    renders: usize,
}

impl FrameCapture {
    /// Creates an empty capture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recent frame
    #[must_use]
    pub fn last(&self) -> &RenderFrame {
        &self.last
    }

    /// Returns how many frames have been rendered
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl RenderSink for FrameCapture {
    fn render(&mut self, frame: &RenderFrame) {
        self.last = frame.clone();
        self.renders += 1;
    }
}

/// An engine wired to a render sink
#[derive(Debug)]
pub struct Session<R: RenderSink> {
    engine: ExpressionEngine,
    sink: R,
}

impl<R: RenderSink> Session<R> {
    /// Creates a session with a fresh engine and renders the initial frame
    pub fn new(sink: R) -> Self {
        Self::with_engine(ExpressionEngine::new(), sink)
    }

    /// Creates a session around an existing engine and renders its state
    pub fn with_engine(engine: ExpressionEngine, sink: R) -> Self {
        let mut session = Self { engine, sink };
        session.render();
        session
    }

    /// Returns the engine
    #[must_use]
    pub fn engine(&self) -> &ExpressionEngine {
        &self.engine
    }

    /// Returns the sink
    #[must_use]
    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Returns the sink mutably
    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// Returns the frame for the current state without rendering it
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        RenderFrame::from_engine(&self.engine)
    }

    /// Handles a digit, `00` or `.` key
    pub fn on_digit(&mut self, token: &str) -> Result<(), DriverError> {
        let command = match token {
            "00" => Command::DoubleZero,
            _ => match Command::from_label(token)? {
                command @ Command::Digit(_) => command,
                _ => return Err(DriverError::UnknownButton(token.to_string())),
            },
        };
        self.dispatch(command);
        Ok(())
    }

    /// Handles an operator key: `+ - * /`, their glyphs `− × ÷`, or `=`
    pub fn on_operator(&mut self, symbol: &str) -> Result<(), DriverError> {
        let command = match Command::from_label(symbol)? {
            command @ (Command::Operator(
                Operation::Add | Operation::Subtract | Operation::Multiply | Operation::Divide,
            )
            | Command::Equals) => command,
            _ => return Err(DriverError::UnknownButton(symbol.to_string())),
        };
        self.dispatch(command);
        Ok(())
    }

    /// Handles any keypad button by its label
    pub fn on_function(&mut self, label: &str) -> Result<(), DriverError> {
        let command = Command::from_label(label)?;
        self.dispatch(command);
        Ok(())
    }

    /// Handles the `=` key
    pub fn on_equals(&mut self) {
        self.dispatch(Command::Equals);
    }

    /// Handles the `AC` key
    pub fn on_clear(&mut self) {
        self.dispatch(Command::Clear);
    }

    /// Handles the `⌫` key
    pub fn on_backspace(&mut self) {
        self.dispatch(Command::Backspace);
    }

    /// Handles a keystroke; returns false when the key is unbound
    pub fn on_key(&mut self, key: Key) -> bool {
        match command_for_key(key) {
            Some(command) => {
                self.dispatch(command);
                true
            }
            None => false,
        }
    }

    /// Runs a command and renders the result
    pub fn dispatch(&mut self, command: Command) {
        trace!(?command, "dispatch");
        command.apply(&mut self.engine);
        self.render();
    }

    fn render(&mut self) {
        let frame = RenderFrame::from_engine(&self.engine);
        self.sink.render(&frame);
    }
}
