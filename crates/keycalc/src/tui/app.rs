//! TUI Application State

use ratatui::layout::Rect;

use crate::core::history::History;
use crate::driver::{Command, DriverError, FrameCapture, Mode, RenderFrame, Session};
use crate::engine::ExpressionEngine;

use super::input::KeyAction;
use super::keypad::Keypad;

/// Calculator application state
#[derive(Debug)]
pub struct CalculatorApp {
    /// Engine wired to an in-memory frame sink
    session: Session<FrameCapture>,
    /// Active keypad layout
    mode: Mode,
    /// Keypad for the active layout, with the last pressed key highlighted
    keypad: Keypad,
    /// Whether the app should quit
    should_quit: bool,
}

impl Default for CalculatorApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorApp {
    /// Creates a calculator app in standard mode
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(Mode::Standard)
    }

    /// Creates a calculator app with the given keypad layout
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            session: Session::new(FrameCapture::new()),
            mode,
            keypad: Keypad::for_mode(mode),
            should_quit: false,
        }
    }

    /// Returns the most recently rendered frame
    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        self.session.sink().last()
    }

    /// Returns the engine
    #[must_use]
    pub fn engine(&self) -> &ExpressionEngine {
        self.session.engine()
    }

    /// Returns the calculation history
    #[must_use]
    pub fn history(&self) -> &History {
        self.session.engine().history()
    }

    /// Returns the active mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the keypad for the active mode
    #[must_use]
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Switches between the standard and scientific keypads.
    ///
    /// Engine state is untouched.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.keypad = Keypad::for_mode(self.mode);
    }

    /// Returns whether the app should quit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Sets the quit flag
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Runs a command and highlights its keypad button
    pub fn execute(&mut self, command: Command) {
        self.session.dispatch(command);
        self.keypad.highlight_command(command);
    }

    /// Presses a keypad button by label
    pub fn press(&mut self, label: &str) -> Result<(), DriverError> {
        let command = Command::from_label(label)?;
        self.execute(command);
        Ok(())
    }

    /// Handles a mouse click at terminal coordinates inside `keypad_area`.
    ///
    /// Returns true when the click landed on a button.
    pub fn click(&mut self, keypad_area: Rect, x: u16, y: u16) -> bool {
        let command = self
            .keypad
            .hit_test(keypad_area, x, y)
            .and_then(|index| self.keypad.get_button(index))
            .map(|button| button.command);

        match command {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Applies an action produced by the input handler
    pub fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Command(command) => self.execute(command),
            KeyAction::ToggleMode => self.toggle_mode(),
            KeyAction::Quit => self.quit(),
            KeyAction::None => {}
        }
    }
}
