//! Clickable keypad for the TUI calculator
//!
//! Buttons can be clicked with the mouse and are highlighted when the matching
//! key is pressed. Two layouts exist:
//!
//! ```text
//! Standard (6x5)           Scientific (8x5)
//! [MC][MR][M+][M-][AC]     [sin][cos][tan][ln ][log]
//! [± ][% ][√ ][÷ ][⌫ ]     [x^y][√  ][x² ][x³ ][!  ]
//! [7 ][8 ][9 ][× ][( ]     [MC ][MR ][M+ ][M- ][AC ]
//! [4 ][5 ][6 ][− ][) ]     [π  ][e  ][(  ][)  ][⌫  ]
//! [1 ][2 ][3 ][+ ][x²]     [7  ][8  ][9  ][÷  ][mod]
//! [0 ][00][. ][= ][1/x]    [4  ][5  ][6  ][×  ][abs]
//!                          [1  ][2  ][3  ][−  ][±  ]
//!                          [0  ][00 ][.  ][+  ][=  ]
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};

use crate::driver::{Command, Mode};

const COLUMNS: usize = 5;

const STANDARD_LAYOUT: [[&str; COLUMNS]; 6] = [
    ["MC", "MR", "M+", "M-", "AC"],
    ["±", "%", "√", "÷", "⌫"],
    ["7", "8", "9", "×", "("],
    ["4", "5", "6", "−", ")"],
    ["1", "2", "3", "+", "x²"],
    ["0", "00", ".", "=", "1/x"],
];

const SCIENTIFIC_LAYOUT: [[&str; COLUMNS]; 8] = [
    ["sin", "cos", "tan", "ln", "log"],
    ["x^y", "√", "x²", "x³", "!"],
    ["MC", "MR", "M+", "M-", "AC"],
    ["π", "e", "(", ")", "⌫"],
    ["7", "8", "9", "÷", "mod"],
    ["4", "5", "6", "×", "abs"],
    ["1", "2", "3", "−", "±"],
    ["0", "00", ".", "+", "="],
];

/// A single keypad button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButton {
    /// The text on the button
    pub label: &'static str,
    /// Whether the button is currently pressed/highlighted
    pub pressed: bool,
    /// The command this button runs
    pub command: Command,
}

impl KeypadButton {
    /// Creates a button for a label from the command table
    #[must_use]
    pub fn new(label: &'static str) -> Option<Self> {
        Command::from_label(label).ok().map(|command| Self {
            label,
            pressed: false,
            command,
        })
    }

    /// Sets the pressed state
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    fn style(&self) -> Style {
        if self.pressed {
            return Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
        }
        match self.command {
            Command::Digit(_) | Command::DoubleZero => Style::default().fg(Color::White),
            Command::Operator(_) => Style::default().fg(Color::Yellow),
            Command::Equals => Style::default().fg(Color::Green),
            Command::Clear | Command::Backspace => Style::default().fg(Color::Red),
            Command::MemoryClear
            | Command::MemoryRecall
            | Command::MemoryAdd
            | Command::MemorySubtract => Style::default().fg(Color::Magenta),
            _ => Style::default().fg(Color::Cyan),
        }
    }
}

/// A grid of buttons in row-major order
#[derive(Debug, Clone)]
pub struct Keypad {
    buttons: Vec<KeypadButton>,
    cols: usize,
    rows: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::standard()
    }
}

impl Keypad {
    /// Creates the 6x5 standard keypad
    #[must_use]
    pub fn standard() -> Self {
        Self::from_rows(&STANDARD_LAYOUT)
    }

    /// Creates the 8x5 scientific keypad
    #[must_use]
    pub fn scientific() -> Self {
        Self::from_rows(&SCIENTIFIC_LAYOUT)
    }

    /// Creates the keypad for a mode
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Standard => Self::standard(),
            Mode::Scientific => Self::scientific(),
        }
    }

    fn from_rows(rows: &[[&'static str; COLUMNS]]) -> Self {
        let buttons = rows
            .iter()
            .flatten()
            .filter_map(|label| KeypadButton::new(*label))
            .collect();
        Self {
            buttons,
            cols: COLUMNS,
            rows: rows.len(),
        }
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Gets a button by index
    #[must_use]
    pub fn get_button(&self, index: usize) -> Option<&KeypadButton> {
        self.buttons.get(index)
    }

    /// Finds the button that runs a command
    #[must_use]
    pub fn find_button_by_command(&self, command: Command) -> Option<usize> {
        self.buttons.iter().position(|b| b.command == command)
    }

    /// Sets a button as pressed by index
    pub fn press_button(&mut self, index: usize) {
        if let Some(btn) = self.buttons.get_mut(index) {
            btn.set_pressed(true);
        }
    }

    /// Releases all buttons
    pub fn release_all(&mut self) {
        for btn in &mut self.buttons {
            btn.set_pressed(false);
        }
    }

    /// Highlights the button that runs `command`, releasing the others
    pub fn highlight_command(&mut self, command: Command) {
        self.release_all();
        if let Some(idx) = self.find_button_by_command(command) {
            self.press_button(idx);
        }
    }

    /// Returns an iterator over all buttons
    pub fn buttons(&self) -> impl Iterator<Item = &KeypadButton> {
        self.buttons.iter()
    }

    /// Returns an iterator over buttons with their (row, col) positions
    pub fn buttons_with_positions(&self) -> impl Iterator<Item = ((usize, usize), &KeypadButton)> {
        self.buttons.iter().enumerate().map(move |(i, btn)| {
            let row = i / self.cols;
            let col = i % self.cols;
            ((row, col), btn)
        })
    }

    /// Converts a click position to button index
    #[must_use]
    pub fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<usize> {
        if x < area.x || y < area.y || x >= area.x + area.width || y >= area.y + area.height {
            return None;
        }

        let rel_x = x - area.x;
        let rel_y = y - area.y;

        // Account for border (1 char on each side)
        if rel_x == 0 || rel_y == 0 || rel_x >= area.width - 1 || rel_y >= area.height - 1 {
            return None;
        }

        let inner_x = rel_x - 1;
        let inner_y = rel_y - 1;

        let btn_width = (area.width - 2) / self.cols as u16;
        let btn_height = (area.height - 2) / self.rows as u16;

        if btn_width == 0 || btn_height == 0 {
            return None;
        }

        let col = (inner_x / btn_width) as usize;
        let row = (inner_y / btn_height) as usize;

        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}

/// Keypad widget for rendering
#[derive(Debug)]
pub struct KeypadWidget<'a> {
    keypad: &'a Keypad,
}

impl<'a> KeypadWidget<'a> {
    /// Creates a new keypad widget
    #[must_use]
    pub fn new(keypad: &'a Keypad) -> Self {
        Self { keypad }
    }
}

impl Widget for KeypadWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(" Keypad ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .render(area, buf);

        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };

        let (rows, cols) = self.keypad.dimensions();
        if (inner.width as usize) < cols || (inner.height as usize) < rows {
            return; // Too small to render
        }

        let btn_width = inner.width / cols as u16;
        let btn_height = inner.height / rows as u16;

        for ((row, col), btn) in self.keypad.buttons_with_positions() {
            let x = inner.x + (col as u16 * btn_width);
            let y = inner.y + (row as u16 * btn_height);

            let label = format!("[{}]", btn.label);
            let label_width = label.chars().count() as u16;
            if label_width > btn_width {
                continue;
            }

            let label_x = x + (btn_width - label_width) / 2;
            let label_y = y + btn_height / 2;
            if label_y < inner.y + inner.height {
                buf.set_span(label_x, label_y, &Span::styled(label, btn.style()), btn_width);
            }
        }
    }
}
