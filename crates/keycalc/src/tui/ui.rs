//! TUI rendering

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
    Frame,
};

use super::app::CalculatorApp;
use super::keypad::KeypadWidget;
use crate::core::format::format_number;
use crate::engine::ERROR_MARKER;

/// Title of the outer frame
pub const APP_TITLE: &str = " keycalc ";

/// Keyboard shortcuts shown in the sidebar
pub const HELP_SHORTCUTS: &[(&str, &str)] = &[
    ("Enter", "Evaluate"),
    ("Esc", "Clear"),
    ("Bksp", "Delete"),
    ("Tab", "Mode"),
    ("Click", "Press key"),
    ("Ctrl+C", "Quit"),
];

/// Typed operators help
pub const HELP_OPERATORS: &str = "+ - * / ( ) . =";

const KEYPAD_WIDTH: u16 = 32;
const SIDEBAR_WIDTH: u16 = 20;

/// Renders the calculator UI to the frame
pub fn render(app: &CalculatorApp, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(CalculatorUI::new(app), area);
}

/// Returns where the keypad is drawn for a terminal of size `area`
#[must_use]
pub fn keypad_area(area: Rect) -> Rect {
    horizontal_layout(area)[1]
}

fn horizontal_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([
            Constraint::Min(24),               // Display, memory, history
            Constraint::Length(KEYPAD_WIDTH),  // Keypad
            Constraint::Length(SIDEBAR_WIDTH), // Help sidebar
        ])
        .split(area)
        .to_vec()
}

/// Calculator UI widget
#[derive(Debug)]
pub struct CalculatorUI<'a> {
    app: &'a CalculatorApp,
}

impl<'a> CalculatorUI<'a> {
    /// Creates a new calculator UI widget
    #[must_use]
    pub fn new(app: &'a CalculatorApp) -> Self {
        Self { app }
    }

    /// Creates the main layout chunks
    fn create_layout(&self, area: Rect) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Pending expression
                Constraint::Length(3), // Display
                Constraint::Length(3), // Memory + mode
                Constraint::Min(5),    // History
            ])
            .split(area)
            .to_vec()
    }

    fn render_pending(&self, area: Rect, buf: &mut Buffer) {
        let paragraph = Paragraph::new(Span::styled(
            self.app.frame().pending.as_str(),
            Style::default().fg(Color::Gray),
        ))
        .block(
            Block::default()
                .title(" Expression ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        paragraph.render(area, buf);
    }

    fn render_display(&self, area: Rect, buf: &mut Buffer) {
        let display = self.app.frame().display.as_str();

        let style = if display == ERROR_MARKER {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        };

        let paragraph = Paragraph::new(Span::styled(display, style)).block(
            Block::default()
                .title(" Display ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

        paragraph.render(area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(
                self.app.frame().memory.as_str(),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw("  "),
            Span::styled(self.app.mode().name(), Style::default().fg(Color::Cyan)),
        ]);

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .title(" Memory ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );

        paragraph.render(area, buf);
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .app
            .history()
            .iter_rev()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(entry.expression.as_str(), Style::default().fg(Color::Gray)),
                    Span::raw(" = "),
                    Span::styled(format_number(entry.result), Style::default().fg(Color::Cyan)),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(" History ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );

        list.render(area, buf);
    }

    fn render_help_sidebar(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),    // Shortcuts
                Constraint::Length(3), // Operators
            ])
            .split(area);

        let shortcuts: Vec<ListItem> = HELP_SHORTCUTS
            .iter()
            .map(|(key, desc)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{key:>6}"), Style::default().fg(Color::Yellow)),
                    Span::raw(" "),
                    Span::styled(*desc, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let shortcuts_list = List::new(shortcuts).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        shortcuts_list.render(chunks[0], buf);

        let ops = Paragraph::new(Span::styled(
            HELP_OPERATORS,
            Style::default().fg(Color::Cyan),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        ops.render(chunks[1], buf);
    }
}

impl Widget for CalculatorUI<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(APP_TITLE)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .render(area, buf);

        let h_chunks = horizontal_layout(area);
        if h_chunks.len() < 3 {
            return;
        }

        let chunks = self.create_layout(h_chunks[0]);
        if chunks.len() >= 4 {
            self.render_pending(chunks[0], buf);
            self.render_display(chunks[1], buf);
            self.render_status(chunks[2], buf);
            self.render_history(chunks[3], buf);
        }

        KeypadWidget::new(self.app.keypad()).render(h_chunks[1], buf);
        self.render_help_sidebar(h_chunks[2], buf);
    }
}
