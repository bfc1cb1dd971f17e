//! Command runners

use crossterm::event::{self, Event};
use keycalc::driver::{FrameCapture, Session};
use keycalc::engine::ExpressionEngine;
use keycalc::tui::{keypad_area, render, CalculatorApp, InputHandler};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{EvalReport, PressReport, Reporter};
use crate::terminal;

/// Evaluates one expression and prints the result
pub fn run_eval(config: &CliConfig, expression: &str) -> CliResult<()> {
    let report = evaluate_expression(expression)?;
    Reporter::new(config).eval(&report)
}

/// Feeds button labels through a session and prints the final frame
pub fn run_press(config: &CliConfig, labels: &[String]) -> CliResult<()> {
    let report = press_labels(labels)?;
    Reporter::new(config).press(&report)
}

/// Runs the interactive calculator until the user quits
pub fn run_tui(config: &CliConfig) -> CliResult<()> {
    info!(mode = config.mode.name(), "starting calculator");
    terminal::install_panic_hook();
    let mut term = terminal::setup_terminal()?;

    let mut app = CalculatorApp::with_mode(config.mode);
    let result = run_app(&mut term, &mut app);

    terminal::restore_terminal()?;
    term.show_cursor()?;
    info!(evaluations = app.history().len(), "calculator closed");
    result
}

/// Evaluates `expression` with a fresh engine
pub fn evaluate_expression(expression: &str) -> CliResult<EvalReport> {
    if expression.trim().is_empty() {
        return Err(CliError::invalid_argument("expression is empty"));
    }

    let mut engine = ExpressionEngine::new();
    engine.set_buffer(expression);
    engine.evaluate();

    if let Some(err) = engine.last_error() {
        return Err(err.clone().into());
    }

    let result = engine
        .history()
        .last()
        .map(|entry| entry.result)
        .ok_or_else(|| CliError::invalid_argument("expression produced no result"))?;

    Ok(EvalReport {
        expression: expression.to_string(),
        result,
        display: engine.buffer().to_string(),
    })
}

/// Presses each label in order and collects the final state
pub fn press_labels(labels: &[String]) -> CliResult<PressReport> {
    let mut session = Session::new(FrameCapture::new());
    for label in labels {
        session.on_function(label)?;
    }
    debug!(presses = labels.len(), "labels applied");

    Ok(PressReport {
        frame: session.sink().last().clone(),
        history: session.engine().history().iter().cloned().collect(),
    })
}

/// Applies one terminal event to the app
///
/// `screen` is the full terminal area; mouse clicks are hit-tested against the
/// keypad inside it.
pub fn handle_event(app: &mut CalculatorApp, input: &InputHandler, event: &Event, screen: Rect) {
    match event {
        Event::Key(key) => app.handle_action(input.handle_key(*key)),
        Event::Mouse(mouse) => {
            if let Some((x, y)) = input.handle_mouse(*mouse) {
                app.click(keypad_area(screen), x, y);
            }
        }
        _ => {}
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut CalculatorApp) -> CliResult<()> {
    let input = InputHandler::new();

    while !app.should_quit() {
        terminal.draw(|f| render(app, f))?;

        let event = event::read()?;
        let size = terminal.size()?;
        handle_event(app, &input, &event, Rect::new(0, 0, size.width, size.height));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use keycalc::core::CalcError;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    mod eval_tests {
        use super::*;

        #[test]
        fn test_precedence() {
            let report = evaluate_expression("2+3*4").unwrap();
            assert!((report.result - 14.0).abs() < f64::EPSILON);
            assert_eq!(report.display, "14");
        }

        #[test]
        fn test_unary_minus_binds_looser_than_power() {
            let report = evaluate_expression("-2**2").unwrap();
            assert_eq!(report.display, "-4");
        }

        #[test]
        fn test_division_by_zero() {
            let err = evaluate_expression("5/0").unwrap_err();
            assert!(matches!(err, CliError::Calculation(CalcError::DivisionByZero)));
        }

        #[test]
        fn test_syntax_error() {
            assert!(matches!(
                evaluate_expression("2+*3"),
                Err(CliError::Calculation(_))
            ));
        }

        #[test]
        fn test_blank_expression() {
            assert!(matches!(
                evaluate_expression("   "),
                Err(CliError::InvalidArgument { .. })
            ));
        }
    }

    mod press_tests {
        use super::*;

        #[test]
        fn test_simple_sum() {
            let report = press_labels(&labels(&["2", "+", "2", "="])).unwrap();
            assert_eq!(report.frame.display, "4");
            assert_eq!(report.frame.pending, "2+2 =");
            assert_eq!(report.history.len(), 1);
        }

        #[test]
        fn test_error_is_a_frame_not_a_failure() {
            let report = press_labels(&labels(&["1", "÷", "0", "="])).unwrap();
            assert_eq!(report.frame.display, "Error");
            assert!(report.history.is_empty());
        }

        #[test]
        fn test_unknown_label() {
            assert!(matches!(
                press_labels(&labels(&["1", "sinh"])),
                Err(CliError::Driver(_))
            ));
        }

        #[test]
        fn test_memory_survives_clear() {
            let report = press_labels(&labels(&["9", "M+", "AC", "MR"])).unwrap();
            assert_eq!(report.frame.display, "9");
            assert_eq!(report.frame.memory, "M: 9");
        }
    }

    mod event_tests {
        use super::*;

        fn key(code: KeyCode) -> Event {
            Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
        }

        fn screen() -> Rect {
            Rect::new(0, 0, 80, 24)
        }

        #[test]
        fn test_typed_expression() {
            let mut app = CalculatorApp::new();
            let input = InputHandler::new();
            for event in [
                key(KeyCode::Char('6')),
                key(KeyCode::Char('*')),
                key(KeyCode::Char('7')),
                key(KeyCode::Enter),
            ] {
                handle_event(&mut app, &input, &event, screen());
            }
            assert_eq!(app.engine().buffer(), "42");
        }

        #[test]
        fn test_ctrl_c_quits() {
            let mut app = CalculatorApp::new();
            let input = InputHandler::new();
            let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
            handle_event(&mut app, &input, &event, screen());
            assert!(app.should_quit());
        }

        #[test]
        fn test_click_outside_keypad_is_ignored() {
            let mut app = CalculatorApp::new();
            let input = InputHandler::new();
            let event = Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            });
            handle_event(&mut app, &input, &event, screen());
            assert_eq!(app.engine().buffer(), "");
            assert!(!app.should_quit());
        }

        #[test]
        fn test_resize_is_ignored() {
            let mut app = CalculatorApp::new();
            let input = InputHandler::new();
            handle_event(&mut app, &input, &Event::Resize(100, 40), screen());
            assert_eq!(app.engine().display(), "0");
        }
    }
}
