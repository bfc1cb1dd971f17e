//! Result printing for the one-shot commands

use console::{style, Term};
use keycalc::core::history::HistoryEntry;
use keycalc::driver::RenderFrame;
use serde::Serialize;

use crate::config::{CliConfig, OutputFormat};
use crate::error::CliResult;

/// Outcome of `keycalc eval`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    /// Expression as given on the command line
    pub expression: String,
    /// Numeric result
    pub result: f64,
    /// Result as the calculator displays it
    pub display: String,
}

/// Outcome of `keycalc press`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressReport {
    /// Last frame the session rendered
    pub frame: RenderFrame,
    /// History entries, oldest first
    pub history: Vec<HistoryEntry>,
}

/// Renders an eval report as plain text
#[must_use]
pub fn render_eval_text(report: &EvalReport) -> String {
    report.display.clone()
}

/// Renders the final frame the way the calculator screen stacks it, followed
/// by the history (newest first) after a blank line
#[must_use]
pub fn render_press_text(report: &PressReport, use_color: bool) -> String {
    let frame = &report.frame;
    let mut lines = Vec::with_capacity(4 + report.history.len());

    if !frame.pending.is_empty() {
        lines.push(if use_color {
            style(&frame.pending).dim().to_string()
        } else {
            frame.pending.clone()
        });
    }

    let is_error = frame.display == keycalc::engine::ERROR_MARKER;
    lines.push(match (use_color, is_error) {
        (true, true) => style(&frame.display).red().bold().to_string(),
        (true, false) => style(&frame.display).bold().to_string(),
        (false, _) => frame.display.clone(),
    });

    if !frame.memory.is_empty() {
        lines.push(if use_color {
            style(&frame.memory).cyan().to_string()
        } else {
            frame.memory.clone()
        });
    }

    if !report.history.is_empty() {
        lines.push(String::new());
        lines.extend(report.history.iter().rev().map(|entry| {
            if use_color {
                style(entry.display()).dim().to_string()
            } else {
                entry.display()
            }
        }));
    }

    lines.join("\n")
}

/// Writes reports to stdout in the configured format
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    format: OutputFormat,
    use_color: bool,
}

impl Reporter {
    /// Creates a reporter for the given configuration
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        let use_color = config.color.should_color();
        console::set_colors_enabled(use_color);
        Self {
            term: Term::stdout(),
            format: config.output_format,
            use_color,
        }
    }

    /// Prints an eval report
    pub fn eval(&self, report: &EvalReport) -> CliResult<()> {
        let text = match self.format {
            OutputFormat::Text => render_eval_text(report),
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
        };
        self.term.write_line(&text)?;
        Ok(())
    }

    /// Prints a press report
    pub fn press(&self, report: &PressReport) -> CliResult<()> {
        let text = match self.format {
            OutputFormat::Text => render_press_text(report, self.use_color),
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
        };
        self.term.write_line(&text)?;
        Ok(())
    }
}
