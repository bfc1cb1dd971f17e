//! keycalc CLI library
//!
//! Argument parsing, configuration, logging setup and the command runners
//! behind the `keycalc` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;
pub mod terminal;

pub use commands::{Cli, ColorArg, Commands, EvalArgs, PressArgs, TuiArgs};
pub use config::{CliConfig, ColorChoice, OutputFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_eval_text, render_press_text, EvalReport, PressReport, Reporter};
pub use runner::{evaluate_expression, handle_event, press_labels, run_eval, run_press, run_tui};
