//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// keycalc: keypad calculator for the terminal
#[derive(Parser, Debug)]
#[command(name = "keycalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, global = true, env = "KEYCALC_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run (defaults to the interactive calculator)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive calculator
    Tui(TuiArgs),

    /// Evaluate one expression and print the result
    Eval(EvalArgs),

    /// Press keypad buttons by label and print the final display
    Press(PressArgs),
}

/// Arguments for the tui command
#[derive(Parser, Debug, Default)]
pub struct TuiArgs {
    /// Start with the scientific keypad
    #[arg(short, long)]
    pub scientific: bool,
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Expression using digits, + - * / % ** and parentheses
    #[arg(allow_hyphen_values = true)]
    pub expression: String,

    /// Emit JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the press command
#[derive(Parser, Debug)]
pub struct PressArgs {
    /// Button labels, e.g. `7 × 6 =` or `9 0 sin`
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub labels: Vec<String>,

    /// Emit the final frame and history as JSON
    #[arg(long)]
    pub json: bool,
}

/// Color output argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
