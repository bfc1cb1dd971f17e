//! keycalc: keypad calculator for the terminal
//!
//! ## Usage
//!
//! ```bash
//! keycalc                      # Interactive calculator
//! keycalc tui --scientific     # Start on the scientific keypad
//! keycalc eval "2+3*4"         # Evaluate one expression
//! keycalc press 9 0 sin        # Press buttons by label
//! ```

use clap::Parser;
use keycalc::driver::Mode;
use keycalc_cli::{
    logging, run_eval, run_press, run_tui, Cli, CliConfig, CliResult, Commands, OutputFormat,
    Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    let interactive = matches!(cli.command, None | Some(Commands::Tui(_)));
    logging::init(&config, interactive)?;

    match cli.command {
        None => run_tui(&config),
        Some(Commands::Tui(args)) => {
            let mode = if args.scientific {
                Mode::Scientific
            } else {
                Mode::Standard
            };
            run_tui(&config.with_mode(mode))
        }
        Some(Commands::Eval(args)) => run_eval(&with_json(config, args.json), &args.expression),
        Some(Commands::Press(args)) => run_press(&with_json(config, args.json), &args.labels),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_log_file(cli.log_file.clone())
}

fn with_json(config: CliConfig, json: bool) -> CliConfig {
    if json {
        config.with_output_format(OutputFormat::Json)
    } else {
        config
    }
}
