//! `tracing` subscriber setup
//!
//! The default filter comes from the verbosity flags; `RUST_LOG` overrides it.
//! The interactive calculator owns the terminal, so it only logs when a log
//! file is configured. Log files get one JSON object per line.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Where log lines end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to the configured file
    File,
    /// Standard error
    Stderr,
    /// Logging disabled
    Off,
}

/// Picks the log target for a run
#[must_use]
pub fn log_target(config: &CliConfig, interactive: bool) -> LogTarget {
    if config.log_file.is_some() {
        LogTarget::File
    } else if interactive {
        LogTarget::Off
    } else {
        LogTarget::Stderr
    }
}

/// Builds the filter from `RUST_LOG`, falling back to the verbosity default
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.filter_directive()))
}

/// Installs the global subscriber
pub fn init(config: &CliConfig, interactive: bool) -> CliResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);

    let result = match (log_target(config, interactive), &config.log_file) {
        (LogTarget::File, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        (LogTarget::Stderr, _) => builder
            .with_ansi(config.color.should_color())
            .with_writer(std::io::stderr)
            .try_init(),
        _ => return Ok(()),
    };

    result.map_err(|e| CliError::logging(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_log_target_selection() {
        let plain = CliConfig::new();
        assert_eq!(log_target(&plain, false), LogTarget::Stderr);
        assert_eq!(log_target(&plain, true), LogTarget::Off);

        let with_file = CliConfig::new().with_log_file(Some(PathBuf::from("x.log")));
        assert_eq!(log_target(&with_file, false), LogTarget::File);
        assert_eq!(log_target(&with_file, true), LogTarget::File);
    }

    #[test]
    fn test_interactive_without_file_installs_nothing() {
        assert!(init(&CliConfig::new(), true).is_ok());
    }

    #[test]
    fn test_unwritable_log_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::new().with_log_file(Some(dir.path().join("missing/dir/x.log")));
        assert!(matches!(init(&config, false), Err(CliError::Io(_))));
    }
}
