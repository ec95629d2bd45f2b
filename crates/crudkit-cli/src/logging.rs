// Logging and verbosity control

use tracing::Level;

/// Verbosity requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Warnings and errors only
    Quiet,
    /// Follow the configured log level
    Normal,
    /// Per-step detail
    Verbose,
}

impl VerbosityLevel {
    /// Resolve the global `--verbose` / `--quiet` flags; quiet wins
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Maximum level to emit, given the configured `log_level`
    pub fn max_level(self, configured: &str) -> Level {
        match self {
            VerbosityLevel::Quiet => Level::WARN,
            VerbosityLevel::Verbose => Level::DEBUG,
            VerbosityLevel::Normal => parse_level(configured).unwrap_or(Level::INFO),
        }
    }
}

/// Parse `trace`, `debug`, `info`, `warn` or `error`
pub fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install the stderr subscriber
///
/// Only the first call in a process takes effect.
pub fn init_logging(verbosity: VerbosityLevel, configured: &str) {
    let level = verbosity.max_level(configured);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(verbosity == VerbosityLevel::Verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
