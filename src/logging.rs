// src/logging.rs
// =============================================================================
// Logger setup.
//
// Logs go to stderr through env_logger, so the JSON report printed on stdout
// stays machine-readable. RUST_LOG is honoured as-is; --log-level, when
// given, replaces its default level. With neither, only warnings show.
// =============================================================================

use clap::ValueEnum;
use log::LevelFilter;

// Verbosity selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Crawl progress and failed probes
    Info,
    /// Every classified link and every probe outcome
    Debug,
    /// Everything
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

// Level used when neither RUST_LOG nor --log-level is given
const DEFAULT_FILTER: &str = "warn";

// Builds the logger configuration
//
// `env_filter` is the RUST_LOG directive string, if set. `level` comes from
// --log-level and, when given, replaces the default level of that string.
// Dependencies that are chatty at debug level are clamped so that
// `--log-level debug` shows our own output.
fn logger_builder(env_filter: Option<&str>, level: Option<LogLevel>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(env_filter.unwrap_or(DEFAULT_FILTER));

    if let Some(level) = level {
        builder.filter_level(level.into());
    }

    builder
        .filter_module("html5ever", LevelFilter::Error)
        .filter_module("selectors", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Info);

    builder
}

// Initializes the global logger
pub fn init_logger(level: Option<LogLevel>) -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG").ok();
    logger_builder(env_filter.as_deref(), level).try_init()?;
    Ok(())
}
