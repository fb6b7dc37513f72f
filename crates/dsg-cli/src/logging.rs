//! Logging setup for the `dsg` binary.
//!
//! Library crates only emit `tracing` events; this module installs the
//! subscriber that prints them.
//!
//! # Log Levels
//!
//! - `error`: failed operations
//! - `warn`: recovered problems, e.g. unknown columns or variables
//! - `info`: stage completion with counts and durations
//! - `debug`: per-column and per-file detail
//! - `trace`: row-level detail; raw cell values need `--log-data`

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static LOG_DATA: AtomicBool = AtomicBool::new(false);

/// Placeholder logged instead of raw cell values.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Targets that follow the chosen level; all others stay at `warn`.
const TARGETS: [&str; 11] = [
    "dsg",
    "dsg_cli",
    "dsg_core",
    "dsg_crossover",
    "dsg_file",
    "dsg_ingest",
    "dsg_model",
    "dsg_nc",
    "dsg_standards",
    "dsg_transform",
    "dsg_validate",
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Whether `--log-data` was given.
pub fn log_data_enabled() -> bool {
    LOG_DATA.load(Ordering::Relaxed)
}

/// The raw value when data logging is on, [`REDACTED_VALUE`] otherwise.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() { value } else { REDACTED_VALUE }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the default filter.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    pub with_target: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    pub log_data: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::Pretty,
            log_file: None,
            log_data: false,
        }
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => {
            let file: File = OpenOptions::new().create(true).append(true).open(path)?;
            // `&File` is `Write`, so a shared handle serves every event.
            init_logging_with_writer(config, Arc::new(file));
        }
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    LOG_DATA.store(config.log_data, Ordering::Relaxed);
    tracing_subscriber::registry()
        .with(format_layer(config, writer))
        .with(env_filter(config))
        .init();
}

fn format_layer<W>(config: &LogConfig, writer: W) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match (config.format, config.with_timestamps) {
        (LogFormat::Json, _) => layer.json().with_span_events(FmtSpan::CLOSE).boxed(),
        (LogFormat::Compact, true) => layer.compact().with_ansi(config.with_ansi).boxed(),
        (LogFormat::Compact, false) => layer
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => layer.with_ansi(config.with_ansi).boxed(),
        (LogFormat::Pretty, false) => layer.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    std::iter::once("warn".to_string())
        .chain(TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    let from_env = config
        .use_env_filter
        .then(|| EnvFilter::try_from_default_env().ok())
        .flatten();
    from_env.unwrap_or_else(|| EnvFilter::new(default_directives(config.level_filter)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_cover_every_crate() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,dsg=debug,dsg_cli=debug"));
        assert!(directives.ends_with("dsg_validate=debug"));
        assert_eq!(default_directives(LevelFilter::OFF).split(',').count(), 12);
    }

    #[test]
    fn values_are_redacted_by_default() {
        assert!(!log_data_enabled());
        assert_eq!(redact_value("33.5"), REDACTED_VALUE);
    }
}
