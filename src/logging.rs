//! Structured logging initialization
//!
//! The router emits `tracing` events (`Route bound`, `Route match attempt`,
//! `Dispatching request`, ...). Libraries never install a subscriber
//! themselves; binaries call [`init_logging_with_config`] once at startup.
//!
//! Configuration is read from the environment:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `ROUNDABOUT_LOG_LEVEL` | trace/debug/info/warn/error | `info` |
//! | `ROUNDABOUT_LOG_FORMAT` | json/pretty | `json` |
//! | `ROUNDABOUT_LOG_ASYNC` | true/false | `false` |
//! | `ROUNDABOUT_LOG_TARGET_FILTER` | comma-separated directives | unset |
//! | `ROUNDABOUT_LOG_INCLUDE_LOCATION` | true/false | `false` |
//! | `ROUNDABOUT_LOG_OUTPUT` | stdout/stderr | `stdout` |
//!
//! `RUST_LOG`, when set, takes precedence over `ROUNDABOUT_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Stream the subscriber writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

impl LogOutput {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "stderr" => LogOutput::Stderr,
            _ => LogOutput::Stdout,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    /// Log format: json/pretty
    pub format: LogFormat,
    /// Write through a background thread instead of blocking on stdout
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
    /// Destination stream; tools that print results on stdout log to stderr
    pub output: LogOutput,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("ROUNDABOUT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("ROUNDABOUT_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            async_logging: env::var("ROUNDABOUT_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            target_filter: env::var("ROUNDABOUT_LOG_TARGET_FILTER").ok(),
            include_location: env::var("ROUNDABOUT_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            output: LogOutput::parse(
                &env::var("ROUNDABOUT_LOG_OUTPUT").unwrap_or_else(|_| "stdout".to_string()),
            ),
        }
    }

    /// Create a default configuration for local development
    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: true,
            output: LogOutput::Stdout,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// With `async_logging` the returned guard must be kept alive for the
/// lifetime of the program; dropping it flushes and stops the writer thread.
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let (writer, guard) = match (config.async_logging, config.output) {
        (true, output) => {
            let (non_blocking, guard) = match output {
                LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
                LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
            };
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        (false, LogOutput::Stdout) => (BoxMakeWriter::new(std::io::stdout), None),
        (false, LogOutput::Stderr) => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    registry
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
