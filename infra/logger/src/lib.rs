//! # Logger
//!
//! Tracing subscriber bootstrap for hosts and operator shells.
//!
//! Console output, an optional rolling log file (plain or JSON), and an
//! `EnvFilter` that honours `RUST_LOG`. [`Logger::for_context`] picks the
//! usual setup for a [`RunContext`]: compact console output for operator
//! shells, console plus JSON files for servers.
//!
//! ## Example
//!
//! ```rust
//! use hzn_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("horizon")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use hzn_domain::RunContext;
use private::Sealed;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Rolling file output.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl FileSink {
    /// Daily rotation, ten files kept, plain text.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), rotation: Rotation::DAILY, max_files: DEFAULT_MAX_FILES, json: false }
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    #[must_use]
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    file: Option<FileSink>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { console: true, level: LevelFilter::INFO, env_filter: None, file: None }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl LoggerBuilder<WithName> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Programmatic default filter (e.g. `hzn_horizon=debug`); `RUST_LOG` is ignored when set.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn file(mut self, sink: FileSink) -> Self {
        self.config.file = Some(sink);
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// Keep the returned [`Logger`] alive: it owns the non-blocking file writer.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set,
    /// [`LoggerError::InvalidConfiguration`] for invalid settings, and
    /// [`LoggerError::Directory`]/[`LoggerError::Appender`] when the log file cannot be opened.
    pub fn init(self) -> Result<Logger, LoggerError> {
        validate(&self.config, &self.name.0)?;
        let filter = env_filter(&self.config)?;

        let mut layers = Vec::new();
        if self.config.console {
            layers.push(layer().compact().with_target(false).boxed());
        }

        let guard = match self.config.file {
            Some(sink) => {
                fs::create_dir_all(&sink.path)
                    .context(format!("Failed to create {}", sink.path.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(sink.rotation)
                    .filename_prefix(&self.name.0)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.path)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if sink.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging output enabled. Enable the console or a log file.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background writer guard; drop it only at shutdown.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Usual setup for a process kind.
    ///
    /// Operator shells log compact lines to the console. Servers also write JSON
    /// files to `log_dir` when one is given.
    pub fn for_context(
        name: impl Into<String>,
        context: RunContext,
        log_dir: Option<PathBuf>,
    ) -> LoggerBuilder<WithName> {
        let builder = Self::builder().name(name);
        match (context, log_dir) {
            (RunContext::Server, Some(dir)) => builder.file(FileSink::new(dir).json()),
            (RunContext::Console, Some(dir)) => builder.file(FileSink::new(dir)),
            (_, None) => builder,
        }
    }

    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }
    if config.file.as_ref().is_some_and(|sink| sink.max_files == 0) {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }
    Ok(())
}

fn env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        }),
        None => Ok(builder.from_env_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("horizon").env_filter("hzn_horizon=debug");
        assert!(builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("hzn_horizon=debug"));
        assert!(builder.config.file.is_none());
    }

    #[test]
    fn server_context_writes_json_files() {
        let builder = Logger::for_context("horizon", RunContext::Server, Some("logs".into()));
        let sink = builder.config.file.expect("server logger should have a file sink");
        assert!(sink.json);
        assert_eq!(sink.path, PathBuf::from("logs"));
    }

    #[test]
    fn console_context_without_dir_is_console_only() {
        let builder = Logger::for_context("horizon", RunContext::Console, None);
        assert!(builder.config.console);
        assert!(builder.config.file.is_none());
    }

    #[test]
    fn zero_max_files_is_rejected() {
        let config = LoggerConfig {
            file: Some(FileSink::new("logs").max_files(0)),
            ..LoggerConfig::default()
        };
        let err = validate(&config, "horizon").unwrap_err();
        assert_eq!(err.kind(), "InvalidConfiguration");
    }

    #[test]
    fn bad_env_filter_is_rejected() {
        let config = LoggerConfig { env_filter: Some("hzn_horizon=verbose".to_owned()), ..LoggerConfig::default() };
        assert!(env_filter(&config).is_err());
    }
}
