//! # Logger
//!
//! Installs the global `tracing` subscriber for the flagging service.
//!
//! * Console output is either compact ANSI text (development) or one JSON object per
//!   line (production), written to stdout or stderr.
//! * File output goes through a non-blocking rolling appender; keep the returned
//!   [`Logger`] alive so buffered lines are flushed on shutdown.
//! * [`LoggerBuilder::env_filter`] adds module directives (e.g. `"crwa_kernel=debug"`);
//!   `RUST_LOG` applies when no explicit filter is set.
//!
//! ## Example
//!
//! ```rust
//! # use crwa_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("crwa-server")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where console lines are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

#[derive(Debug)]
pub struct LoggerConfig {
    console: bool,
    target: ConsoleTarget,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            target: ConsoleTarget::default(),
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: std::marker::PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Sets the name of the logger; it prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder {
            name: WithName(name.into()),
            config: self.config,
            file_state: std::marker::PhantomData,
        }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `crwa_server=debug,tower_http=info`).
    ///
    /// Invalid filters will cause [`LoggerBuilder::init`] to return an error.
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
    pub const fn target(mut self, target: ConsoleTarget) -> Self {
        self.config.target = target;
        self
    }

    /// Emits one JSON object per line on every enabled output.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// Sets the directory for rolling log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: std::marker::PhantomData }
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// The returned [`Logger`] holds the file writer's [`WorkerGuard`]; keep it alive
    /// for the lifetime of the process.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set,
    /// [`LoggerError::InvalidConfiguration`] for invalid builder settings and
    /// [`LoggerError::Appender`] when the log directory cannot be used.
    pub fn init(self) -> Result<Logger, LoggerError> {
        validate_config(&self.config, &self.name.0)?;

        let env_filter = build_env_filter(&self.config)?;

        let mut layers: Vec<BoxedLayer> = Vec::new();

        if self.config.console {
            layers.push(console_layer(self.config.target, self.config.json));
        }

        let guard = if let Some(path) = &self.config.path {
            fs::create_dir_all(path).map_err(|e| LoggerError::Internal {
                message: e.to_string().into(),
                context: Some(format!("Failed to create path: {}", path.display()).into()),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.config.rotation.clone())
                .filename_prefix(&self.name.0)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.config.max_files)
                .build(path)?;

            let (non_blocking, g) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            layers.push(if self.config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(g)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(env_filter).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    ///
    /// ```rust
    /// use crwa_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("crwa-server")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            config: LoggerConfig::default(),
            name: NoName,
            file_state: std::marker::PhantomData,
        }
    }

    /// Returns a reference to the underlying worker guard, if present.
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

/// Parses a level name such as `"info"` or `"WARN"`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Invalid log level '{level}': {e}").into(),
        context: None,
    })
}

/// Parses a rotation name: `minutely`, `hourly`, `daily` or `never`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_rotation(rotation: &str) -> Result<Rotation, LoggerError> {
    match rotation.trim().to_ascii_lowercase().as_str() {
        "minutely" => Ok(Rotation::MINUTELY),
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        "never" => Ok(Rotation::NEVER),
        _ => Err(LoggerError::InvalidConfiguration {
            message: format!("Invalid log rotation '{rotation}'").into(),
            context: None,
        }),
    }
}

fn console_layer(target: ConsoleTarget, json: bool) -> BoxedLayer {
    match (target, json) {
        (ConsoleTarget::Stdout, false) => layer().compact().with_ansi(true).boxed(),
        (ConsoleTarget::Stdout, true) => layer().json().boxed(),
        (ConsoleTarget::Stderr, false) => {
            layer().compact().with_ansi(true).with_writer(io::stderr).boxed()
        },
        (ConsoleTarget::Stderr, true) => layer().json().with_writer(io::stderr).boxed(),
    }
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("test-app").env_filter("crwa=debug");
        assert!(builder.config.console);
        assert!(!builder.config.json);
        assert_eq!(builder.config.target, ConsoleTarget::Stdout);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("crwa=debug"));
        assert!(builder.config.path.is_none());
    }

    #[test]
    fn builder_with_file_keeps_settings() {
        let builder = Logger::builder()
            .name("test-app")
            .json(true)
            .target(ConsoleTarget::Stderr)
            .path("logs")
            .max_files(5)
            .level(LevelFilter::DEBUG);

        assert!(builder.config.json);
        assert_eq!(builder.config.target, ConsoleTarget::Stderr);
        assert_eq!(builder.config.max_files, 5);
        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(builder.config.path.as_deref(), Some(std::path::Path::new("logs")));
    }

    #[test]
    fn rejects_empty_name_and_zero_files() {
        let err = Logger::builder().name("  ").init().expect_err("empty name");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("app").path("logs").max_files(0).init().expect_err("zero");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rejects_when_no_output_is_enabled() {
        let err = Logger::builder().name("app").console(false).init().expect_err("no layers");
        assert!(err.to_string().contains("No logging layers enabled"));
    }

    #[test]
    fn invalid_env_filter_is_reported() {
        let config = LoggerConfig { env_filter: Some("crwa=[".to_owned()), ..LoggerConfig::default() };
        let err = build_env_filter(&config).expect_err("bad filter");
        assert!(err.to_string().contains("Invalid env filter"));
    }

    #[test]
    fn parses_level_names() {
        assert_eq!(parse_level("debug").ok(), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level(" WARN ").ok(), Some(LevelFilter::WARN));
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn parses_rotation_names() {
        assert_eq!(parse_rotation("hourly").ok(), Some(Rotation::HOURLY));
        assert_eq!(parse_rotation(" Never ").ok(), Some(Rotation::NEVER));
        let err = parse_rotation("weekly").expect_err("unknown rotation");
        assert!(err.to_string().contains("weekly"));
    }
}
