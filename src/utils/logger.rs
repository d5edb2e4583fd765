use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LogLevel, LoggingConfig};

/// Sink for registration failures.
pub trait Logger: Send + Sync {
    fn error(&self, message: &str, cause: &dyn std::error::Error);
}

/// Forwards to `tracing` at ERROR level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, message: &str, cause: &dyn std::error::Error) {
        tracing::error!(error = %cause, "{}", message);
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` directives are layered on top of the configured level. Fails if
/// a subscriber is already installed.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), TryInitError> {
    let level_filter: LevelFilter = logging_config.level.into();
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    match logging_config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Console => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().pretty())
            .try_init(),
    }
}
