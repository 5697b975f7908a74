use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Initialize the tracing subscriber with console output
/// Reads the log level from the LOG_LEVEL environment variable
pub fn init_logging() -> Result<(), LoggingError> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    let env_filter = EnvFilter::try_new(&log_level)
        .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", log_level, e)))?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationError(e.to_string()))?;

    Ok(())
}
