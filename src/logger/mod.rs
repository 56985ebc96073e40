//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - File output with multiple formats (Full, Compact, JSON)
//! - Fallback to stderr when the log file cannot be written

pub mod config;
pub mod error;
pub(crate) mod writer;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};
use writer::LogFileWriter;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config
        .validate()
        .map_err(|e| LoggerError::config(e.to_string()))?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    // File layer goes first so console ANSI settings never leak into file output.
    // See: https://github.com/tokio-rs/tracing/issues/1817
    let file_layer = if config.file.enabled {
        Some(file_layer(&config.file)?)
    } else {
        None
    };
    let console_layer = config
        .console
        .enabled
        .then(|| console_layer(&config.console));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggerError::subscriber(e.to_string()))
}

fn console_layer<S>(config: &ConsoleConfig) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .boxed()
}

fn file_layer<S>(config: &FileConfig) -> Result<BoxedLayer<S>, LoggerError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let writer = LogFileWriter::new(config)?;
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    Ok(match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_invalid_config() {
        let config = LoggerConfig {
            console: ConsoleConfig::new(false, false),
            ..Default::default()
        };
        let err = init_logger(config).unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
    }
}
