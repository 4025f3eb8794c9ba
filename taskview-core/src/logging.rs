//! Logging for TaskView.
//!
//! Built on the `tracing` ecosystem. [`initialize_logging`] installs a console layer on
//! stderr (stdout stays free for command output) and an optional daily-rolling file
//! layer, each in text or JSON format. [`init_minimal_logging`] is the fallback used
//! before configuration is available and in tests.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the file writer's guard alive for the lifetime of the process so buffered
/// lines are flushed on exit.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs a stderr logger filtered by `RUST_LOG` (default `info`).
///
/// Errors (e.g. a global subscriber is already set) are ignored.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn parse_level(level: &str) -> Result<Level, CoreError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        invalid => Err(CoreError::Logging(LoggingError::FilterError(format!(
            "Invalid log level in config: {}",
            invalid
        )))),
    }
}

/// Creates the rolling file layer and its worker guard, creating the log directory
/// if needed.
fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    utils::fs::ensure_dir_exists(directory)?;

    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("taskview.log"));
    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer: BoxedLayer = match format {
        "json" => fmt::layer().json().with_writer(writer).with_ansi(false).boxed(),
        _ => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
    };
    Ok((layer, guard))
}

/// Initializes the global logging system from a [`LoggingConfig`].
///
/// The file guard is only replaced once the new subscriber is installed, so a failed
/// call leaves an active file layer flushing.
///
/// # Errors
///
/// - [`LoggingError::FilterError`] for an unknown level.
/// - [`LoggingError::InitializationFailure`] when a subscriber is already set.
/// - [`CoreError::Filesystem`] when the log directory cannot be created.
pub fn initialize_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;
    let format = config.format.to_lowercase();

    let console_layer: BoxedLayer = match format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed(),
        _ => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed(),
    };

    let mut layers: Vec<BoxedLayer> = vec![console_layer];
    let mut new_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &format)?;
        layers.push(file_layer.with_filter(EnvFilter::new(level.to_string())).boxed());
        new_guard = Some(guard);
    }

    Registry::default().with(layers).try_init().map_err(|e| {
        CoreError::Logging(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        )))
    })?;

    match LOG_WORKER_GUARD.lock() {
        Ok(mut slot) => *slot = new_guard,
        Err(e) => eprintln!("[ERROR] Failed to lock LOG_WORKER_GUARD: {}. Log flushing may be affected.", e),
    }
    Ok(())
}
