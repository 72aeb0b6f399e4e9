//! Logging infrastructure for pkgrepo.
//!
//! Provides structured logging to a file, plus console output in debug mode:
//! - Writes to the configured log file (cleared on each start)
//! - Mirrors to stderr when debug logging is requested, leaving stdout
//!   for operator-facing messages
//! - Configurable via the RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log file's directory if needed, clears any previous log,
/// and installs the global subscriber.
///
/// # Arguments
///
/// * `log_path` - Log file path (e.g., "~/.pkgrepo/logs/pkgrepo.log", already expanded)
/// * `debug_mode` - Log at debug level and mirror to stderr
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file cannot be cleared
pub fn init_logging(log_path: &Path, debug_mode: bool) -> Result<LoggingGuard, io::Error> {
    let (log_dir, log_file) = prepare_log_file(log_path)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false) // No ANSI colors in file
        .with_span_events(FmtSpan::CLOSE);

    let stderr_layer = debug_mode.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .pretty()
    });

    tracing_subscriber::registry()
        .with(env_filter(debug_mode))
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Build the level filter. `--debug` wins over RUST_LOG; otherwise RUST_LOG,
/// defaulting to INFO.
fn env_filter(debug_mode: bool) -> EnvFilter {
    if debug_mode {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Create the log directory and truncate the log file.
///
/// Returns the directory and file name the appender should write to.
fn prepare_log_file(log_path: &Path) -> io::Result<(PathBuf, String)> {
    let log_dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let log_file = log_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log path has no file name: {}", log_path.display()),
            )
        })?;

    fs::create_dir_all(&log_dir)?;
    fs::write(log_dir.join(&log_file), "")?;

    Ok((log_dir, log_file))
}
