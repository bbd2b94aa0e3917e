//! Logging bootstrap for the console core.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process, either as rolling
//!   files (host apps) or on stderr (CLI).
//! - Capture panics into the log with a sanitized payload.
//!
//! # Invariants
//! - Initialization is idempotent for the same level and sink.
//! - Switching level or sink after initialization is rejected.
//! - Initialization never panics.

use crate::config::LoggingConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "opsconsole";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("log_dir cannot be empty")]
    EmptyDir,
    #[error("log_dir must be an absolute path, got `{0}`")]
    RelativeDir(String),
    #[error("failed to create log directory `{dir}`: {message}")]
    CreateDir { dir: PathBuf, message: String },
    #[error("failed to start logger: {0}")]
    Backend(String),
    #[error("logging already initialized with {active}; refusing to switch to {requested}")]
    Conflict { active: String, requested: String },
}

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Size-rotated files in this directory.
    Files(PathBuf),
    Stderr,
}

impl LogSink {
    fn describe(&self, level: &str) -> String {
        match self {
            Self::Files(dir) => format!("level `{level}` at `{}`", dir.display()),
            Self::Stderr => format!("level `{level}` on stderr"),
        }
    }
}

struct LoggingState {
    level: &'static str,
    sink: LogSink,
    _logger: LoggerHandle,
}

/// Starts rolling file logs in `log_dir`.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is empty, relative, or cannot be created.
/// - Logging is already active with a different level or sink.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let dir = normalize_log_dir(log_dir)?;
    init_with_sink(level, LogSink::Files(dir))
}

/// Starts logging to stderr. Used by the CLI.
pub fn init_stderr_logging(level: &str) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    init_with_sink(level, LogSink::Stderr)
}

/// Starts file logging when the config names a directory.
///
/// Returns `Ok(false)` without doing anything when no directory is set.
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<bool, LoggingError> {
    let Some(dir) = &config.dir else {
        return Ok(false);
    };
    let dir = dir
        .to_str()
        .ok_or_else(|| LoggingError::RelativeDir(dir.display().to_string()))?;
    init_logging(&config.level, dir)?;
    Ok(true)
}

/// Active level and sink, or `None` before initialization.
pub fn logging_status() -> Option<(&'static str, LogSink)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.sink.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::EmptyDir);
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::RelativeDir(trimmed.to_string()));
    }
    Ok(path.to_path_buf())
}

fn init_with_sink(level: &'static str, sink: LogSink) -> Result<(), LoggingError> {
    let state = LOGGING_STATE.get_or_try_init(|| start_backend(level, sink.clone()))?;
    if state.level != level || state.sink != sink {
        return Err(LoggingError::Conflict {
            active: state.sink.describe(state.level),
            requested: sink.describe(level),
        });
    }
    Ok(())
}

fn start_backend(level: &'static str, sink: LogSink) -> Result<LoggingState, LoggingError> {
    let logger = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(format!("invalid log level `{level}`: {err}")))?;

    let logger = match &sink {
        LogSink::Files(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| LoggingError::CreateDir {
                dir: dir.clone(),
                message: err.to_string(),
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        LogSink::Stderr => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
    };
    let handle = logger
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();
    info!(
        "event=core_init module=logging status=ok platform={} version={} sink={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        sink.describe(level)
    );

    Ok(LoggingState {
        level,
        sink,
        _logger: handle,
    })
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

// Payloads may carry card titles typed by users; keep them on one line and short.
fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
