//! Logging initialization and configuration.
//!
//! Stdout belongs to the relayed child and stderr only carries the usage
//! line, so diagnostics go to a log file. Each run gets its own file named
//! by start time and pid, e.g. `logs/council-pty.2024-12-06-14-30-25.4242.log`.
//!
//! # Configuration
//!
//! - `COUNCIL_LOG_DIR` - directory for log files (default: `logs/` next to
//!   the executable)
//! - `RUST_LOG` - filter directive, defaulting to `info`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_DIR_VAR: &str = "COUNCIL_LOG_DIR";

/// Resolves the log directory from `COUNCIL_LOG_DIR`, falling back to
/// `logs/` beside the executable, then `logs/` in the working directory.
pub fn log_dir(configured: Option<&str>) -> PathBuf {
    if let Some(dir) = configured.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    match std::env::current_exe() {
        Ok(exe_path) => exe_path
            .parent()
            .map(|p| p.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs")),
        Err(_) => PathBuf::from("logs"),
    }
}

/// File name for a log started now by this process.
pub fn log_file_name() -> String {
    log_file_name_at(Local::now(), std::process::id())
}

/// File name for a log started at `started` by process `pid`.
///
/// The pid keeps runs started within the same second apart.
pub fn log_file_name_at(started: DateTime<Local>, pid: u32) -> String {
    format!("council-pty.{}.{}.log", started.format("%Y-%m-%d-%H-%M-%S"), pid)
}

/// Initialize file logging.
///
/// Returns the appender guard; keep it alive until just before the process
/// exits or buffered lines are lost. Returns `None` if the log file cannot
/// be set up; the run then continues unlogged and nothing is printed.
pub fn init_logging() -> Option<WorkerGuard> {
    let configured = std::env::var(LOG_DIR_VAR).ok();
    let dir = log_dir(configured.as_deref());
    init_logging_in(&dir).ok()
}

/// Sets up logging into `log_dir`, reporting failure only through the result.
pub fn init_logging_in(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create logs directory {}", log_dir.display()))?;

    let log_path = log_dir.join(log_file_name());
    let log_file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install logger")?;

    tracing::info!("Logging initialized - writing to {}", log_path.display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_log_dir_wins() {
        assert_eq!(log_dir(Some("/var/log/council")), PathBuf::from("/var/log/council"));
    }

    #[test]
    fn test_empty_log_dir_falls_back() {
        assert!(log_dir(Some("")).ends_with("logs"));
        assert!(log_dir(None).ends_with("logs"));
    }

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name();
        let pid = std::process::id().to_string();
        assert!(name.starts_with("council-pty."));
        assert!(name.ends_with(&format!(".{}.log", pid)));
        // council-pty. + YYYY-MM-DD-HH-MM-SS + . + pid + .log
        assert_eq!(name.len(), "council-pty.".len() + 19 + 1 + pid.len() + ".log".len());
    }

    #[test]
    fn test_same_second_runs_get_distinct_files() {
        let started = Local::now();
        assert_ne!(log_file_name_at(started, 4001), log_file_name_at(started, 4002));
    }

    #[test]
    fn test_unusable_log_dir_is_reported_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file in the way").unwrap();

        let result = init_logging_in(&blocker.join("logs"));

        assert!(result.is_err());
    }
}
