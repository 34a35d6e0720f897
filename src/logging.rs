//! Logging setup.
//!
//! The terminal belongs to the UI while fibstrip runs, so logs only go to a
//! file: `<data dir>/fibstrip/fibstrip.log`. File logging is on when
//! `FIBSTRIP_LOG=1` is set or `[debug] log_to_file` is true in the config.
//! `RUST_LOG` overrides the default filter.

use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::APP_NAME;

/// Keeps the non-blocking writer alive; logs buffered at exit are flushed on drop
pub struct LogGuard {
    file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl LogGuard {
    pub fn is_active(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Whether file logging was requested through the environment
pub fn env_requested() -> bool {
    std::env::var("FIBSTRIP_LOG").as_deref() == Ok("1")
}

/// Install the global subscriber when `enabled`. Call once from `main`.
pub fn init(enabled: bool, debug: bool) -> LogGuard {
    if !enabled {
        return LogGuard { file_guard: None };
    }

    let dir = log_dir().unwrap_or_else(|| std::env::temp_dir().join(APP_NAME));
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: Could not create log directory {}: {}", dir.display(), e);
        return LogGuard { file_guard: None };
    }

    let file_appender = tracing_appender::rolling::never(&dir, format!("{}.log", APP_NAME));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if debug { "debug" } else { "info" };
    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {}", e);
        return LogGuard { file_guard: None };
    }

    tracing::info!(dir = %dir.display(), "logging started");
    LogGuard {
        file_guard: Some(guard),
    }
}

fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_installs_nothing() {
        let guard = init(false, true);
        assert!(!guard.is_active());
    }
}
