//! File logging for the TUI.
//!
//! stdout belongs to the terminal UI, so `tracing` output goes to a file.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogSettings, default_log_path};

/// Environment variable that overrides `[log] filter`.
pub const LOG_ENV: &str = "GRAMOPHONE_LOG";

/// Where log output should go: `[log] file`, else the XDG state dir.
pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// Build the filter from `GRAMOPHONE_LOG`, falling back to the configured
/// directive, then to `info`.
pub fn filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns the log path when logging is on.
///
/// A log file that cannot be opened leaves logging off; the player still runs.
pub fn init(settings: &LogSettings) -> Option<PathBuf> {
    let path = log_path(settings)?;
    let file = open_log(&path).ok()?;

    tracing_subscriber::registry()
        .with(filter(settings))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok()?;

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_file_wins_over_default() {
        let settings = LogSettings {
            file: Some(PathBuf::from("/tmp/custom.log")),
            ..LogSettings::default()
        };
        assert_eq!(log_path(&settings), Some(PathBuf::from("/tmp/custom.log")));
    }

    #[test]
    fn open_log_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gramophone.log");
        open_log(&path).unwrap();
        assert!(path.exists());
    }
}
