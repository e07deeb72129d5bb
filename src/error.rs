//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by an audio device.
///
/// These never reach the caller of a session command: the session logs them
/// and counts them in its diagnostics.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No audio output could be opened.
    #[error("no audio output device: {0}")]
    NoOutput(String),

    /// `play` was requested before any source was set.
    #[error("no source loaded")]
    NoSource,

    /// The source file could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file could not be decoded.
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// The device thread is gone.
    #[error("audio device disconnected")]
    Disconnected,
}

/// Settings that loaded but do not make sense.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] ::config::ConfigError),

    #[error("invalid setting: {0}")]
    Invalid(String),
}
