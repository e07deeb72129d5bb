use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::Track;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/gramophone/config.toml` or `~/.config/gramophone/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `GRAMOPHONE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub transition: TransitionSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
    /// Replaces the built-in song list when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Directory that track sources and the ambient bed are resolved against.
    pub music_dir: PathBuf,
    /// Starting volume, 0.0 to 1.0.
    pub volume: f32,
    /// How often the audio thread reports the playback position (milliseconds).
    pub time_update_ms: u64,
    /// Looping background sound mixed under the music. Unset to disable.
    pub ambient: Option<String>,
    pub ambient_volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("music"),
            volume: 0.5,
            time_update_ms: 250,
            ambient: Some("Bird Chirping Sound Effect.mp3".to_string()),
            ambient_volume: 0.15,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Whether the current track repeats when it ends.
    pub looping: bool,
    pub dark_mode: bool,
    /// How long the expand animation flag stays up (milliseconds).
    pub expand_revert_ms: u64,
    /// Start with the compact player instead of the full one.
    pub start_minimized: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            looping: false,
            dark_mode: false,
            expand_revert_ms: 1000,
            start_minimized: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Delay from a navigation request to the page swap (milliseconds).
    pub swap_delay_ms: u64,
    /// Delay from the page swap to clearing the click origin (milliseconds).
    pub clear_delay_ms: u64,
    /// Ripple color for "back" navigation.
    pub back_color: String,
    /// Number of particles in the burst.
    pub particles: usize,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            swap_delay_ms: 50,
            clear_delay_ms: 50,
            back_color: "#6366f1".to_string(),
            particles: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered in the top header box.
    pub header_text: String,

    /// Size of one terminal cell in pixels. Used to map cells to the
    /// pixel coordinates the transition effects work in.
    pub cell_width_px: u16,
    pub cell_height_px: u16,

    /// Redraw interval (milliseconds).
    pub frame_ms: u64,

    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,

    /// Which track fields to show in the player bar, and in what order.
    ///
    /// Example: ["artist", "title", "album"]
    pub now_playing_track_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_track_fields`.
    pub now_playing_track_separator: String,

    /// Which time fields to show in the player bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ welcome in, stay a while ~ ".to_string(),
            cell_width_px: 10,
            cell_height_px: 20,
            frame_ms: 33,
            scrub_seconds: 5,
            now_playing_track_fields: vec![TrackDisplayField::Title, TrackDisplayField::Artist],
            now_playing_track_separator: " - ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file. Defaults to `$XDG_STATE_HOME/gramophone/gramophone.log`.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `GRAMOPHONE_LOG`.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    /// The audio source reference.
    #[serde(alias = "filename")]
    Source,
}
