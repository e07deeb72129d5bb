use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Theme, ThemeColor, Track};

/// The authoritative playback state. Subscribers receive clones of it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub tracks: Arc<[Track]>,
    /// Index into `tracks`; `None` only when the list is empty.
    pub current: Option<usize>,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
    /// Seconds into the current track.
    pub current_time: f64,
    /// Seconds, as reported by the device; 0 until metadata loads.
    pub duration: f64,
    pub volume: f32,
    pub dominant_color: ThemeColor,
    pub accent_color: ThemeColor,
    pub dark_mode: bool,
    pub is_minimized: bool,
    /// True only during the expand animation window.
    pub is_transitioning: bool,
}

impl PlaybackState {
    pub(super) fn new(tracks: Vec<Track>, options: &SessionOptions) -> Self {
        let tracks: Arc<[Track]> = tracks.into();
        let current = if tracks.is_empty() { None } else { Some(0) };
        let theme = tracks.first().map(Track::theme).unwrap_or_default();

        Self {
            tracks,
            current,
            is_playing: false,
            is_looping: options.looping,
            is_shuffling: options.shuffling,
            current_time: 0.0,
            duration: 0.0,
            volume: options.volume,
            dominant_color: theme.dominant,
            accent_color: theme.accent,
            dark_mode: options.dark_mode,
            is_minimized: options.minimized,
            is_transitioning: false,
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Device-reported duration, or the fixture's when the device has not
    /// reported one.
    pub fn effective_duration(&self) -> f64 {
        if self.duration > 0.0 {
            self.duration
        } else {
            self.current_track()
                .map_or(0.0, |t| f64::from(t.duration))
        }
    }

    /// Fraction of the track played, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.effective_duration();
        if total <= 0.0 {
            0.0
        } else {
            (self.current_time / total).clamp(0.0, 1.0)
        }
    }

    pub(super) fn apply_theme(&mut self, theme: Theme) {
        self.dominant_color = theme.dominant;
        self.accent_color = theme.accent;
    }
}

/// Startup options for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub volume: f32,
    pub looping: bool,
    pub shuffling: bool,
    pub dark_mode: bool,
    pub minimized: bool,
    /// How long `is_transitioning` stays set after `expand_player`.
    pub expand_revert: Duration,
    /// Seed for shuffle picks; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            volume: 0.5,
            looping: false,
            shuffling: false,
            dark_mode: false,
            minimized: false,
            expand_revert: Duration::from_millis(1000),
            seed: None,
        }
    }
}

/// Counters for problems the session swallowed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    /// Device operations that reported failure.
    pub device_failures: u64,
    /// Device events dropped because they belonged to a replaced source.
    pub stale_events: u64,
}
