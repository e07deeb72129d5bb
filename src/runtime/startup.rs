use std::time::Duration;

use crate::catalog::{ThemeColor, Track, default_tracks};
use crate::config::{Settings, UiSettings};
use crate::session::SessionOptions;
use crate::transition::{TransitionTimings, Viewport};

/// The configured track list, or the built-in one.
pub fn tracks(settings: &Settings) -> Vec<Track> {
    settings.tracks.clone().unwrap_or_else(default_tracks)
}

/// Playback defaults for a new session.
pub fn session_options(settings: &Settings) -> SessionOptions {
    SessionOptions {
        volume: settings.audio.volume,
        looping: settings.playback.looping,
        shuffling: settings.playback.shuffle,
        dark_mode: settings.playback.dark_mode,
        minimized: settings.playback.start_minimized,
        expand_revert: Duration::from_millis(settings.playback.expand_revert_ms),
        seed: None,
    }
}

pub fn transition_timings(settings: &Settings) -> TransitionTimings {
    let t = &settings.transition;
    TransitionTimings {
        swap_delay: Duration::from_millis(t.swap_delay_ms),
        clear_delay: Duration::from_millis(t.clear_delay_ms),
        back_color: ThemeColor::new(t.back_color.as_str()),
        particles: t.particles,
        seed: None,
    }
}

/// The terminal's size in the pixel space the transition effects use.
pub fn viewport(cols: u16, rows: u16, ui: &UiSettings) -> Viewport {
    Viewport::new(
        f32::from(cols) * f32::from(ui.cell_width_px),
        f32::from(rows) * f32::from(ui.cell_height_px),
    )
}
