use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::audio::{AudioDevice, Completion, DeviceEventKind};
use crate::catalog::Track;
use crate::timeline::Timeline;

use super::state::{Diagnostics, PlaybackState, SessionOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    /// End of the expand-player animation window.
    EndTransition,
}

/// Owns [`PlaybackState`] and the one audio device it drives.
///
/// The device is handed over at construction, configured in place for every
/// track, and released when the session is dropped.
pub struct PlaybackSession<D: AudioDevice> {
    state: PlaybackState,
    device: D,
    source_seq: u64,
    pending: Vec<Completion>,
    timeline: Timeline<Timer>,
    rng: StdRng,
    expand_revert: Duration,
    subscribers: Vec<Sender<PlaybackState>>,
    diagnostics: Diagnostics,
}

impl<D: AudioDevice> PlaybackSession<D> {
    pub fn new(tracks: Vec<Track>, device: D, options: SessionOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut session = Self {
            state: PlaybackState::new(tracks, &options),
            device,
            source_seq: 0,
            pending: Vec::new(),
            timeline: Timeline::new(),
            rng,
            expand_revert: options.expand_revert,
            subscribers: Vec::new(),
            diagnostics: Diagnostics::default(),
        };
        session.initial_sync();
        session
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.state.tracks
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&mut self) -> Receiver<PlaybackState> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Start playing. Playback always collapses the player.
    pub fn play(&mut self) {
        self.apply(|s| {
            s.is_playing = true;
            s.is_minimized = true;
        });
    }

    pub fn pause(&mut self) {
        self.apply(|s| s.is_playing = false);
    }

    /// Flip playing; starting playback collapses the player, pausing leaves
    /// it as it is.
    pub fn toggle_play(&mut self) {
        self.apply(|s| {
            s.is_playing = !s.is_playing;
            if s.is_playing {
                s.is_minimized = true;
            }
        });
    }

    /// Advance one track, or pick a random one when shuffling.
    ///
    /// The random pick spans the whole list and may land on the current track.
    pub fn next_track(&mut self) {
        let len = self.state.tracks.len();
        if len == 0 {
            return;
        }
        let index = if self.state.is_shuffling {
            self.rng.gen_range(0..len)
        } else {
            (self.state.current.unwrap_or(0) + 1) % len
        };
        self.change_track(index, false);
    }

    /// Step back one track, wrapping at the start. Shuffle does not apply.
    pub fn previous_track(&mut self) {
        let len = self.state.tracks.len();
        if len == 0 {
            return;
        }
        let index = match self.state.current {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.change_track(index, false);
    }

    /// Make the track with `id` current and pause. Unknown ids are ignored.
    pub fn select_track(&mut self, id: &str) {
        match self.state.tracks.iter().position(|t| t.id == id) {
            Some(index) => self.change_track(index, true),
            None => debug!(id, "select_track: no such track"),
        }
    }

    pub fn toggle_loop(&mut self) {
        self.apply(|s| s.is_looping = !s.is_looping);
    }

    pub fn toggle_shuffle(&mut self) {
        self.apply(|s| s.is_shuffling = !s.is_shuffling);
    }

    pub fn toggle_dark_mode(&mut self) {
        self.apply(|s| s.dark_mode = !s.dark_mode);
    }

    /// Store `volume` as given. Range checks belong to the caller.
    pub fn set_volume(&mut self, volume: f32) {
        self.apply(|s| s.volume = volume);
    }

    /// Move the cursor to `seconds`, optimistically. The device is told to
    /// follow; if it cannot, state is not rolled back.
    pub fn seek_to(&mut self, seconds: f64) {
        self.apply(|s| s.current_time = seconds);
        self.device.set_current_time(seconds);
    }

    /// Show the full player. Expanding always pauses, and flags the expand
    /// animation until the revert window elapses.
    pub fn expand_player(&mut self) {
        self.apply(|s| {
            s.is_minimized = false;
            s.is_playing = false;
            s.is_transitioning = true;
        });
        self.timeline
            .schedule(self.expand_revert, Timer::EndTransition);
    }

    /// Collapse the player to its compact form.
    pub fn minimize(&mut self) {
        self.apply(|s| s.is_minimized = true);
    }

    /// Re-read the theme from the current track when it has both colors.
    pub fn extract_colors(&mut self) {
        let Some(track) = self.state.current_track() else {
            return;
        };
        if track.primary_color.is_none() || track.secondary_color.is_none() {
            return;
        }
        let theme = track.theme();
        self.apply(|s| s.apply_theme(theme));
    }

    /// Apply device events and settle finished device operations.
    pub fn pump_device(&mut self) {
        self.drain_completions();

        for ev in self.device.poll_events() {
            if ev.source_seq != self.source_seq {
                self.diagnostics.stale_events += 1;
                continue;
            }
            match ev.kind {
                DeviceEventKind::TimeUpdated(t) => {
                    let t = if t.is_finite() { t.max(0.0).floor() } else { 0.0 };
                    self.apply(|s| s.current_time = t);
                }
                DeviceEventKind::MetadataLoaded(d) => {
                    let d = if d.is_finite() { d.max(0.0).floor() } else { 0.0 };
                    self.apply(|s| s.duration = d);
                }
                DeviceEventKind::Ended => self.handle_ended(),
            }
        }

        self.drain_completions();
    }

    /// Move the session's timeline forward by `by`.
    pub fn advance(&mut self, by: Duration) {
        for timer in self.timeline.advance(by) {
            match timer {
                Timer::EndTransition => self.apply(|s| s.is_transitioning = false),
            }
        }
    }

    fn handle_ended(&mut self) {
        if self.state.is_looping {
            self.device.set_current_time(0.0);
            self.request_play();
            self.apply(|s| s.current_time = 0.0);
        } else {
            self.next_track();
        }
    }

    fn change_track(&mut self, index: usize, pause: bool) {
        let same = self.state.current == Some(index);
        let theme = self.state.tracks[index].theme();

        self.apply(|s| {
            s.current = Some(index);
            s.current_time = 0.0;
            if !same {
                s.duration = 0.0;
            }
            if pause {
                s.is_playing = false;
            }
            s.apply_theme(theme);
        });

        // Same source: no reload, so rewind the device to match state.
        if same {
            self.device.set_current_time(0.0);
            if self.state.is_playing {
                self.request_play();
            }
        }
    }

    /// Mutate state, push the resulting differences to the device and notify
    /// subscribers if anything changed.
    fn apply(&mut self, mutate: impl FnOnce(&mut PlaybackState)) {
        let before = self.state.clone();
        mutate(&mut self.state);
        self.sync_device(&before);
        if self.state != before {
            self.publish();
        }
    }

    fn sync_device(&mut self, before: &PlaybackState) {
        let track_changed = before.current != self.state.current;

        if track_changed {
            self.load_current();
        }

        if before.is_playing != self.state.is_playing {
            if !self.state.is_playing {
                self.device.pause();
            } else if !track_changed {
                // A fresh source already got its play request.
                self.request_play();
            }
        }

        if before.volume != self.state.volume {
            self.device.set_volume(self.state.volume);
        }

        if before.is_looping != self.state.is_looping {
            self.device.set_looping(self.state.is_looping);
        }
    }

    fn load_current(&mut self) {
        let Some(source) = self.state.current_track().map(|t| t.source.clone()) else {
            return;
        };
        self.source_seq = self.device.set_source(&source);
        self.device.load();
        if self.state.is_playing {
            self.request_play();
        }
    }

    fn initial_sync(&mut self) {
        self.load_current();
        self.device.pause();
        self.device.set_volume(self.state.volume);
        self.device.set_looping(self.state.is_looping);
    }

    fn request_play(&mut self) {
        let completion = self.device.play();
        self.pending.push(completion);
    }

    fn drain_completions(&mut self) {
        let mut failures = 0;
        self.pending.retain(|c| match c.try_take() {
            None => true,
            Some(Ok(())) => false,
            Some(Err(e)) => {
                warn!("audio playback failed: {e}");
                failures += 1;
                false
            }
        });
        self.diagnostics.device_failures += failures;
    }

    fn publish(&mut self) {
        let snapshot = &self.state;
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl<D: AudioDevice> Drop for PlaybackSession<D> {
    fn drop(&mut self) {
        self.pending.clear();
        self.device.release();
    }
}
