use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::error::DeviceError;

use super::sink::{create_sink_at, probe_duration, start_ambient};
use super::types::{DeviceCmd, DeviceEvent, DeviceEventKind};

/// Wall-clock playback position that survives pauses.
#[derive(Debug, Default)]
pub(super) struct PlayClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlayClock {
    pub(super) fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn stop(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    /// Jump to `at` and stop running.
    pub(super) fn reset(&mut self, at: Duration) {
        self.started_at = None;
        self.accumulated = at;
    }

    pub(super) fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }
}

/// What a periodic tick does with the current sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum TickAction {
    /// Paused, or nothing loaded.
    Idle,
    /// Still playing: report the cursor.
    Report,
    /// Source ran out while looping: play it again from the start.
    Restart,
    /// Source ran out: drop the sink and report the end.
    Finish,
}

/// Decide a tick. `drained` is `None` without a sink, otherwise whether the
/// sink has run out of queued audio.
pub(super) fn tick_action(playing: bool, drained: Option<bool>, looping: bool) -> TickAction {
    match (playing, drained) {
        (false, _) | (true, None) => TickAction::Idle,
        (true, Some(false)) => TickAction::Report,
        (true, Some(true)) if looping => TickAction::Restart,
        (true, Some(true)) => TickAction::Finish,
    }
}

struct DeviceThread {
    stream: Option<OutputStream>,
    events: Sender<DeviceEvent>,
    source: Option<PathBuf>,
    seq: u64,
    metadata_sent: bool,
    sink: Option<Sink>,
    clock: PlayClock,
    playing: bool,
    volume: f32,
    looping: bool,
}

impl DeviceThread {
    fn emit(&self, kind: DeviceEventKind) {
        let _ = self.events.send(DeviceEvent {
            source_seq: self.seq,
            kind,
        });
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    /// Replace the sink with a fresh, paused one positioned at `at`.
    fn load_at(&mut self, at: Duration) -> Result<(), DeviceError> {
        let Some(stream) = self.stream.as_ref() else {
            return Err(DeviceError::NoOutput("output stream unavailable".into()));
        };
        let Some(path) = self.source.clone() else {
            return Err(DeviceError::NoSource);
        };

        let (sink, decoded_total) = create_sink_at(stream, &path, at, self.volume)?;
        self.drop_sink();
        self.sink = Some(sink);

        if !self.metadata_sent {
            self.metadata_sent = true;
            if let Some(total) = probe_duration(&path).or(decoded_total) {
                self.emit(DeviceEventKind::MetadataLoaded(total.as_secs_f64()));
            }
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), DeviceError> {
        if self.sink.is_none() {
            let at = self.clock.elapsed(Instant::now());
            self.load_at(at)?;
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.clock.start(Instant::now());
        self.playing = true;
        Ok(())
    }

    fn handle(&mut self, cmd: DeviceCmd) {
        match cmd {
            DeviceCmd::SetSource { seq, path } => {
                debug!(?path, seq, "audio source set");
                self.drop_sink();
                self.seq = seq;
                self.source = Some(path);
                self.metadata_sent = false;
                self.clock.reset(Duration::ZERO);
                self.playing = false;
            }
            DeviceCmd::Load => {
                if let Err(e) = self.load_at(Duration::ZERO) {
                    warn!("audio load failed: {e}");
                } else {
                    self.clock.reset(Duration::ZERO);
                    self.playing = false;
                }
            }
            DeviceCmd::Play(reply) => {
                let result = self.start();
                if let Err(ref e) = result {
                    warn!("audio playback failed: {e}");
                }
                let _ = reply.send(result);
            }
            DeviceCmd::Pause => {
                if let Some(s) = self.sink.as_ref() {
                    s.pause();
                }
                self.clock.stop(Instant::now());
                self.playing = false;
            }
            DeviceCmd::Seek(at) => {
                if self.source.is_none() {
                    return;
                }
                // Rebuild the sink and skip into the file.
                if let Err(e) = self.load_at(at) {
                    warn!("audio seek failed: {e}");
                    return;
                }
                self.clock.reset(at);
                if self.playing {
                    if let Some(s) = self.sink.as_ref() {
                        s.play();
                    }
                    self.clock.start(Instant::now());
                }
                self.emit(DeviceEventKind::TimeUpdated(at.as_secs_f64()));
            }
            DeviceCmd::SetVolume(v) => {
                self.volume = v;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(v);
                }
            }
            DeviceCmd::SetLooping(l) => {
                self.looping = l;
            }
            // Handled by the loop itself.
            DeviceCmd::Quit { .. } => {}
        }
    }

    /// Periodic check: report the cursor and handle the end of the source.
    fn tick(&mut self) {
        let drained = self.sink.as_ref().map(Sink::empty);
        match tick_action(self.playing, drained, self.looping) {
            TickAction::Idle => {}
            TickAction::Report => {
                let elapsed = self.clock.elapsed(Instant::now());
                self.emit(DeviceEventKind::TimeUpdated(elapsed.as_secs_f64()));
            }
            TickAction::Restart => {
                self.clock.reset(Duration::ZERO);
                if let Err(e) = self.load_at(Duration::ZERO).and_then(|_| self.start()) {
                    warn!("audio loop restart failed: {e}");
                    self.playing = false;
                }
            }
            TickAction::Finish => {
                self.drop_sink();
                self.clock.reset(Duration::ZERO);
                self.playing = false;
                self.emit(DeviceEventKind::Ended);
            }
        }
    }

    fn fade_out(&mut self, fade_out_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if self.playing && fade_out_ms > 0 {
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(self.volume * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
        }
        sink.set_volume(0.0);
    }
}

pub(super) fn spawn_device_thread(
    rx: Receiver<DeviceCmd>,
    events: Sender<DeviceEvent>,
    settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut s) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                s.log_on_drop(false);
                Some(s)
            }
            Err(e) => {
                warn!("no audio output device: {e}");
                None
            }
        };

        let ambient = match (stream.as_ref(), settings.ambient.as_ref()) {
            (Some(stream), Some(name)) => {
                let path = settings.music_dir.join(name);
                match start_ambient(stream, &path, settings.ambient_volume) {
                    Ok(sink) => Some(sink),
                    Err(e) => {
                        warn!("ambient audio failed to play: {e}");
                        None
                    }
                }
            }
            _ => None,
        };

        let mut device = DeviceThread {
            stream,
            events,
            source: None,
            seq: 0,
            metadata_sent: false,
            sink: None,
            clock: PlayClock::default(),
            playing: false,
            volume: settings.volume,
            looping: false,
        };

        let tick = Duration::from_millis(settings.time_update_ms.max(1));
        let mut last_tick = Instant::now();
        info!("audio thread started");

        loop {
            match rx.recv_timeout(tick) {
                Ok(DeviceCmd::Quit { fade_out_ms }) => {
                    device.fade_out(fade_out_ms);
                    device.drop_sink();
                    if let Some(a) = ambient.as_ref() {
                        a.stop();
                    }
                    break;
                }
                Ok(cmd) => device.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // A busy command stream must not starve time updates.
            if last_tick.elapsed() >= tick {
                last_tick = Instant::now();
                device.tick();
            }
        }
        info!("audio thread stopped");
    })
}
