use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::AudioSettings;
use crate::error::DeviceError;

use super::device::AudioDevice;
use super::thread::spawn_device_thread;
use super::types::{Completion, DeviceCmd, DeviceEvent};

/// The real audio device: a `rodio` output driven from its own thread.
///
/// Source references are resolved against `audio.music_dir`.
pub struct RodioDevice {
    tx: Sender<DeviceCmd>,
    events: Receiver<DeviceEvent>,
    music_dir: PathBuf,
    quit_fade_out_ms: u64,
    source_seq: u64,
    join: Option<JoinHandle<()>>,
}

impl RodioDevice {
    pub fn open(settings: &AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<DeviceCmd>();
        let (events_tx, events_rx) = mpsc::channel::<DeviceEvent>();
        let join = spawn_device_thread(rx, events_tx, settings.clone());

        Self {
            tx,
            events: events_rx,
            music_dir: settings.music_dir.clone(),
            quit_fade_out_ms: settings.quit_fade_out_ms,
            source_seq: 0,
            join: Some(join),
        }
    }

    fn send(&self, cmd: DeviceCmd) -> Result<(), mpsc::SendError<DeviceCmd>> {
        self.tx.send(cmd)
    }
}

impl AudioDevice for RodioDevice {
    fn set_source(&mut self, source: &str) -> u64 {
        self.source_seq += 1;
        let _ = self.send(DeviceCmd::SetSource {
            seq: self.source_seq,
            path: self.music_dir.join(source),
        });
        self.source_seq
    }

    fn load(&mut self) {
        let _ = self.send(DeviceCmd::Load);
    }

    fn play(&mut self) -> Completion {
        let (reply, completion) = Completion::channel();
        if self.send(DeviceCmd::Play(reply)).is_err() {
            return Completion::settled(Err(DeviceError::Disconnected));
        }
        completion
    }

    fn pause(&mut self) {
        let _ = self.send(DeviceCmd::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        let at = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
        let _ = self.send(DeviceCmd::Seek(at));
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(DeviceCmd::SetVolume(volume));
    }

    fn set_looping(&mut self, looping: bool) {
        let _ = self.send(DeviceCmd::SetLooping(looping));
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        self.events.try_iter().collect()
    }

    fn release(&mut self) {
        let _ = self.send(DeviceCmd::Quit {
            fade_out_ms: self.quit_fade_out_ms,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
            debug!("audio device released");
        }
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        self.release();
    }
}
