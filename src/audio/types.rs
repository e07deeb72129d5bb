//! Device commands, events and completion handles.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use crate::error::DeviceError;

/// Something the device reports on its own schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceEvent {
    /// Sequence number of the source this event belongs to.
    pub source_seq: u64,
    pub kind: DeviceEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEventKind {
    /// Playback cursor moved; seconds from the start of the source.
    TimeUpdated(f64),
    /// The source's length became known, in seconds.
    MetadataLoaded(f64),
    /// The source played to its end without looping.
    Ended,
}

/// Outcome of an asynchronous device operation.
///
/// Dropping a `Completion` discards the outcome; nobody is required to look.
pub struct Completion {
    rx: Receiver<Result<(), DeviceError>>,
}

impl Completion {
    /// A completion plus the sender the device resolves it with.
    pub fn channel() -> (Sender<Result<(), DeviceError>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// A completion that is already resolved.
    pub fn settled(result: Result<(), DeviceError>) -> Self {
        let (tx, completion) = Self::channel();
        let _ = tx.send(result);
        completion
    }

    /// Take the outcome if the device has resolved it.
    ///
    /// A device that went away without answering counts as
    /// [`DeviceError::Disconnected`].
    pub fn try_take(&self) -> Option<Result<(), DeviceError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DeviceError::Disconnected)),
        }
    }
}

#[derive(Debug)]
pub(super) enum DeviceCmd {
    /// Drop the current source and point at `path`.
    SetSource { seq: u64, path: PathBuf },
    /// Open and decode the current source, paused at zero.
    Load,
    /// Start or resume playback, answering on the sender.
    Play(Sender<Result<(), DeviceError>>),
    Pause,
    /// Move the cursor to an absolute position.
    Seek(Duration),
    SetVolume(f32),
    SetLooping(bool),
    /// Fade out over `fade_out_ms` milliseconds, stop everything and exit.
    Quit { fade_out_ms: u64 },
}
