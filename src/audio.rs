//! Audio device abstraction and the rodio-backed implementation.
//!
//! The playback session only talks to an [`AudioDevice`]. The real device
//! ([`RodioDevice`]) owns a dedicated audio thread; commands travel to it over
//! a channel and device events come back over another. Nothing on the calling
//! side ever blocks on audio work.

mod device;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use device::AudioDevice;
pub use player::RodioDevice;
pub use types::{Completion, DeviceEvent, DeviceEventKind};
