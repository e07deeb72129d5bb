//! Playback session: the single owner of transport state and the audio device.
//!
//! Commands mutate [`PlaybackState`] synchronously and push the matching
//! effects to the device without waiting for them. Device events flow back
//! in through [`PlaybackSession::pump_device`]. Timed effects run on the
//! session's own timeline, advanced by [`PlaybackSession::advance`].

mod controller;
mod state;

pub use controller::*;
pub use state::*;

#[cfg(test)]
mod tests;
