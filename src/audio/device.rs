use super::types::{Completion, DeviceEvent};

/// An asynchronous playback device, such as an audio element or a sound card.
///
/// Every method returns immediately. Effects land later; the device reports
/// progress through [`AudioDevice::poll_events`]. Only `play` can fail in a
/// way the owner may want to know about, and it reports that through a
/// [`Completion`] instead of a `Result`.
pub trait AudioDevice {
    /// Point the device at a new source, discarding the old one.
    ///
    /// Returns the sequence number carried by events for this source.
    fn set_source(&mut self, source: &str) -> u64;

    /// Start fetching the current source.
    fn load(&mut self);

    /// Start or resume playback.
    fn play(&mut self) -> Completion;

    fn pause(&mut self);

    /// Move the cursor, in seconds.
    fn set_current_time(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f32);

    fn set_looping(&mut self, looping: bool);

    /// Drain the events reported since the last call.
    fn poll_events(&mut self) -> Vec<DeviceEvent>;

    /// Stop playback, clear the source and stop reporting events.
    fn release(&mut self);
}
