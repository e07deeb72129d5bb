//! Helpers for turning a file into a `rodio` sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::DeviceError;

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, DeviceError> {
    let file = File::open(path).map_err(|source| DeviceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| DeviceError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the decoder's own idea of the total length, if it has one.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), DeviceError> {
    let decoder = open_decoder(path)?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

/// Read the length of `path` from its container metadata.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

/// Start an endlessly looping background bed at `volume`.
pub(super) fn start_ambient(
    stream: &OutputStream,
    path: &Path,
    volume: f32,
) -> Result<Sink, DeviceError> {
    let source = open_decoder(path)?.buffered().repeat_infinite();

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.play();
    Ok(sink)
}
