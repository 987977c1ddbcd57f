//! Utilities for creating `rodio` sinks from downloaded audio bytes.
//!
//! The helpers here decode an in-memory file, prepare a paused `Sink` at the
//! requested start position and probe the file's total length.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink, Source};

/// Create a paused `Sink` for `data` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    data: &Arc<[u8]>,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, DecoderError> {
    let source = Decoder::new(Cursor::new(data.clone()))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Total length of an encoded file, from its headers when possible and from
/// the decoder otherwise.
pub(super) fn probe_duration(data: &Arc<[u8]>) -> Option<Duration> {
    let from_tags = Probe::new(Cursor::new(&data[..]))
        .guess_file_type()
        .ok()
        .and_then(|p| p.read().ok())
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero());

    from_tags.or_else(|| {
        Decoder::new(Cursor::new(data.clone()))
            .ok()
            .and_then(|d| d.total_duration())
            .filter(|d| !d.is_zero())
    })
}

/// Playback position from the time accumulated before the last resume plus
/// the time since it, never past `total`.
pub(super) fn position(
    accumulated: Duration,
    resumed_for: Option<Duration>,
    total: Option<Duration>,
) -> Duration {
    let pos = accumulated + resumed_for.unwrap_or(Duration::ZERO);
    match total {
        Some(t) => pos.min(t),
        None => pos,
    }
}
