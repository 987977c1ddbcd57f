//! Audio-related small types and handles.
//!
//! This module defines the commands understood by the audio thread, the
//! playback info it publishes and the errors it reports at startup.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source. Playback does not start by itself.
    Load { url: Url },
    /// Bytes for `url` arrived from the fetch thread (or failed to).
    Loaded {
        url: Url,
        result: Result<Arc<[u8]>, String>,
    },
    /// Start or resume; restarts from the beginning after the track ended.
    Play,
    /// Pause, keeping the position.
    Pause,
    /// Jump to an absolute position.
    Seek(Duration),
    /// Output gain in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Source currently assigned to the media resource.
    pub source: Option<Url>,
    /// Elapsed playback time for the current source.
    pub elapsed: Duration,
    /// Total length, once the source is loaded and probed.
    pub duration: Option<Duration>,
    /// Whether playback is currently active (or requested while loading).
    pub playing: bool,
    /// The source is still being downloaded.
    pub loading: bool,
    /// Set when the source played to its end; cleared by whoever consumes it.
    pub ended: bool,
    /// Last fetch or decode failure for the current source.
    pub error: Option<String>,
}

impl PlaybackInfo {
    /// Forget everything about the previous source and point at `url`.
    pub fn reset_for(&mut self, url: Url) {
        *self = Self {
            source: Some(url),
            loading: true,
            ..Self::default()
        };
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("audio thread exited during startup")]
    ThreadGone,
}
