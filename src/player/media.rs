use std::time::Duration;

use url::Url;

/// The single playable resource.
///
/// Assigning a source resets the position and the known duration; playback
/// only starts on [`Media::play`].
pub trait Media {
    fn set_source(&mut self, url: Url);
    fn source(&self) -> Option<Url>;

    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;

    fn current_time(&self) -> Duration;
    /// `None` until the source is loaded and its length is known.
    fn duration(&self) -> Option<Duration>;
    fn set_current_time(&mut self, at: Duration);

    /// Gain in `[0, 1]`.
    fn set_volume(&mut self, gain: f32);

    /// True once after the source played to its end.
    fn take_ended(&mut self) -> bool;
    /// Last fetch or decode failure of the current source.
    fn error(&self) -> Option<String>;
}
