//! Audio playback: a single media resource on a dedicated thread.
//!
//! The UI thread talks to it through `AudioPlayer`, which implements
//! `player::Media`. Assigning a new source reuses the same thread, output
//! stream and command channel; only the decoded sink is replaced.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
