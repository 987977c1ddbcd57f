use std::time::Duration;

use crate::catalog::{CatalogClient, CatalogError, FetchError};
use crate::timefmt::{format_duration, format_mmss};

use super::media::Media;
use super::volume::Volume;

/// The playback state of the player, derived from the media resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Elapsed/total text plus where the seek marker sits.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub text: String,
    /// `0.0..=100.0`, never NaN.
    pub marker_percent: f64,
}

pub struct Player<M: Media> {
    pub(super) media: M,
    client: CatalogClient,
    folder: Option<String>,
    tracks: Vec<String>,
    now_playing: Option<String>,
    volume: Volume,
}

impl<M: Media> Player<M> {
    pub fn new(mut media: M, client: CatalogClient, volume: Volume) -> Self {
        media.set_volume(volume.gain());
        Self {
            media,
            client,
            folder: None,
            tracks: Vec::new(),
            now_playing: None,
            volume,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn tracks(&self) -> &[String] {
        &self.tracks
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// List `folder` and make it the current catalog. Playback is untouched.
    pub fn load(&mut self, folder: &str) -> Result<&[String], CatalogError> {
        let tracks = self.client.list_tracks(folder)?;
        self.replace_catalog(folder.to_string(), tracks);
        Ok(&self.tracks)
    }

    /// Swap in a listing that was fetched elsewhere.
    pub fn replace_catalog(&mut self, folder: String, tracks: Vec<String>) {
        tracing::debug!(folder, count = tracks.len(), "catalog replaced");
        self.folder = Some(folder);
        self.tracks = tracks;
    }

    /// Point the media resource at `track` of the current folder.
    pub fn play(&mut self, track: &str, autoplay: bool) -> Result<(), FetchError> {
        let folder = self.folder.as_deref().unwrap_or_default();
        let url = self.client.track_url(folder, track)?;
        tracing::info!(%url, autoplay, "assigning source");

        self.media.set_source(url);
        if autoplay {
            self.media.play();
        }
        self.now_playing = Some(track.to_string());
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        if self.media.source().is_none() {
            return;
        }
        if self.media.is_paused() {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    pub fn pause(&mut self) {
        self.media.pause();
    }

    pub fn resume(&mut self) {
        if self.media.source().is_some() {
            self.media.play();
        }
    }

    /// Position of the playing track in the catalog, found by name.
    pub fn current_index(&self) -> Option<usize> {
        let src = self.media.source()?;
        let last = src.path_segments()?.next_back()?;
        let name = urlencoding::decode(last).ok()?;
        self.tracks.iter().position(|t| *t == name)
    }

    /// Play the following track; nothing happens on the last one.
    pub fn next(&mut self) -> Result<(), FetchError> {
        let Some(i) = self.current_index() else {
            return Ok(());
        };
        match self.tracks.get(i + 1).cloned() {
            Some(track) => self.play(&track, true),
            None => Ok(()),
        }
    }

    /// Play the preceding track; nothing happens on the first one.
    pub fn previous(&mut self) -> Result<(), FetchError> {
        let Some(i) = self.current_index() else {
            return Ok(());
        };
        if i == 0 {
            return Ok(());
        }
        let track = self.tracks[i - 1].clone();
        self.play(&track, true)
    }

    /// Jump to `fraction` of the track length.
    pub fn seek(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let Some(total) = self.media.duration() else {
            return;
        };
        let at = total.mul_f64(fraction.clamp(0.0, 1.0));
        self.media.set_current_time(at);
    }

    /// Move the position by `seconds` (negative goes back), within the track.
    pub fn seek_by(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let Some(total) = self.media.duration() else {
            return;
        };
        let target = (self.media.current_time().as_secs_f64() + seconds)
            .clamp(0.0, total.as_secs_f64());
        self.media.set_current_time(Duration::from_secs_f64(target));
    }

    pub fn set_volume(&mut self, level: i32) {
        self.volume.set_level(level);
        self.media.set_volume(self.volume.gain());
    }

    pub fn step_volume(&mut self, delta: i32) {
        self.set_volume(i32::from(self.volume.level()) + delta);
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.media.set_volume(self.volume.gain());
    }

    pub fn readout(&self) -> Readout {
        let elapsed = self.media.current_time().as_secs_f64();
        let total = self.media.duration();
        let text = format!("{} / {}", format_mmss(elapsed), format_duration(total));

        let marker_percent = match total.map(|d| d.as_secs_f64()) {
            Some(t) if t > 0.0 => {
                let pct = elapsed / t * 100.0;
                if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 }
            }
            _ => 0.0,
        };
        Readout {
            text,
            marker_percent,
        }
    }

    pub fn status(&self) -> PlaybackState {
        if self.media.source().is_none() {
            PlaybackState::Stopped
        } else if self.media.is_paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }

    /// Shows what pressing play/pause would do.
    pub fn play_icon(&self) -> &'static str {
        if self.media.is_paused() { "▶" } else { "⏸" }
    }

    pub fn volume_icon(&self) -> &'static str {
        self.volume.icon()
    }

    pub fn error(&self) -> Option<String> {
        self.media.error()
    }

    /// Consume an end-of-track notification. Returns whether one was pending.
    pub fn handle_ended(&mut self, auto_advance: bool) -> Result<bool, FetchError> {
        if !self.media.take_ended() {
            return Ok(false);
        }
        tracing::debug!(track = ?self.now_playing, auto_advance, "track ended");
        if auto_advance {
            self.next()?;
        }
        Ok(true)
    }
}
