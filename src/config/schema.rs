use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/folio/config.toml` or `~/.config/folio/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line arguments (root url, default album)
/// 2) Environment variables (prefix `FOLIO__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// URL of the directory listing that holds the album folders.
    pub root_url: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Album folder to cue (loaded but not started) on startup, e.g.
    /// `default_album = "ncs"` to open on the `songs/ncs` folder.
    pub default_album: Option<String>,
    /// Per-album metadata document name.
    pub info_file: String,
    /// Per-album cover image name.
    pub cover_file: String,
    /// Timeout for every HTTP request (listings, metadata, audio).
    pub request_timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            root_url: "http://127.0.0.1:8000/songs/".to_string(),
            extensions: vec!["mp3".into()],
            default_album: None,
            info_file: "info.json".to_string(),
            cover_file: "cover.jpg".to_string(),
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume level (0-100) the player starts with.
    pub initial_volume: u8,
    /// Level restored by unmute when no audible level was ever set.
    pub unmute_fallback_volume: u8,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 100,
            unmute_fallback_volume: 10,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the album panel starts open.
    pub show_albums_on_start: bool,
    /// Secondary text rendered on every track row.
    pub track_attribution: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ folio: albums over http ~ ".to_string(),
            show_albums_on_start: true,
            track_attribution: "Harry".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start the next track of the album when the current one ends.
    pub auto_advance: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. Defaults to the XDG state dir.
    pub directory: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            filter: "info,folio=debug".to_string(),
        }
    }
}
