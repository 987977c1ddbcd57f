//! View model types: `App`, `Listing` and `Focus`.
//!
//! Nothing here touches the network or the audio device. The runtime issues
//! catalog requests with the generation numbers handed out here and feeds the
//! results back through [`App::apply_catalog_event`].

use crate::catalog::{Album, CatalogEvent, StartMode};

/// State of one listing pane.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Loading,
    Ready(Vec<T>),
    /// The request failed; holds the error for the status line and the log.
    Failed(String),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// Which pane receives cursor movement and activation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Albums,
    Tracks,
}

/// What the runtime should do after a catalog event was applied.
#[derive(Debug, PartialEq)]
pub enum Applied {
    /// Stale or failed; nothing to hand to the player.
    Nothing,
    Albums,
    Tracks {
        folder: String,
        tracks: Vec<String>,
        start: StartMode,
    },
}

pub struct App {
    pub albums: Listing<Album>,
    pub tracks: Listing<String>,
    pub album_cursor: usize,
    pub track_cursor: usize,
    pub focus: Focus,
    pub menu_open: bool,
    /// Folder whose tracks are shown (or being fetched).
    pub shown_folder: Option<String>,

    album_generation: u64,
    track_generation: u64,
}

impl App {
    pub fn new(show_albums: bool) -> Self {
        Self {
            albums: Listing::Ready(Vec::new()),
            tracks: Listing::Ready(Vec::new()),
            album_cursor: 0,
            track_cursor: 0,
            focus: if show_albums {
                Focus::Albums
            } else {
                Focus::Tracks
            },
            menu_open: show_albums,
            shown_folder: None,
            album_generation: 0,
            track_generation: 0,
        }
    }

    /// Mark the album grid as loading and return the generation for the request.
    pub fn begin_album_load(&mut self) -> u64 {
        self.album_generation += 1;
        self.albums = Listing::Loading;
        self.album_generation
    }

    /// Mark the track list as loading `folder` and return the generation for the request.
    pub fn begin_track_load(&mut self, folder: &str) -> u64 {
        self.track_generation += 1;
        self.tracks = Listing::Loading;
        self.track_cursor = 0;
        self.shown_folder = Some(folder.to_string());
        self.track_generation
    }

    /// Apply a worker response unless a newer request superseded it.
    pub fn apply_catalog_event(&mut self, event: CatalogEvent) -> Applied {
        match event {
            CatalogEvent::Albums { generation, result } => {
                if generation != self.album_generation {
                    tracing::debug!(generation, latest = self.album_generation, "stale album listing");
                    return Applied::Nothing;
                }
                match result {
                    Ok(albums) => {
                        self.album_cursor = self.album_cursor.min(albums.len().saturating_sub(1));
                        self.albums = Listing::Ready(albums);
                        Applied::Albums
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "album listing failed");
                        self.albums = Listing::Failed(e.to_string());
                        Applied::Nothing
                    }
                }
            }
            CatalogEvent::Tracks {
                folder,
                generation,
                start,
                result,
            } => {
                if generation != self.track_generation {
                    tracing::debug!(folder, generation, latest = self.track_generation, "stale track listing");
                    return Applied::Nothing;
                }
                match result {
                    Ok(tracks) => {
                        self.tracks = Listing::Ready(tracks.clone());
                        self.track_cursor = 0;
                        Applied::Tracks {
                            folder,
                            tracks,
                            start,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(folder, error = %e, "track listing failed");
                        self.tracks = Listing::Failed(e.to_string());
                        Applied::Nothing
                    }
                }
            }
        }
    }

    pub fn toggle_menu(&mut self) {
        if self.menu_open {
            self.close_menu();
        } else {
            self.menu_open = true;
            self.focus = Focus::Albums;
        }
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
        self.focus = Focus::Tracks;
    }

    /// Albums can only take focus while their panel is visible.
    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Albums => Focus::Tracks,
            Focus::Tracks if self.menu_open => Focus::Albums,
            Focus::Tracks => Focus::Tracks,
        };
    }

    /// Move the cursor of the focused pane by `delta`, stopping at both ends.
    pub fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Albums => (&mut self.album_cursor, self.albums.len()),
            Focus::Tracks => (&mut self.track_cursor, self.tracks.len()),
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn album_at(&self, idx: usize) -> Option<&Album> {
        self.albums.items().get(idx)
    }

    pub fn track_at(&self, idx: usize) -> Option<&str> {
        self.tracks.items().get(idx).map(String::as_str)
    }
}
