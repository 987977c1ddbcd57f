use std::sync::Arc;

use url::Url;

use crate::config::CatalogSettings;

use super::error::{CatalogError, FetchError};
use super::fetch::Fetch;
use super::listing::{album_folders, track_names};
use super::model::{Album, AlbumInfo, MISSING_DESCRIPTION};

/// Lists albums and tracks from a static file server.
///
/// Cheap to clone; every clone shares the same fetcher.
#[derive(Clone)]
pub struct CatalogClient {
    fetcher: Arc<dyn Fetch>,
    root: Url,
    extensions: Vec<String>,
    info_file: String,
    cover_file: String,
}

fn parse_url(input: &str) -> Result<Url, FetchError> {
    Url::parse(input).map_err(|source| FetchError::BadUrl {
        input: input.to_string(),
        source,
    })
}

fn join(base: &Url, relative: &str) -> Result<Url, FetchError> {
    base.join(relative).map_err(|source| FetchError::BadUrl {
        input: relative.to_string(),
        source,
    })
}

/// Percent-encode every segment of `folder`, keeping `/` as separator.
fn encode_folder(folder: &str) -> String {
    folder
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl CatalogClient {
    /// Create a client for the listing at `root_url` (a trailing `/` is added when missing).
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        root_url: &str,
        settings: &CatalogSettings,
    ) -> Result<Self, FetchError> {
        let mut root = parse_url(root_url)?;
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }

        Ok(Self {
            fetcher,
            root,
            extensions: settings.extensions.clone(),
            info_file: settings.info_file.clone(),
            cover_file: settings.cover_file.clone(),
        })
    }

    /// `<root>/<folder>/`
    pub fn folder_url(&self, folder: &str) -> Result<Url, FetchError> {
        let encoded = encode_folder(folder);
        if encoded.is_empty() {
            return Ok(self.root.clone());
        }
        join(&self.root, &format!("{encoded}/"))
    }

    /// `<root>/<folder>/<track>` with the track name percent-encoded.
    pub fn track_url(&self, folder: &str, track: &str) -> Result<Url, FetchError> {
        join(&self.folder_url(folder)?, &urlencoding::encode(track))
    }

    pub fn cover_url(&self, folder: &str) -> Result<Url, FetchError> {
        join(&self.folder_url(folder)?, &urlencoding::encode(&self.cover_file))
    }

    pub fn info_url(&self, folder: &str) -> Result<Url, FetchError> {
        join(&self.folder_url(folder)?, &urlencoding::encode(&self.info_file))
    }

    /// Names of the audio files in `folder`, in listing order.
    ///
    /// An empty folder is `Ok(vec![])`; only a failed listing is an error.
    pub fn list_tracks(&self, folder: &str) -> Result<Vec<String>, CatalogError> {
        let url = self
            .folder_url(folder)
            .map_err(|e| CatalogError::unavailable(folder, e))?;
        let html = self
            .fetcher
            .get_text(&url)
            .map_err(|e| CatalogError::unavailable(url.as_str(), e))?;

        let tracks = track_names(&url, &html, &self.extensions);
        tracing::debug!(folder, count = tracks.len(), "listed tracks");
        Ok(tracks)
    }

    /// Every album folder under the root, with its sidecar metadata.
    ///
    /// Metadata is fetched one folder at a time; a folder without usable
    /// metadata still gets a card.
    pub fn list_albums(&self) -> Result<Vec<Album>, CatalogError> {
        let html = self
            .fetcher
            .get_text(&self.root)
            .map_err(|e| CatalogError::unavailable(self.root.as_str(), e))?;

        let mut albums = Vec::new();
        for folder in album_folders(&self.root, &html) {
            let (title, description) = match self.album_info(&folder) {
                Ok(info) => info.into_labels(),
                Err(e) => {
                    tracing::debug!(error = %e, "using fallback album labels");
                    (folder.clone(), MISSING_DESCRIPTION.to_string())
                }
            };
            let cover = match self.cover_url(&folder) {
                Ok(u) => u,
                Err(e) => {
                    tracing::warn!(folder, error = %e, "skipping album with unusable name");
                    continue;
                }
            };
            albums.push(Album {
                folder,
                title,
                description,
                cover,
            });
        }
        tracing::debug!(count = albums.len(), "listed albums");
        Ok(albums)
    }

    /// Fetch and parse `info.json` for `folder`.
    pub fn album_info(&self, folder: &str) -> Result<AlbumInfo, CatalogError> {
        let missing = |reason: String| CatalogError::MetadataMissing {
            folder: folder.to_string(),
            reason,
        };
        let url = self.info_url(folder).map_err(|e| missing(e.to_string()))?;
        let body = self
            .fetcher
            .get_text(&url)
            .map_err(|e| missing(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| missing(e.to_string()))
    }
}
