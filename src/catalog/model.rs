use serde::Deserialize;
use url::Url;

pub const NO_TITLE: &str = "No Title";
pub const NO_DESCRIPTION: &str = "No Description";
/// Description used when an album has no readable `info.json` at all.
pub const MISSING_DESCRIPTION: &str = "No description";

/// One album card.
#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    /// Decoded folder name under the catalog root.
    pub folder: String,
    pub title: String,
    pub description: String,
    /// Derived from the folder, never fetched.
    pub cover: Url,
}

/// Contents of an album's `info.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl AlbumInfo {
    /// Title and description with placeholders for absent or empty fields.
    pub fn into_labels(self) -> (String, String) {
        (
            non_empty(self.title).unwrap_or_else(|| NO_TITLE.to_string()),
            non_empty(self.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        )
    }
}
