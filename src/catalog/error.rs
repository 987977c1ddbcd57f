use thiserror::Error;

/// Failure of a single HTTP GET.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {input:?}: {source}")]
    BadUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A directory listing could not be fetched. Shown to the user.
    #[error("catalog unavailable at {url}: {source}")]
    Unavailable {
        url: String,
        #[source]
        source: FetchError,
    },
    /// An album has no usable `info.json`. Recovered with defaults, never shown.
    #[error("no metadata for {folder}: {reason}")]
    MetadataMissing { folder: String, reason: String },
}

impl CatalogError {
    pub(crate) fn unavailable(url: impl Into<String>, source: FetchError) -> Self {
        Self::Unavailable {
            url: url.into(),
            source,
        }
    }
}
