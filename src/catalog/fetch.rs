use std::io::Read;
use std::time::Duration;

use url::Url;

use super::error::FetchError;

/// Blocking HTTP GET, the only thing the catalog and the audio thread need
/// from the network.
pub trait Fetch: Send + Sync {
    fn get_text(&self, url: &Url) -> Result<String, FetchError>;
    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// `Fetch` backed by `reqwest`'s blocking client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    fn get(&self, url: &Url) -> Result<reqwest::blocking::Response, FetchError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

fn transport(url: &Url, e: reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    }
}

impl Fetch for HttpFetcher {
    fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        self.get(url)?.text().map_err(|e| transport(url, e))
    }

    /// Audio bodies can take longer than the request timeout to arrive, so they
    /// are streamed through `Read`, where the timeout bounds each read instead
    /// of the whole download.
    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let mut response = self.get(url)?;
        let capacity = response
            .content_length()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        let mut bytes = Vec::with_capacity(capacity);
        response
            .read_to_end(&mut bytes)
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(bytes)
    }
}

/// In-memory `Fetch` serving fixed bodies; unknown URLs answer 404.
#[cfg(test)]
#[derive(Default)]
pub struct StaticFetcher {
    bodies: std::collections::HashMap<String, Vec<u8>>,
    broken: std::collections::HashSet<String>,
    requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    /// Make `url` fail at the transport level (connection refused and the like).
    pub fn break_url(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn lookup(&self, url: &Url) -> Result<&Vec<u8>, FetchError> {
        let key = url.to_string();
        if let Ok(mut r) = self.requests.lock() {
            r.push(key.clone());
        }
        if self.broken.contains(&key) {
            return Err(FetchError::Transport {
                url: key,
                message: "connection refused".to_string(),
            });
        }
        self.bodies
            .get(&key)
            .ok_or(FetchError::Status { url: key, status: 404 })
    }
}

#[cfg(test)]
impl Fetch for StaticFetcher {
    fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        self.lookup(url)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.lookup(url).cloned()
    }
}
