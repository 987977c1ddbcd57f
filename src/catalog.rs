//! Remote album catalog.
//!
//! Albums are folders under a root URL served by a plain static file server.
//! Everything is discovered from HTML directory listings plus two optional
//! sidecar files per folder (`info.json`, `cover.jpg`).

mod client;
mod error;
mod fetch;
mod listing;
mod model;
mod worker;

pub use client::CatalogClient;
pub use error::{CatalogError, FetchError};
pub use fetch::{Fetch, HttpFetcher};
pub use model::Album;
pub use worker::{CatalogEvent, CatalogRequest, CatalogWorker, StartMode, spawn_catalog_worker};

#[cfg(test)]
pub(crate) use fetch::StaticFetcher;
