//! Background thread running catalog requests off the UI thread.
//!
//! Requests run one at a time in arrival order. Every request carries the
//! generation number the caller issued for it; the caller drops events whose
//! generation is no longer the latest one.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::client::CatalogClient;
use super::error::CatalogError;
use super::model::Album;

/// What to do with the first track once a folder listing arrives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StartMode {
    /// Only show the listing.
    Browse,
    /// Assign the first track to the player without starting it.
    Cue,
    /// Start the first track immediately.
    Autoplay,
}

#[derive(Debug)]
pub enum CatalogRequest {
    Albums {
        generation: u64,
    },
    Tracks {
        folder: String,
        generation: u64,
        start: StartMode,
    },
}

#[derive(Debug)]
pub enum CatalogEvent {
    Albums {
        generation: u64,
        result: Result<Vec<Album>, CatalogError>,
    },
    Tracks {
        folder: String,
        generation: u64,
        start: StartMode,
        result: Result<Vec<String>, CatalogError>,
    },
}

/// Handle to the worker thread. Dropping it stops the thread once the
/// request in flight (if any) completes.
pub struct CatalogWorker {
    tx: Sender<CatalogRequest>,
}

impl CatalogWorker {
    pub fn send(&self, req: CatalogRequest) -> Result<(), mpsc::SendError<CatalogRequest>> {
        self.tx.send(req)
    }
}

fn run(client: CatalogClient, rx: Receiver<CatalogRequest>, events: Sender<CatalogEvent>) {
    for req in rx {
        let event = match req {
            CatalogRequest::Albums { generation } => {
                tracing::debug!(generation, "loading albums");
                CatalogEvent::Albums {
                    generation,
                    result: client.list_albums(),
                }
            }
            CatalogRequest::Tracks {
                folder,
                generation,
                start,
            } => {
                tracing::debug!(folder, generation, "loading tracks");
                let result = client.list_tracks(&folder);
                CatalogEvent::Tracks {
                    folder,
                    generation,
                    start,
                    result,
                }
            }
        };
        if events.send(event).is_err() {
            break;
        }
    }
    tracing::debug!("catalog worker stopped");
}

/// Spawn the worker; events are delivered on `events`.
pub fn spawn_catalog_worker(client: CatalogClient, events: Sender<CatalogEvent>) -> CatalogWorker {
    let (tx, rx) = mpsc::channel::<CatalogRequest>();
    thread::spawn(move || run(client, rx, events));
    CatalogWorker { tx }
}
