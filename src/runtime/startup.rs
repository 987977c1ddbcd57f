use crate::app::App;
use crate::catalog::{CatalogRequest, CatalogWorker, StartMode};
use crate::config;

/// Queue the first album listing and, when configured, the default album.
///
/// The default album is cued, not started: its first track becomes the
/// source but stays paused until the user presses play.
pub fn request_initial_listings(
    app: &mut App,
    worker: &CatalogWorker,
    settings: &config::Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let generation = app.begin_album_load();
    worker.send(CatalogRequest::Albums { generation })?;

    if let Some(folder) = settings
        .catalog
        .default_album
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
    {
        let generation = app.begin_track_load(folder);
        worker.send(CatalogRequest::Tracks {
            folder: folder.to_string(),
            generation,
            start: StartMode::Cue,
        })?;
    }
    Ok(())
}
