use std::time::Duration;

use url::Url;

use crate::app::App;
use crate::mpris::{MprisHandle, TrackMetadata};
use crate::player::{Media, PlaybackState, Player};

/// What was last published to MPRIS; republish only when it changes.
pub type MprisSnapshot = (PlaybackState, Option<Url>, Option<Duration>);

pub fn snapshot<M: Media>(player: &Player<M>) -> MprisSnapshot {
    (
        player.status(),
        player.media().source(),
        player.media().duration(),
    )
}

pub fn update_mpris<M: Media>(mpris: &MprisHandle, app: &App, player: &Player<M>, artist: &str) {
    let source = player.media().source();
    let album = player.folder().map(|folder| {
        app.albums
            .items()
            .iter()
            .find(|a| a.folder == folder)
            .map_or(folder, |a| a.title.as_str())
    });

    let track = match (&source, player.now_playing()) {
        (Some(url), Some(title)) => Some(TrackMetadata {
            index: player.current_index().unwrap_or(0),
            title,
            artist,
            album,
            url,
            length: player.media().duration(),
        }),
        _ => None,
    };
    mpris.set_track_metadata(track);
    mpris.set_playback(player.status());
}
