//! MPRIS bridge so desktop media keys and `playerctl` can drive the player.
//!
//! Commands arriving over D-Bus are forwarded as [`ControlCmd`]s to the
//! event loop. The event loop publishes status and now-playing metadata
//! through [`MprisHandle`]; a notify channel tells the D-Bus thread to emit
//! `PropertiesChanged`.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use url::Url;
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::player::PlaybackState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
/// Track ids live outside `/org/mpris`, which is reserved for `NoTrack`.
const TRACK_ID_PREFIX: &str = "/dev/folio/track";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.folio";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

/// What MPRIS clients get to know about the current track.
pub struct TrackMetadata<'a> {
    /// Position in the current folder.
    pub index: usize,
    pub title: &'a str,
    pub artist: &'a str,
    pub album: Option<&'a str>,
    pub url: &'a Url,
    pub length: Option<Duration>,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Replace the published metadata; `None` clears it.
    pub fn set_track_metadata(&self, track: Option<TrackMetadata<'_>>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.title = Some(t.title.to_string());
                    s.artist = vec![t.artist.to_string()];
                    s.album = t.album.map(str::to_string);
                    s.url = Some(t.url.to_string());
                    s.length_micros = t
                        .length
                        .map(|d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX));
                    s.track_id =
                        OwnedObjectPath::try_from(format!("{TRACK_ID_PREFIX}/{}", t.index)).ok();
                }
                None => {
                    s.title = None;
                    s.artist.clear();
                    s.album = None;
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "folio"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["http".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/mpeg".to_string()]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned(v: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(v).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, v: Option<OwnedValue>| {
            if let Some(v) = v {
                map.insert(key.to_string(), v);
            }
        };
        if let Some(id) = s.track_id.clone() {
            put("mpris:trackid", owned(Value::from(id)));
        }
        if let Some(title) = s.title.clone() {
            put("xesam:title", owned(Value::from(title)));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", owned(Value::from(s.artist.clone())));
        }
        if let Some(album) = s.album.clone() {
            put("xesam:album", owned(Value::from(album)));
        }
        if let Some(url) = s.url.clone() {
            put("xesam:url", owned(Value::from(url)));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", owned(Value::from(len)));
        }
        map
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;
    tracing::info!(name = BUS_NAME, "MPRIS service registered");

    loop {
        let mut dirty = false;
        loop {
            match notify.try_recv() {
                Ok(()) => dirty = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if dirty {
            let iface = player.get().await;
            let emitter = player.signal_emitter();
            iface.playback_status_changed(emitter).await?;
            iface.metadata_changed(emitter).await?;
        }
        Timer::after(Duration::from_millis(200)).await;
    }
}

/// Register on the session bus from a background thread.
///
/// Failing to reach the bus only disables media keys; the handle keeps working.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            tracing::warn!(error = %e, "MPRIS unavailable");
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

#[cfg(test)]
mod tests;
