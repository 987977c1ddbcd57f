use super::*;
use std::sync::mpsc;
use std::time::Duration;

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>, mpsc::Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };
    (handle, state, notify_rx)
}

fn heroes(url: &Url) -> TrackMetadata<'_> {
    TrackMetadata {
        index: 7,
        title: "Janji - Heroes.mp3",
        artist: "Harry",
        album: Some("NCS"),
        url,
        length: Some(Duration::from_micros(1_234_567)),
    }
}

fn player_iface(state: &Arc<Mutex<SharedState>>) -> PlayerIface {
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    PlayerIface {
        tx,
        state: state.clone(),
    }
}

#[test]
fn track_metadata_is_published_and_cleared() {
    let (handle, state, notify) = handle();
    let url = Url::parse("http://music.test/songs/ncs/Janji%20-%20Heroes.mp3").unwrap();

    handle.set_track_metadata(Some(heroes(&url)));
    {
        let shared = state.lock().unwrap();
        assert_eq!(shared.title.as_deref(), Some("Janji - Heroes.mp3"));
        assert_eq!(shared.artist, ["Harry"]);
        assert_eq!(shared.album.as_deref(), Some("NCS"));
        assert_eq!(shared.url.as_deref(), Some(url.as_str()));
        assert_eq!(shared.length_micros, Some(1_234_567));
        assert_eq!(
            shared.track_id.as_ref().map(|p| p.as_str()),
            Some("/dev/folio/track/7")
        );
    }
    assert!(notify.try_recv().is_ok());

    handle.set_track_metadata(None);
    let shared = state.lock().unwrap();
    assert!(shared.title.is_none() && shared.url.is_none() && shared.track_id.is_none());
    assert!(shared.artist.is_empty());
}

#[test]
fn playback_status_follows_the_player() {
    let (handle, state, _notify) = handle();
    let iface = player_iface(&state);

    let mut seen = vec![iface.playback_status().to_string()];
    for playback in [PlaybackState::Playing, PlaybackState::Paused] {
        handle.set_playback(playback);
        seen.push(iface.playback_status().to_string());
    }
    assert_eq!(seen, ["Stopped", "Playing", "Paused"]);
}

#[test]
fn metadata_map_is_empty_until_a_track_is_set() {
    let (handle, state, _notify) = handle();
    let iface = player_iface(&state);
    assert!(iface.metadata().is_empty());

    let url = Url::parse("http://music.test/songs/ncs/Janji%20-%20Heroes.mp3").unwrap();
    handle.set_track_metadata(Some(heroes(&url)));
    let map = iface.metadata();
    for key in [
        "mpris:trackid",
        "mpris:length",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
    ] {
        assert!(map.contains_key(key), "{key} not published");
    }
}

#[test]
fn transport_methods_forward_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop
        ]
    );
}
