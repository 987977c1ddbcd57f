use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::event_loop::{apply_catalog_event, handle_control_cmd, handle_key_event, handle_mouse_event};
use super::startup::request_initial_listings;
use crate::app::{App, Focus, Listing};
use crate::audio::AudioPlayer;
use crate::catalog::{
    CatalogClient, CatalogEvent, CatalogWorker, StartMode, StaticFetcher, spawn_catalog_worker,
};
use crate::cli::Args;
use crate::config::Settings;
use crate::mpris::ControlCmd;
use crate::player::{Media, PlaybackState, Player, Volume};
use crate::ui::{HitAreas, ListArea};

const ROOT: &str = "http://music.test/songs/";

struct Harness {
    settings: Settings,
    app: App,
    player: Player<AudioPlayer>,
    worker: CatalogWorker,
    events: Receiver<CatalogEvent>,
    control_tx: mpsc::Sender<ControlCmd>,
    control_rx: Receiver<ControlCmd>,
}

fn harness() -> Harness {
    let fetcher = StaticFetcher::new()
        .serve(ROOT, r#"<a href="ncs/">ncs/</a><a href="empty/">empty/</a>"#)
        .serve(
            "http://music.test/songs/ncs/",
            r#"<a href="a.mp3">a</a><a href="b.mp3">b</a>"#,
        )
        .serve("http://music.test/songs/empty/", "<ul></ul>");
    let settings = Settings::default();
    let client = CatalogClient::new(Arc::new(fetcher), ROOT, &settings.catalog).unwrap();
    let (media, _audio_rx) = AudioPlayer::detached();
    let player = Player::new(media, client.clone(), Volume::new(50, 10));
    let (events_tx, events) = mpsc::channel();
    let worker = spawn_catalog_worker(client, events_tx);
    let (control_tx, control_rx) = mpsc::channel();

    Harness {
        settings,
        app: App::new(true),
        player,
        worker,
        events,
        control_tx,
        control_rx,
    }
}

impl Harness {
    fn key(&mut self, code: KeyCode) -> bool {
        let quit = handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &self.settings,
            &mut self.app,
            &mut self.player,
            &self.worker,
            &self.control_tx,
        )
        .unwrap();
        // Keys routed through the control channel, like media keys.
        while let Ok(cmd) = self.control_rx.try_recv() {
            handle_control_cmd(cmd, &mut self.player).unwrap();
        }
        quit
    }

    fn click(&mut self, hits: &HitAreas, column: u16, row: u16) {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(mouse, hits, &mut self.app, &mut self.player, &self.worker).unwrap();
    }

    /// Wait for `n` worker responses and apply them.
    fn pump(&mut self, n: usize) {
        for _ in 0..n {
            let ev = self.events.recv_timeout(Duration::from_secs(5)).unwrap();
            apply_catalog_event(ev, &mut self.app, &mut self.player);
        }
    }

    fn set_duration(&self, secs: u64) {
        self.player
            .media()
            .playback_handle()
            .lock()
            .unwrap()
            .duration = Some(Duration::from_secs(secs));
    }
}

#[test]
fn startup_lists_albums_and_cues_default_album() {
    let mut h = harness();
    h.settings.catalog.default_album = Some("ncs".into());
    request_initial_listings(&mut h.app, &h.worker, &h.settings).unwrap();
    assert_eq!(h.app.albums, Listing::Loading);
    assert_eq!(h.app.tracks, Listing::Loading);

    h.pump(2);
    assert_eq!(h.app.albums.len(), 2);
    assert_eq!(h.player.now_playing(), Some("a.mp3"));
    assert_eq!(h.player.status(), PlaybackState::Paused);
    assert_eq!(h.player.readout().text, "00:00 / 00:00");
}

#[test]
fn opening_an_album_autoplays_its_first_track() {
    let mut h = harness();
    request_initial_listings(&mut h.app, &h.worker, &h.settings).unwrap();
    h.pump(1);

    assert_eq!(h.app.focus, Focus::Albums);
    h.key(KeyCode::Char('k'));
    h.key(KeyCode::Enter);
    assert_eq!(h.app.tracks, Listing::Loading);
    assert_eq!(h.app.focus, Focus::Tracks);

    h.pump(1);
    assert_eq!(h.player.folder(), Some("ncs"));
    assert_eq!(h.player.now_playing(), Some("a.mp3"));
    assert_eq!(h.player.status(), PlaybackState::Playing);
}

#[test]
fn opening_an_empty_album_plays_nothing() {
    let mut h = harness();
    request_initial_listings(&mut h.app, &h.worker, &h.settings).unwrap();
    h.pump(1);

    h.key(KeyCode::Char('j'));
    h.key(KeyCode::Enter);
    h.pump(1);
    assert_eq!(h.app.tracks, Listing::Ready(vec![]));
    assert_eq!(h.player.status(), PlaybackState::Stopped);
}

#[test]
fn transport_keys_drive_the_player() {
    let mut h = harness();
    h.app.tracks = Listing::Ready(vec!["a.mp3".into(), "b.mp3".into()]);
    h.app.shown_folder = Some("ncs".into());
    h.player
        .replace_catalog("ncs".into(), vec!["a.mp3".into(), "b.mp3".into()]);
    h.app.close_menu();

    h.key(KeyCode::Enter);
    assert_eq!(h.player.status(), PlaybackState::Playing);
    h.key(KeyCode::Char(' '));
    assert_eq!(h.player.status(), PlaybackState::Paused);
    h.key(KeyCode::Char('p'));
    assert_eq!(h.player.status(), PlaybackState::Playing);

    h.key(KeyCode::Char('l'));
    assert_eq!(h.player.current_index(), Some(1));
    h.key(KeyCode::Char('l'));
    assert_eq!(h.player.current_index(), Some(1));
    h.key(KeyCode::Char('h'));
    assert_eq!(h.player.current_index(), Some(0));

    h.set_duration(60);
    h.key(KeyCode::Char('L'));
    assert_eq!(h.player.media().current_time(), Duration::from_secs(5));
    h.key(KeyCode::Char('H'));
    h.key(KeyCode::Char('H'));
    assert_eq!(h.player.media().current_time(), Duration::ZERO);
}

#[test]
fn volume_keys_step_and_mute() {
    let mut h = harness();
    h.key(KeyCode::Char('+'));
    assert_eq!(h.player.volume().level(), 55);
    h.key(KeyCode::Char('-'));
    h.key(KeyCode::Char('-'));
    assert_eq!(h.player.volume().level(), 45);

    h.key(KeyCode::Char('m'));
    assert!(h.player.volume().is_muted());
    h.key(KeyCode::Char('m'));
    assert_eq!(h.player.volume().level(), 45);
}

#[test]
fn menu_keys_and_quit() {
    let mut h = harness();
    assert!(h.app.menu_open);
    h.key(KeyCode::Esc);
    assert!(!h.app.menu_open);
    h.key(KeyCode::Char('a'));
    assert!(h.app.menu_open);
    h.key(KeyCode::Tab);
    assert_eq!(h.app.focus, Focus::Tracks);

    h.key(KeyCode::Char('r'));
    assert_eq!(h.app.albums, Listing::Loading);

    assert!(!h.key(KeyCode::Char('x')));
    assert!(h.key(KeyCode::Char('q')));
}

#[test]
fn mouse_clicks_map_to_controls() {
    let mut h = harness();
    h.app.tracks = Listing::Ready(vec!["a.mp3".into(), "b.mp3".into()]);
    h.app.shown_folder = Some("ncs".into());
    h.player
        .replace_catalog("ncs".into(), vec!["a.mp3".into(), "b.mp3".into()]);

    let hits = HitAreas {
        menu_button: Rect::new(1, 1, 10, 1),
        albums: None,
        tracks: Some(ListArea {
            inner: Rect::new(1, 4, 50, 10),
            offset: 0,
            item_height: 1,
            len: 2,
        }),
        seek_bar: Rect::new(2, 20, 101, 1),
        volume_icon: Rect::new(2, 21, 3, 1),
        volume_bar: Rect::new(5, 21, 101, 1),
    };

    h.click(&hits, 10, 5);
    assert_eq!(h.player.now_playing(), Some("b.mp3"));
    assert_eq!(h.app.track_cursor, 1);

    h.set_duration(200);
    h.click(&hits, 52, 20);
    assert_eq!(h.player.media().current_time(), Duration::from_secs(100));

    h.click(&hits, 35, 21);
    assert_eq!(h.player.volume().level(), 30);
    h.click(&hits, 3, 21);
    assert!(h.player.volume().is_muted());

    h.click(&hits, 3, 1);
    assert!(!h.app.menu_open);
}

#[test]
fn clicking_an_album_card_opens_it() {
    let mut h = harness();
    request_initial_listings(&mut h.app, &h.worker, &h.settings).unwrap();
    h.pump(1);

    let hits = HitAreas {
        albums: Some(ListArea {
            inner: Rect::new(1, 4, 40, 12),
            offset: 0,
            item_height: 3,
            len: 2,
        }),
        ..HitAreas::default()
    };
    h.click(&hits, 5, 5);
    assert_eq!(h.app.shown_folder.as_deref(), Some("ncs"));
    h.pump(1);
    assert_eq!(h.player.status(), PlaybackState::Playing);
}

#[test]
fn stop_pauses_and_rewinds() {
    let mut h = harness();
    h.player.replace_catalog("ncs".into(), vec!["a.mp3".into()]);
    h.player.play("a.mp3", true).unwrap();
    h.set_duration(100);
    h.player.seek(0.5);

    assert!(!handle_control_cmd(ControlCmd::Stop, &mut h.player).unwrap());
    assert_eq!(h.player.status(), PlaybackState::Paused);
    assert_eq!(h.player.media().current_time(), Duration::ZERO);
    assert!(handle_control_cmd(ControlCmd::Quit, &mut h.player).unwrap());
}

#[test]
fn stale_track_listing_does_not_reach_the_player() {
    let mut h = harness();
    let old = h.app.begin_track_load("ncs");
    h.app.begin_track_load("empty");
    apply_catalog_event(
        CatalogEvent::Tracks {
            folder: "ncs".into(),
            generation: old,
            start: StartMode::Autoplay,
            result: Ok(vec!["a.mp3".into()]),
        },
        &mut h.app,
        &mut h.player,
    );
    assert_eq!(h.player.folder(), None);
    assert_eq!(h.player.status(), PlaybackState::Stopped);
}

#[test]
fn cli_overrides_config() {
    let args = Args {
        root: Some("http://nas.local/music".into()),
        album: Some("jazz".into()),
        config: Some("/nonexistent/folio.toml".into()),
    };
    let settings = super::settings::load_settings(&args);
    assert_eq!(settings.catalog.root_url, "http://nas.local/music");
    assert_eq!(settings.catalog.default_album.as_deref(), Some("jazz"));
}
