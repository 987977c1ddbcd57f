use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Applied, Focus};
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogEvent, CatalogRequest, CatalogWorker, StartMode};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Media, Player};
use crate::runtime::mpris_sync::{MprisSnapshot, snapshot, update_mpris};
use crate::ui::{self, HitAreas, fraction_at};

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Clickable regions of the last drawn frame.
    pub hits: HitAreas,
    /// Last status/source/length emitted to MPRIS.
    pub last_mpris: Option<MprisSnapshot>,
}

/// Main terminal event loop: handles input, UI drawing, catalog responses,
/// end of track and MPRIS. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<AudioPlayer>,
    worker: &CatalogWorker,
    catalog_rx: &mpsc::Receiver<CatalogEvent>,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let quit = |player: &Player<AudioPlayer>| {
        player
            .media()
            .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    };

    loop {
        while let Ok(ev) = catalog_rx.try_recv() {
            apply_catalog_event(ev, app, player);
        }

        if let Err(e) = player.handle_ended(settings.playback.auto_advance) {
            tracing::warn!(error = %e, "cannot advance to the next track");
        }

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let snap = snapshot(player);
        if state.last_mpris.as_ref() != Some(&snap) {
            update_mpris(mpris, app, player, &settings.ui.track_attribution);
            state.last_mpris = Some(snap);
        }

        terminal.draw(|f| state.hits = ui::draw(f, app, player, settings))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, player)? {
                quit(player);
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, player, worker, control_tx)? {
                        quit(player);
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(mouse, &state.hits, app, player, worker)?;
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Hand a worker response to the app and, for fresh track listings, to the player.
pub(super) fn apply_catalog_event<M: Media>(
    ev: CatalogEvent,
    app: &mut App,
    player: &mut Player<M>,
) {
    let Applied::Tracks {
        folder,
        tracks,
        start,
    } = app.apply_catalog_event(ev)
    else {
        return;
    };

    let first = tracks.first().cloned();
    player.replace_catalog(folder, tracks);
    let Some(first) = first else {
        return;
    };
    let result = match start {
        StartMode::Browse => Ok(()),
        StartMode::Cue => player.play(&first, false),
        StartMode::Autoplay => player.play(&first, true),
    };
    if let Err(e) = result {
        tracing::warn!(track = first, error = %e, "cannot play first track");
    }
}

pub(super) fn handle_control_cmd<M: Media>(
    cmd: ControlCmd,
    player: &mut Player<M>,
) -> Result<bool, Box<dyn std::error::Error>> {
    tracing::debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return Ok(true),
        ControlCmd::Play => player.resume(),
        ControlCmd::Pause => player.pause(),
        ControlCmd::PlayPause => player.toggle_play_pause(),
        ControlCmd::Stop => {
            player.pause();
            player.seek(0.0);
        }
        ControlCmd::Next | ControlCmd::Prev => {
            let moved = if cmd == ControlCmd::Next {
                player.next()
            } else {
                player.previous()
            };
            if let Err(e) = moved {
                tracing::warn!(error = %e, "cannot switch track");
            }
        }
    }

    Ok(false)
}

fn open_album(
    idx: usize,
    app: &mut App,
    worker: &CatalogWorker,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(folder) = app.album_at(idx).map(|a| a.folder.clone()) else {
        return Ok(());
    };
    app.album_cursor = idx;
    let generation = app.begin_track_load(&folder);
    app.focus = Focus::Tracks;
    tracing::info!(folder, generation, "opening album");
    worker.send(CatalogRequest::Tracks {
        folder,
        generation,
        start: StartMode::Autoplay,
    })?;
    Ok(())
}

fn play_track<M: Media>(idx: usize, app: &mut App, player: &mut Player<M>) {
    let Some(track) = app.track_at(idx).map(str::to_string) else {
        return;
    };
    app.track_cursor = idx;
    if let Err(e) = player.play(&track, true) {
        tracing::warn!(track, error = %e, "cannot play track");
    }
}

fn reload_albums(app: &mut App, worker: &CatalogWorker) -> Result<(), Box<dyn std::error::Error>> {
    let generation = app.begin_album_load();
    worker.send(CatalogRequest::Albums { generation })?;
    Ok(())
}

pub(super) fn handle_key_event<M: Media>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<M>,
    worker: &CatalogWorker,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            player.seek_by(settings.controls.scrub_seconds as f64);
        }
        KeyCode::Char('H') => {
            player.seek_by(-(settings.controls.scrub_seconds as f64));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            player.step_volume(i32::from(settings.controls.volume_step));
        }
        KeyCode::Char('-') => {
            player.step_volume(-i32::from(settings.controls.volume_step));
        }
        KeyCode::Char('m') => player.toggle_mute(),
        KeyCode::Char('a') => app.toggle_menu(),
        KeyCode::Esc => app.close_menu(),
        KeyCode::Tab => app.switch_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('r') => reload_albums(app, worker)?,
        KeyCode::Enter => match app.focus {
            Focus::Albums => open_album(app.album_cursor, app, worker)?,
            Focus::Tracks => play_track(app.track_cursor, app, player),
        },
        _ => {}
    }

    Ok(false)
}

pub(super) fn handle_mouse_event<M: Media>(
    mouse: MouseEvent,
    hits: &HitAreas,
    app: &mut App,
    player: &mut Player<M>,
    worker: &CatalogWorker,
) -> Result<(), Box<dyn std::error::Error>> {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollDown => {
            app.move_cursor(1);
            return Ok(());
        }
        MouseEventKind::ScrollUp => {
            app.move_cursor(-1);
            return Ok(());
        }
        _ => return Ok(()),
    }

    if ui::contains(hits.menu_button, col, row) {
        app.toggle_menu();
    } else if let Some(idx) = hits.albums.and_then(|a| a.index_at(col, row)) {
        open_album(idx, app, worker)?;
    } else if let Some(idx) = hits.tracks.and_then(|t| t.index_at(col, row)) {
        app.focus = Focus::Tracks;
        play_track(idx, app, player);
    } else if let Some(f) = fraction_at(hits.seek_bar, col, row) {
        player.seek(f);
    } else if ui::contains(hits.volume_icon, col, row) {
        player.toggle_mute();
    } else if let Some(f) = fraction_at(hits.volume_bar, col, row) {
        player.set_volume((f * 100.0).round() as i32);
    }
    Ok(())
}
