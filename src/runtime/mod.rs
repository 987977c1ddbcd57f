use std::sync::{Arc, mpsc};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogClient, CatalogEvent, Fetch, HttpFetcher, spawn_catalog_worker};
use crate::cli::Args;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::player::{Player, Volume};

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = settings::load_settings(&args);

    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("folio: file logging disabled: {e}");
            None
        }
    };
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        root = %settings.catalog.root_url,
        "starting"
    );

    let timeout = Duration::from_secs(settings.catalog.request_timeout_secs);
    let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(timeout)?);
    let client = CatalogClient::new(fetcher.clone(), &settings.catalog.root_url, &settings.catalog)?;

    let audio_player = AudioPlayer::new(fetcher, f32::from(settings.audio.initial_volume) / 100.0)?;
    let volume = Volume::new(
        settings.audio.initial_volume,
        settings.audio.unmute_fallback_volume,
    );
    let mut player = Player::new(audio_player, client.clone(), volume);
    let mut app = App::new(settings.ui.show_albums_on_start);

    let (catalog_tx, catalog_rx) = mpsc::channel::<CatalogEvent>();
    let worker = spawn_catalog_worker(client, catalog_tx);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    startup::request_initial_listings(&mut app, &worker, &settings)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut player,
            &worker,
            &catalog_rx,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    tracing::info!("bye");
    run_result
}
