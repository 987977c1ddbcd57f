//! UI rendering for the terminal user interface.
//!
//! `draw` renders one frame with `ratatui` and reports where the clickable
//! parts ended up, so the event loop can map mouse clicks back to actions.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Focus, Listing};
use crate::config::{ControlsSettings, Settings};
use crate::player::{Media, Player};

pub const LOADING_TRACKS: &str = "Loading...";
pub const LOADING_ALBUMS: &str = "Loading albums...";
pub const NO_TRACKS: &str = "No songs found in this album.";
pub const NO_ALBUMS: &str = "No albums found.";
pub const TRACKS_FAILED: &str = "Error loading songs. Please try again.";
pub const ALBUMS_FAILED: &str = "Error loading albums.";
pub const NO_FOLDER: &str = "No album selected.";

const MENU_BUTTON: &str = "[≡ albums]";
const ALBUM_CARD_HEIGHT: u16 = 3;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "open album / play song".to_string());
    map.insert("tab".to_string(), "switch pane".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L and +/- are filled dynamically from config.
    map.insert("m".to_string(), "mute".to_string());
    map.insert("a".to_string(), "albums".to_string());
    map.insert("r".to_string(), "reload albums".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = [
        "j/k", "tab", "enter", "space/p", "h/l", "H/L", "+/-", "m", "a", "r", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] scrub -/+{}s", controls.scrub_seconds)),
            "+/-" => Some(format!("[+/-] volume ±{}", controls.volume_step)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// A rendered list: where its rows are and which item is at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListArea {
    pub inner: Rect,
    pub offset: usize,
    pub item_height: u16,
    pub len: usize,
}

impl ListArea {
    /// Index of the item drawn at (`column`, `row`), if any.
    pub fn index_at(&self, column: u16, row: u16) -> Option<usize> {
        if !contains(self.inner, column, row) || self.item_height == 0 {
            return None;
        }
        let idx = self.offset + usize::from((row - self.inner.y) / self.item_height);
        (idx < self.len).then_some(idx)
    }
}

/// Clickable regions of the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitAreas {
    pub menu_button: Rect,
    pub albums: Option<ListArea>,
    pub tracks: Option<ListArea>,
    pub seek_bar: Rect,
    pub volume_icon: Rect,
    pub volume_bar: Rect,
}

pub fn contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
}

/// Horizontal click position inside `r`: 0.0 on the first column, 1.0 on the last.
pub fn fraction_at(r: Rect, column: u16, row: u16) -> Option<f64> {
    if !contains(r, column, row) {
        return None;
    }
    let span = r.width.saturating_sub(1).max(1);
    Some((f64::from(column - r.x) / f64::from(span)).min(1.0))
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Message for a listing that has nothing to show, `None` when it has items.
fn placeholder<T>(
    listing: &Listing<T>,
    loading: &'static str,
    empty: &'static str,
    failed: &'static str,
) -> Option<&'static str> {
    match listing {
        Listing::Loading => Some(loading),
        Listing::Failed(_) => Some(failed),
        Listing::Ready(items) if items.is_empty() => Some(empty),
        Listing::Ready(_) => None,
    }
}

fn cursor_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn draw_albums(frame: &mut Frame, app: &App, area: Rect) -> Option<ListArea> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" albums (esc closes) ");

    if let Some(msg) = placeholder(&app.albums, LOADING_ALBUMS, NO_ALBUMS, ALBUMS_FAILED) {
        frame.render_widget(Paragraph::new(msg).block(block).wrap(Wrap { trim: true }), area);
        return None;
    }

    let inner = block.inner(area);
    let items: Vec<ListItem> = app
        .albums
        .items()
        .iter()
        .map(|a| {
            ListItem::new(vec![
                Line::from(a.title.as_str().bold()),
                Line::from(a.description.as_str()),
                Line::from(a.cover.as_str().dim()),
            ])
        })
        .collect();

    let focused = app.focus == Focus::Albums;
    let list = List::new(items)
        .block(block)
        .highlight_style(cursor_style(focused))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.album_cursor));
    frame.render_stateful_widget(list, area, &mut state);

    Some(ListArea {
        inner,
        offset: state.offset(),
        item_height: ALBUM_CARD_HEIGHT,
        len: app.albums.len(),
    })
}

fn draw_tracks<M: Media>(
    frame: &mut Frame,
    app: &App,
    player: &Player<M>,
    attribution: &str,
    area: Rect,
) -> Option<ListArea> {
    let title = match app.shown_folder.as_deref() {
        Some(folder) => format!(" tracks: {folder} "),
        None => " tracks ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let msg = match app.shown_folder {
        None if app.tracks.is_empty() => Some(NO_FOLDER),
        _ => placeholder(&app.tracks, LOADING_TRACKS, NO_TRACKS, TRACKS_FAILED),
    };
    if let Some(msg) = msg {
        frame.render_widget(Paragraph::new(msg).block(block).wrap(Wrap { trim: true }), area);
        return None;
    }

    // The highlighted row is the one the media source points at, if it is in this folder.
    let active = if player.folder() == app.shown_folder.as_deref() {
        player.current_index()
    } else {
        None
    };

    let inner = block.inner(area);
    let items: Vec<ListItem> = app
        .tracks
        .items()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let line = Line::from(vec![
                Span::raw("♫ "),
                Span::raw(name.as_str()),
                Span::raw("  "),
                Span::raw(attribution).dim(),
                Span::raw("  "),
                Span::raw("Play Now ▶").italic(),
            ]);
            let item = ListItem::new(line);
            if Some(i) == active {
                item.style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();

    let focused = app.focus == Focus::Tracks;
    let list = List::new(items)
        .block(block)
        .highlight_style(cursor_style(focused))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.track_cursor));
    frame.render_stateful_widget(list, area, &mut state);

    Some(ListArea {
        inner,
        offset: state.offset(),
        item_height: 1,
        len: app.tracks.len(),
    })
}

/// Render the entire UI into `frame` and return the clickable regions.
pub fn draw<M: Media>(
    frame: &mut Frame,
    app: &App,
    player: &Player<M>,
    settings: &Settings,
) -> HitAreas {
    let mut hits = HitAreas::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header_block = Block::default()
        .borders(Borders::ALL)
        .title(" folio ")
        .title_alignment(Alignment::Center);
    let header_inner = header_block.inner(chunks[0]);
    frame.render_widget(header_block, chunks[0]);
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(MENU_BUTTON.chars().count() as u16 + 1),
            Constraint::Min(1),
        ])
        .split(header_inner);
    let menu_style = if app.menu_open {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(Span::styled(MENU_BUTTON, menu_style)), header_cols[0]);
    frame.render_widget(
        Paragraph::new(settings.ui.header_text.as_str()).alignment(Alignment::Center),
        header_cols[1],
    );
    hits.menu_button = Rect {
        width: MENU_BUTTON.chars().count() as u16,
        ..header_cols[0]
    };

    // Albums panel (when open) and tracks
    if app.menu_open {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        hits.albums = draw_albums(frame, app, body[0]);
        hits.tracks = draw_tracks(frame, app, player, &settings.ui.track_attribution, body[1]);
    } else {
        hits.tracks = draw_tracks(frame, app, player, &settings.ui.track_attribution, chunks[1]);
    }

    // Transport
    let transport_block = padded(" now playing ");
    let transport = transport_block.inner(chunks[2]);
    frame.render_widget(transport_block, chunks[2]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(transport);

    let readout = player.readout();
    let song = player.now_playing().unwrap_or("-");
    let mut line = vec![
        Span::raw(format!("{} ", player.play_icon())).bold(),
        Span::raw(song),
        Span::raw("  "),
        Span::raw(readout.text),
    ];
    if let Some(err) = player.error() {
        line.push(Span::raw("  "));
        line.push(Span::raw(format!("cannot play: {err}")).fg(Color::Red));
    }
    frame.render_widget(Paragraph::new(Line::from(line)), rows[0]);

    let seek = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(readout.marker_percent / 100.0)
        .label("")
        .use_unicode(true);
    frame.render_widget(seek, rows[1]);
    hits.seek_bar = rows[1];

    let volume_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(rows[2]);
    frame.render_widget(Paragraph::new(player.volume_icon()), volume_cols[0]);
    let level = player.volume().level();
    let volume = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(f64::from(level) / 100.0)
        .label(format!("{level}"))
        .use_unicode(true);
    frame.render_widget(volume, volume_cols[1]);
    hits.volume_icon = volume_cols[0];
    hits.volume_bar = volume_cols[1];

    // Footer
    let footer = Paragraph::new(controls_text(&settings.controls))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    hits
}
