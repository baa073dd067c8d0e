//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`: a
//! header, a library sidebar, the prompt and track list, and the persistent
//! transport bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Focus, InputMode, PlaybackState};
use crate::art::{Artwork, PlaceholderArt};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::{Track, format_time, track_line};

const WELCOME_TITLE: &str = "Welcome to Cortex FM";
const WELCOME_HINT: &str = "Describe a vibe, or add your own music to get started";
const SWATCH_WIDTH: u16 = 10;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("tab".to_string(), "library/tracks".to_string());
    map.insert("enter".to_string(), "play / use preset".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek 0-90%".to_string());
    map.insert("/".to_string(), "describe a vibe".to_string());
    map.insert("a".to_string(), "add files".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "0-9", "gg/G", "tab", "/", "a", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// `elapsed / total` for the transport bar. The total falls back to the
/// track's display duration until the real one is known.
fn time_label(current_time: f64, duration: f64, track: &Track) -> String {
    let total = if duration > 0.0 {
        format_time(duration)
    } else {
        track.duration.clone()
    };
    format!("{} / {}", format_time(current_time), total)
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

/// One line of the album art swatch: a horizontal gradient with the glyph
/// in the middle on the centre row.
fn swatch_line(art: &PlaceholderArt, width: u16, glyph_row: bool) -> Line<'static> {
    let width = width.max(1);
    let mid = width / 2;
    let spans = (0..width)
        .map(|x| {
            let t = if width > 1 {
                x as f32 / (width - 1) as f32
            } else {
                0.0
            };
            let (r1, g1, b1) = art.from;
            let (r2, g2, b2) = art.to;
            let bg = Color::Rgb(lerp(r1, r2, t), lerp(g1, g2, t), lerp(b1, b2, t));
            let symbol = if glyph_row && x == mid && !art.glyph.is_empty() {
                art.glyph.clone()
            } else {
                " ".to_string()
            };
            Span::styled(symbol, Style::default().bg(bg).fg(Color::White))
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

/// Short description of album art that cannot be drawn in a terminal.
fn art_caption(artwork: Artwork<'_>) -> (&'static str, String) {
    match artwork {
        Artwork::Placeholder => ("", String::new()),
        Artwork::Embedded { mime } => ("cover", mime.trim_start_matches("image/").to_string()),
        Artwork::Remote { url } => {
            let host = url
                .split_once("://")
                .map_or(url, |(_, rest)| rest)
                .split('/')
                .next()
                .unwrap_or_default();
            ("web art", host.to_string())
        }
    }
}

fn draw_art(frame: &mut Frame, track: Option<&Track>, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(track) = track else {
        return;
    };

    match Artwork::classify(&track.album_art) {
        Artwork::Placeholder => {
            let art = PlaceholderArt::new(&track.title);
            let lines = (0..inner.height)
                .map(|y| swatch_line(&art, inner.width, y == inner.height / 2))
                .collect::<Vec<_>>();
            frame.render_widget(Paragraph::new(lines), inner);
        }
        artwork => {
            let (kind, detail) = art_caption(artwork);
            let caption = Paragraph::new(vec![Line::from(kind), Line::from(detail).dim()])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(caption, inner);
        }
    }
}

fn draw_sidebar<P>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let total = app.playlist.len();
    let playable = app.playlist.playable_count();
    let stats = Paragraph::new(vec![
        Line::from(format!("Tracks:    {total}")),
        Line::from(format!("Local:     {playable}")),
        Line::from(format!("Generated: {}", total - playable)),
    ])
    .block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" library "),
    );
    frame.render_widget(stats, chunks[0]);

    let focused = app.focus == Focus::Library;
    let items: Vec<ListItem> = app
        .presets
        .iter()
        .map(|p| ListItem::new(p.as_str()))
        .collect();
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" moods "),
        )
        .highlight_style(if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        })
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !app.presets.is_empty() {
        state.select(Some(app.preset_selected.min(app.presets.len() - 1)));
    }
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_input<P>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let (title, text, style) = match app.input_mode {
        InputMode::Prompt => (
            " describe a vibe (enter submits, esc cancels) ",
            format!("{}_", app.input),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::AddFiles => (
            " add a file or folder (enter submits, esc cancels) ",
            format!("{}_", app.input),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Normal => (
            " prompt ",
            "Press / to describe a vibe, a to add music".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };
    let input = Paragraph::new(text).style(style).block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(title),
    );
    frame.render_widget(input, area);
}

fn message_line<P>(app: &App<P>) -> Line<'static> {
    if let Some(err) = &app.error {
        Line::from(Span::styled(format!(" {err}"), Style::default().fg(Color::Red)))
    } else if app.is_loading {
        Line::from(Span::styled(
            " Generating playlist...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
        ))
    } else if let Some(status) = &app.status {
        Line::from(Span::raw(format!(" {status}"))).dim()
    } else {
        Line::default()
    }
}

fn draw_tracks<P>(frame: &mut Frame, app: &App<P>, ui: &UiSettings, area: Rect) {
    let focused = app.focus == Focus::Tracks;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" tracks ");

    if app.playlist.is_empty() {
        let welcome = Paragraph::new(vec![
            Line::default(),
            Line::from(WELCOME_TITLE).bold(),
            Line::from(WELCOME_HINT).dim(),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(welcome, area);
        return;
    }

    // Center the selected item when possible by creating a visible window.
    // Important: only build ListItems for the visible window (avoid allocating the entire list).
    let tracks = app.playlist.tracks();
    let total = tracks.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total - 1);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let current = app.current_id();
    let visible_items: Vec<ListItem> = tracks[start..end]
        .iter()
        .map(|t| {
            let marker = if Some(t.id) == current { "♪ " } else { "  " };
            let text = format!("{marker}{}", track_line(t, &ui.track_fields, &ui.track_separator));
            let mut style = Style::default();
            if Some(t.id) == current {
                style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
            } else if !t.is_playable() {
                style = style.fg(Color::Magenta);
            }
            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(visible_items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_transport<P>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SWATCH_WIDTH + 2),
            Constraint::Min(20),
        ])
        .split(area);

    let track = app.current_track();
    draw_art(frame, track, chunks[0]);

    let block = Block::bordered()
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
        .title(" now playing ");
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1)])
        .split(inner);

    let Some(track) = track else {
        frame.render_widget(Paragraph::new("Nothing playing").dim(), rows[0]);
        return;
    };

    let state = match app.session.state() {
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
        PlaybackState::Stopped => "■",
    };
    let mut title_line = vec![
        Span::raw(format!("{state} ")),
        Span::styled(track.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if app.session.output_failed() {
        title_line.push(Span::styled(
            "  ⚠ no audio output",
            Style::default().fg(Color::Red),
        ));
    } else if !track.is_playable() {
        title_line.push(Span::styled(
            "  (generated, preview only)",
            Style::default().fg(Color::Magenta),
        ));
    }
    let info = Paragraph::new(vec![
        Line::from(title_line),
        Line::from(track.artist.clone()).dim(),
    ]);
    frame.render_widget(info, rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(app.session.progress())
        .label(time_label(
            app.session.current_time,
            app.session.duration,
            track,
        ));
    frame.render_widget(gauge, rows[1]);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<P>(
    frame: &mut Frame,
    app: &App<P>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(6),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cortex-fm ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(chunks[1]);
    draw_sidebar(frame, app, body[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(body[1]);
    draw_input(frame, app, main[0]);
    frame.render_widget(Paragraph::new(message_line(app)), main[1]);
    draw_tracks(frame, app, ui_settings, main[2]);

    draw_transport(frame, app, chunks[2]);

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
