use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Focus, InputMode};
use crate::audio::{AudioEvent, Playback};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::runtime::workers::{WorkEvent, Workers};
use crate::ui;

/// Whether the loop keeps going after handling an input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// What was last published to MPRIS.
    pub last_mpris: MprisSnapshot,
}

/// Channels feeding the event loop.
pub struct Inbox<'a> {
    pub audio: &'a mpsc::Receiver<AudioEvent>,
    pub work: &'a mpsc::Receiver<WorkEvent>,
    pub control: &'a mpsc::Receiver<ControlCmd>,
}

/// Main terminal event loop: drains background events, draws, and handles
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run<P: Playback>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<P>,
    workers: &Workers,
    mpris: &MprisHandle,
    inbox: Inbox<'_>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = inbox.audio.try_recv() {
            app.on_audio_event(ev);
        }

        while let Ok(ev) = inbox.work.try_recv() {
            apply_work_event(app, ev);
        }

        while let Ok(cmd) = inbox.control.try_recv() {
            if handle_control_cmd(cmd, app) == Flow::Quit {
                return Ok(());
            }
        }

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        let snapshot = MprisSnapshot::of(app);
        if snapshot != state.last_mpris {
            update_mpris(mpris, app);
            state.last_mpris = snapshot;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, workers, state) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}

pub fn apply_work_event<P: Playback>(app: &mut App<P>, ev: WorkEvent) {
    match ev {
        WorkEvent::UploadReady(batch) => app.on_upload_ready(batch),
        WorkEvent::PlaylistGenerated { token, result } => app.finish_generation(token, result),
    }
}

pub fn handle_control_cmd<P: Playback>(cmd: ControlCmd, app: &mut App<P>) -> Flow {
    match cmd {
        ControlCmd::Quit => return Flow::Quit,
        ControlCmd::Play => {
            if app.current_track().is_none() {
                app.next();
            } else if !app.session.is_playing {
                app.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if app.session.is_playing {
                app.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => {
            if app.current_track().is_none() {
                app.next();
            } else {
                app.toggle_play_pause();
            }
        }
        ControlCmd::Next => app.next(),
        ControlCmd::Prev => app.previous(),
    }
    Flow::Continue
}

fn submit_prompt<P: Playback>(app: &mut App<P>, workers: &Workers, prompt: &str) {
    if let Some((token, prompt)) = app.begin_generation(prompt) {
        workers.generate(token, prompt);
    }
}

fn submit_paths<P: Playback>(app: &mut App<P>, workers: &Workers, input: &str) {
    let input = input.trim();
    if input.is_empty() {
        return;
    }
    let path = match input.strip_prefix("~/") {
        Some(rest) => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|| PathBuf::from(input)),
        None => PathBuf::from(input),
    };
    app.status = Some(format!("Adding {}...", path.display()));
    workers.upload(vec![path]);
}

fn handle_input_key<P: Playback>(key: KeyEvent, app: &mut App<P>, workers: &Workers) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_input_char(),
        KeyCode::Enter => match app.take_input() {
            (InputMode::Prompt, text) => submit_prompt(app, workers, &text),
            (InputMode::AddFiles, text) => submit_paths(app, workers, &text),
            (InputMode::Normal, _) => {}
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if !c.is_control() {
                app.push_input_char(c);
            }
        }
        _ => {}
    }
}

pub fn handle_key_event<P: Playback>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<P>,
    workers: &Workers,
    state: &mut EventLoopState,
) -> Flow {
    if app.input_mode != InputMode::Normal {
        state.pending_gg = false;
        handle_input_key(key, app, workers);
        return Flow::Continue;
    }

    // g pending should clear on anything but a second g
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let scrub = settings.controls.scrub_seconds as f64;

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('/') => app.enter_input(InputMode::Prompt),
        KeyCode::Char('a') => app.enter_input(InputMode::AddFiles),
        KeyCode::Esc => {
            app.error = None;
            app.status = None;
        }
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback = false;
                app.cursor_top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback = false;
            app.cursor_bottom();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback = false;
            app.cursor_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback = false;
            app.cursor_up();
        }
        KeyCode::Enter => match app.focus {
            Focus::Library => {
                if let Some(preset) = app.selected_preset().map(str::to_string) {
                    submit_prompt(app, workers, &preset);
                }
            }
            Focus::Tracks => {
                if let Some(id) = app.selected_track().map(|t| t.id) {
                    app.follow_playback = settings.ui.follow_playback;
                    app.select_track(id);
                }
            }
        },
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            if app.current_track().is_none() {
                app.next();
            } else {
                app.toggle_play_pause();
            }
        }
        KeyCode::Char('l') => {
            app.follow_playback = settings.ui.follow_playback;
            app.next();
        }
        KeyCode::Char('h') => {
            app.follow_playback = settings.ui.follow_playback;
            app.previous();
        }
        KeyCode::Char('L') => app.seek_by(scrub),
        KeyCode::Char('H') => app.seek_by(-scrub),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = c.to_digit(10).unwrap_or(0) as f64;
            app.seek_to_fraction(tenth / 10.0);
        }
        _ => {}
    }

    Flow::Continue
}
