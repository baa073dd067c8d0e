//! Application model types: `App`, focus and input modes.
//!
//! The `App` struct holds the playlist, the playback session and the
//! cursor/input flags used by the UI and runtime.

use crate::library::{Playlist, Track, TrackId};

use super::session::PlaybackSession;

/// Which pane receives `j`/`k`/`Enter`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    /// Sidebar with the mood presets.
    Library,
    #[default]
    Tracks,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a mood prompt.
    Prompt,
    /// Typing a file or directory path.
    AddFiles,
}

/// Tag of one generation request. Only the latest one issued is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct GenerationToken(pub(super) u64);

/// The main application model.
pub struct App<P> {
    pub playlist: Playlist,
    pub session: PlaybackSession,
    pub(super) player: P,

    pub is_loading: bool,
    /// User-visible error line.
    pub error: Option<String>,
    /// Transient one-line notice (e.g. how many files were added).
    pub status: Option<String>,
    pub(super) last_token: GenerationToken,
    pub(super) pending_token: Option<GenerationToken>,

    pub focus: Focus,
    pub input_mode: InputMode,
    pub input: String,
    /// Cursor in the track list.
    pub selected: usize,
    /// Cursor in the preset list.
    pub preset_selected: usize,
    pub presets: Vec<String>,

    pub follow_playback: bool,
}

impl<P> App<P> {
    /// Create an empty `App` driving `player`.
    pub fn new(player: P, presets: Vec<String>) -> Self {
        Self {
            playlist: Playlist::new(),
            session: PlaybackSession::default(),
            player,

            is_loading: false,
            error: None,
            status: None,
            last_token: GenerationToken::default(),
            pending_token: None,

            focus: Focus::default(),
            input_mode: InputMode::Normal,
            input: String::new(),
            selected: 0,
            preset_selected: 0,
            presets,

            follow_playback: true,
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.current.as_ref()
    }

    pub fn current_id(&self) -> Option<TrackId> {
        self.session.current.as_ref().map(|t| t.id)
    }

    /// Track under the cursor.
    pub fn selected_track(&self) -> Option<&Track> {
        self.playlist.tracks().get(self.selected)
    }

    pub fn selected_preset(&self) -> Option<&str> {
        self.presets.get(self.preset_selected).map(String::as_str)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Library => Focus::Tracks,
            Focus::Tracks => Focus::Library,
        };
    }

    fn cursor_len(&self) -> usize {
        match self.focus {
            Focus::Library => self.presets.len(),
            Focus::Tracks => self.playlist.len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            Focus::Library => &mut self.preset_selected,
            Focus::Tracks => &mut self.selected,
        }
    }

    /// Move the focused cursor down, wrapping to the top.
    pub fn cursor_down(&mut self) {
        let len = self.cursor_len();
        if len == 0 {
            return;
        }
        let c = self.cursor_mut();
        *c = (*c + 1) % len;
    }

    /// Move the focused cursor up, wrapping to the bottom.
    pub fn cursor_up(&mut self) {
        let len = self.cursor_len();
        if len == 0 {
            return;
        }
        let c = self.cursor_mut();
        *c = if *c == 0 { len - 1 } else { *c - 1 };
    }

    pub fn cursor_top(&mut self) {
        *self.cursor_mut() = 0;
    }

    pub fn cursor_bottom(&mut self) {
        let len = self.cursor_len();
        *self.cursor_mut() = len.saturating_sub(1);
    }

    /// Move the track cursor onto the current track when following playback.
    pub(super) fn follow_current(&mut self) {
        if !self.follow_playback {
            return;
        }
        if let Some(pos) = self.current_id().and_then(|id| self.playlist.position(id)) {
            self.selected = pos;
        }
    }

    pub fn enter_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
    }

    /// Leave the input without submitting it.
    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Return to normal mode, handing back what was typed. The buffer is
    /// cleared so the same value can be submitted again.
    pub fn take_input(&mut self) -> (InputMode, String) {
        let mode = std::mem::take(&mut self.input_mode);
        (mode, std::mem::take(&mut self.input))
    }
}
