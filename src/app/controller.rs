//! Playback state machine, selection/navigation and batch ingestion.

use std::path::PathBuf;
use std::time::Duration;

use crate::audio::{AudioEvent, LoadId, Playback};
use crate::generate::GenerateError;
use crate::library::{Track, TrackDescriptor, TrackId, format_time};

use super::model::{App, Focus, GenerationToken};
use super::session::OutputState;

/// Shown when a generation request fails for any reason.
pub const GENERATION_FAILED: &str = "Failed to generate playlist. Please try again.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl<P: Playback> App<P> {
    /// Play `id`, or toggle play/pause when it is already the current track.
    pub fn select_track(&mut self, id: TrackId) {
        let Some(track) = self.playlist.get(id).cloned() else {
            return;
        };
        if self.current_id() == Some(id) {
            self.toggle_play_pause();
            return;
        }
        self.make_current(track);
    }

    pub fn toggle_play_pause(&mut self) {
        match self.session.current.as_ref() {
            Some(t) if t.is_playable() => {}
            _ => return,
        }
        self.session.is_playing = !self.session.is_playing;
        self.issue_play_state();
    }

    pub fn next(&mut self) {
        self.step(Direction::Forward);
    }

    pub fn previous(&mut self) {
        self.step(Direction::Backward);
    }

    /// Move circularly to the nearest playable track, skipping generated ones.
    fn step(&mut self, dir: Direction) {
        let len = self.playlist.len() as isize;
        if len == 0 {
            return;
        }

        let start = match self.current_id().and_then(|id| self.playlist.position(id)) {
            Some(i) => i as isize,
            None if dir == Direction::Forward => -1,
            None => 0,
        };

        let tracks = self.playlist.tracks();
        let found = (1..=len)
            .map(|k| match dir {
                Direction::Forward => (start + k).rem_euclid(len),
                Direction::Backward => (start - k).rem_euclid(len),
            })
            .map(|i| &tracks[i as usize])
            .find(|t| t.is_playable())
            .cloned();

        match found {
            Some(track) => self.make_current(track),
            None => log::debug!("no playable track to move to"),
        }
    }

    /// Switch to `track`, reloading its source from the start.
    fn make_current(&mut self, track: Track) {
        let play = track.is_playable();
        let load = self.session.change_track(track, play);
        self.reconcile_source(load);
        self.follow_current();
    }

    fn reconcile_source(&mut self, load: LoadId) {
        let file: Option<PathBuf> = self
            .session
            .current
            .as_ref()
            .and_then(|t| t.file())
            .map(|p| p.to_path_buf());

        match file {
            Some(path) => {
                self.player.load(&path, load);
                self.issue_play_state();
            }
            None => {
                self.player.pause();
                self.session.output = OutputState::Idle;
            }
        }
    }

    fn issue_play_state(&mut self) {
        if self.session.is_playing {
            self.session.output = OutputState::Pending;
            if let Err(e) = self.player.play() {
                log::warn!("cannot start playback: {e}");
                self.session.output = OutputState::Failed(e.to_string());
            }
        } else {
            self.player.pause();
            self.session.output = OutputState::Idle;
        }
    }

    fn can_seek(&self) -> bool {
        self.session.duration > 0.0
            && self
                .session
                .current
                .as_ref()
                .is_some_and(|t| t.is_playable())
    }

    /// Seek to an absolute position in seconds, clamped to the track.
    pub fn seek_to(&mut self, seconds: f64) {
        if !self.can_seek() || seconds.is_nan() {
            return;
        }
        let target = seconds.clamp(0.0, self.session.duration);
        self.player.seek_to(Duration::from_secs_f64(target));
        self.session.current_time = target;
    }

    /// Seek to `fraction` (clamped to `[0, 1]`) of the duration.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        self.seek_to(fraction.clamp(0.0, 1.0) * self.session.duration);
    }

    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek_to(self.session.current_time + delta_seconds);
    }

    pub fn on_position_changed(&mut self, load: LoadId, seconds: f64) {
        if self.session.is_current(load) {
            self.session.current_time = seconds;
        }
    }

    /// Record the real duration and rewrite the display duration of every
    /// entry backed by the same file.
    pub fn on_duration_resolved(&mut self, load: LoadId, seconds: f64) {
        if !self.session.is_current(load) {
            return;
        }
        self.session.duration = seconds;

        let Some(current) = self.session.current.as_mut() else {
            return;
        };
        let Some(file) = current.file.clone() else {
            return;
        };
        let formatted = format_time(seconds);
        let rewritten = self.playlist.update_duration(&file, &formatted);
        log::debug!("duration of {} is {formatted} ({rewritten} entries)", file.display());
        current.duration = formatted;
    }

    pub fn on_track_ended(&mut self, load: LoadId) {
        if self.session.is_current(load) {
            self.next();
        }
    }

    pub fn on_playback_started(&mut self, load: LoadId) {
        if self.session.is_current(load) && self.session.output == OutputState::Pending {
            self.session.output = OutputState::Playing;
        }
    }

    pub fn on_playback_failed(&mut self, load: LoadId, reason: String) {
        log::warn!("playback refused for {load}: {reason}");
        if self.session.is_current(load) {
            self.session.output = OutputState::Failed(reason);
        }
    }

    /// Apply one event from the audio thread.
    pub fn on_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::PositionChanged { load, position } => {
                self.on_position_changed(load, position.as_secs_f64())
            }
            AudioEvent::MetadataReady { load, duration } => {
                self.on_duration_resolved(load, duration.as_secs_f64())
            }
            AudioEvent::Ended { load } => self.on_track_ended(load),
            AudioEvent::Started { load } => self.on_playback_started(load),
            AudioEvent::PlayFailed { load, reason } => self.on_playback_failed(load, reason),
        }
    }

    /// Append a batch of added files. When nothing is current yet, the first
    /// new track starts playing.
    pub fn on_upload_ready(&mut self, batch: Vec<TrackDescriptor>) {
        if batch.is_empty() {
            self.status = Some("No audio files found".to_string());
            return;
        }
        let ids = self.playlist.append(batch);
        log::info!("added {} tracks", ids.len());
        self.status = Some(format!("Added {} tracks", ids.len()));

        if self.session.current.is_none() {
            if let Some(&first) = ids.first() {
                self.select_track(first);
            }
        }
    }

    /// Start a generation request for `prompt`.
    ///
    /// Returns `None` for blank prompts; otherwise the token the result must
    /// be reported with, and the trimmed prompt.
    pub fn begin_generation(&mut self, prompt: &str) -> Option<(GenerationToken, String)> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }
        self.last_token = GenerationToken(self.last_token.0 + 1);
        self.pending_token = Some(self.last_token);
        self.error = None;
        self.is_loading = true;
        Some((self.last_token, prompt.to_string()))
    }

    /// Apply the result of a generation request. Results for anything but
    /// the latest request are dropped.
    pub fn finish_generation(
        &mut self,
        token: GenerationToken,
        result: Result<Vec<TrackDescriptor>, GenerateError>,
    ) {
        if self.pending_token != Some(token) {
            log::debug!("dropping superseded generation result {token:?}");
            return;
        }
        self.pending_token = None;
        self.is_loading = false;

        match result {
            Ok(batch) => {
                let n = self.playlist.prepend(batch).len();
                log::info!("generated {n} tracks");
                self.status = Some(format!("Generated {n} tracks"));
                self.focus = Focus::Tracks;
                self.selected = 0;
            }
            Err(e) => {
                log::warn!("playlist generation failed: {e}");
                self.error = Some(GENERATION_FAILED.to_string());
            }
        }
    }
}
