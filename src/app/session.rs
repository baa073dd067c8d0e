use crate::audio::LoadId;
use crate::library::Track;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What the audio output is actually doing, as last reported.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum OutputState {
    #[default]
    Idle,
    /// Play was requested; no acknowledgement yet.
    Pending,
    Playing,
    /// The output refused to start.
    Failed(String),
}

/// The single playback session.
///
/// `is_playing` is what the user asked for; `output` is what the audio
/// thread reported. They can disagree, e.g. when no output device exists.
#[derive(Clone, Debug, Default)]
pub struct PlaybackSession {
    pub current: Option<Track>,
    pub is_playing: bool,
    /// Seconds.
    pub current_time: f64,
    /// Seconds; 0 until the media duration is known.
    pub duration: f64,
    pub output: OutputState,
    pub load: LoadId,
}

impl PlaybackSession {
    pub fn state(&self) -> PlaybackState {
        match (&self.current, self.is_playing) {
            (None, _) => PlaybackState::Stopped,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    /// Make `track` current with a fresh load generation and zeroed clock.
    pub(super) fn change_track(&mut self, track: Track, play: bool) -> LoadId {
        self.is_playing = play && track.is_playable();
        self.current = Some(track);
        self.current_time = 0.0;
        self.duration = 0.0;
        self.load = self.load.next();
        self.load
    }

    pub fn is_current(&self, load: LoadId) -> bool {
        self.current.is_some() && self.load == load
    }

    /// Completed fraction of the current track in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// The user wants sound but the output refused.
    pub fn output_failed(&self) -> bool {
        self.is_playing && matches!(self.output, OutputState::Failed(_))
    }
}
