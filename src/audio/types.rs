//! Audio-related small types.
//!
//! Commands sent to the audio thread, the events it emits back, and the
//! [`Playback`] seam the controller drives.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Generation tag of a loaded source. Every load gets a fresh one so events
/// from a previous source can be told apart and dropped.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct LoadId(u64);

impl LoadId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with `path`, paused at the start.
    Load { path: PathBuf, load: LoadId },
    /// Start or resume the loaded source.
    Play,
    /// Pause the loaded source, keeping its position.
    Pause,
    /// Jump to an absolute position in the loaded source.
    SeekTo(Duration),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Periodic position report while playing, and after a seek.
    PositionChanged { load: LoadId, position: Duration },
    /// The real media duration became known.
    MetadataReady { load: LoadId, duration: Duration },
    /// The source ran out.
    Ended { load: LoadId },
    /// A play request was honoured.
    Started { load: LoadId },
    /// A play request was refused (no output device, unreadable file...).
    PlayFailed { load: LoadId, reason: String },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device: {0}")]
    NoOutput(String),
    #[error("audio thread is gone")]
    Disconnected,
}

/// The single-source playback primitive the controller drives.
///
/// Only `play` reports failure synchronously; everything that happens later
/// (start acknowledgement, refusal, position, end) arrives as [`AudioEvent`]s.
pub trait Playback {
    fn load(&mut self, path: &Path, load: LoadId);
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn seek_to(&mut self, position: Duration);
}
