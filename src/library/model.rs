use std::fmt;
use std::path::{Path, PathBuf};

/// Artist shown for added files whose tags carry no artist.
pub const UPLOADED_ARTIST: &str = "Uploaded";

/// Duration text shown until real media metadata has been resolved.
pub const UNKNOWN_DURATION: &str = "0:00";

/// Session-unique track identifier, assigned when a track enters the playlist.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub(super) u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A track as produced by the metadata reader or the playlist generator,
/// before it has been given an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub title: String,
    pub artist: String,
    /// `data:` URI or remote URL.
    pub album_art: String,
    /// Display duration (`M:SS`).
    pub duration: String,
    /// Backing audio file. Generated tracks have none and cannot be played.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album_art: String,
    pub duration: String,
    pub file: Option<PathBuf>,
}

impl Track {
    pub(super) fn from_descriptor(id: TrackId, d: TrackDescriptor) -> Self {
        Self {
            id,
            title: d.title,
            artist: d.artist,
            album_art: d.album_art,
            duration: d.duration,
            file: d.file,
        }
    }

    pub fn is_playable(&self) -> bool {
        self.file.is_some()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}
