//! The playlist store.
//!
//! An ordered list of tracks where insertion order drives navigation.
//! Generated batches go to the front, added files to the back, and each
//! batch stays contiguous in its original order.

use std::path::Path;

use super::model::{Track, TrackDescriptor, TrackId};

#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    next_id: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `batch` ahead of the existing tracks. Returns the new ids in batch order.
    pub fn prepend(&mut self, batch: Vec<TrackDescriptor>) -> Vec<TrackId> {
        let new = self.ingest(batch);
        let ids = new.iter().map(|t| t.id).collect();
        self.tracks.splice(0..0, new);
        ids
    }

    /// Insert `batch` after the existing tracks. Returns the new ids in batch order.
    pub fn append(&mut self, batch: Vec<TrackDescriptor>) -> Vec<TrackId> {
        let new = self.ingest(batch);
        let ids = new.iter().map(|t| t.id).collect();
        self.tracks.extend(new);
        ids
    }

    /// Rewrite the display duration of every track backed by `file`.
    ///
    /// Returns how many entries changed; zero means nothing matched.
    pub fn update_duration(&mut self, file: &Path, formatted: &str) -> usize {
        let mut updated = 0;
        for track in self
            .tracks
            .iter_mut()
            .filter(|t| t.file.as_deref() == Some(file))
        {
            track.duration = formatted.to_string();
            updated += 1;
        }
        updated
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn playable_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_playable()).count()
    }

    fn ingest(&mut self, batch: Vec<TrackDescriptor>) -> Vec<Track> {
        batch
            .into_iter()
            .map(|d| {
                let id = TrackId(self.next_id);
                self.next_id += 1;
                Track::from_descriptor(id, d)
            })
            .collect()
    }
}
