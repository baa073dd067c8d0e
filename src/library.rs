//! Track model, the playlist store and the "add files" pipeline.
//!
//! Added files become `TrackDescriptor`s through the metadata reader, the
//! playlist turns descriptors into identified `Track`s, and `display`
//! holds the formatting helpers shared by the UI.

mod display;
mod metadata;
mod model;
mod playlist;
mod scan;

pub use display::{format_time, track_line};
pub use model::*;
pub use playlist::Playlist;
pub use scan::{collect_audio_files, read_batch};

#[cfg(test)]
mod tests;
