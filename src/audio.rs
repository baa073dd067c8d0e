//! Audio playback on a dedicated thread.
//!
//! The UI talks to the thread through [`AudioPlayer`] (which implements
//! [`Playback`]) and hears back through a channel of [`AudioEvent`]s tagged
//! with the [`LoadId`] of the source they belong to.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, AudioError, AudioEvent, LoadId, Playback};

#[cfg(test)]
mod tests;
