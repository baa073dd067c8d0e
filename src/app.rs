//! Application module: the playback controller and the UI-facing model.
//!
//! `App` owns the playlist and the single playback session, drives a
//! [`crate::audio::Playback`] implementation and holds the transient input
//! state the terminal UI needs.

mod controller;
mod model;
mod session;

pub use controller::GENERATION_FAILED;
pub use model::*;
pub use session::*;
