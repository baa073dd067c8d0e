use std::time::Duration;

use crate::app::{App, PlaybackState};
use crate::library::TrackId;
use crate::mpris::MprisHandle;

/// What MPRIS last saw, to avoid republishing on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MprisSnapshot {
    track: Option<TrackId>,
    playback: PlaybackState,
    length_known: bool,
}

impl MprisSnapshot {
    pub fn of<P>(app: &App<P>) -> Self {
        Self {
            track: app.current_id(),
            playback: app.session.state(),
            length_known: app.session.duration > 0.0,
        }
    }
}

pub fn update_mpris<P>(mpris: &MprisHandle, app: &App<P>) {
    let length = Some(app.session.duration)
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(Duration::from_secs_f64);
    mpris.set_track_metadata(app.current_track(), length);
    mpris.set_playback(app.session.state());
}
