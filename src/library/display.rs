use crate::config::TrackField;

use super::model::Track;

/// Format seconds as `M:SS`. Negative, NaN and infinite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}

/// Build the one-line label for a track according to the provided `fields` and separator.
///
/// Blank fields are skipped; falls back to the title when no parts were produced.
pub fn track_line(track: &Track, fields: &[TrackField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackField::Title => {
                if !track.title.trim().is_empty() {
                    parts.push(track.title.trim().to_string());
                }
            }
            TrackField::Artist => {
                if !track.artist.trim().is_empty() {
                    parts.push(track.artist.trim().to_string());
                }
            }
            TrackField::Duration => parts.push(track.duration.clone()),
            TrackField::Origin => {
                let origin = if track.is_playable() { "local" } else { "generated" };
                parts.push(origin.to_string());
            }
            TrackField::Filename => {
                if let Some(stem) = track
                    .file()
                    .and_then(|p| p.file_name())
                    .and_then(|s| s.to_str())
                {
                    parts.push(stem.to_string());
                }
            }
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
