use super::*;
use crate::config::TrackField;
use std::path::{Path, PathBuf};

fn generated(title: &str) -> TrackDescriptor {
    TrackDescriptor {
        title: title.into(),
        artist: "Synth Ghost".into(),
        album_art: "https://picsum.photos/200".into(),
        duration: "3:12".into(),
        file: None,
    }
}

fn local(title: &str, path: &str) -> TrackDescriptor {
    TrackDescriptor {
        title: title.into(),
        artist: UPLOADED_ARTIST.into(),
        album_art: crate::art::placeholder_art(title),
        duration: UNKNOWN_DURATION.into(),
        file: Some(PathBuf::from(path)),
    }
}

fn titles(playlist: &Playlist) -> Vec<&str> {
    playlist.tracks().iter().map(|t| t.title.as_str()).collect()
}

#[test]
fn format_time_renders_minutes_and_padded_seconds() {
    assert_eq!(format_time(125.0), "2:05");
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(59.99), "0:59");
    assert_eq!(format_time(3600.0), "60:00");
    assert_eq!(format_time(-3.0), "0:00");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(f64::INFINITY), "0:00");
}

#[test]
fn prepend_then_append_keeps_batches_contiguous_and_ordered() {
    let mut playlist = Playlist::new();
    playlist.append(vec![local("old1", "/m/old1.mp3"), local("old2", "/m/old2.mp3")]);
    playlist.prepend(vec![generated("ai1"), generated("ai2")]);
    playlist.append(vec![local("up1", "/m/up1.mp3"), local("up2", "/m/up2.mp3")]);

    assert_eq!(
        titles(&playlist),
        vec!["ai1", "ai2", "old1", "old2", "up1", "up2"]
    );
}

#[test]
fn newest_generated_batch_surfaces_first() {
    let mut playlist = Playlist::new();
    playlist.prepend(vec![generated("first")]);
    playlist.prepend(vec![generated("second-a"), generated("second-b")]);
    assert_eq!(titles(&playlist), vec!["second-a", "second-b", "first"]);
}

#[test]
fn ids_are_unique_even_for_identical_tracks() {
    let mut playlist = Playlist::new();
    let a = playlist.append(vec![local("same", "/m/same.mp3")]);
    let b = playlist.append(vec![local("same", "/m/same.mp3")]);
    let c = playlist.prepend(vec![generated("same")]);

    assert_ne!(a[0], b[0]);
    assert_ne!(a[0], c[0]);
    assert_eq!(playlist.position(c[0]), Some(0));
    assert_eq!(playlist.position(b[0]), Some(2));
    assert_eq!(playlist.get(a[0]).unwrap().title, "same");
}

#[test]
fn update_duration_rewrites_matching_file_only() {
    let mut playlist = Playlist::new();
    playlist.prepend(vec![generated("ai")]);
    playlist.append(vec![local("a", "/m/a.mp3"), local("b", "/m/b.mp3")]);

    assert_eq!(playlist.update_duration(Path::new("/m/b.mp3"), "2:05"), 1);
    let durations: Vec<_> = playlist.tracks().iter().map(|t| t.duration.as_str()).collect();
    assert_eq!(durations, vec!["3:12", "0:00", "2:05"]);

    assert_eq!(playlist.update_duration(Path::new("/m/nope.mp3"), "9:99"), 0);
}

#[test]
fn playable_count_ignores_generated_tracks() {
    let mut playlist = Playlist::new();
    assert!(playlist.is_empty());
    playlist.prepend(vec![generated("x"), generated("y")]);
    playlist.append(vec![local("a", "/m/a.mp3")]);
    assert_eq!(playlist.len(), 3);
    assert_eq!(playlist.playable_count(), 1);
}

#[test]
fn track_line_joins_requested_fields() {
    let mut playlist = Playlist::new();
    playlist.append(vec![local("Song", "/m/Song.mp3")]);
    playlist.prepend(vec![generated("Neon Rain")]);
    let ai = &playlist.tracks()[0];
    let file = &playlist.tracks()[1];

    assert_eq!(
        track_line(ai, &[TrackField::Title, TrackField::Artist], " - "),
        "Neon Rain - Synth Ghost"
    );
    assert_eq!(
        track_line(file, &[TrackField::Filename, TrackField::Duration, TrackField::Origin], " | "),
        "Song.mp3 | 0:00 | local"
    );
    assert_eq!(track_line(ai, &[TrackField::Origin], ""), "generated");
    assert_eq!(track_line(ai, &[TrackField::Filename], " - "), "Neon Rain");
}
