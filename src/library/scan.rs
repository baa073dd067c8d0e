use std::path::{Path, PathBuf};
use std::thread;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::metadata::{read_track, untagged_track};
use super::model::TrackDescriptor;

/// Accepted extensions, lowercased and without leading dots.
fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand `paths` into the audio files they name.
///
/// Files are kept when their extension is an accepted audio type; directories
/// are walked per `settings` and contribute their files in name order. Input
/// order is preserved.
pub fn collect_audio_files(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let exts = normalized_extensions(settings);
    let mut files: Vec<PathBuf> = Vec::new();

    for root in paths {
        if root.is_file() {
            if is_audio_file(root, &exts) {
                files.push(root.clone());
            } else {
                log::debug!("skipping non-audio file {}", root.display());
            }
            continue;
        }

        if !root.is_dir() {
            log::warn!("cannot add {}: no such file or directory", root.display());
            continue;
        }

        let mut walker = WalkDir::new(root)
            .follow_links(settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file() && is_audio_file(path, &exts) {
                files.push(path.to_path_buf());
            }
        }
    }

    files
}

/// Read metadata for every file concurrently and return the results in input order.
pub fn read_batch(files: &[PathBuf]) -> Vec<TrackDescriptor> {
    if files.is_empty() {
        return Vec::new();
    }

    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let chunk_len = files.len().div_ceil(workers).max(1);

    thread::scope(|s| {
        let handles: Vec<_> = files
            .chunks(chunk_len)
            .map(|chunk| {
                let handle = s.spawn(move || {
                    chunk
                        .iter()
                        .map(PathBuf::as_path)
                        .map(read_track)
                        .collect::<Vec<_>>()
                });
                (chunk, handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(chunk, handle)| {
                handle.join().unwrap_or_else(|_| {
                    log::warn!("metadata reader panicked; using file names for {} files", chunk.len());
                    chunk.iter().map(PathBuf::as_path).map(untagged_track).collect()
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"no audio in here").unwrap();
    }

    fn file_names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn extension_check_ignores_case_and_leading_dots() {
        let settings = LibrarySettings {
            extensions: vec![".FLAC".into(), " opus ".into(), "".into()],
            ..LibrarySettings::default()
        };
        let exts = normalized_extensions(&settings);
        assert_eq!(exts, ["flac", "opus"]);
        assert!(is_audio_file(Path::new("mix.flac"), &exts));
        assert!(is_audio_file(Path::new("voice.OPUS"), &exts));
        assert!(!is_audio_file(Path::new("song.mp3"), &exts));
        assert!(!is_audio_file(Path::new("flac"), &exts));
        assert!(!is_audio_file(Path::new("cover.jpg"), &exts));
    }

    #[test]
    fn directory_entries_come_back_in_name_order() {
        let dir = tempdir().unwrap();
        for name in ["Beta.M4A", "alpha.aac", "Gamma.wav", "lyrics.txt", "cover.png"] {
            touch(&dir.path().join(name));
        }

        let files = collect_audio_files(&[dir.path().to_path_buf()], &LibrarySettings::default());
        assert_eq!(file_names(&files), vec!["Beta.M4A", "Gamma.wav", "alpha.aac"]);
    }

    #[test]
    fn collect_keeps_explicit_files_in_input_order() {
        let dir = tempdir().unwrap();
        let z = dir.path().join("z.mp3");
        let a = dir.path().join("a.mp3");
        let doc = dir.path().join("notes.pdf");
        for p in [&z, &a, &doc] {
            touch(p);
        }

        let files = collect_audio_files(
            &[z.clone(), doc, dir.path().join("missing.mp3"), a.clone()],
            &LibrarySettings::default(),
        );
        assert_eq!(files, vec![z, a]);
    }

    #[test]
    fn walk_settings_limit_what_a_folder_contributes() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("intro.ogg"));
        touch(&root.join(".stash/secret.ogg"));
        touch(&root.join(".ghost.ogg"));
        touch(&root.join("disc1/track.ogg"));
        touch(&root.join("disc1/bonus/extra.ogg"));

        let walk = |settings: LibrarySettings| {
            let mut names = file_names(&collect_audio_files(&[root.to_path_buf()], &settings));
            names.sort();
            names
        };

        assert_eq!(
            walk(LibrarySettings::default()),
            vec!["extra.ogg", "intro.ogg", "track.ogg"]
        );
        assert_eq!(
            walk(LibrarySettings {
                include_hidden: true,
                ..LibrarySettings::default()
            }),
            vec![".ghost.ogg", "extra.ogg", "intro.ogg", "secret.ogg", "track.ogg"]
        );
        assert_eq!(
            walk(LibrarySettings {
                recursive: false,
                ..LibrarySettings::default()
            }),
            vec!["intro.ogg"]
        );
        // Depth 0 is the folder itself.
        assert_eq!(
            walk(LibrarySettings {
                max_depth: Some(2),
                ..LibrarySettings::default()
            }),
            vec!["intro.ogg", "track.ogg"]
        );
    }

    #[test]
    fn read_batch_preserves_input_order() {
        let dir = tempdir().unwrap();
        let files: Vec<PathBuf> = (0..9)
            .map(|i| {
                let p = dir.path().join(format!("track{i}.wav"));
                touch(&p);
                p
            })
            .collect();

        let batch = read_batch(&files);
        let titles: Vec<_> = batch.iter().map(|t| t.title.clone()).collect();
        let expected: Vec<_> = (0..9).map(|i| format!("track{i}")).collect();
        assert_eq!(titles, expected);
        assert!(read_batch(&[]).is_empty());
    }
}
