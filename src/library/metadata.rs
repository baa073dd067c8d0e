//! Best-effort metadata for added audio files.

use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use lofty::tag::Accessor;

use crate::art::{embed_image, placeholder_art};

use super::model::{TrackDescriptor, UNKNOWN_DURATION, UPLOADED_ARTIST};

/// Read title, artist and cover art for `path`.
///
/// Never fails: files without usable tags fall back to the file name, the
/// `"Uploaded"` artist and generated placeholder art.
pub fn read_track(path: &Path) -> TrackDescriptor {
    let file = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let default_title = default_title(path);

    let mut title = default_title.clone();
    let mut artist = UPLOADED_ARTIST.to_string();
    let mut picture: Option<String> = None;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                    title = v.trim().to_string();
                }
                if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                    artist = v.trim().to_string();
                }
            }

            // Front cover first, then any picture in any tag.
            for tag in tagged.tags() {
                if let Some(p) = tag
                    .pictures()
                    .iter()
                    .find(|p| p.pic_type() == PictureType::CoverFront)
                    .or_else(|| tag.pictures().first())
                {
                    let mime = p
                        .mime_type()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "image/jpeg".to_string());
                    picture = Some(embed_image(&mime, p.data()));
                    break;
                }
            }
        }
        Err(e) => {
            log::debug!("no readable tags in {}: {e}", path.display());
        }
    }

    let album_art = picture.unwrap_or_else(|| placeholder_art(&title));

    TrackDescriptor {
        title,
        artist,
        album_art,
        duration: UNKNOWN_DURATION.to_string(),
        file: Some(file),
    }
}

/// Descriptor for `path` built without looking at its contents.
pub(super) fn untagged_track(path: &Path) -> TrackDescriptor {
    let title = default_title(path);
    TrackDescriptor {
        album_art: placeholder_art(&title),
        title,
        artist: UPLOADED_ARTIST.to_string(),
        duration: UNKNOWN_DURATION.to_string(),
        file: Some(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())),
    }
}

/// File name without its final extension.
fn default_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}
