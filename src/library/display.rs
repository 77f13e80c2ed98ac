use crate::catalog::Track;
use crate::config::TrackDisplayField;

const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Build a listing line for a track according to the provided `fields` and separator.
///
/// A missing album shows as "Unknown Album"; a missing genre is skipped.
/// Falls back to the title when no parts were produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Title => push_trimmed(&mut parts, &track.title),
            TrackDisplayField::Artist => push_trimmed(&mut parts, &track.artist),
            TrackDisplayField::Album => {
                let album = track
                    .album
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_ALBUM);
                parts.push(album.to_string());
            }
            TrackDisplayField::Genre => {
                if let Some(genre) = track.genre.as_deref() {
                    push_trimmed(&mut parts, genre);
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = track.path.file_stem().and_then(|s| s.to_str()) {
                    push_trimmed(&mut parts, stem);
                }
            }
            TrackDisplayField::Path => parts.push(track.path.display().to_string()),
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}

fn push_trimmed(parts: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        parts.push(value.to_string());
    }
}
