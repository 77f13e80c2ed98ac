use std::path::Path;

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::catalog::NewTrack;
use crate::config::LibrarySettings;

const UNKNOWN_ARTIST: &str = "Unknown Artist";

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_blank(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read tags from `path` into a catalog row. Title falls back to the file
/// stem and artist to "Unknown Artist"; duration is `None` when unreadable.
fn track_from_file(path: &Path) -> NewTrack {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    let mut track = NewTrack::new(stem, UNKNOWN_ARTIST, path);

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let duration = tagged.properties().duration();
            if !duration.is_zero() {
                track.duration = Some(duration);
            }

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = non_blank(tag.title()) {
                    track.title = v;
                }
                if let Some(v) = non_blank(tag.artist()) {
                    track.artist = v;
                }
                track.album = non_blank(tag.album());
                track.genre = non_blank(tag.genre());
            }
        }
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "no readable tags");
        }
    }

    track
}

/// Walk `dir` and describe every audio file found, sorted case-insensitively
/// by "artist - title".
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<NewTrack> {
    let mut tracks: Vec<NewTrack> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

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
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            tracks.push(track_from_file(path));
        }
    }

    sort_for_listing(&mut tracks);
    tracks
}

/// Case-insensitive order on "artist - title", the same order an import
/// adds them in.
fn sort_for_listing(tracks: &mut [NewTrack]) {
    tracks.sort_by_cached_key(|t| format!("{} - {}", t.artist, t.title).to_lowercase());
}
