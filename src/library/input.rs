use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;

use crate::catalog::NewTrack;
use crate::error::{Error, Result};

/// Reads the play length of an audio file.
pub trait DurationReader {
    /// `None` when the file cannot be read or reports no length.
    fn read_duration(&self, path: &Path) -> Option<Duration>;
}

/// Reads lengths from the audio properties lofty parses out of the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyDurationReader;

impl DurationReader for LoftyDurationReader {
    fn read_duration(&self, path: &Path) -> Option<Duration> {
        match lofty::read_from_path(path) {
            Ok(tagged) => {
                let duration = tagged.properties().duration();
                (!duration.is_zero()).then_some(duration)
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "could not read duration");
                None
            }
        }
    }
}

/// What the user typed for a new or edited track.
#[derive(Debug, Clone, Default)]
pub struct TrackInput {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
}

/// Check `input` and turn it into a catalog row.
///
/// Title and artist must be non-blank and `path` must be an existing file.
/// Blank album/genre become `None`. When the length cannot be read the
/// track is recorded with `fallback`.
pub fn prepare_track(
    input: TrackInput,
    reader: &dyn DurationReader,
    fallback: Duration,
) -> Result<NewTrack> {
    let title = input.title.trim();
    let artist = input.artist.trim();
    if title.is_empty() || artist.is_empty() {
        return Err(Error::validation("title and artist are required"));
    }
    if !input.path.is_file() {
        return Err(Error::FileNotFound(input.path));
    }

    let duration = reader.read_duration(&input.path).unwrap_or_else(|| {
        tracing::warn!(
            path = %input.path.display(),
            fallback_secs = fallback.as_secs(),
            "length unreadable, using fallback"
        );
        fallback
    });

    Ok(NewTrack {
        title: title.to_string(),
        artist: artist.to_string(),
        album: non_blank(input.album),
        genre: non_blank(input.genre),
        duration: Some(duration),
        path: input.path,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
