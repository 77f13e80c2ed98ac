use std::path::PathBuf;
use std::time::Duration;

pub type TrackId = i64;
pub type PlaylistId = i64;

/// A catalogued audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<Duration>,
    pub path: PathBuf,
}

/// Field values for inserting or replacing a track.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<Duration>,
    pub path: PathBuf,
}

impl NewTrack {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: None,
            genre: None,
            duration: None,
            path: path.into(),
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
}

/// Where playback left off, saved across restarts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumePoint {
    pub track_id: TrackId,
    pub position: Duration,
}
