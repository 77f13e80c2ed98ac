use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{Error, Result, Severity};

use super::model::{NewTrack, Playlist, PlaylistId, ResumePoint, Track, TrackId};
use super::schema;

const TRACK_COLUMNS: &str = "id, title, artist, album, genre, duration, mp3_link";

/// How `list_tracks` compares the filter against titles.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MatchCase {
    Sensitive,
    #[default]
    Insensitive,
}

impl MatchCase {
    fn matches(self, title: &str, needle: &str) -> bool {
        match self {
            MatchCase::Sensitive => title.contains(needle),
            MatchCase::Insensitive => title.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

pub struct CatalogStore {
    conn: Connection,
    match_case: MatchCase,
}

impl CatalogStore {
    /// Open (or create) the database at `path`, creating parent directories
    /// and tables as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened catalog");
        Self::from_connection(conn)
    }

    /// A throwaway catalog that lives only as long as the store.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::prepare(&conn)?;
        Ok(Self {
            conn,
            match_case: MatchCase::default(),
        })
    }

    pub fn with_match_case(mut self, match_case: MatchCase) -> Self {
        self.match_case = match_case;
        self
    }

    pub fn match_case(&self) -> MatchCase {
        self.match_case
    }

    /// Insert a track and return its newly assigned id.
    pub fn add_track(&self, track: &NewTrack) -> Result<TrackId> {
        logged("add_track", self.insert_track(track))
    }

    fn insert_track(&self, track: &NewTrack) -> Result<TrackId> {
        validate(track)?;
        self.conn.execute(
            "INSERT INTO music (title, artist, album, genre, duration, mp3_link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                track.title.trim(),
                track.artist.trim(),
                track.album,
                track.genre,
                track.duration.map(|d| d.as_secs_f64()),
                path_text(&track.path),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, title = %track.title, "track added");
        Ok(id)
    }

    /// All tracks in insertion order, or those whose title contains `filter`.
    ///
    /// A blank filter lists everything.
    pub fn list_tracks(&self, filter: Option<&str>) -> Result<Vec<Track>> {
        logged("list_tracks", self.select_tracks(filter))
    }

    fn select_tracks(&self, filter: Option<&str>) -> Result<Vec<Track>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TRACK_COLUMNS} FROM music ORDER BY id"))?;
        let tracks = stmt
            .query_map([], track_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match filter.filter(|f| !f.trim().is_empty()) {
            None => Ok(tracks),
            Some(needle) => Ok(tracks
                .into_iter()
                .filter(|t| self.match_case.matches(&t.title, needle))
                .collect()),
        }
    }

    pub fn track(&self, id: TrackId) -> Result<Track> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT {TRACK_COLUMNS} FROM music WHERE id = ?1"),
                params![id],
                track_from_row,
            )
            .optional();
        logged("track", found.map_err(Error::from))?.ok_or_else(|| Error::track_not_found(id))
    }

    /// Id of the first track stored with this file path, if any.
    pub fn track_id_by_path(&self, path: &Path) -> Result<Option<TrackId>> {
        let found = self
            .conn
            .query_row(
                "SELECT id FROM music WHERE mp3_link = ?1 ORDER BY id LIMIT 1",
                params![path_text(path)],
                |row| row.get(0),
            )
            .optional();
        logged("track_id_by_path", found.map_err(Error::from))
    }

    /// Replace every field of track `id`.
    pub fn update_track(&self, id: TrackId, track: &NewTrack) -> Result<()> {
        logged("update_track", self.replace_track(id, track))
    }

    fn replace_track(&self, id: TrackId, track: &NewTrack) -> Result<()> {
        validate(track)?;
        let changed = self.conn.execute(
            "UPDATE music
             SET title = ?1, artist = ?2, album = ?3, genre = ?4, duration = ?5, mp3_link = ?6
             WHERE id = ?7",
            params![
                track.title.trim(),
                track.artist.trim(),
                track.album,
                track.genre,
                track.duration.map(|d| d.as_secs_f64()),
                path_text(&track.path),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::track_not_found(id));
        }
        Ok(())
    }

    /// Delete track `id` and its playlist memberships.
    ///
    /// Deleting an unknown id succeeds; the returned flag tells whether a
    /// row was actually removed.
    pub fn delete_track(&self, id: TrackId) -> Result<bool> {
        logged("delete_track", self.remove_track(id))
    }

    fn remove_track(&self, id: TrackId) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM playlist_songs WHERE music_id = ?1", params![id])?;
        tx.execute("DELETE FROM resume_point WHERE music_id = ?1", params![id])?;
        let removed = tx.execute("DELETE FROM music WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(removed > 0)
    }

    /// Remove all tracks, playlists, memberships and the resume point at once.
    pub fn clear_library(&self) -> Result<()> {
        logged("clear_library", self.remove_everything())
    }

    fn remove_everything(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            "DELETE FROM playlist_songs;
             DELETE FROM music;
             DELETE FROM playlists;
             DELETE FROM resume_point;",
        )?;
        tx.commit()?;
        tracing::info!("library cleared");
        Ok(())
    }

    pub fn create_playlist(&self, name: &str) -> Result<PlaylistId> {
        logged("create_playlist", self.insert_playlist(name))
    }

    fn insert_playlist(&self, name: &str) -> Result<PlaylistId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("playlist name is required"));
        }
        self.conn
            .execute("INSERT INTO playlists (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append a membership row. Both ids must exist; duplicates are kept.
    pub fn add_track_to_playlist(&self, playlist_id: PlaylistId, track_id: TrackId) -> Result<()> {
        logged(
            "add_track_to_playlist",
            self.insert_membership(playlist_id, track_id),
        )
    }

    fn insert_membership(&self, playlist_id: PlaylistId, track_id: TrackId) -> Result<()> {
        if !self.exists("playlists", playlist_id)? {
            return Err(Error::playlist_not_found(playlist_id));
        }
        if !self.exists("music", track_id)? {
            return Err(Error::track_not_found(track_id));
        }
        self.conn.execute(
            "INSERT INTO playlist_songs (playlist_id, music_id) VALUES (?1, ?2)",
            params![playlist_id, track_id],
        )?;
        Ok(())
    }

    pub fn list_playlists(&self) -> Result<Vec<Playlist>> {
        logged("list_playlists", self.select_playlists())
    }

    fn select_playlists(&self) -> Result<Vec<Playlist>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM playlists ORDER BY id")?;
        let playlists = stmt
            .query_map([], |row| {
                Ok(Playlist {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(playlists)
    }

    /// Tracks of a playlist in membership order. Memberships whose track no
    /// longer exists are dropped by the join.
    pub fn list_playlist_tracks(&self, playlist_id: PlaylistId) -> Result<Vec<Track>> {
        logged(
            "list_playlist_tracks",
            self.select_playlist_tracks(playlist_id),
        )
    }

    fn select_playlist_tracks(&self, playlist_id: PlaylistId) -> Result<Vec<Track>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.title, m.artist, m.album, m.genre, m.duration, m.mp3_link
             FROM playlist_songs ps
             INNER JOIN music m ON m.id = ps.music_id
             WHERE ps.playlist_id = ?1
             ORDER BY ps.rowid",
        )?;
        let tracks = stmt
            .query_map(params![playlist_id], track_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    pub fn save_resume_point(&self, point: &ResumePoint) -> Result<()> {
        let saved = self.conn.execute(
            "INSERT INTO resume_point (id, music_id, position) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET music_id = excluded.music_id, position = excluded.position",
            params![point.track_id, point.position.as_secs_f64()],
        );
        logged("save_resume_point", saved.map(|_| ()).map_err(Error::from))
    }

    pub fn load_resume_point(&self) -> Result<Option<ResumePoint>> {
        let found = self
            .conn
            .query_row(
                "SELECT music_id, position FROM resume_point WHERE id = 1",
                [],
                |row| {
                    let position: f64 = row.get(1)?;
                    Ok(ResumePoint {
                        track_id: row.get(0)?,
                        position: seconds(position).unwrap_or(Duration::ZERO),
                    })
                },
            )
            .optional();
        logged("load_resume_point", found.map_err(Error::from))
    }

    pub fn clear_resume_point(&self) -> Result<()> {
        let cleared = self.conn.execute("DELETE FROM resume_point", []);
        logged("clear_resume_point", cleared.map(|_| ()).map_err(Error::from))
    }

    fn exists(&self, table: &str, id: i64) -> Result<bool> {
        let found = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }
}

fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        match err.severity() {
            Severity::Warning => tracing::debug!(operation, error = %err, "catalog request rejected"),
            Severity::Error => tracing::warn!(operation, error = %err, "catalog operation failed"),
        }
    }
    result
}

fn validate(track: &NewTrack) -> Result<()> {
    if track.title.trim().is_empty() {
        return Err(Error::validation("track title is required"));
    }
    if track.artist.trim().is_empty() {
        return Err(Error::validation("track artist is required"));
    }
    if track.path.as_os_str().is_empty() {
        return Err(Error::validation("track file path is required"));
    }
    Ok(())
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok()
}

fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    let duration: Option<f64> = row.get(5)?;
    let path: String = row.get(6)?;
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        album: row.get(3)?,
        genre: row.get(4)?,
        duration: duration.and_then(seconds),
        path: PathBuf::from(path),
    })
}
