//! Table creation and the one-off upgrade of the legacy track table.
//!
//! The schema version lives in `PRAGMA user_version`. Version 0 is either a
//! fresh file or a database written by the first release, whose `music`
//! table only had `id, tille, artist, mp3_link`.

use rusqlite::Connection;

pub(super) const SCHEMA_VERSION: i64 = 2;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS music (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        album TEXT,
        genre TEXT,
        duration REAL,
        mp3_link TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS playlists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS playlist_songs (
        playlist_id INTEGER NOT NULL,
        music_id INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_playlist_songs_playlist ON playlist_songs(playlist_id);
    CREATE INDEX IF NOT EXISTS idx_playlist_songs_music ON playlist_songs(music_id);
    CREATE INDEX IF NOT EXISTS idx_music_link ON music(mp3_link);
    CREATE TABLE IF NOT EXISTS resume_point (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        music_id INTEGER NOT NULL,
        position REAL NOT NULL
    );
";

/// Bring `conn` up to [`SCHEMA_VERSION`], creating missing tables.
pub(super) fn prepare(conn: &Connection) -> Result<(), rusqlite::Error> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if version > SCHEMA_VERSION {
        tracing::warn!(
            version,
            supported = SCHEMA_VERSION,
            "database was written by a newer release; opening it as-is"
        );
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    if version < SCHEMA_VERSION {
        upgrade_legacy_music_table(&tx)?;
    }
    tx.execute_batch(CREATE_TABLES)?;
    if version != SCHEMA_VERSION {
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tracing::info!(from = version, to = SCHEMA_VERSION, "catalog schema updated");
    }
    tx.commit()
}

fn upgrade_legacy_music_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    let columns = table_columns(conn, "music")?;
    if columns.is_empty() {
        // Fresh database.
        return Ok(());
    }

    let has = |name: &str| columns.iter().any(|c| c == name);

    if has("tille") && !has("title") {
        conn.execute("ALTER TABLE music RENAME COLUMN tille TO title", [])?;
        tracing::info!("renamed legacy music.tille column to title");
    }
    for (name, ty) in [("album", "TEXT"), ("genre", "TEXT"), ("duration", "REAL")] {
        if !has(name) {
            conn.execute(&format!("ALTER TABLE music ADD COLUMN {name} {ty}"), [])?;
            tracing::info!(column = name, "added missing music column");
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
