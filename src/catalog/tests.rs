use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;

use super::*;
use crate::error::Error;

fn store() -> CatalogStore {
    CatalogStore::open_in_memory().unwrap()
}

fn song(title: &str, artist: &str) -> NewTrack {
    NewTrack::new(title, artist, format!("/music/{title}.mp3"))
}

fn ids(tracks: &[Track]) -> Vec<TrackId> {
    tracks.iter().map(|t| t.id).collect()
}

#[test]
fn added_track_is_listed_with_fresh_id() {
    let store = store();
    let first = store.add_track(&song("Judas", "Lady Gaga")).unwrap();
    let second = store
        .add_track(
            &song("Alejandro", "Lady Gaga")
                .with_album("The Fame Monster")
                .with_genre("Pop")
                .with_duration(Duration::from_secs(274)),
        )
        .unwrap();
    assert_ne!(first, second);

    let tracks = store.list_tracks(None).unwrap();
    assert_eq!(ids(&tracks), vec![first, second]);

    let alejandro = &tracks[1];
    assert_eq!(alejandro.title, "Alejandro");
    assert_eq!(alejandro.artist, "Lady Gaga");
    assert_eq!(alejandro.album.as_deref(), Some("The Fame Monster"));
    assert_eq!(alejandro.genre.as_deref(), Some("Pop"));
    assert_eq!(alejandro.duration, Some(Duration::from_secs(274)));
    assert_eq!(alejandro.path, PathBuf::from("/music/Alejandro.mp3"));
    assert_eq!(tracks[0].album, None);
    assert_eq!(tracks[0].duration, None);
}

#[test]
fn add_track_requires_title_artist_and_path() {
    let store = store();
    assert!(matches!(
        store.add_track(&song("  ", "Artist")),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        store.add_track(&song("Title", "")),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        store.add_track(&NewTrack::new("Title", "Artist", "")),
        Err(Error::Validation(_))
    ));
    assert!(store.list_tracks(None).unwrap().is_empty());
}

#[test]
fn deleted_track_is_never_listed_and_id_is_not_reused() {
    let store = store();
    let a = store.add_track(&song("A", "X")).unwrap();
    let b = store.add_track(&song("B", "X")).unwrap();

    assert!(store.delete_track(b).unwrap());
    assert_eq!(ids(&store.list_tracks(None).unwrap()), vec![a]);

    let c = store.add_track(&song("C", "X")).unwrap();
    assert!(c > b);
}

#[test]
fn deleting_unknown_track_still_succeeds() {
    let store = store();
    assert!(!store.delete_track(42).unwrap());
}

#[test]
fn case_insensitive_filter_matches_substrings() {
    let store = store();
    let black = store.add_track(&song("Blackened", "Metallica")).unwrap();
    let paranoid = store.add_track(&song("Paranoid", "Black Sabbath")).unwrap();
    let back = store.add_track(&song("Back in BLACK", "AC/DC")).unwrap();

    let found = store.list_tracks(Some("black")).unwrap();
    assert_eq!(ids(&found), vec![black, back]);

    // Only titles are searched, not artists.
    assert!(!ids(&found).contains(&paranoid));

    // Substring, not exact or fuzzy match.
    assert_eq!(ids(&store.list_tracks(Some("noid")).unwrap()), vec![paranoid]);
    assert!(store.list_tracks(Some("bkd")).unwrap().is_empty());
}

#[test]
fn case_sensitive_filter_respects_case() {
    let store = store().with_match_case(MatchCase::Sensitive);
    let black = store.add_track(&song("Blackened", "Metallica")).unwrap();
    let back = store.add_track(&song("Back in BLACK", "AC/DC")).unwrap();

    assert_eq!(ids(&store.list_tracks(Some("Black")).unwrap()), vec![black]);
    assert_eq!(ids(&store.list_tracks(Some("BLACK")).unwrap()), vec![back]);
    assert!(store.list_tracks(Some("black")).unwrap().is_empty());
}

#[test]
fn blank_filter_lists_everything() {
    let store = store();
    store.add_track(&song("A", "X")).unwrap();
    store.add_track(&song("B", "X")).unwrap();
    assert_eq!(store.list_tracks(Some("")).unwrap().len(), 2);
    assert_eq!(store.list_tracks(Some("   ")).unwrap().len(), 2);
}

#[test]
fn update_replaces_fields_of_existing_track() {
    let store = store();
    let id = store.add_track(&song("Judas", "Lady Gaga")).unwrap();

    let edited = NewTrack::new("Judas (Remix)", "Lady Gaga", "/music/remix.mp3")
        .with_album("Born This Way")
        .with_duration(Duration::from_secs(249));
    store.update_track(id, &edited).unwrap();

    let track = store.track(id).unwrap();
    assert_eq!(track.title, "Judas (Remix)");
    assert_eq!(track.album.as_deref(), Some("Born This Way"));
    assert_eq!(track.path, PathBuf::from("/music/remix.mp3"));
    assert_eq!(track.id, id);
}

#[test]
fn update_of_unknown_track_is_not_found() {
    let store = store();
    let err = store.update_track(9, &song("A", "X")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn track_lookup_reports_not_found() {
    let store = store();
    assert!(store.track(1).unwrap_err().is_not_found());
}

#[test]
fn track_id_by_path_finds_catalogued_file() {
    let store = store();
    let id = store.add_track(&song("Judas", "Lady Gaga")).unwrap();
    assert_eq!(
        store
            .track_id_by_path(&PathBuf::from("/music/Judas.mp3"))
            .unwrap(),
        Some(id)
    );
    assert_eq!(
        store
            .track_id_by_path(&PathBuf::from("/music/none.mp3"))
            .unwrap(),
        None
    );
}

#[test]
fn playlist_with_added_track_lists_exactly_that_track() {
    let store = store();
    let judas = store.add_track(&song("Judas", "Lady Gaga")).unwrap();
    store.add_track(&song("Other", "Someone")).unwrap();
    let favorites = store.create_playlist("Favorites").unwrap();

    store.add_track_to_playlist(favorites, judas).unwrap();

    let tracks = store.list_playlist_tracks(favorites).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, judas);
    assert_eq!(tracks[0].title, "Judas");
    assert_eq!(tracks[0].artist, "Lady Gaga");

    assert_eq!(
        store.list_playlists().unwrap(),
        vec![Playlist {
            id: favorites,
            name: "Favorites".into()
        }]
    );
}

#[test]
fn empty_or_unknown_playlist_has_no_tracks() {
    let store = store();
    let empty = store.create_playlist("Empty").unwrap();
    assert!(store.list_playlist_tracks(empty).unwrap().is_empty());
    assert!(store.list_playlist_tracks(empty + 100).unwrap().is_empty());
}

#[test]
fn playlist_name_is_required() {
    let store = store();
    assert!(matches!(
        store.create_playlist(" "),
        Err(Error::Validation(_))
    ));
}

#[test]
fn duplicate_membership_is_kept_in_insertion_order() {
    let store = store();
    let a = store.add_track(&song("A", "X")).unwrap();
    let b = store.add_track(&song("B", "X")).unwrap();
    let mix = store.create_playlist("Mix").unwrap();

    store.add_track_to_playlist(mix, b).unwrap();
    store.add_track_to_playlist(mix, a).unwrap();
    store.add_track_to_playlist(mix, b).unwrap();

    assert_eq!(ids(&store.list_playlist_tracks(mix).unwrap()), vec![b, a, b]);
}

#[test]
fn membership_requires_existing_playlist_and_track() {
    let store = store();
    let a = store.add_track(&song("A", "X")).unwrap();
    let mix = store.create_playlist("Mix").unwrap();

    let err = store.add_track_to_playlist(mix + 1, a).unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            entity: crate::error::Entity::Playlist,
            ..
        }
    ));

    let err = store.add_track_to_playlist(mix, a + 1).unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            entity: crate::error::Entity::Track,
            ..
        }
    ));
}

#[test]
fn deleting_track_drops_its_memberships() {
    let store = store();
    let a = store.add_track(&song("A", "X")).unwrap();
    let b = store.add_track(&song("B", "X")).unwrap();
    let mix = store.create_playlist("Mix").unwrap();
    store.add_track_to_playlist(mix, a).unwrap();
    store.add_track_to_playlist(mix, b).unwrap();

    store.delete_track(a).unwrap();
    assert_eq!(ids(&store.list_playlist_tracks(mix).unwrap()), vec![b]);
}

#[test]
fn stale_membership_rows_are_filtered_by_join() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");
    let (mix, b) = {
        let store = CatalogStore::open(&path).unwrap();
        let b = store.add_track(&song("B", "X")).unwrap();
        let mix = store.create_playlist("Mix").unwrap();
        store.add_track_to_playlist(mix, b).unwrap();
        (mix, b)
    };

    // A row written by an older release that never checked track ids.
    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO playlist_songs (playlist_id, music_id) VALUES (?1, 999)",
        [mix],
    )
    .unwrap();
    drop(conn);

    let store = CatalogStore::open(&path).unwrap();
    assert_eq!(ids(&store.list_playlist_tracks(mix).unwrap()), vec![b]);
}

#[test]
fn clear_library_removes_everything_and_keeps_ids_unique() {
    let store = store();
    let a = store.add_track(&song("A", "X")).unwrap();
    let mix = store.create_playlist("Mix").unwrap();
    store.add_track_to_playlist(mix, a).unwrap();
    store
        .save_resume_point(&ResumePoint {
            track_id: a,
            position: Duration::from_secs(3),
        })
        .unwrap();

    store.clear_library().unwrap();

    assert!(store.list_tracks(None).unwrap().is_empty());
    assert!(store.list_playlists().unwrap().is_empty());
    assert!(store.list_playlist_tracks(mix).unwrap().is_empty());
    assert_eq!(store.load_resume_point().unwrap(), None);

    let again = store.add_track(&song("A", "X")).unwrap();
    assert!(again > a);
}

#[test]
fn resume_point_round_trips_and_is_replaced() {
    let store = store();
    let a = store.add_track(&song("A", "X")).unwrap();
    let b = store.add_track(&song("B", "X")).unwrap();
    assert_eq!(store.load_resume_point().unwrap(), None);

    store
        .save_resume_point(&ResumePoint {
            track_id: a,
            position: Duration::from_millis(1500),
        })
        .unwrap();
    store
        .save_resume_point(&ResumePoint {
            track_id: b,
            position: Duration::from_secs(42),
        })
        .unwrap();

    assert_eq!(
        store.load_resume_point().unwrap(),
        Some(ResumePoint {
            track_id: b,
            position: Duration::from_secs(42)
        })
    );

    store.delete_track(b).unwrap();
    assert_eq!(store.load_resume_point().unwrap(), None);
}

#[test]
fn open_creates_parent_directories_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("library.db");

    let id = {
        let store = CatalogStore::open(&path).unwrap();
        store.add_track(&song("Judas", "Lady Gaga")).unwrap()
    };

    let store = CatalogStore::open(&path).unwrap();
    assert_eq!(store.track(id).unwrap().title, "Judas");
}

#[test]
fn legacy_three_column_database_is_upgraded_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("musiclibrary.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE music (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tille TEXT NOT NULL,
                artist TEXT NOT NULL,
                mp3_link TEXT NOT NULL
            );
            INSERT INTO music (tille, artist, mp3_link) VALUES ('Judas', 'Lady Gaga', '/music/judas.mp3');",
        )
        .unwrap();
    }

    let store = CatalogStore::open(&path).unwrap();
    let tracks = store.list_tracks(None).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Judas");
    assert_eq!(tracks[0].artist, "Lady Gaga");
    assert_eq!(tracks[0].album, None);
    assert_eq!(tracks[0].duration, None);

    let id = store
        .add_track(&song("Alejandro", "Lady Gaga").with_genre("Pop"))
        .unwrap();
    assert!(id > tracks[0].id);
    drop(store);

    let conn = Connection::open(&path).unwrap();
    let version: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap();
    assert_eq!(version, 2);
}
