use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::*;
use crate::catalog::{CatalogStore, Track};
use crate::config::{LibrarySettings, TrackDisplayField};
use crate::error::Error;

struct FixedReader(Option<Duration>);

impl DurationReader for FixedReader {
    fn read_duration(&self, _path: &Path) -> Option<Duration> {
        self.0
    }
}

const FALLBACK: Duration = Duration::from_secs(180);

fn input(path: PathBuf, title: &str, artist: &str) -> TrackInput {
    TrackInput {
        path,
        title: title.into(),
        artist: artist.into(),
        album: None,
        genre: None,
    }
}

fn track(title: &str, artist: &str, album: Option<&str>) -> Track {
    Track {
        id: 1,
        title: title.into(),
        artist: artist.into(),
        album: album.map(str::to_string),
        genre: None,
        duration: None,
        path: PathBuf::from("/music/Song.mp3"),
    }
}

#[test]
fn prepare_track_uses_read_duration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("judas.mp3");
    fs::write(&path, b"fake").unwrap();

    let mut raw = input(path.clone(), "  Judas ", "Lady Gaga");
    raw.album = Some("Born This Way".into());
    raw.genre = Some("   ".into());

    let prepared =
        prepare_track(raw, &FixedReader(Some(Duration::from_secs(249))), FALLBACK).unwrap();
    assert_eq!(prepared.title, "Judas");
    assert_eq!(prepared.album.as_deref(), Some("Born This Way"));
    assert_eq!(prepared.genre, None);
    assert_eq!(prepared.duration, Some(Duration::from_secs(249)));
    assert_eq!(prepared.path, path);
}

#[test]
fn prepare_track_falls_back_when_length_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.mp3");
    fs::write(&path, b"not audio").unwrap();

    let prepared = prepare_track(input(path.clone(), "Broken", "Band"), &FixedReader(None), FALLBACK)
        .unwrap();
    assert_eq!(prepared.duration, Some(FALLBACK));

    // The real reader cannot parse garbage either.
    assert_eq!(LoftyDurationReader.read_duration(&path), None);
}

#[test]
fn prepare_track_rejects_missing_file() {
    let err = prepare_track(
        input(PathBuf::from("/definitely/not/here.mp3"), "A", "B"),
        &FixedReader(None),
        FALLBACK,
    )
    .unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn prepare_track_requires_title_and_artist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.mp3");
    fs::write(&path, b"fake").unwrap();

    let err = prepare_track(input(path.clone(), "", "B"), &FixedReader(None), FALLBACK).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    let err = prepare_track(input(path, "A", "  "), &FixedReader(None), FALLBACK).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn display_from_fields_shows_unknown_album() {
    let fields = [
        TrackDisplayField::Title,
        TrackDisplayField::Artist,
        TrackDisplayField::Album,
    ];
    assert_eq!(
        display_from_fields(&track("Judas", "Lady Gaga", None), &fields, " - "),
        "Judas - Lady Gaga - Unknown Album"
    );
    assert_eq!(
        display_from_fields(
            &track("Judas", " Lady Gaga ", Some("Born This Way")),
            &fields,
            " - "
        ),
        "Judas - Lady Gaga - Born This Way"
    );
}

#[test]
fn display_from_fields_supports_filename_and_empty_fields() {
    let t = track("Judas", "Lady Gaga", None);
    assert_eq!(
        display_from_fields(&t, &[TrackDisplayField::Filename], " | "),
        "Song"
    );
    assert_eq!(display_from_fields(&t, &[TrackDisplayField::Genre], " | "), "Judas");
    assert_eq!(display_from_fields(&t, &[], " | "), "Judas");
}

#[test]
fn import_dir_adds_new_files_and_skips_known_ones() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("two.flac"), b"not real").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore").unwrap();

    let store = CatalogStore::open_in_memory().unwrap();
    let settings = LibrarySettings::default();

    let first = import_dir(&store, dir.path(), &settings).unwrap();
    assert_eq!(
        first,
        ImportSummary {
            added: 2,
            skipped: 0,
            failed: 0
        }
    );

    let tracks = store.list_tracks(None).unwrap();
    assert_eq!(tracks.len(), 2);
    assert!(tracks.iter().all(|t| t.duration == Some(FALLBACK)));
    assert!(tracks.iter().all(|t| t.artist == "Unknown Artist"));

    let second = import_dir(&store, dir.path(), &settings).unwrap();
    assert_eq!(
        second,
        ImportSummary {
            added: 0,
            skipped: 2,
            failed: 0
        }
    );
}

#[test]
fn import_dir_rejects_missing_directory() {
    let store = CatalogStore::open_in_memory().unwrap();
    let err = import_dir(
        &store,
        Path::new("/definitely/not/a/dir"),
        &LibrarySettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}
