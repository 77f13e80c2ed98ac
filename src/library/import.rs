use std::path::Path;
use std::time::Duration;

use crate::catalog::{CatalogStore, NewTrack};
use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::scan::scan;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    /// Files already in the catalog.
    pub skipped: usize,
    /// Files the catalog refused; the rest of the import still runs.
    pub failed: usize,
}

/// Add every audio file under `dir` that the catalog does not know yet.
///
/// Files whose length cannot be read get `fallback_duration_secs`.
pub fn import_dir(
    store: &CatalogStore,
    dir: &Path,
    settings: &LibrarySettings,
) -> Result<ImportSummary> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    let fallback = Duration::from_secs(settings.fallback_duration_secs);
    let summary = add_new(store, scan(dir, settings), fallback)?;

    tracing::info!(
        dir = %dir.display(),
        added = summary.added,
        skipped = summary.skipped,
        failed = summary.failed,
        "directory imported"
    );
    Ok(summary)
}

fn add_new(
    store: &CatalogStore,
    tracks: impl IntoIterator<Item = NewTrack>,
    fallback: Duration,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for mut track in tracks {
        if store.track_id_by_path(&track.path)?.is_some() {
            summary.skipped += 1;
            continue;
        }
        track.duration.get_or_insert(fallback);
        match store.add_track(&track) {
            Ok(_) => summary.added += 1,
            Err(err) => {
                tracing::warn!(path = %track.path.display(), error = %err, "skipping file");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_rejected_track_does_not_stop_the_rest() {
        let store = CatalogStore::open_in_memory().unwrap();
        let tracks = vec![
            NewTrack::new("Judas", "Lady Gaga", "/m/judas.mp3"),
            NewTrack::new("   ", "Lady Gaga", "/m/untitled.mp3"),
            NewTrack::new("Alejandro", "Lady Gaga", "/m/alejandro.mp3"),
        ];

        let summary = add_new(&store, tracks, Duration::from_secs(180)).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                added: 2,
                skipped: 0,
                failed: 1
            }
        );
        let titles: Vec<String> = store
            .list_tracks(None)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(!titles.iter().any(|t| t.trim().is_empty()));
    }
}
