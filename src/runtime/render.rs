use crate::catalog::{Playlist, Track};
use crate::config::LibrarySettings;
use crate::error::{Error, Severity};
use crate::library::display_from_fields;
use crate::session::{DisplayState, format_time};

use super::ui_state::Theme;

/// One numbered listing line: `  2. [#14] Judas - Lady Gaga - Born This Way  (4:09)`.
pub fn track_line(
    position: usize,
    track: &Track,
    current: bool,
    library: &LibrarySettings,
    theme: Theme,
) -> String {
    let label = display_from_fields(track, &library.display_fields, &library.display_separator);
    let length = track
        .duration
        .map(|d| format!("  ({})", format_time(d)))
        .unwrap_or_default();
    let line = format!("{position:>3}. [#{}] {label}{length}", track.id);
    if current {
        theme.paint(&format!("▶{line}"))
    } else {
        format!(" {line}")
    }
}

pub fn listing(
    heading: &str,
    tracks: &[Track],
    current: Option<usize>,
    library: &LibrarySettings,
    theme: Theme,
) -> String {
    let mut out = theme.paint(heading);
    if tracks.is_empty() {
        out.push_str("\n  (no songs)");
    }
    for (i, track) in tracks.iter().enumerate() {
        out.push('\n');
        out.push_str(&track_line(i + 1, track, current == Some(i), library, theme));
    }
    out
}

pub fn playlists(playlists: &[Playlist], theme: Theme) -> String {
    let mut out = theme.paint("Playlists");
    if playlists.is_empty() {
        out.push_str("\n  (none)");
    }
    for p in playlists {
        out.push_str(&format!("\n  [#{}] {}", p.id, p.name));
    }
    out
}

pub fn status(display: &DisplayState, theme: Theme) -> String {
    let mut lines = vec![
        theme.paint(&display.now_playing_label()),
        format!(
            "{}   {}",
            display.time_label(),
            display.play_pause_label()
        ),
        format!(
            "{}   {}   Volume: {:.0}%",
            display.repeat_label(),
            display.shuffle_label(),
            display.volume * 100.0
        ),
    ];
    if let Some(left) = display.sleep_remaining {
        lines.push(format!("Sleep in {}", format_time(left)));
    }
    lines.join("\n")
}

/// A one-line message for a failed command.
pub fn notice(err: &Error) -> String {
    match err.severity() {
        Severity::Warning => format!("warning: {err}"),
        Severity::Error => format!("error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::session::{PlaybackState, RepeatMode};

    fn judas() -> Track {
        Track {
            id: 14,
            title: "Judas".into(),
            artist: "Lady Gaga".into(),
            album: Some("Born This Way".into()),
            genre: None,
            duration: Some(Duration::from_secs(249)),
            path: PathBuf::from("/music/judas.mp3"),
        }
    }

    #[test]
    fn track_line_numbers_from_one_and_marks_current() {
        let lib = LibrarySettings::default();
        let plain = track_line(2, &judas(), false, &lib, Theme::Dark);
        assert_eq!(plain, "   2. [#14] Judas - Lady Gaga - Born This Way  (4:09)");

        let current = track_line(1, &judas(), true, &lib, Theme::Dark);
        assert!(current.contains("▶  1. [#14] Judas"));
    }

    #[test]
    fn empty_listing_says_so() {
        let out = listing("Library", &[], None, &LibrarySettings::default(), Theme::Light);
        assert!(out.ends_with("(no songs)"));
    }

    #[test]
    fn status_includes_sleep_countdown_when_set() {
        let mut display = DisplayState {
            state: PlaybackState::Paused,
            now_playing: Some("Judas by Lady Gaga".into()),
            elapsed: Duration::from_secs(65),
            total: Some(Duration::from_secs(249)),
            repeat: RepeatMode::All,
            shuffle: false,
            volume: 0.5,
            sleep_remaining: None,
        };
        let out = status(&display, Theme::Dark);
        assert!(out.contains("Now Playing: Judas by Lady Gaga"));
        assert!(out.contains("1:05 / 4:09   ▶ Play"));
        assert!(out.contains("Repeat: All   Shuffle: Off   Volume: 50%"));
        assert!(!out.contains("Sleep"));

        display.sleep_remaining = Some(Duration::from_secs(90));
        assert!(status(&display, Theme::Dark).ends_with("Sleep in 1:30"));
    }

    #[test]
    fn notice_prefix_follows_severity() {
        assert_eq!(
            notice(&Error::validation("no songs in the library")),
            "warning: no songs in the library"
        );
        assert_eq!(
            notice(&Error::device("no output")),
            "error: audio device error: no output"
        );
    }
}
