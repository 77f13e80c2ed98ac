use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub sleep: SleepSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Location of the catalog database.
    ///
    /// Unset means `$XDG_DATA_HOME/cadenza/library.db` or
    /// `~/.local/share/cadenza/library.db`.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume in `[0.0, 1.0]`.
    pub volume: f32,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Default repeat mode.
    pub repeat: RepeatSetting,
    /// Restore the last played track on startup.
    pub resume: bool,
    /// Start playing the restored track immediately instead of only selecting it.
    pub resume_autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            shuffle: false,
            repeat: RepeatSetting::Off,
            resume: true,
            resume_autoplay: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatSetting {
    #[serde(alias = "no-loop", alias = "no_loop", alias = "none")]
    Off,
    #[serde(alias = "repeat-one", alias = "loop-one", alias = "loop_one")]
    One,
    #[serde(alias = "repeat-all", alias = "loop-all", alias = "loop_all")]
    All,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Genre,
    Filename,
    Path,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Length recorded for a track whose file length cannot be read (seconds).
    pub fallback_duration_secs: u64,
    /// Whether `list <filter>` matches titles case-sensitively.
    pub case_sensitive_filter: bool,

    /// Which fields make up a listing line.
    ///
    /// Example: ["title", "artist", "album"] -> "Judas - Lady Gaga - Born This Way"
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            fallback_duration_secs: 180,
            case_sensitive_filter: false,
            display_fields: vec![
                TrackDisplayField::Title,
                TrackDisplayField::Artist,
                TrackDisplayField::Album,
            ],
            display_separator: " - ".to_string(),
        }
    }
}

/// Largest accepted `sleep.max_minutes`: one day.
pub const MAX_SLEEP_MINUTES: u64 = 24 * 60;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SleepSettings {
    /// Longest sleep timer accepted, in minutes.
    pub max_minutes: u64,
}

impl Default for SleepSettings {
    fn default() -> Self {
        Self { max_minutes: 120 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "cadenza=info".to_string(),
        }
    }
}
