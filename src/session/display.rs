use std::time::Duration;

use super::model::{PlaybackState, RepeatMode};

/// Everything a renderer needs to draw the transport area.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub state: PlaybackState,
    /// "Title by Artist" while a track is playing or paused.
    pub now_playing: Option<String>,
    pub elapsed: Duration,
    pub total: Option<Duration>,
    pub repeat: RepeatMode,
    pub shuffle: bool,
    pub volume: f32,
    pub sleep_remaining: Option<Duration>,
}

impl DisplayState {
    pub fn now_playing_label(&self) -> String {
        format!(
            "Now Playing: {}",
            self.now_playing.as_deref().unwrap_or("None")
        )
    }

    /// `elapsed / total`, e.g. `1:05 / 3:00`.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.elapsed),
            format_time(self.total.unwrap_or(Duration::ZERO))
        )
    }

    /// The action the play/pause control would perform.
    pub fn play_pause_label(&self) -> &'static str {
        match self.state {
            PlaybackState::Playing => "⏸ Pause",
            PlaybackState::Paused | PlaybackState::Stopped => "▶ Play",
        }
    }

    pub fn repeat_label(&self) -> String {
        format!("Repeat: {}", self.repeat.label())
    }

    pub fn shuffle_label(&self) -> &'static str {
        if self.shuffle {
            "Shuffle: On"
        } else {
            "Shuffle: Off"
        }
    }
}

/// Format as `m:ss`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
