use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::AudioDevice;
use crate::catalog::{ResumePoint, Track};
use crate::config::MAX_SLEEP_MINUTES;
use crate::error::{Error, Result};

use super::display::DisplayState;
use super::model::{PlaybackState, RepeatMode};
use super::timer::{SleepTimer, Stopwatch};

const DEFAULT_VOLUME: f32 = 0.5;
const DEFAULT_SLEEP_LIMIT_MINUTES: u64 = 120;

/// Something that happened on its own during [`PlaybackSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// The sleep timer expired and playback was stopped.
    SleepTimerFired(Option<ResumePoint>),
    /// The current track ended and the session moved on to this index.
    Advanced(usize),
    /// The last track ended with repeat off. Carries where playback was.
    Finished(Option<ResumePoint>),
}

pub struct PlaybackSession<D> {
    device: D,
    tracks: Vec<Track>,
    current: Option<usize>,
    state: PlaybackState,
    repeat: RepeatMode,
    shuffle: bool,
    volume: f32,
    sleep: SleepTimer,
    sleep_limit_minutes: u64,
    clock: Stopwatch,
    rng: StdRng,
}

impl<D: AudioDevice> PlaybackSession<D> {
    pub fn new(device: D) -> Self {
        Self::with_rng(device, StdRng::from_os_rng())
    }

    /// Build a session whose shuffle choices come from `rng`.
    pub fn with_rng(mut device: D, rng: StdRng) -> Self {
        device.set_volume(DEFAULT_VOLUME);
        Self {
            device,
            tracks: Vec::new(),
            current: None,
            state: PlaybackState::Stopped,
            repeat: RepeatMode::Off,
            shuffle: false,
            volume: DEFAULT_VOLUME,
            sleep: SleepTimer::default(),
            sleep_limit_minutes: DEFAULT_SLEEP_LIMIT_MINUTES,
            clock: Stopwatch::default(),
            rng,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn sleep_deadline(&self) -> Option<Instant> {
        self.sleep.deadline()
    }

    /// Replace the listing the session indexes into.
    ///
    /// The current track is found again by id; when it is no longer listed
    /// playback stops and the selection is cleared.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        let current_id = self.current_track().map(|t| t.id);
        self.tracks = tracks;
        self.current = current_id.and_then(|id| self.tracks.iter().position(|t| t.id == id));

        if self.current.is_none() && self.state != PlaybackState::Stopped {
            tracing::debug!("current track left the listing; stopping");
            self.halt();
        }
    }

    /// Make `index` the current track without starting it.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.state == PlaybackState::Stopped {
            self.current = Some(index);
        } else if self.current != Some(index) {
            // Selecting something else while audio runs just queues it up for the next play.
            self.halt();
            self.current = Some(index);
        }
        Ok(())
    }

    /// Start the track at `index` from the beginning.
    pub fn play(&mut self, index: usize) -> Result<()> {
        self.start(index, Duration::ZERO)
    }

    fn start(&mut self, index: usize, start_at: Duration) -> Result<()> {
        self.check_index(index)?;
        let path = self.tracks[index].path.clone();

        let started = self
            .device
            .load(&path, start_at)
            .and_then(|()| self.device.play());

        if let Err(err) = started {
            tracing::warn!(path = %path.display(), error = %err, "playback failed");
            self.halt();
            return Err(err);
        }

        self.current = Some(index);
        self.state = PlaybackState::Playing;
        self.clock.start(start_at, Instant::now());
        tracing::debug!(index, path = %path.display(), "playing");
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(Error::validation("no songs in the library"));
        }
        if index >= self.tracks.len() {
            return Err(Error::validation(format!(
                "no track at position {} (listing has {})",
                index + 1,
                self.tracks.len()
            )));
        }
        Ok(())
    }

    /// Pause when playing, resume when paused, start the selection when stopped.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Paused => {
                self.resume();
                Ok(())
            }
            PlaybackState::Stopped => match self.current {
                Some(index) => self.play(index),
                None => Err(Error::validation("please select a song to play")),
            },
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.device.pause();
            self.clock.pause(Instant::now());
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.device.unpause();
            self.clock.resume(Instant::now());
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop playback, keeping the selection. Returns where playback was.
    pub fn stop(&mut self) -> Option<ResumePoint> {
        if self.state == PlaybackState::Stopped {
            return None;
        }
        let point = self.resume_point();
        self.halt();
        point
    }

    fn halt(&mut self) {
        self.device.stop();
        self.state = PlaybackState::Stopped;
        self.clock.reset();
    }

    /// Advance according to the repeat and shuffle modes.
    ///
    /// Repeat one replays the current track; otherwise shuffle picks any
    /// track at random; otherwise the next track plays, wrapping with
    /// repeat all and stopping at the end with repeat off. Stopping returns
    /// the resume point reached, like [`stop`](Self::stop).
    pub fn next(&mut self) -> Result<Option<ResumePoint>> {
        if self.tracks.is_empty() {
            return Err(Error::validation("no songs in the library"));
        }
        match self.next_index() {
            Some(index) => self.play(index).map(|()| None),
            None => Ok(self.stop()),
        }
    }

    fn next_index(&mut self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let Some(current) = self.current else {
            return Some(0);
        };

        if self.repeat == RepeatMode::One {
            return Some(current);
        }
        if self.shuffle {
            return Some(self.rng.random_range(0..len));
        }
        if current + 1 < len {
            Some(current + 1)
        } else if self.repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Play the track before the current one. No-op on the first track.
    pub fn previous(&mut self) -> Result<()> {
        match self.current {
            Some(index) if index > 0 => self.play(index - 1),
            _ => Ok(()),
        }
    }

    /// Clamp `level` into `[0.0, 1.0]` and apply it. NaN is rejected.
    pub fn set_volume(&mut self, level: f32) -> Result<f32> {
        if level.is_nan() {
            return Err(Error::validation("volume must be a number between 0 and 1"));
        }
        let level = level.clamp(0.0, 1.0);
        self.volume = level;
        self.device.set_volume(level);
        Ok(level)
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn set_sleep_limit(&mut self, minutes: u64) {
        self.sleep_limit_minutes = minutes.clamp(1, MAX_SLEEP_MINUTES);
    }

    /// Stop playback `minutes` from `now`, replacing any pending timer.
    pub fn set_sleep_timer(&mut self, minutes: u64, now: Instant) -> Result<Instant> {
        if minutes == 0 || minutes > self.sleep_limit_minutes {
            return Err(Error::validation(format!(
                "sleep timer must be between 1 and {} minutes",
                self.sleep_limit_minutes
            )));
        }
        let deadline = minutes
            .checked_mul(60)
            .and_then(|secs| self.sleep.set(Duration::from_secs(secs), now))
            .ok_or_else(|| Error::validation(format!("{minutes} minutes is too far ahead")))?;
        tracing::info!(minutes, "sleep timer set");
        Ok(deadline)
    }

    pub fn cancel_sleep_timer(&mut self) -> bool {
        self.sleep.cancel()
    }

    /// Fire the sleep timer and follow on from a finished track.
    pub fn tick(&mut self, now: Instant) -> Result<Option<TickEvent>> {
        if self.sleep.poll(now) {
            tracing::info!("sleep timer expired");
            return Ok(Some(TickEvent::SleepTimerFired(self.stop())));
        }

        if self.state != PlaybackState::Playing || !self.device.is_finished() {
            return Ok(None);
        }

        match self.next_index() {
            Some(index) => {
                self.play(index)?;
                Ok(Some(TickEvent::Advanced(index)))
            }
            None => Ok(Some(TickEvent::Finished(self.stop()))),
        }
    }

    /// The current track and how far into it playback is.
    pub fn resume_point(&self) -> Option<ResumePoint> {
        self.current_track().map(|track| ResumePoint {
            track_id: track.id,
            position: self.clock.elapsed(Instant::now()),
        })
    }

    /// Select the saved track again and optionally continue from the saved
    /// position. Returns `false` when the track is no longer listed.
    pub fn restore(&mut self, point: &ResumePoint, autoplay: bool) -> Result<bool> {
        let Some(index) = self.tracks.iter().position(|t| t.id == point.track_id) else {
            return Ok(false);
        };
        if autoplay {
            self.start(index, point.position)?;
        } else {
            self.select(index)?;
        }
        Ok(true)
    }

    pub fn display(&self, now: Instant) -> DisplayState {
        let playing_track = match self.state {
            PlaybackState::Stopped => None,
            PlaybackState::Playing | PlaybackState::Paused => self.current_track(),
        };

        DisplayState {
            state: self.state,
            now_playing: playing_track.map(|t| format!("{} by {}", t.title, t.artist)),
            elapsed: self.clock.elapsed(now),
            total: playing_track.and_then(|t| t.duration),
            repeat: self.repeat,
            shuffle: self.shuffle,
            volume: self.volume,
            sleep_remaining: self.sleep.remaining(now),
        }
    }
}
