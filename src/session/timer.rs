use std::time::{Duration, Instant};

/// A single pending one-shot deadline. Setting a new one replaces the old.
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepTimer {
    deadline: Option<Instant>,
}

impl SleepTimer {
    /// `None` when `now + after` cannot be represented; the pending timer
    /// is left untouched in that case.
    pub fn set(&mut self, after: Duration, now: Instant) -> Option<Instant> {
        let deadline = now.checked_add(after)?;
        self.deadline = Some(deadline);
        Some(deadline)
    }

    /// Returns whether a timer was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Elapsed play time of the current track, frozen while paused.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct Stopwatch {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Stopwatch {
    pub(super) fn start(&mut self, offset: Duration, now: Instant) {
        self.accumulated = offset;
        self.started_at = Some(now);
    }

    pub(super) fn pause(&mut self, now: Instant) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(started);
        }
    }

    pub(super) fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(super) fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }
}
