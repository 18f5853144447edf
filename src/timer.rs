//! Step countdown timer.
//!
//! Expiry is a pure function of the current time against the recorded
//! start.  No callback is scheduled.

/// Where a [`TimerWindow`] is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    NotStarted,
    Running,
    Finished,
}

/// A fixed-length countdown owned by one process step.
#[derive(Debug, Clone)]
pub struct TimerWindow {
    total_secs: u64,
    started_at: Option<u64>,
}

impl TimerWindow {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            started_at: None,
        }
    }

    /// Start (or restart) the countdown at `now`.  Returns the end time.
    pub fn start(&mut self, now: u64) -> u64 {
        self.started_at = Some(now);
        now.saturating_add(self.total_secs)
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn state(&self, now: u64) -> TimerState {
        match self.end_at() {
            None => TimerState::NotStarted,
            Some(end) if now >= end => TimerState::Finished,
            Some(_) => TimerState::Running,
        }
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    /// End time, derived from the start time.  `None` until started.
    pub fn end_at(&self) -> Option<u64> {
        self.started_at
            .map(|start| start.saturating_add(self.total_secs))
    }

    /// Seconds left, or `None` if not started.
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.end_at().map(|end| end.saturating_sub(now))
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }
}
