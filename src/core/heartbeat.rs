//! Presence heartbeat timer.
//!
//! Poll-driven: the owner asks `due(now)` from its event loop and writes
//! presence when it answers true. There is no background thread.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval: Duration,
    next_due: Option<Instant>,
    beats: u64,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            beats: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re)start the timer. A running timer is replaced, never duplicated.
    /// The first beat is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        matches!(self.next_due, Some(t) if now >= t)
    }

    /// Record a beat sent at `now` and schedule the next one.
    pub fn beat(&mut self, now: Instant) {
        if self.next_due.is_some() {
            self.next_due = Some(now + self.interval);
            self.beats += 1;
        }
    }

    pub fn beats(&self) -> u64 {
        self.beats
    }

    /// Time left before the next beat, `None` when stopped.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|t| t.saturating_duration_since(now))
    }

    /// Stop the timer. Cancelling a stopped timer is a no-op; returns
    /// whether anything was running.
    pub fn cancel(&mut self) -> bool {
        self.next_due.take().is_some()
    }
}
