//! Cancellable single-shot deferred work.
//!
//! A [`ScheduledTask`] holds at most one pending instance. Scheduling while an
//! instance is pending replaces it, so the old instance never fires. Tasks do
//! not run themselves: the owner asks for due payloads with
//! [`ScheduledTask::take_due`], passing in the current time from a [`Clock`].

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// A source of the current time.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time, so a test
/// can keep one handle and give another to an overlay.
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Shared current time.
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// A manual clock starting at the current instant.
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward.
    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }

    /// Move time forward by a number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A pending payload and the time it becomes due.
#[derive(Debug)]
struct Pending<T> {
    /// Scheduled time for the payload.
    due: Instant,
    /// What to do when the time arrives.
    payload: T,
}

/// A deferred payload with at most one pending instance.
#[derive(Debug)]
pub struct ScheduledTask<T> {
    /// The single pending instance, if any.
    pending: Option<Pending<T>>,
}

impl<T> Default for ScheduledTask<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ScheduledTask<T> {
    /// Construct an idle task.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due `delay` after `now`. Any pending
    /// instance is dropped. Returns true if an instance was replaced.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> bool {
        self.pending
            .replace(Pending {
                due: now + delay,
                payload,
            })
            .is_some()
    }

    /// Drop the pending instance, returning its payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    /// Is an instance waiting to fire?
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending instance becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Take the payload if it is due at `now`. The task is idle afterwards.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.cancel()
        } else {
            None
        }
    }
}
