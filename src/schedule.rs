//! Host-driven timers.
//!
//! Nothing here reads a clock or blocks. The host reports elapsed time and
//! the controller drains whichever timers fell due, one at a time and in
//! due order, so a handler can cancel or re-arm timers before the next one
//! is considered. Each [`TimerKind`] has at most one pending timer;
//! scheduling a kind again replaces the previous one.

use std::time::Duration;

/// The timers the tour uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One-shot: the page has had time to render after navigation.
    Settle,

    /// Recurring: inspect the page for sub-mode panels.
    ModePoll,

    /// One-shot: resume the page tour after leaving a sub-mode.
    ResumeNormal,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: TimerKind,
    due: Duration,
    every: Option<Duration>,
    seq: u64,
}

/// Pending timers against a virtual clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fires `kind` once after `delay`.
    pub fn once(&mut self, kind: TimerKind, delay: Duration) {
        self.arm(kind, delay, None);
    }

    /// Fires `kind` every `interval`, first after one interval.
    ///
    /// A zero interval is treated as one millisecond.
    pub fn every(&mut self, kind: TimerKind, interval: Duration) {
        let interval = interval.max(Duration::from_millis(1));
        self.arm(kind, interval, Some(interval));
    }

    /// Cancels the pending `kind` timer. Returns whether one was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.kind != kind);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pops the earliest timer due at or before `until`, moving the clock
    /// to its due time.
    ///
    /// Recurring timers are re-armed. One that fell several intervals
    /// behind fires for its first missed tick and then for the latest tick
    /// at or before `until`, never once per missed interval.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKind> {
        let (index, timer) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, t)| (i, *t))?;

        self.now = self.now.max(timer.due);
        match timer.every {
            Some(interval) => {
                let mut next = timer.due + interval;
                if next <= until {
                    // Ticks missed while the host was away collapse into
                    // the latest one due.
                    let behind = (until - next).as_nanos() / interval.as_nanos();
                    next += interval * u32::try_from(behind).unwrap_or(u32::MAX);
                }
                self.seq += 1;
                self.timers[index].due = next;
                self.timers[index].seq = self.seq;
            }
            None => {
                self.timers.swap_remove(index);
            }
        }
        Some(timer.kind)
    }

    /// Moves the clock forward to `until` without firing anything.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration, every: Option<Duration>) {
        self.cancel(kind);
        self.seq += 1;
        self.timers.push(Timer {
            kind,
            due: self.now + delay,
            every,
            seq: self.seq,
        });
    }
}
