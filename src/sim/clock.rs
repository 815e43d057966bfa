//! Session clock
//!
//! Two repeating intervals driven by the session's simulated time: the
//! one-second countdown and the target spawner. An interval that is `None`
//! has been torn down and can never fire again; pausing leaves them running
//! and the session simply ignores the ticks.

use crate::consts::COUNTDOWN_PERIOD_MS;

/// A repeating deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub period_ms: u64,
    pub next_due_ms: u64,
}

impl Interval {
    /// First tick one full period after `now_ms`
    pub fn starting_at(now_ms: u64, period_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    /// Schedule the following tick; None once time can't go any further
    fn rearm(self) -> Option<Self> {
        let next_due_ms = self.next_due_ms.checked_add(self.period_ms)?;
        Some(Self { next_due_ms, ..self })
    }

    /// Drop every tick due at or before `until_ms`, keeping the phase
    fn skip_past(self, until_ms: u64) -> Option<Self> {
        if self.next_due_ms > until_ms {
            return Some(self);
        }
        let missed = (until_ms - self.next_due_ms) / self.period_ms + 1;
        let next_due_ms = self
            .next_due_ms
            .checked_add(missed.checked_mul(self.period_ms)?)?;
        Some(Self { next_due_ms, ..self })
    }
}

/// Which interval fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClockTick {
    Countdown,
    Spawn,
}

#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    countdown: Option<Interval>,
    spawner: Option<Interval>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm both intervals (replacing any previous ones)
    pub fn start(&mut self, now_ms: u64, spawn_interval_ms: u64) {
        self.countdown = Some(Interval::starting_at(now_ms, COUNTDOWN_PERIOD_MS));
        self.spawner = Some(Interval::starting_at(now_ms, spawn_interval_ms));
    }

    /// Tear both intervals down for good
    pub fn stop(&mut self) {
        self.countdown = None;
        self.spawner = None;
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_some() || self.spawner.is_some()
    }

    /// Earliest pending tick; countdown goes first on a tie
    pub fn next_due(&self) -> Option<(u64, ClockTick)> {
        let countdown = self.countdown.map(|i| (i.next_due_ms, ClockTick::Countdown));
        let spawn = self.spawner.map(|i| (i.next_due_ms, ClockTick::Spawn));
        match (countdown, spawn) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Consume a tick and schedule the next one for that interval
    pub fn fire(&mut self, which: ClockTick) {
        let slot = match which {
            ClockTick::Countdown => &mut self.countdown,
            ClockTick::Spawn => &mut self.spawner,
        };
        *slot = slot.and_then(Interval::rearm);
    }

    /// Consume every tick due at or before `until_ms` without acting on them
    pub fn skip_past(&mut self, until_ms: u64) {
        self.countdown = self.countdown.and_then(|i| i.skip_past(until_ms));
        self.spawner = self.spawner.and_then(|i| i.skip_past(until_ms));
    }
}
