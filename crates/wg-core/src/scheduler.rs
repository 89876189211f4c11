//! Repeating timer for stack rotation.
//!
//! The scheduler owns no clock and spawns nothing: callers pass the current
//! [`Instant`] in and ask whether a tick is due. It only decides *when*; what a
//! tick rotates is looked up by cluster id at fire time, so a tick can never
//! act on clusters from an earlier render pass.

use std::time::{Duration, Instant};

/// Default rotation period.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

/// Shortest accepted rotation period.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Longest accepted rotation period.
pub const MAX_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Stopped,
    Running { next_due: Instant },
}

/// A start/stop repeating timer driven by caller-supplied instants.
#[derive(Debug, Clone)]
pub struct RotationScheduler {
    period: Duration,
    state: SchedulerState,
}

impl RotationScheduler {
    /// Creates a stopped scheduler. The period is clamped to
    /// [`MIN_PERIOD`]..=[`MAX_PERIOD`].
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.clamp(MIN_PERIOD, MAX_PERIOD),
            state: SchedulerState::Stopped,
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    /// (Re)arms the timer one full period after `now`.
    ///
    /// Restarting a running timer discards the pending deadline.
    pub fn start(&mut self, now: Instant) {
        self.state = SchedulerState::Running {
            next_due: now + self.period,
        };
    }

    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// When the next tick fires, if running.
    pub const fn next_due(&self) -> Option<Instant> {
        match self.state {
            SchedulerState::Running { next_due } => Some(next_due),
            SchedulerState::Stopped => None,
        }
    }

    /// Reports whether a tick is due at `now`, advancing the deadline if so.
    ///
    /// Several missed periods collapse into a single tick; the next deadline
    /// stays on the original period grid.
    pub fn poll(&mut self, now: Instant) -> bool {
        let SchedulerState::Running { next_due } = self.state else {
            return false;
        };
        if now < next_due {
            return false;
        }
        let mut next = next_due + self.period;
        while next <= now {
            next += self.period;
        }
        self.state = SchedulerState::Running { next_due: next };
        true
    }
}

impl Default for RotationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}
