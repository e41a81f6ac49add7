use crate::domain::{ActiveTimer, TimerState};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Tracks remaining time for every active timer and reports each expiry once.
///
/// The monitor holds no timing of its own. Every poll recomputes remaining
/// seconds from the timers' end times, so it survives reloads and restarts.
#[derive(Debug, Default)]
pub struct TimerMonitor {
    states: Vec<TimerState>,
    fired: HashSet<String>,
}

impl TimerMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh state from `timers` and return the ones that expired since the
    /// previous poll.
    pub fn poll(&mut self, timers: &[ActiveTimer], now: DateTime<Utc>) -> Vec<ActiveTimer> {
        if timers.is_empty() {
            self.reset();
            return Vec::new();
        }

        // Forget ids that left the active set so a reused id can fire again
        self.fired.retain(|id| timers.iter().any(|t| &t.id == id));

        let mut newly_expired = Vec::new();
        self.states = timers
            .iter()
            .map(|timer| {
                let remaining_secs = timer.remaining_seconds(now);
                let expired = timer.is_expired(now);
                if expired && self.fired.insert(timer.id.clone()) {
                    newly_expired.push(timer.clone());
                }
                TimerState {
                    timer: timer.clone(),
                    remaining_secs,
                    expired,
                }
            })
            .collect();

        newly_expired
    }

    pub fn reset(&mut self) {
        self.states.clear();
        self.fired.clear();
    }

    pub fn state(&self, timer_id: &str) -> Option<&TimerState> {
        self.states.iter().find(|s| s.timer.id == timer_id)
    }
}

/// When the next timer poll is due. There is only ever one deadline.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm when timers appear, disarm when they are all gone
    pub fn sync(&mut self, has_timers: bool, now: Instant) {
        match (has_timers, self.next_due) {
            (true, None) => self.next_due = Some(now),
            (false, Some(_)) => self.next_due = None,
            _ => {}
        }
    }

    /// Poll on the next check, e.g. after a reload
    pub fn rearm(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// True once per interval while armed. Advances the deadline when taken.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
