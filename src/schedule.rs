use std::time::{Duration, Instant};

pub const PURSUER_TICK_MS: u64 = 500;

/// Periodic task driven by the host loop. Armed when a session goes live,
/// cancelled when it leaves play; a cancelled schedule is never due.
#[derive(Clone, Debug)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Fires at most once per call; the next deadline counts from `now`, so a
    /// stalled host does not get a burst of catch-up ticks.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(Duration::from_millis(PURSUER_TICK_MS))
    }
}
