//! Wall-clock implementation of the engine's tick clock.

use std::time::{Duration, Instant};

use blocktris_engine::Clock;

/// Periodic clock polled by the host loop.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    interval: Option<Duration>,
    next_due: Instant,
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalClock {
    pub fn new() -> Self {
        Self {
            interval: None,
            next_due: Instant::now(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// True once per elapsed period. A host that fell more than a period
    /// behind gets one tick, not a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        if now < self.next_due {
            return false;
        }
        self.next_due += interval;
        if self.next_due <= now {
            self.next_due = now + interval;
        }
        true
    }

    /// Time left until the next tick, None while stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.interval
            .map(|_| self.next_due.saturating_duration_since(now))
    }

    fn start_at(&mut self, now: Instant, interval_ms: u32) {
        let interval = Duration::from_millis(interval_ms.max(1) as u64);
        self.interval = Some(interval);
        self.next_due = now + interval;
    }
}

impl Clock for IntervalClock {
    fn start_periodic(&mut self, interval_ms: u32) {
        self.start_at(Instant::now(), interval_ms);
    }

    fn stop(&mut self) {
        self.interval = None;
    }
}
