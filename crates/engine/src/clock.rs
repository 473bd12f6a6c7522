//! Periodic tick source.
//!
//! The engine never registers callbacks: it tells the clock when to run and at
//! what interval, and the host calls [`crate::GameEngine::tick`] whenever the
//! clock says a period has elapsed.

pub trait Clock {
    /// Start (or restart) firing every `interval_ms`.
    fn start_periodic(&mut self, interval_ms: u32);

    /// Stop firing. Stopping a stopped clock does nothing.
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCall {
    Start(u32),
    Stop,
}

/// Clock that only records what it was told, for tests.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    calls: Vec<ClockCall>,
    interval_ms: Option<u32>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.interval_ms.is_some()
    }

    /// Current interval, None while stopped.
    pub fn interval_ms(&self) -> Option<u32> {
        self.interval_ms
    }

    pub fn calls(&self) -> &[ClockCall] {
        &self.calls
    }
}

impl Clock for ManualClock {
    fn start_periodic(&mut self, interval_ms: u32) {
        self.calls.push(ClockCall::Start(interval_ms));
        self.interval_ms = Some(interval_ms);
    }

    fn stop(&mut self) {
        self.calls.push(ClockCall::Stop);
        self.interval_ms = None;
    }
}
