use std::time::Duration;

/// Recurring auto-advance timer driven by the host's frame clock.
///
/// There is only ever one schedule per timer: `start` on a running timer
/// restarts it instead of adding a second one.
#[derive(Debug, Clone)]
pub struct AutoPlayTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
    paused: bool,
}

impl AutoPlayTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms.max(1)),
            elapsed: Duration::ZERO,
            running: false,
            paused: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    // User navigated: the next auto-advance is a full interval away
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.elapsed = Duration::ZERO;
        }
    }

    /// Advance the clock by `dt` and return how many intervals completed.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        if !self.running || self.paused {
            return 0;
        }
        self.elapsed += dt;

        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}
