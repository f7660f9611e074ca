use std::cell::Cell;

use crate::model::Ms;

/// Source of "now" for calendar origins.
pub trait Clock {
    fn now_ms(&self) -> Ms;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Ms {
        // A clock before 1970 reads as the epoch.
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as Ms)
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: Cell<Ms>,
}

impl FixedClock {
    pub fn new(now: Ms) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: Ms) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Ms) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> Ms {
        self.now.get()
    }
}
