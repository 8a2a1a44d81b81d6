use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock source used to decide which calendar period a poll falls in.
pub trait Clock: Send + Sync {
    /// Get the current wall-clock time without a zone.
    fn now(&self) -> NaiveDateTime;
}

/// Which calendar the system clock reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockZone {
    #[default]
    Local,
    Utc,
}

/// Reads the host clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    zone: ClockZone,
}

impl SystemClock {
    /// Create a clock reading the given zone.
    pub fn new(zone: ClockZone) -> Self {
        Self { zone }
    }

    /// Get the zone this clock reads.
    pub fn zone(&self) -> ClockZone {
        self.zone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.zone {
            ClockZone::Local => Local::now().naive_local(),
            ClockZone::Utc => Utc::now().naive_utc(),
        }
    }
}

/// A manually driven clock for replays and tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Create a clock stopped at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
