use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// How month boundaries are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Compare only the month-of-year number.
    ///
    /// A month crossing goes unnoticed when exactly twelve months (or a
    /// multiple of twelve) pass between two polls. Kept as the default so
    /// reported increases stay compatible with existing deployments.
    #[default]
    Legacy,
    /// Compare the full (year, month) key.
    Strict,
}

/// Increase figures computed by one [`TrackedEntity::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodIncrease {
    pub follower: u64,
    pub monthly_increase: i64,
    pub yearly_increase: i64,
    pub month_start_counter: u64,
    pub year_start_counter: u64,
}

/// Per-account delta bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntity {
    id: String,
    last_counter: u64,
    month_start_counter: u64,
    year_start_counter: u64,
    last_seen_month: u32,
    last_seen_year: i32,
}

impl TrackedEntity {
    /// Create an entity for `id` with zero counters, anchored to the calendar
    /// period of `now`.
    pub fn new<D: Datelike>(id: impl Into<String>, now: &D) -> Self {
        Self {
            id: id.into(),
            last_counter: 0,
            month_start_counter: 0,
            year_start_counter: 0,
            last_seen_month: now.month(),
            last_seen_year: now.year(),
        }
    }

    /// Rebuild an entity from previously recorded state.
    pub fn from_parts(
        id: impl Into<String>,
        last_counter: u64,
        month_start_counter: u64,
        year_start_counter: u64,
        last_seen_month: u32,
        last_seen_year: i32,
    ) -> Self {
        Self {
            id: id.into(),
            last_counter,
            month_start_counter,
            year_start_counter,
            last_seen_month,
            last_seen_year,
        }
    }

    /// Get the tracked account id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the counter recorded by the most recent successful poll.
    pub fn last_counter(&self) -> u64 {
        self.last_counter
    }

    /// Get the baseline of the current month.
    pub fn month_start_counter(&self) -> u64 {
        self.month_start_counter
    }

    /// Get the baseline of the current year.
    pub fn year_start_counter(&self) -> u64 {
        self.year_start_counter
    }

    /// Get the month (1 to 12) of the most recent poll.
    pub fn last_seen_month(&self) -> u32 {
        self.last_seen_month
    }

    /// Get the year of the most recent poll.
    pub fn last_seen_year(&self) -> i32 {
        self.last_seen_year
    }

    /// Record a freshly fetched counter observed at `now`.
    ///
    /// Baselines move to the counter recorded by the *previous* poll when a
    /// month or year boundary has been crossed since then. Calling this
    /// repeatedly within one period never touches the baselines.
    pub fn update<D: Datelike>(
        &mut self,
        fresh: u64,
        now: &D,
        mode: BoundaryMode,
    ) -> PeriodIncrease {
        let month_crossed = match mode {
            BoundaryMode::Legacy => now.month() != self.last_seen_month,
            BoundaryMode::Strict => {
                now.month() != self.last_seen_month || now.year() != self.last_seen_year
            }
        };
        if month_crossed {
            self.month_start_counter = self.last_counter;
            self.last_seen_month = now.month();
        }

        if now.year() != self.last_seen_year {
            self.year_start_counter = self.last_counter;
            self.last_seen_year = now.year();
        }

        let increase = PeriodIncrease {
            follower: fresh,
            monthly_increase: delta(fresh, self.month_start_counter),
            yearly_increase: delta(fresh, self.year_start_counter),
            month_start_counter: self.month_start_counter,
            year_start_counter: self.year_start_counter,
        };

        self.last_counter = fresh;
        increase
    }
}

fn delta(current: u64, baseline: u64) -> i64 {
    let delta = i128::from(current) - i128::from(baseline);
    delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
