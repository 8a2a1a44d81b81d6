//! Calendar-aligned delta tracking.
//!
//! A [`TrackedEntity`] turns an absolute follower counter into "increase since
//! the start of this month/year" figures. The baselines only move when a poll
//! observes a different month or year than the previous poll, and they move
//! to the counter recorded by that previous poll.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fans_tracker::tracker::{BoundaryMode, TrackedEntity};
//!
//! let may = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
//! let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!
//! let mut entity = TrackedEntity::from_parts("2", 100, 0, 0, 5, 2024);
//! let increase = entity.update(150, &may, BoundaryMode::Legacy);
//! assert_eq!(increase.monthly_increase, 150);
//!
//! let increase = entity.update(200, &june, BoundaryMode::Legacy);
//! assert_eq!(increase.month_start_counter, 150);
//! assert_eq!(increase.monthly_increase, 50);
//! assert_eq!(increase.yearly_increase, 200);
//! ```

mod clock;
mod entity;
mod store;

pub use clock::{Clock, ClockZone, FixedClock, SystemClock};
pub use entity::{BoundaryMode, PeriodIncrease, TrackedEntity};
pub use store::{EntityHandle, TrackerStore};
