//! Prelude for commonly used types and traits in fans-tracker.

pub use crate::config::{AccountConfig, TrackerConfig};
pub use crate::coordinator::{Coordinator, RefreshTrigger};
pub use crate::error::{Result, TrackerError};
pub use crate::fetcher::{FetchError, FetchResult, FetcherConfig, StatClient, StatSource};
pub use crate::metric::{FansMetric, MetricSnapshot};
pub use crate::tracker::{BoundaryMode, Clock, ClockZone, TrackedEntity, TrackerStore};
pub use crate::worker::{PollStats, PollWorker};
