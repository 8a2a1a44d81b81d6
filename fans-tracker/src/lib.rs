//! # fans-tracker
//!
//! Polls the public relation statistics of an account and turns the raw
//! follower count into calendar-aligned growth figures.
//!
//! ## Overview
//!
//! Each polling cycle fetches the current follower count once, then a
//! [`TrackedEntity`](tracker::TrackedEntity) compares the wall clock with the
//! calendar period of the previous poll. When a month or year boundary has
//! been crossed, the counter recorded by the previous poll becomes the new
//! baseline. The cycle produces a [`MetricSnapshot`](metric::MetricSnapshot)
//! carrying the follower count together with the monthly and yearly increase.
//!
//! - [`fetcher`]: one HTTP GET per cycle, envelope validation, no retries.
//! - [`tracker`]: baseline bookkeeping, the per-id store and clocks.
//! - [`coordinator`]: the [`RefreshTrigger`](coordinator::RefreshTrigger)
//!   implementation tying fetcher and tracker together.
//! - [`worker`]: interval scheduling until shutdown.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fans_tracker::prelude::*;
//!
//! # async fn example() -> fans_tracker::error::Result<()> {
//! let coordinator = Coordinator::connect(
//!     AccountConfig::new("2"),
//!     FetcherConfig::new(),
//!     &TrackerConfig::new(),
//!     TrackerStore::new(),
//! )?;
//!
//! let snapshot = coordinator.trigger_refresh().await?;
//! println!(
//!     "{} followers, +{} this month",
//!     snapshot.follower, snapshot.monthly_increase
//! );
//!
//! let metric = coordinator.metric();
//! assert!(metric.available);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure handling
//!
//! A failed cycle never touches tracker state. The coordinator keeps serving
//! the last successful snapshot; the metric only reports itself unavailable
//! when no cycle has ever succeeded.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod metric;
pub mod prelude;
pub mod tracker;
pub mod worker;
