//! Refresh coordination for one tracked account.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::config::{AccountConfig, TrackerConfig};
use crate::error::Result;
use crate::fetcher::{FetchError, FetcherConfig, StatClient, StatSource};
use crate::metric::{FansMetric, MetricSnapshot};
use crate::tracker::{BoundaryMode, Clock, SystemClock, TrackerStore};

/// Something that can run a polling cycle on demand.
///
/// Schedulers (the poll worker, a CLI command, a test) only depend on this
/// trait.
#[async_trait]
pub trait RefreshTrigger: Send + Sync {
    /// Run one fetch-and-update cycle.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] of a failed cycle. A failed cycle leaves
    /// all tracker state untouched.
    async fn trigger_refresh(&self) -> std::result::Result<MetricSnapshot, FetchError>;
}

/// Runs polling cycles for one account and keeps its last good snapshot.
pub struct Coordinator {
    account: AccountConfig,
    source: Arc<dyn StatSource>,
    store: TrackerStore,
    clock: Arc<dyn Clock>,
    boundary_mode: BoundaryMode,
    latest: watch::Sender<Option<MetricSnapshot>>,
}

impl Coordinator {
    /// Create a coordinator from explicit collaborators.
    pub fn new(
        account: AccountConfig,
        source: Arc<dyn StatSource>,
        store: TrackerStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            account,
            source,
            store,
            clock,
            boundary_mode: BoundaryMode::default(),
            latest,
        }
    }

    /// Create a coordinator that polls the public API with the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the account or tracker configuration is invalid,
    /// or if the HTTP client cannot be built.
    pub fn connect(
        account: AccountConfig,
        fetcher: FetcherConfig,
        tracker: &TrackerConfig,
        store: TrackerStore,
    ) -> Result<Self> {
        account.validate()?;
        tracker.validate()?;
        let client = StatClient::new(fetcher)?;
        let clock = SystemClock::new(tracker.clock_zone());

        Ok(Self::new(account, Arc::new(client), store, Arc::new(clock))
            .with_boundary_mode(tracker.boundary_mode()))
    }

    /// Set how month boundaries are detected.
    pub fn with_boundary_mode(mut self, mode: BoundaryMode) -> Self {
        self.boundary_mode = mode;
        self
    }

    /// Get the account configuration.
    pub fn account(&self) -> &AccountConfig {
        &self.account
    }

    /// Get the tracker store shared with other coordinators.
    pub fn store(&self) -> &TrackerStore {
        &self.store
    }

    /// The snapshot of the most recent successful cycle.
    pub fn latest(&self) -> Option<MetricSnapshot> {
        self.latest.borrow().clone()
    }

    /// Render the current metric.
    pub fn metric(&self) -> FansMetric {
        FansMetric::render(&self.account, self.latest.borrow().as_ref())
    }

    /// Subscribe to snapshot updates. The receiver sees a new value after
    /// every successful cycle.
    pub fn subscribe(&self) -> watch::Receiver<Option<MetricSnapshot>> {
        self.latest.subscribe()
    }
}

#[async_trait]
impl RefreshTrigger for Coordinator {
    #[instrument(skip(self), fields(id = %self.account.id()))]
    async fn trigger_refresh(&self) -> std::result::Result<MetricSnapshot, FetchError> {
        let id = self.account.id();
        let handle = self.store.entry(id, &self.clock.now()).await;

        // Held across the fetch so overlapping refreshes of one id run one
        // after the other.
        let mut entity = handle.lock().await;

        let stat = match self.source.fetch(id).await {
            Ok(stat) => stat,
            Err(e) => {
                warn!("Refresh of {} skipped: {}", id, e);
                return Err(e);
            }
        };

        let now = self.clock.now();
        let increase = entity.update(stat.follower, &now, self.boundary_mode);
        let snapshot = MetricSnapshot::new(id, &stat, &increase, now);
        self.latest.send_replace(Some(snapshot.clone()));
        drop(entity);

        info!(
            follower = snapshot.follower,
            monthly_increase = snapshot.monthly_increase,
            yearly_increase = snapshot.yearly_increase,
            "Refreshed follower statistics"
        );
        Ok(snapshot)
    }
}
