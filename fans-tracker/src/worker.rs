use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::coordinator::RefreshTrigger;

/// Background worker that triggers a refresh on a fixed interval.
///
/// The first cycle runs immediately. A failed cycle is logged and counted;
/// the next tick is the only retry.
pub struct PollWorker {
    trigger: Arc<dyn RefreshTrigger>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
    stats: PollStats,
}

/// Statistics from the poll worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl PollWorker {
    /// Create a new poll worker.
    pub fn new(
        trigger: Arc<dyn RefreshTrigger>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            trigger,
            interval,
            shutdown,
            stats: PollStats::default(),
        }
    }

    /// Run the worker until shutdown.
    ///
    /// A cycle in progress is not cancelled. Shutdown is noticed once it
    /// finishes, which for a stalled request means after the HTTP timeout.
    ///
    /// Returns the accumulated statistics from the worker's operation.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> PollStats {
        info!("Poll worker started, interval {:?}", self.interval);
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll().await;
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        }

        info!(
            "Poll worker stopped: {} cycles, {} succeeded, {} failed",
            self.stats.cycles, self.stats.succeeded, self.stats.failed
        );
        self.stats
    }

    async fn poll(&mut self) {
        self.stats.cycles += 1;
        match self.trigger.trigger_refresh().await {
            Ok(snapshot) => {
                debug!("Cycle {} produced follower={}", self.stats.cycles, snapshot.follower);
                self.stats.succeeded += 1;
            }
            Err(e) => {
                warn!("Cycle {} failed: {}", self.stats.cycles, e);
                self.stats.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::metric::MetricSnapshot;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Succeeds on odd calls, fails on even ones.
    #[derive(Default)]
    struct AlternatingTrigger {
        calls: AtomicU64,
    }

    #[async_trait]
    impl RefreshTrigger for AlternatingTrigger {
        async fn trigger_refresh(&self) -> Result<MetricSnapshot, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call % 2 == 0 {
                return Err(FetchError::Transport {
                    status: 500,
                    message: String::new(),
                });
            }
            Ok(MetricSnapshot {
                id: "2".to_string(),
                follower: call,
                following: 0,
                mid: 2,
                monthly_increase: 0,
                yearly_increase: 0,
                month_start_follower: 0,
                year_start_follower: 0,
                observed_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            })
        }
    }

    #[tokio::test]
    async fn test_worker_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let trigger = Arc::new(AlternatingTrigger::default());
        let worker = PollWorker::new(trigger, Duration::from_secs(3600), shutdown_rx);

        let handle = tokio::spawn(async move { worker.run().await });

        shutdown_tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(result.is_ok());
        let stats = result.unwrap().unwrap();
        assert!(stats.cycles <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_counts_cycles() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let trigger = Arc::new(AlternatingTrigger::default());
        let worker = PollWorker::new(trigger.clone(), Duration::from_secs(60), shutdown_rx);

        let handle = tokio::spawn(async move { worker.run().await });

        // Ticks at 0s, 60s, 120s and 180s.
        tokio::time::sleep(Duration::from_secs(181)).await;
        shutdown_tx.send(true).unwrap();

        let stats = handle.await.unwrap();
        assert_eq!(stats.cycles, 4);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 4);
    }

    /// Takes thirty seconds per cycle.
    struct StalledTrigger;

    #[async_trait]
    impl RefreshTrigger for StalledTrigger {
        async fn trigger_refresh(&self) -> Result<MetricSnapshot, FetchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(FetchError::Network {
                message: "timed out".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_finishes_cycle_before_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let worker = PollWorker::new(
            Arc::new(StalledTrigger),
            Duration::from_secs(3600),
            shutdown_rx,
        );
        let started = tokio::time::Instant::now();

        let handle = tokio::spawn(async move { worker.run().await });

        tokio::time::sleep(Duration::from_secs(1)).await;
        shutdown_tx.send(true).unwrap();

        let stats = handle.await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert_eq!(stats.cycles, 1);
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test]
    async fn test_worker_stops_when_sender_dropped() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let worker = PollWorker::new(
            Arc::new(AlternatingTrigger::default()),
            Duration::from_secs(3600),
            shutdown_rx,
        );
        let handle = tokio::spawn(async move { worker.run().await });

        drop(shutdown_tx);

        let result = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(result.is_ok());
    }
}
