//! Periodic status polling.
//!
//! The [`UpdateScheduler`] is the only writer of the snapshot history. On every
//! tick it fetches one snapshot, appends it, recomputes metrics and publishes a
//! complete, immutable [`Dashboard`] through a watch channel. Readers never see
//! a half-updated state: each publication replaces the previous one wholesale.
//! Fetch failures publish no dashboard; they are reported on a separate
//! [`PollHealth`] channel instead.
//!
//! ```text
//!  tick ──▶ Fetching ──ok──▶ Updated ──▶ publish(Arc<Dashboard>)
//!              │
//!              └──err──▶ Skipped ──▶ report(PollHealth), history untouched
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::data::metrics::pool_load;
use crate::data::{DerivedMetrics, HistoryBuffer};
use crate::error::FetchError;
use crate::source::{Snapshot, StatusSource};

/// Fixed polling period. Throughput is a per-tick delta, so it reads as a
/// per-second rate only while this stays at one second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Receiving end of the dashboard handoff; `None` until the first success.
pub type DashboardReceiver = watch::Receiver<Option<Arc<Dashboard>>>;

/// Receiving end of the poll health channel.
pub type HealthReceiver = watch::Receiver<PollHealth>;

/// Whether recent fetches are failing, published when that changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollHealth {
    /// Failed ticks since the last success.
    pub consecutive_failures: u32,
    /// Message of the most recent failure, cleared on recovery.
    pub last_error: Option<String>,
}

impl PollHealth {
    pub fn is_failing(&self) -> bool {
        self.consecutive_failures > 0
    }
}

/// Render-ready state published after each successful tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// The snapshot fetched on this tick.
    pub latest: Arc<Snapshot>,
    /// History in chronological order, ending with `latest`.
    pub history: Vec<Arc<Snapshot>>,
    pub metrics: DerivedMetrics,
    /// Number of successful ticks so far, starting at 1.
    pub sequence: u64,
}

/// Chart points for the process counts across history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSeries {
    pub active: Vec<(f64, f64)>,
    pub idle: Vec<(f64, f64)>,
    /// Highest count in either series, for the y axis bound.
    pub max: f64,
}

impl Dashboard {
    /// Active and idle process counts, indexed by position in history.
    pub fn process_series(&self) -> ProcessSeries {
        let mut series = ProcessSeries::default();
        for (i, snapshot) in self.history.iter().enumerate() {
            let x = i as f64;
            let active = snapshot.active_processes as f64;
            let idle = snapshot.idle_processes as f64;
            series.active.push((x, active));
            series.idle.push((x, idle));
            series.max = series.max.max(active).max(idle);
        }
        series
    }

    /// Pool load for the gauge as (active, total, percent).
    ///
    /// A sample without processes withholds its load, so the gauge keeps
    /// showing the most recent sample that had one.
    pub fn pool_gauge(&self) -> Option<(u64, u64, u8)> {
        self.history.iter().rev().find_map(|s| {
            pool_load(s).map(|percent| (s.active_processes, s.total_processes, percent))
        })
    }
}

/// Where the scheduler is in its tick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next tick.
    Idle,
    /// A fetch is in flight.
    Fetching,
    /// The last tick published a new dashboard.
    Updated,
    /// The last tick failed and published nothing.
    Skipped,
}

/// Result of one tick.
#[derive(Debug)]
pub enum TickOutcome {
    Updated(Arc<Dashboard>),
    Skipped(FetchError),
}

/// Drives one status source on a fixed interval.
#[derive(Debug)]
pub struct UpdateScheduler<S> {
    source: S,
    history: HistoryBuffer,
    publisher: watch::Sender<Option<Arc<Dashboard>>>,
    health: watch::Sender<PollHealth>,
    state: SchedulerState,
    published: u64,
    consecutive_failures: u32,
}

impl<S: StatusSource + 'static> UpdateScheduler<S> {
    /// Create a scheduler and the receiver its dashboards are published on.
    pub fn new(source: S) -> (Self, DashboardReceiver) {
        Self::with_history(source, HistoryBuffer::new())
    }

    /// Create a scheduler with a custom history buffer.
    pub fn with_history(source: S, history: HistoryBuffer) -> (Self, DashboardReceiver) {
        let (publisher, receiver) = watch::channel(None);
        let (health, _) = watch::channel(PollHealth::default());
        let scheduler = Self {
            source,
            history,
            publisher,
            health,
            state: SchedulerState::Idle,
            published: 0,
            consecutive_failures: 0,
        };
        (scheduler, receiver)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Number of failed ticks since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Subscribe to failure reports.
    pub fn health(&self) -> HealthReceiver {
        self.health.subscribe()
    }

    /// Run one fetch-append-publish cycle.
    ///
    /// On failure nothing is appended or published, so readers keep seeing the
    /// last good dashboard.
    pub async fn tick(&mut self) -> TickOutcome {
        self.state = SchedulerState::Fetching;

        match self.source.fetch().await {
            Ok(snapshot) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "Status fetch recovered after {} failed tick(s)",
                        self.consecutive_failures
                    );
                    self.consecutive_failures = 0;
                    self.health.send_replace(PollHealth::default());
                }
                let dashboard = self.publish(snapshot);
                self.state = SchedulerState::Updated;
                TickOutcome::Updated(dashboard)
            }
            Err(e) => {
                self.consecutive_failures += 1;
                warn!("Error fetching status from {}: {}", self.source.description(), e);
                self.health.send_replace(PollHealth {
                    consecutive_failures: self.consecutive_failures,
                    last_error: Some(e.to_string()),
                });
                self.state = SchedulerState::Skipped;
                TickOutcome::Skipped(e)
            }
        }
    }

    fn publish(&mut self, snapshot: Snapshot) -> Arc<Dashboard> {
        let latest = Arc::new(snapshot);
        self.history.append(latest.clone());
        self.published += 1;

        let dashboard = Arc::new(Dashboard {
            latest,
            history: self.history.to_vec(),
            metrics: DerivedMetrics::compute(&self.history),
            sequence: self.published,
        });
        debug!(
            "Published dashboard #{} ({} samples)",
            dashboard.sequence,
            dashboard.history.len()
        );

        // Succeeds even when every receiver is gone.
        self.publisher.send_replace(Some(dashboard.clone()));
        dashboard
    }

    /// Tick until `shutdown` becomes `true` (or its sender is dropped).
    ///
    /// A fetch still in flight at shutdown is abandoned before it can touch
    /// the history.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Polling {} every {:?}", self.source.description(), TICK_INTERVAL);

        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            self.state = SchedulerState::Idle;

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                _ = self.tick() => {}
            }
        }

        info!("Status polling stopped after {} update(s)", self.published);
    }

    /// Spawn [`run`](Self::run) onto the current tokio runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender counts as a shutdown request.
    let _ = shutdown.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::source::testing::{snapshot_with_accepted, ScriptedSource};

    fn accepted(dashboard: &Dashboard) -> Vec<u64> {
        dashboard.history.iter().map(|s| s.accepted_conn).collect()
    }

    #[tokio::test]
    async fn test_three_ticks_publish_throughput_sequence() {
        let source = ScriptedSource::accepting(&[5, 12, 20]);
        let (mut scheduler, rx) = UpdateScheduler::new(source);
        assert!(rx.borrow().is_none());

        let mut throughputs = Vec::new();
        for _ in 0..3 {
            match scheduler.tick().await {
                TickOutcome::Updated(dashboard) => throughputs.push(dashboard.metrics.throughput),
                TickOutcome::Skipped(e) => panic!("unexpected skip: {}", e),
            }
        }

        assert_eq!(throughputs, vec![None, Some(7), Some(8)]);
        let published = rx.borrow().clone().unwrap();
        assert_eq!(published.sequence, 3);
        assert_eq!(accepted(&published), vec![5, 12, 20]);
        assert_eq!(scheduler.state(), SchedulerState::Updated);
    }

    #[tokio::test]
    async fn test_failed_tick_keeps_previous_state() {
        let source = ScriptedSource::new(vec![
            Ok(snapshot_with_accepted(5)),
            Ok(snapshot_with_accepted(12)),
            Err(FetchError::Network("connection refused".to_string())),
        ]);
        let (mut scheduler, mut rx) = UpdateScheduler::new(source);

        scheduler.tick().await;
        scheduler.tick().await;
        let before = rx.borrow_and_update().clone().unwrap();
        let history_before = scheduler.history().to_vec();

        let outcome = scheduler.tick().await;
        assert!(matches!(outcome, TickOutcome::Skipped(FetchError::Network(_))));
        assert_eq!(scheduler.state(), SchedulerState::Skipped);
        assert_eq!(scheduler.consecutive_failures(), 1);

        // Nothing new was published and the history is untouched.
        assert!(!rx.has_changed().unwrap());
        let after = rx.borrow().clone().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(scheduler.history().to_vec(), history_before);
        assert_eq!(after.metrics.throughput, Some(7));
    }

    #[tokio::test]
    async fn test_first_tick_failure_publishes_nothing() {
        let source = ScriptedSource::new(vec![Err(FetchError::Decode("eof".to_string()))]);
        let (mut scheduler, rx) = UpdateScheduler::new(source);

        assert!(matches!(scheduler.tick().await, TickOutcome::Skipped(_)));
        assert!(rx.borrow().is_none());
        assert!(scheduler.history().is_empty());
    }

    #[tokio::test]
    async fn test_recovery_resets_failure_count() {
        let source = ScriptedSource::new(vec![
            Ok(snapshot_with_accepted(1)),
            Err(FetchError::Status(502)),
            Err(FetchError::Status(502)),
            Ok(snapshot_with_accepted(9)),
        ]);
        let (mut scheduler, _rx) = UpdateScheduler::new(source);

        scheduler.tick().await;
        scheduler.tick().await;
        scheduler.tick().await;
        assert_eq!(scheduler.consecutive_failures(), 2);

        let TickOutcome::Updated(dashboard) = scheduler.tick().await else {
            panic!("expected update");
        };
        assert_eq!(scheduler.consecutive_failures(), 0);
        // Throughput spans the gap: it is relative to the last good sample.
        assert_eq!(dashboard.metrics.throughput, Some(8));
        assert_eq!(dashboard.sequence, 2);
    }

    #[tokio::test]
    async fn test_failures_are_reported_on_health_channel() {
        let source = ScriptedSource::new(vec![
            Ok(snapshot_with_accepted(1)),
            Err(FetchError::Status(502)),
            Err(FetchError::Network("connection refused".to_string())),
            Ok(snapshot_with_accepted(4)),
        ]);
        let (mut scheduler, _rx) = UpdateScheduler::new(source);
        let mut health = scheduler.health();

        scheduler.tick().await;
        assert!(!health.has_changed().unwrap());
        assert!(!health.borrow().is_failing());

        scheduler.tick().await;
        scheduler.tick().await;
        assert!(health.has_changed().unwrap());
        let failing = health.borrow_and_update().clone();
        assert_eq!(failing.consecutive_failures, 2);
        assert_eq!(
            failing.last_error.as_deref(),
            Some(FetchError::Network("connection refused".to_string()).to_string().as_str())
        );

        scheduler.tick().await;
        assert!(health.has_changed().unwrap());
        assert_eq!(*health.borrow_and_update(), PollHealth::default());
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let counts: Vec<u64> = (0..75).collect();
        let source = ScriptedSource::accepting(&counts);
        let (mut scheduler, rx) =
            UpdateScheduler::with_history(source, HistoryBuffer::with_capacity(10));

        for _ in 0..75 {
            scheduler.tick().await;
        }

        let dashboard = rx.borrow().clone().unwrap();
        assert_eq!(dashboard.history.len(), 10);
        assert_eq!(accepted(&dashboard), (65..75).collect::<Vec<_>>());
        assert_eq!(dashboard.metrics.throughput, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_publishes_until_shutdown() {
        let source = ScriptedSource::accepting(&[5, 12, 20, 30]);
        let (scheduler, mut rx) = UpdateScheduler::new(source);
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = scheduler.spawn(stop_rx);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().latest.accepted_conn, 5);

        rx.changed().await.unwrap();
        let second = rx.borrow_and_update().clone().unwrap();
        assert_eq!(second.metrics.throughput, Some(7));

        stop_tx.send(true).unwrap();
        handle.await.unwrap();

        // The scheduler is gone; its last publication is the final state.
        assert!(rx.has_changed().is_err());
        assert_eq!(rx.borrow().as_ref().unwrap().sequence, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_survives_failed_ticks() {
        let source = ScriptedSource::new(vec![
            Err(FetchError::Network("refused".to_string())),
            Ok(snapshot_with_accepted(3)),
        ]);
        let (scheduler, mut rx) = UpdateScheduler::new(source);
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = scheduler.spawn(stop_rx);

        rx.changed().await.unwrap();
        let dashboard = rx.borrow_and_update().clone().unwrap();
        assert_eq!(dashboard.sequence, 1);
        assert_eq!(dashboard.latest.accepted_conn, 3);

        drop(stop_tx);
        handle.await.unwrap();
    }

    /// Answers the first fetch at once; later fetches take five seconds.
    #[derive(Debug)]
    struct SlowSource {
        calls: Arc<AtomicU64>,
    }

    #[async_trait]
    impl StatusSource for SlowSource {
        async fn fetch(&self) -> Result<Snapshot, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call > 0 {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(snapshot_with_accepted(call * 10))
        }

        fn description(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_abandons_fetch_in_flight() {
        let calls = Arc::new(AtomicU64::new(0));
        let source = SlowSource {
            calls: calls.clone(),
        };
        let (scheduler, mut rx) = UpdateScheduler::new(source);
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = scheduler.spawn(stop_rx);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().sequence, 1);

        // The second tick fires at 1s and its fetch is still sleeping at 2s.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        stop_tx.send(true).unwrap();
        handle.await.unwrap();

        // Let the abandoned fetch's deadline pass; nothing may land.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!matches!(rx.has_changed(), Ok(true)));
        let last = rx.borrow().clone().unwrap();
        assert_eq!(last.sequence, 1);
        assert_eq!(accepted(&last), vec![0]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_process_series() {
        let history: Vec<Arc<Snapshot>> = [(1, 3), (4, 0), (2, 2)]
            .into_iter()
            .map(|(active, idle)| {
                Arc::new(Snapshot {
                    active_processes: active,
                    idle_processes: idle,
                    ..Snapshot::default()
                })
            })
            .collect();
        let dashboard = Dashboard {
            latest: history[2].clone(),
            history,
            metrics: DerivedMetrics::default(),
            sequence: 3,
        };

        let series = dashboard.process_series();
        assert_eq!(series.active, vec![(0.0, 1.0), (1.0, 4.0), (2.0, 2.0)]);
        assert_eq!(series.idle, vec![(0.0, 3.0), (1.0, 0.0), (2.0, 2.0)]);
        assert_eq!(series.max, 4.0);
    }

    #[test]
    fn test_pool_gauge_keeps_last_known_load() {
        let loaded = Arc::new(Snapshot {
            active_processes: 3,
            total_processes: 4,
            ..Snapshot::default()
        });
        let empty = Arc::new(Snapshot::default());
        let dashboard = Dashboard {
            latest: empty.clone(),
            history: vec![loaded, empty],
            metrics: DerivedMetrics::default(),
            sequence: 2,
        };
        assert_eq!(dashboard.pool_gauge(), Some((3, 4, 75)));

        let fresh = Dashboard {
            history: vec![dashboard.latest.clone()],
            ..dashboard
        };
        assert_eq!(fresh.pool_gauge(), None);
    }
}
