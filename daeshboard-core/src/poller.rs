//! Background poller that refreshes the snapshot store.
//!
//! Every cycle visits the registered sources in display order, fetches each
//! one and commits a new snapshot only when the item list changed (or on the
//! first successful fetch). Between cycles the poller sleeps for the
//! configured interval, wakes early on a refresh request, and exits as soon as
//! the shutdown signal is raised, dropping any fetch still in flight.

use crate::error::{PollerError, SourceError};
use crate::item::Item;
use crate::snapshot::SnapshotStore;
use crate::tab::TabId;
use crate::Timestamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// Produces the current item list of one tab.
///
/// Implementations must be safe to call repeatedly and must not keep state
/// between calls beyond what one call needs for pagination.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<Item>, SourceError>;
}

/// Backoff and escalation for failing sources.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
    /// Consecutive failures of one tab that stop the poller. `1` stops on the
    /// first failure.
    pub escalate_after: u32,
}

impl RetryPolicy {
    pub fn fail_fast() -> Self {
        Self {
            initial: Duration::ZERO,
            max: Duration::ZERO,
            multiplier: 1.0,
            escalate_after: 1,
        }
    }

    /// Delay before retrying a tab that has failed `failures` times in a row.
    pub fn backoff(&self, failures: u32) -> Duration {
        let mut delay_ms = self.initial.as_millis() as f64;
        let max_ms = self.max.as_millis() as f64;
        for _ in 1..failures {
            delay_ms *= self.multiplier;
            if delay_ms >= max_ms {
                break;
            }
        }
        Duration::from_millis(delay_ms.min(max_ms) as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(10),
            max: Duration::from_secs(300),
            multiplier: 2.0,
            escalate_after: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// What one cycle did for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Committed(Timestamp),
    Unchanged,
    Failed { failures: u32 },
    /// The tab is still backing off from earlier failures.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub outcomes: Vec<(TabId, FetchOutcome)>,
}

impl CycleReport {
    pub fn outcome(&self, tab: TabId) -> Option<FetchOutcome> {
        self.outcomes
            .iter()
            .find(|(t, _)| *t == tab)
            .map(|(_, outcome)| *outcome)
    }

    pub fn committed(&self) -> Vec<TabId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FetchOutcome::Committed(_)))
            .map(|(tab, _)| *tab)
            .collect()
    }
}

/// Counters collected over the poller's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStats {
    pub cycles: u64,
    pub commits: u64,
    pub failures: u64,
}

/// Wakes a sleeping poller before its interval elapses.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    notify: Arc<Notify>,
}

impl RefreshHandle {
    pub fn request(&self) {
        self.notify.notify_one();
    }
}

struct TabSource {
    tab: TabId,
    adapter: Box<dyn SourceAdapter>,
    failures: u32,
    retry_at: Option<Timestamp>,
}

pub struct Poller {
    sources: Vec<TabSource>,
    store: Arc<SnapshotStore>,
    config: PollerConfig,
    refresh: Arc<Notify>,
    stats: PollerStats,
}

impl Poller {
    pub fn new(store: Arc<SnapshotStore>, config: PollerConfig) -> Self {
        Self {
            sources: Vec::new(),
            store,
            config,
            refresh: Arc::new(Notify::new()),
            stats: PollerStats::default(),
        }
    }

    /// Register the adapter for `tab`. Sources are fetched in registration
    /// order.
    pub fn add_source(&mut self, tab: TabId, adapter: Box<dyn SourceAdapter>) {
        self.sources.push(TabSource {
            tab,
            adapter,
            failures: 0,
            retry_at: None,
        });
    }

    pub fn refresh_handle(&self) -> RefreshHandle {
        RefreshHandle {
            notify: Arc::clone(&self.refresh),
        }
    }

    pub fn stats(&self) -> PollerStats {
        self.stats
    }

    /// Fetch every source once with the clock frozen at `now`.
    pub async fn run_cycle(&mut self, now: Timestamp) -> Result<CycleReport, PollerError> {
        self.run_cycle_with(|| now).await
    }

    /// Fetch every source once. `clock` is read after each fetch completes,
    /// so commit stamps and backoff deadlines reflect when the result landed.
    pub async fn run_cycle_with<C>(&mut self, clock: C) -> Result<CycleReport, PollerError>
    where
        C: Fn() -> Timestamp,
    {
        let mut report = CycleReport::default();
        for source in self.sources.iter_mut() {
            let outcome = poll_source(source, &self.store, &self.config.retry, &clock).await;
            match outcome {
                Ok(outcome) => {
                    match outcome {
                        FetchOutcome::Committed(_) => self.stats.commits += 1,
                        FetchOutcome::Failed { .. } => self.stats.failures += 1,
                        FetchOutcome::Unchanged | FetchOutcome::Skipped => {}
                    }
                    report.outcomes.push((source.tab, outcome));
                }
                Err(err) => {
                    self.stats.failures += 1;
                    return Err(err);
                }
            }
        }
        self.stats.cycles += 1;
        Ok(report)
    }

    /// Poll until `shutdown` turns true or its sender is dropped.
    pub async fn run(
        mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<PollerStats, PollerError> {
        let refresh = Arc::clone(&self.refresh);

        tracing::info!(
            sources = self.sources.len(),
            interval_ms = self.config.interval.as_millis() as u64,
            escalate_after = self.config.retry.escalate_after,
            "Poller started"
        );

        loop {
            tokio::select! {
                result = self.run_cycle_with(Utc::now) => {
                    if let Err(err) = result {
                        tracing::error!(error = %err, "Poller stopped after repeated source failures");
                        return Err(err);
                    }
                }
                _ = wait_for_shutdown(&mut shutdown) => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = refresh.notified() => {
                    tracing::debug!("Refresh requested");
                }
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
        }

        tracing::info!(
            cycles = self.stats.cycles,
            commits = self.stats.commits,
            failures = self.stats.failures,
            "Poller shutting down"
        );
        Ok(self.stats)
    }
}

async fn poll_source<C>(
    source: &mut TabSource,
    store: &SnapshotStore,
    retry: &RetryPolicy,
    clock: &C,
) -> Result<FetchOutcome, PollerError>
where
    C: Fn() -> Timestamp,
{
    let tab = source.tab;
    if let Some(retry_at) = source.retry_at {
        if clock() < retry_at {
            tracing::debug!(tab = %tab, retry_at = %retry_at, "Skipping tab while backing off");
            return Ok(FetchOutcome::Skipped);
        }
    }

    let fetched = source.adapter.fetch().await;
    // Views stamped while the fetch was in flight must not hide this result.
    let now = clock();
    match fetched {
        Ok(items) => {
            source.failures = 0;
            source.retry_at = None;

            let current = store.get(tab);
            if current.modified_at.is_some() && current.items == items {
                tracing::debug!(tab = %tab, source = source.adapter.name(), "Items unchanged");
                return Ok(FetchOutcome::Unchanged);
            }

            let count = items.len();
            let modified_at = store.put(tab, items, now);
            tracing::info!(tab = %tab, items = count, "Updated items for tab");
            Ok(FetchOutcome::Committed(modified_at))
        }
        Err(err) => {
            source.failures += 1;
            if source.failures >= retry.escalate_after {
                return Err(PollerError::SourceFailed {
                    tab,
                    failures: source.failures,
                    source: err,
                });
            }

            let delay = retry.backoff(source.failures);
            let delay_ms = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
            let retry_at = now
                .checked_add_signed(chrono::Duration::milliseconds(delay_ms))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            source.retry_at = Some(retry_at);

            tracing::warn!(
                tab = %tab,
                source = source.adapter.name(),
                failures = source.failures,
                retry_in_ms = delay_ms,
                error = %err,
                "Failed to get items for tab"
            );
            Ok(FetchOutcome::Failed {
                failures: source.failures,
            })
        }
    }
}

/// Resolves once the shutdown flag is set or the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
