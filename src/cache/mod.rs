//! In-memory cache of the analysis history and metrics summary.
//!
//! A [`HistoryCache`] is created explicitly and shared by `Arc` with whatever
//! presents it. Lifecycle: `new` → `activate` → `refresh`* → `dispose`.
//!
//! - Every load replaces the cached values wholesale. Nothing is merged.
//! - A failed history load keeps the previous history and sets `error`.
//! - A failed metrics-summary load is logged and never reaches `error`.
//! - Overlapping `refresh` calls collapse into the one already in flight.
//! - Results that land after `dispose` are dropped.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::analytics::{compute_trend_with, TrendPolicy, Trends};
use crate::api::{ApiError, RecordSource};
use crate::models::{AnalysisRecord, HistoryList, MetricsSummary};

/// Read model exposed to presentation code
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    pub history: HistoryList,
    pub metrics_summary: Option<MetricsSummary>,
    /// True while any cache load is in flight
    pub loading: bool,
    /// Last history load failure, cleared by the next successful one
    pub error: Option<String>,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// What happened to a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Fetched and applied to the cache (successfully or as an error)
    Applied,
    /// Collapsed into a refresh that was already running
    Joined,
    /// The cache was disposed; nothing was applied
    Discarded,
}

#[derive(Debug, Default)]
struct Inner {
    state: CacheState,
    in_flight: usize,
}

pub struct HistoryCache {
    source: Arc<dyn RecordSource>,
    inner: RwLock<Inner>,
    refresh_gate: Mutex<()>,
    refreshes_completed: AtomicU64,
    activated: AtomicBool,
    disposed: AtomicBool,
}

impl HistoryCache {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            inner: RwLock::new(Inner::default()),
            refresh_gate: Mutex::new(()),
            refreshes_completed: AtomicU64::new(0),
            activated: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// First call loads history and metrics concurrently; later calls do nothing
    pub async fn activate(&self) {
        if self.activated.swap(true, Ordering::AcqRel) {
            return;
        }

        tracing::debug!("Activating history cache");
        tokio::join!(self.load_history_only(), self.load_metrics_only());
    }

    /// Reload history and metrics summary together.
    ///
    /// Completes once both fetches settle. A call made while another refresh is
    /// running waits for it and reports [`CacheOutcome::Joined`].
    pub async fn refresh(&self) -> CacheOutcome {
        if self.is_disposed() {
            return CacheOutcome::Discarded;
        }

        let observed = self.refreshes_completed.load(Ordering::Acquire);
        let _gate = self.refresh_gate.lock().await;

        if self.refreshes_completed.load(Ordering::Acquire) != observed {
            tracing::debug!("Refresh already completed while waiting, reusing its result");
            return CacheOutcome::Joined;
        }

        self.begin_load().await;

        let (history, metrics) = tokio::join!(
            self.source.fetch_history_list(),
            self.source.fetch_metrics_summary()
        );

        let outcome = self
            .finish_load(|state| {
                apply_history(state, history);
                apply_metrics(state, metrics);
                state.last_refresh = Some(Utc::now());
            })
            .await;

        self.refreshes_completed.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    /// Reload only the history; failures surface through `error`
    pub async fn load_history_only(&self) -> CacheOutcome {
        if self.is_disposed() {
            return CacheOutcome::Discarded;
        }

        self.begin_load().await;
        let history = self.source.fetch_history_list().await;

        self.finish_load(|state| {
            if history.is_ok() {
                state.last_refresh = Some(Utc::now());
            }
            apply_history(state, history);
        })
        .await
    }

    /// Reload only the metrics summary; failures are logged, never surfaced
    pub async fn load_metrics_only(&self) -> CacheOutcome {
        if self.is_disposed() {
            return CacheOutcome::Discarded;
        }

        self.begin_load().await;
        let metrics = self.source.fetch_metrics_summary().await;

        self.finish_load(|state| apply_metrics(state, metrics)).await
    }

    /// Fetch a single record straight from the source, bypassing the cache
    pub async fn load_record(&self, id: i64) -> Result<AnalysisRecord, ApiError> {
        tracing::debug!("Loading record {}", id);
        self.source.fetch_record(id).await
    }

    /// Trends of `record` against its predecessor in the cached history
    pub async fn trends_for(&self, record: &AnalysisRecord, policy: &TrendPolicy) -> Trends {
        let inner = self.inner.read().await;
        compute_trend_with(record, &inner.state.history, policy)
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> CacheState {
        self.inner.read().await.state.clone()
    }

    pub async fn history(&self) -> HistoryList {
        self.inner.read().await.state.history.clone()
    }

    /// Stop applying results. Loads still in flight finish but change nothing.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            tracing::debug!("History cache disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    async fn begin_load(&self) {
        let mut inner = self.inner.write().await;
        inner.in_flight += 1;
        inner.state.loading = true;
    }

    async fn finish_load<F>(&self, apply: F) -> CacheOutcome
    where
        F: FnOnce(&mut CacheState),
    {
        let mut inner = self.inner.write().await;

        let outcome = if self.is_disposed() {
            tracing::debug!("Discarding load result for disposed cache");
            CacheOutcome::Discarded
        } else {
            apply(&mut inner.state);
            CacheOutcome::Applied
        };

        inner.in_flight = inner.in_flight.saturating_sub(1);
        inner.state.loading = inner.in_flight > 0;

        outcome
    }
}

fn apply_history(state: &mut CacheState, result: Result<Vec<AnalysisRecord>, ApiError>) {
    match result {
        Ok(records) => {
            tracing::info!("Loaded {} history records", records.len());
            state.history = HistoryList::new(records);
            state.error = None;
        }
        Err(e) => {
            tracing::warn!("Error loading history: {}", e);
            state.error = Some(e.to_string());
        }
    }
}

fn apply_metrics(state: &mut CacheState, result: Result<MetricsSummary, ApiError>) {
    match result {
        Ok(summary) => {
            tracing::debug!("Loaded metrics summary");
            state.metrics_summary = Some(summary);
        }
        Err(e) => tracing::warn!("Error loading metrics summary: {}", e),
    }
}
