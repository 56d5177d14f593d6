//! In-memory record cache behind the dashboard endpoints.
//!
//! Holds the last fetched call and load lists and derives chart metrics from
//! the calls on demand. A refresh replaces each list wholesale.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::metrics::{Metrics, MetricsMemo};
use crate::models::{CallRecord, LoadRecord};
use crate::upstream::{LoadSearch, UpstreamClient};

/// `loading` until the first call fetch resolves; `empty` when it resolved
/// to no calls; `ready` when metrics are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Empty,
    Ready,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub status: Phase,
    pub metrics: Option<Arc<Metrics>>,
    pub calls_count: usize,
    pub loads_count: usize,
}

#[derive(Clone)]
struct CallSnapshot {
    generation: u64,
    calls: Arc<Vec<CallRecord>>,
}

#[derive(Default)]
pub struct DashboardStore {
    calls: RwLock<Option<CallSnapshot>>,
    loads: RwLock<Option<Arc<Vec<LoadRecord>>>>,
    memo: Mutex<MetricsMemo>,
    generation: AtomicU64,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches calls and loads concurrently. A failed fetch is logged and
    /// stored as an empty list; there is no retry.
    pub async fn refresh(&self, upstream: &UpstreamClient) {
        let search = LoadSearch::default();
        let (calls, loads) = tokio::join!(upstream.fetch_calls(), upstream.fetch_loads(&search));

        let calls = calls.unwrap_or_else(|e| {
            tracing::error!(error = %e, "error fetching calls");
            Vec::new()
        });
        let loads = loads.unwrap_or_else(|e| {
            tracing::error!(error = %e, "error fetching loads");
            Vec::new()
        });

        tracing::info!(calls = calls.len(), loads = loads.len(), "dashboard records refreshed");
        self.replace_calls(calls).await;
        self.replace_loads(loads).await;
    }

    /// Installs a new call list. The generation is taken under the write
    /// lock, so installed snapshots always carry increasing generations.
    pub async fn replace_calls(&self, calls: Vec<CallRecord>) -> u64 {
        let mut slot = self.calls.write().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *slot = Some(CallSnapshot {
            generation,
            calls: Arc::new(calls),
        });
        generation
    }

    #[cfg(test)]
    async fn current_generation(&self) -> Option<u64> {
        self.calls.read().await.as_ref().map(|s| s.generation)
    }

    pub async fn replace_loads(&self, loads: Vec<LoadRecord>) {
        *self.loads.write().await = Some(Arc::new(loads));
    }

    pub async fn calls(&self) -> Arc<Vec<CallRecord>> {
        self.calls
            .read()
            .await
            .as_ref()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    pub async fn loads(&self) -> Arc<Vec<LoadRecord>> {
        self.loads.read().await.clone().unwrap_or_default()
    }

    pub async fn view(&self) -> DashboardView {
        let snapshot = self.calls.read().await.clone();
        let loads_count = self.loads.read().await.as_ref().map_or(0, |l| l.len());

        let Some(snapshot) = snapshot else {
            return DashboardView {
                status: Phase::Loading,
                metrics: None,
                calls_count: 0,
                loads_count,
            };
        };

        let metrics = self
            .memo
            .lock()
            .await
            .get_or_compute(snapshot.generation, &snapshot.calls);

        DashboardView {
            status: if metrics.is_some() { Phase::Ready } else { Phase::Empty },
            metrics,
            calls_count: snapshot.calls.len(),
            loads_count,
        }
    }
}
