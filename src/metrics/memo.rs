use std::sync::Arc;

use crate::models::CallRecord;

use super::{aggregate, Metrics};

/// Caches the last `aggregate` result keyed by the generation of the call
/// list it was computed from. A list is never edited in place; replacing it
/// bumps the generation and the next lookup recomputes.
#[derive(Debug, Default)]
pub struct MetricsMemo {
    cached: Option<(u64, Option<Arc<Metrics>>)>,
}

impl MetricsMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, generation: u64, calls: &[CallRecord]) -> Option<Arc<Metrics>> {
        if let Some((cached_gen, metrics)) = &self.cached {
            if *cached_gen == generation {
                return metrics.clone();
            }
        }

        tracing::debug!(generation, calls = calls.len(), "recomputing call metrics");
        let metrics = aggregate(calls).map(Arc::new);
        self.cached = Some((generation, metrics.clone()));
        metrics
    }

    #[cfg(test)]
    pub fn cached_generation(&self) -> Option<u64> {
        self.cached.as_ref().map(|(generation, _)| *generation)
    }
}
