use std::collections::BTreeMap;
use std::sync::Arc;
use super::StageMetrics;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub stage_id: String,
    pub samples_received: u64,
    pub samples_forwarded: u64,
    pub samples_suppressed: u64,
    pub avg_latency_us: u64,
}

/// Shared registry of per-stage metrics; clones see the same counters
#[derive(Clone, Default)]
pub struct MetricsCollector {
    metrics: BTreeMap<String, Arc<StageMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, stage_id: impl Into<String>, metrics: Arc<StageMetrics>) {
        self.metrics.insert(stage_id.into(), metrics);
    }

    /// Snapshot ordered by stage id
    pub fn snapshot(&self) -> BTreeMap<String, MetricsSnapshot> {
        self.metrics
            .iter()
            .map(|(id, metrics)| {
                (
                    id.clone(),
                    MetricsSnapshot {
                        stage_id: metrics.stage_id().to_string(),
                        samples_received: metrics.samples_received(),
                        samples_forwarded: metrics.samples_forwarded(),
                        samples_suppressed: metrics.samples_suppressed(),
                        avg_latency_us: metrics.avg_latency_us(),
                    },
                )
            })
            .collect()
    }

    pub fn get_stage_metrics(&self, stage_id: &str) -> Option<Arc<StageMetrics>> {
        self.metrics.get(stage_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
