use super::MetricsCollector;

pub struct PipelineMonitor {
    collector: MetricsCollector,
}

impl PipelineMonitor {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn generate_report(&self) -> String {
        let snapshot = self.collector.snapshot();

        if snapshot.is_empty() {
            return "No stages registered".to_string();
        }

        let mut report = String::from("=== Pipeline Metrics ===\n");

        for (stage_id, metrics) in snapshot.iter() {
            report.push_str(&format!(
                "\n[{}]\n  Received: {} sample{}\n  Forwarded: {}\n  Suppressed: {}\n  Avg Latency: {}μs\n",
                stage_id,
                metrics.samples_received,
                if metrics.samples_received == 1 { "" } else { "s" },
                metrics.samples_forwarded,
                metrics.samples_suppressed,
                metrics.avg_latency_us
            ));
        }

        report
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }
}
