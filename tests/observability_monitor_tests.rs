use gesturelab::observability::{MetricsCollector, PipelineMonitor, StageMetrics};
use std::sync::Arc;

#[test]
fn test_monitor_report() {
    let mut collector = MetricsCollector::new();

    let gate = Arc::new(StageMetrics::new("gate"));
    let scale = Arc::new(StageMetrics::new("scale"));

    gate.record_received();
    gate.record_received();
    gate.record_forwarded();
    gate.record_suppressed();
    scale.record_received();
    scale.record_forwarded();

    collector.register("gate", gate);
    collector.register("scale", scale);

    let monitor = PipelineMonitor::new(collector);
    let report = monitor.generate_report();

    assert!(report.contains("[gate]"));
    assert!(report.contains("[scale]"));
    assert!(report.contains("Received: 2 samples"));
    assert!(report.contains("Received: 1 sample\n"));
    assert!(report.contains("Suppressed: 1"));
}

#[test]
fn test_empty_collector_report() {
    let monitor = PipelineMonitor::new(MetricsCollector::new());
    assert_eq!(monitor.generate_report(), "No stages registered");
}

#[test]
fn test_snapshot_sees_live_counters() {
    let mut collector = MetricsCollector::new();
    let metrics = Arc::new(StageMetrics::new("fft"));
    collector.register("fft", metrics.clone());
    let shared = collector.clone();

    metrics.record_received();
    let start = metrics.start_processing();
    metrics.finish_processing(start);

    let snapshot = shared.snapshot();
    assert_eq!(snapshot["fft"].samples_received, 1);
    assert_eq!(snapshot["fft"].stage_id, "fft");
}
